use futures::future::try_join_all;
use validator::Validate;

use super::{devices, Envelope, ResourceService, Titles};
use crate::classify::{classify, Failure};
use crate::domain::{Device, DeviceSelector, FilterSet, LocationInput, MeasurementInput, TimeFilter};
use crate::repository::{Repository, RepositoryResult, Store};
use crate::validation::validate_body;

/// Payloads written against a device
pub trait DeviceScoped {
    fn device_id(&self) -> Option<i32>;
}

impl DeviceScoped for LocationInput {
    fn device_id(&self) -> Option<i32> {
        self.device_id
    }
}

impl DeviceScoped for MeasurementInput {
    fn device_id(&self) -> Option<i32> {
        self.device_id
    }
}

/// Time series of one device: locations or measurements
pub struct SeriesService<'a, S, R> {
    store: &'a S,
    resource: ResourceService<'a, R>,
    titles: &'static Titles,
}

impl<'a, S, R> SeriesService<'a, S, R>
where
    S: Store,
    R: Repository<Filter = TimeFilter, Selector = TimeFilter>,
    R::Input: Validate + DeviceScoped,
{
    pub fn new(store: &'a S, repo: &'a R, titles: &'static Titles) -> Self {
        Self {
            store,
            resource: ResourceService::new(repo, titles),
            titles,
        }
    }

    pub async fn list(&self, filter: &TimeFilter) -> Envelope<Vec<R::Entity>> {
        self.resource.list(filter).await
    }

    /// Add a record for an existing device
    pub async fn add(&self, input: R::Input) -> Envelope<R::Entity> {
        validate_body(&input)?;
        async {
            let device_id = input.device_id().unwrap_or_default();
            devices(self.store).find(&DeviceSelector::id(device_id)).await?;
            Ok(self.resource.repo().add(input).await?)
        }
        .await
        .map_err(|f| classify(f, self.titles.add))
    }

    /// Delete every record in the window; an empty window is rejected
    pub async fn delete(&self, filter: &TimeFilter) -> Envelope<()> {
        self.resource.delete(filter).await
    }
}

/// Union of every device's records in the window, in device order
pub(crate) async fn fan_out_list<R>(
    repo: &R,
    devices: &[Device],
    window: &TimeFilter,
) -> RepositoryResult<Vec<R::Entity>>
where
    R: Repository<Filter = TimeFilter>,
{
    let filters: Vec<TimeFilter> = devices.iter().map(|d| window.for_device(d.id)).collect();
    let lists = try_join_all(filters.iter().map(|filter| repo.list(filter))).await?;
    Ok(lists.into_iter().flatten().collect())
}

/// Delete each device's records in the window, one device at a time
///
/// Returns whether any rows were removed. Deletes already applied stay
/// applied when a later one fails.
pub(crate) async fn fan_out_delete<R>(
    repo: &R,
    devices: &[Device],
    window: &TimeFilter,
) -> Result<bool, Failure>
where
    R: Repository<Selector = TimeFilter>,
{
    let mut removed_any = false;
    for device in devices {
        match repo.delete(&window.for_device(device.id)).await {
            Ok(removed) => removed_any |= removed,
            Err(error) => {
                if removed_any {
                    tracing::warn!(
                        device_id = device.id,
                        window = %window.describe(),
                        "Group delete failed part way, earlier deletes were kept: {}",
                        error
                    );
                }
                return Err(error.into());
            }
        }
    }
    Ok(removed_any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ErrorCode;
    use crate::domain::{time, DeviceInput};
    use crate::repository::memory::MemoryStore;
    use crate::service::{LOCATION_TITLES, MEASUREMENT_TITLES};

    #[tokio::test]
    async fn test_add_requires_existing_device() {
        let store = MemoryStore::new();
        let service = SeriesService::new(&store, store.locations(), &LOCATION_TITLES);
        let error = service.add(LocationInput::new(7, 1.0, 2.0)).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::NoItemsFound);
        assert_eq!(error.title, "Add location failed");
    }

    #[tokio::test]
    async fn test_add_rejects_missing_coordinates() {
        let store = MemoryStore::new();
        let service = SeriesService::new(&store, store.locations(), &LOCATION_TITLES);
        let input = LocationInput {
            latitude: None,
            ..LocationInput::new(1, 1.0, 2.0)
        };
        let error = service.add(input).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::ParameterValidationError);
        assert_eq!(error.message, "Invalid value (null) for parameter latitude");
    }

    #[tokio::test]
    async fn test_delete_with_no_filters_is_rejected() {
        let store = MemoryStore::new();
        let device = store.devices().add(DeviceInput::named("d")).await.unwrap();
        store
            .locations()
            .add(LocationInput::new(device.id, 1.0, 2.0))
            .await
            .unwrap();
        let service = SeriesService::new(&store, store.locations(), &LOCATION_TITLES);

        let error = service.delete(&TimeFilter::default()).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::ParameterValidationError);
        let rows = service.list(&TimeFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_time_window_query() {
        let store = MemoryStore::new();
        let device = store.devices().add(DeviceInput::named("d")).await.unwrap();
        let service = SeriesService::new(&store, store.locations(), &LOCATION_TITLES);
        for at in ["01-01-2017 00:00:10", "01-01-2017 00:00:20"] {
            let input = LocationInput::new(device.id, 1.0, 2.0).at(time::parse(at).unwrap());
            service.add(input).await.unwrap();
        }

        let window = TimeFilter {
            start_time: time::parse("01-01-2017 00:00:05").ok(),
            end_time: time::parse("01-01-2017 00:00:15").ok(),
            ..Default::default()
        };
        let rows = service.list(&window).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(time::format(&rows[0].time), "01-01-2017 00:00:10");
    }

    #[tokio::test]
    async fn test_omitted_time_is_assigned() {
        let store = MemoryStore::new();
        let device = store.devices().add(DeviceInput::named("d")).await.unwrap();
        let service = SeriesService::new(&store, store.measurements(), &MEASUREMENT_TITLES);
        let added = service
            .add(MeasurementInput::new(device.id, serde_json::json!({"t": 1})))
            .await
            .unwrap();
        let window = TimeFilter {
            exact_time: Some(added.time),
            ..TimeFilter::default()
        };
        assert_eq!(service.list(&window).await.unwrap().len(), 1);
    }
}
