use super::{configurations, devices, groups, icons, null_reference, types, Envelope};
use crate::classify::{classify, Failure};
use crate::domain::{
    Configuration, Device, DeviceGroup, DeviceIcon, DeviceSelector, DeviceType, FilterSet,
    Location, Measurement, Selector, TimeFilter,
};
use crate::repository::{Repository, Store};

const GROUP_TITLE: &str = "Get device's group failed";
const TYPE_TITLE: &str = "Get device's type failed";
const ICON_TITLE: &str = "Get device's icon failed";
const CONFIGURATION_TITLE: &str = "Get device's configuration failed";
const LOCATIONS_TITLE: &str = "Get device's location updates failed";
const MEASUREMENTS_TITLE: &str = "Get device's measurements failed";

/// Records a single device refers to
pub struct DeviceService<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> DeviceService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    async fn device(&self, id: i32) -> Result<Device, Failure> {
        devices(self.store).find(&DeviceSelector::id(id)).await
    }

    pub async fn group(&self, id: i32) -> Envelope<DeviceGroup> {
        async {
            let device = self.device(id).await?;
            let group_id = device
                .device_group_id
                .ok_or_else(|| null_reference(GROUP_TITLE, "DeviceGroup"))?;
            groups(self.store).find(&Selector::id(group_id)).await
        }
        .await
        .map_err(|f| classify(f, GROUP_TITLE))
    }

    pub async fn device_type(&self, id: i32) -> Envelope<DeviceType> {
        async {
            let device = self.device(id).await?;
            let type_id = device
                .device_type_id
                .ok_or_else(|| null_reference(TYPE_TITLE, "DeviceType"))?;
            types(self.store).find(&Selector::id(type_id)).await
        }
        .await
        .map_err(|f| classify(f, TYPE_TITLE))
    }

    /// Icon of the device's type
    pub async fn icon(&self, id: i32) -> Envelope<DeviceIcon> {
        async {
            let device = self.device(id).await?;
            let type_id = device
                .device_type_id
                .ok_or_else(|| null_reference(ICON_TITLE, "DeviceType"))?;
            let device_type = types(self.store).find(&Selector::id(type_id)).await?;
            let icon_id = device_type
                .device_icon_id
                .ok_or_else(|| null_reference(ICON_TITLE, "DeviceIcon"))?;
            icons(self.store).find(&Selector::id(icon_id)).await
        }
        .await
        .map_err(|f| classify(f, ICON_TITLE))
    }

    pub async fn configuration(&self, id: i32) -> Envelope<Configuration> {
        async {
            let device = self.device(id).await?;
            let configuration_id = device
                .configuration_id
                .ok_or_else(|| null_reference(CONFIGURATION_TITLE, "Configuration"))?;
            configurations(self.store)
                .find(&Selector::id(configuration_id))
                .await
        }
        .await
        .map_err(|f| classify(f, CONFIGURATION_TITLE))
    }

    pub async fn locations(&self, id: i32, window: &TimeFilter) -> Envelope<Vec<Location>> {
        async {
            self.device(id).await?;
            let filter = window.for_device(id);
            let rows = self.store.locations().list(&filter).await?;
            non_empty(rows, &filter)
        }
        .await
        .map_err(|f| classify(f, LOCATIONS_TITLE))
    }

    pub async fn measurements(&self, id: i32, window: &TimeFilter) -> Envelope<Vec<Measurement>> {
        async {
            self.device(id).await?;
            let filter = window.for_device(id);
            let rows = self.store.measurements().list(&filter).await?;
            non_empty(rows, &filter)
        }
        .await
        .map_err(|f| classify(f, MEASUREMENTS_TITLE))
    }
}

fn non_empty<T>(rows: Vec<T>, filter: &TimeFilter) -> Result<Vec<T>, Failure> {
    if rows.is_empty() {
        return Err(Failure::not_found(filter.describe()));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ErrorCode;
    use crate::domain::{DeviceGroupInput, DeviceInput, LocationInput};
    use crate::repository::memory::MemoryStore;

    #[tokio::test]
    async fn test_null_group_is_conflict() {
        let store = MemoryStore::new();
        let device = store.devices().add(DeviceInput::named("d")).await.unwrap();
        let error = DeviceService::new(&store).group(device.id).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::ParameterConflict);
        assert_eq!(error.message, "DeviceGroup ID is null");
        assert_eq!(error.title, GROUP_TITLE);
    }

    #[tokio::test]
    async fn test_group_resolves() {
        let store = MemoryStore::new();
        let group = store.groups().add(DeviceGroupInput::named("g")).await.unwrap();
        let input = DeviceInput {
            device_group_id: Some(group.id),
            ..DeviceInput::named("d")
        };
        let device = store.devices().add(input).await.unwrap();
        let found = DeviceService::new(&store).group(device.id).await.unwrap();
        assert_eq!(found, group);
    }

    #[tokio::test]
    async fn test_missing_device_is_not_found() {
        let store = MemoryStore::new();
        let error = DeviceService::new(&store).device_type(42).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::NoItemsFound);
        assert_eq!(error.message, "[id: 42, name: null, authenticationKey: null]");
    }

    #[tokio::test]
    async fn test_locations_for_device() {
        let store = MemoryStore::new();
        let device = store.devices().add(DeviceInput::named("d")).await.unwrap();
        let service = DeviceService::new(&store);

        let error = service.locations(device.id, &TimeFilter::default()).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::NoItemsFound);

        store
            .locations()
            .add(LocationInput::new(device.id, 1.0, 2.0))
            .await
            .unwrap();
        let rows = service.locations(device.id, &TimeFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
