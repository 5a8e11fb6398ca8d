use super::{configurations, or_null, Envelope};
use crate::classify::{classify, Failure};
use crate::domain::{Device, DeviceFilter, DeviceInput, Selector};
use crate::repository::{Repository, Store};
use crate::validation::validate_body;

const DEVICES_TITLE: &str = "Get configuration's devices failed";
const ADD_DEVICE_TITLE: &str = "Add device with configuration failed";

/// Devices running one configuration
pub struct ConfigurationService<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> ConfigurationService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn devices(
        &self,
        id: i32,
        device_type_id: Option<i32>,
        device_group_id: Option<i32>,
    ) -> Envelope<Vec<Device>> {
        async {
            configurations(self.store).find(&Selector::id(id)).await?;
            let filter = DeviceFilter {
                configuration_id: Some(id),
                device_type_id,
                device_group_id,
                ..Default::default()
            };
            let found = self.store.devices().list(&filter).await?;
            if found.is_empty() {
                return Err(Failure::not_found(format!(
                    "[configurationId: {}, deviceTypeId: {}, deviceGroupId: {}]",
                    id,
                    or_null(device_type_id),
                    or_null(device_group_id)
                )));
            }
            Ok(found)
        }
        .await
        .map_err(|f| classify(f, DEVICES_TITLE))
    }

    pub async fn add_device(&self, id: i32, mut input: DeviceInput) -> Envelope<Device> {
        validate_body(&input)?;
        async {
            configurations(self.store).find(&Selector::id(id)).await?;
            input.configuration_id = Some(id);
            Ok(self.store.devices().add(input).await?)
        }
        .await
        .map_err(|f| classify(f, ADD_DEVICE_TITLE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ErrorCode;
    use crate::domain::ConfigurationInput;
    use crate::repository::memory::MemoryStore;

    #[tokio::test]
    async fn test_add_and_list_devices() {
        let store = MemoryStore::new();
        let configuration = store
            .configurations()
            .add(ConfigurationInput::named("c"))
            .await
            .unwrap();
        let service = ConfigurationService::new(&store);

        let device = service
            .add_device(configuration.id, DeviceInput::named("d"))
            .await
            .unwrap();
        assert_eq!(device.configuration_id, Some(configuration.id));
        assert_eq!(
            service.devices(configuration.id, None, None).await.unwrap(),
            vec![device]
        );
    }

    #[tokio::test]
    async fn test_missing_configuration() {
        let store = MemoryStore::new();
        let error = ConfigurationService::new(&store)
            .devices(9, None, None)
            .await
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::NoItemsFound);
        assert_eq!(error.message, "[id: 9, name: null]");
        assert_eq!(error.title, DEVICES_TITLE);
    }

    #[tokio::test]
    async fn test_invalid_body_checked_first() {
        let store = MemoryStore::new();
        let error = ConfigurationService::new(&store)
            .add_device(9, DeviceInput::default())
            .await
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::ParameterValidationError);
        assert_eq!(error.message, "Invalid value (null) for parameter name");
    }
}
