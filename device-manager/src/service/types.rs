use super::icons::IconService;
use super::{null_reference, or_null, types, Envelope};
use crate::classify::{classify, Failure};
use crate::domain::{
    Device, DeviceFilter, DeviceIcon, DeviceIconInput, DeviceInput, DeviceType, DeviceTypeInput,
    Selector,
};
use crate::icons::IconStorage;
use crate::repository::{ReplaceRepository, Repository, Store};
use crate::validation::validate_body;

const DEVICES_TITLE: &str = "Get type's devices failed";
const ADD_DEVICE_TITLE: &str = "Add device with type failed";
const ICON_TITLE: &str = "Get device type's icon failed";
const RENAME_ICON_TITLE: &str = "Rename device type's icon failed";
const DELETE_ICON_TITLE: &str = "Delete device type's icon failed";

/// Devices and icon of one device type
pub struct TypeService<'a, S> {
    store: &'a S,
    storage: &'a IconStorage,
}

impl<'a, S: Store> TypeService<'a, S> {
    pub fn new(store: &'a S, storage: &'a IconStorage) -> Self {
        Self { store, storage }
    }

    async fn device_type(&self, id: i32) -> Result<DeviceType, Failure> {
        types(self.store).find(&Selector::id(id)).await
    }

    async fn icon_id(&self, id: i32, title: &str) -> Result<(DeviceType, i32), Failure> {
        let device_type = self.device_type(id).await?;
        let icon_id = device_type
            .device_icon_id
            .ok_or_else(|| null_reference(title, "DeviceIcon"))?;
        Ok((device_type, icon_id))
    }

    /// Devices of the type, optionally narrowed by group and configuration
    pub async fn devices(
        &self,
        id: i32,
        device_group_id: Option<i32>,
        configuration_id: Option<i32>,
    ) -> Envelope<Vec<Device>> {
        async {
            self.device_type(id).await?;
            let filter = DeviceFilter {
                device_type_id: Some(id),
                device_group_id,
                configuration_id,
                ..Default::default()
            };
            let found = self.store.devices().list(&filter).await?;
            if found.is_empty() {
                return Err(Failure::not_found(format!(
                    "[deviceTypeId: {}, deviceGroupId: {}, configurationId: {}]",
                    id,
                    or_null(device_group_id),
                    or_null(configuration_id)
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
            self.device_type(id).await?;
            input.device_type_id = Some(id);
            Ok(self.store.devices().add(input).await?)
        }
        .await
        .map_err(|f| classify(f, ADD_DEVICE_TITLE))
    }

    pub async fn icon(&self, id: i32) -> Envelope<DeviceIcon> {
        async {
            let (_, icon_id) = self.icon_id(id, ICON_TITLE).await?;
            IconService::new(self.store, self.storage)
                .stored(&Selector::id(icon_id))
                .await
        }
        .await
        .map_err(|f| classify(f, ICON_TITLE))
    }

    /// Rename the type's icon row and file
    pub async fn rename_icon(&self, id: i32, input: DeviceIconInput) -> Envelope<DeviceIcon> {
        validate_body(&input)?;
        async {
            let (_, icon_id) = self.icon_id(id, RENAME_ICON_TITLE).await?;
            IconService::new(self.store, self.storage)
                .rename(&Selector::id(icon_id), input)
                .await
        }
        .await
        .map_err(|f| classify(f, RENAME_ICON_TITLE))
    }

    /// Unlink the icon from the type, then delete it
    pub async fn delete_icon(&self, id: i32) -> Envelope<()> {
        async {
            let (device_type, icon_id) = self.icon_id(id, DELETE_ICON_TITLE).await?;
            let unlinked = DeviceTypeInput {
                device_icon_id: None,
                ..DeviceTypeInput::named(device_type.name)
            };
            self.store.types().update(&Selector::id(id), unlinked).await?;
            IconService::new(self.store, self.storage)
                .remove(&Selector::id(icon_id))
                .await
        }
        .await
        .map_err(|f| classify(f, DELETE_ICON_TITLE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ErrorCode;
    use crate::domain::DeviceGroupInput;
    use crate::repository::memory::MemoryStore;

    async fn type_with_icon(store: &MemoryStore, storage: &IconStorage) -> DeviceType {
        let icon = IconService::new(store, storage).add("lamp.png", b"img").await.unwrap();
        let input = DeviceTypeInput {
            device_icon_id: Some(icon.id),
            ..DeviceTypeInput::named("lamp")
        };
        store.types().add(input).await.unwrap()
    }

    #[tokio::test]
    async fn test_type_without_icon_is_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let storage = IconStorage::new(dir.path());
        let store = MemoryStore::new();
        let device_type = store.types().add(DeviceTypeInput::named("bare")).await.unwrap();
        let error = TypeService::new(&store, &storage)
            .icon(device_type.id)
            .await
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::ParameterConflict);
        assert_eq!(error.message, "DeviceIcon ID is null");
    }

    #[tokio::test]
    async fn test_rename_icon_through_type() {
        let dir = tempfile::tempdir().unwrap();
        let storage = IconStorage::new(dir.path());
        let store = MemoryStore::new();
        let device_type = type_with_icon(&store, &storage).await;
        let service = TypeService::new(&store, &storage);

        let renamed = service
            .rename_icon(device_type.id, DeviceIconInput::named("bulb.png"))
            .await
            .unwrap();
        assert_eq!(renamed.name, "bulb.png");
        assert_eq!(service.icon(device_type.id).await.unwrap(), renamed);
        assert!(storage.exists("bulb.png").await);
    }

    #[tokio::test]
    async fn test_delete_icon_unlinks_type() {
        let dir = tempfile::tempdir().unwrap();
        let storage = IconStorage::new(dir.path());
        let store = MemoryStore::new();
        let device_type = type_with_icon(&store, &storage).await;
        let service = TypeService::new(&store, &storage);

        service.delete_icon(device_type.id).await.unwrap();
        assert!(!storage.exists("lamp.png").await);
        let error = service.icon(device_type.id).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::ParameterConflict);
    }

    #[tokio::test]
    async fn test_devices_of_type_with_filters() {
        let dir = tempfile::tempdir().unwrap();
        let storage = IconStorage::new(dir.path());
        let store = MemoryStore::new();
        let device_type = store.types().add(DeviceTypeInput::named("t")).await.unwrap();
        let group = store.groups().add(DeviceGroupInput::named("g")).await.unwrap();
        let service = TypeService::new(&store, &storage);

        let error = service.devices(device_type.id, None, None).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::NoItemsFound);
        assert_eq!(
            error.message,
            format!(
                "[deviceTypeId: {}, deviceGroupId: null, configurationId: null]",
                device_type.id
            )
        );

        service
            .add_device(device_type.id, DeviceInput::named("free"))
            .await
            .unwrap();
        let grouped = DeviceInput {
            device_group_id: Some(group.id),
            ..DeviceInput::named("grouped")
        };
        service.add_device(device_type.id, grouped).await.unwrap();

        assert_eq!(service.devices(device_type.id, None, None).await.unwrap().len(), 2);
        let narrowed = service
            .devices(device_type.id, Some(group.id), None)
            .await
            .unwrap();
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].name, "grouped");
    }

    #[tokio::test]
    async fn test_add_device_to_missing_type() {
        let dir = tempfile::tempdir().unwrap();
        let storage = IconStorage::new(dir.path());
        let store = MemoryStore::new();
        let error = TypeService::new(&store, &storage)
            .add_device(3, DeviceInput::named("d"))
            .await
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::NoItemsFound);
        assert_eq!(error.title, ADD_DEVICE_TITLE);
    }
}
