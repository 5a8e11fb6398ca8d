use super::{icons, no_rows_removed, Envelope, ICON_TITLES};
use crate::classify::{classify, ClassifiedError, ErrorCode, Failure};
use crate::domain::device_icon::ICON_NAME_REGEX;
use crate::domain::{
    DeviceIcon, DeviceIconInput, DeviceType, DeviceTypeFilter, DeviceTypeInput, FilterSet,
    Selector, ICON_NAME_PATTERN,
};
use crate::icons::IconStorage;
use crate::repository::{ReplaceRepository, Repository, Store};
use crate::validation::{check_minimum_filters, validate_body};

/// Title of an icon name rejected by the file name pattern
pub const ICON_NAME_TITLE: &str = "Parameter validation";

const FILE_TITLE: &str = "Get device icon failed";
const TYPES_TITLE: &str = "Get icon's types failed";
const ADD_TYPE_TITLE: &str = "Add type with icon failed";

/// Icon rows kept in step with their files
///
/// Every write touches the row first and the file second. A row whose file
/// is missing is treated as absent.
pub struct IconService<'a, S> {
    store: &'a S,
    storage: &'a IconStorage,
}

impl<'a, S: Store> IconService<'a, S> {
    pub fn new(store: &'a S, storage: &'a IconStorage) -> Self {
        Self { store, storage }
    }

    pub async fn list(&self, filter: &Selector) -> Envelope<Vec<DeviceIcon>> {
        icons(self.store).list(filter).await
    }

    /// Store a new icon row and its image
    pub async fn add(&self, name: &str, image: &[u8]) -> Envelope<DeviceIcon> {
        check_icon_name(name)?;
        let icon = icons(self.store).add(DeviceIconInput::named(name)).await?;
        if let Err(error) = self.storage.save(&icon.name, image).await {
            tracing::error!(icon = %icon.name, "Icon file write failed, removing row: {}", error);
            if let Err(rollback) = self.store.icons().delete(&Selector::id(icon.id)).await {
                tracing::warn!(icon = %icon.name, "Icon row rollback failed: {}", rollback);
            }
            return Err(classify(error.into(), ICON_TITLES.add));
        }
        tracing::info!(icon_id = icon.id, icon = %icon.name, "Added device icon");
        Ok(icon)
    }

    pub async fn update(&self, selector: &Selector, input: DeviceIconInput) -> Envelope<DeviceIcon> {
        validate_body(&input)?;
        check_minimum_filters(selector)?;
        self.rename(selector, input)
            .await
            .map_err(|f| classify(f, ICON_TITLES.update))
    }

    pub async fn delete(&self, selector: &Selector) -> Envelope<()> {
        check_minimum_filters(selector)?;
        self.remove(selector)
            .await
            .map_err(|f| classify(f, ICON_TITLES.delete))
    }

    /// Image bytes of the icon named `name`
    pub async fn file(&self, name: &str) -> Envelope<Vec<u8>> {
        check_icon_name(name)?;
        async {
            let icon = self.stored(&Selector::name(name)).await?;
            Ok(self.storage.load(&icon.name).await?)
        }
        .await
        .map_err(|f| classify(f, FILE_TITLE))
    }

    /// Device types pictured by the icon
    pub async fn types(&self, id: i32) -> Envelope<Vec<DeviceType>> {
        async {
            icons(self.store).find(&Selector::id(id)).await?;
            let filter = DeviceTypeFilter {
                device_icon_id: Some(id),
                ..Default::default()
            };
            let found = self.store.types().list(&filter).await?;
            if found.is_empty() {
                return Err(Failure::not_found(format!("[deviceIconId: {}]", id)));
            }
            Ok(found)
        }
        .await
        .map_err(|f| classify(f, TYPES_TITLE))
    }

    pub async fn add_type(&self, id: i32, mut input: DeviceTypeInput) -> Envelope<DeviceType> {
        validate_body(&input)?;
        async {
            icons(self.store).find(&Selector::id(id)).await?;
            input.device_icon_id = Some(id);
            Ok(self.store.types().add(input).await?)
        }
        .await
        .map_err(|f| classify(f, ADD_TYPE_TITLE))
    }

    /// Icon row selected by `selector` whose file is also present
    pub(crate) async fn stored(&self, selector: &Selector) -> Result<DeviceIcon, Failure> {
        let icon = icons(self.store).find(selector).await?;
        if !self.storage.exists(&icon.name).await {
            tracing::warn!(icon = %icon.name, "Icon row has no stored file");
            return Err(Failure::not_found(selector.describe()));
        }
        Ok(icon)
    }

    /// Rename the row, then the file
    ///
    /// A failed file rename puts the original name back on the row.
    pub(crate) async fn rename(
        &self,
        selector: &Selector,
        input: DeviceIconInput,
    ) -> Result<DeviceIcon, Failure> {
        check_icon_name(input.name())?;
        let original = self.stored(selector).await?;
        let renamed = self.store.icons().update(selector, input).await?;
        if renamed.name == original.name {
            return Ok(renamed);
        }

        if let Err(error) = self.storage.rename(&original.name, &renamed.name).await {
            tracing::error!(
                icon = %original.name,
                target = %renamed.name,
                "Icon file rename failed, restoring row name: {}", error
            );
            let restore = DeviceIconInput::named(original.name.clone());
            let renamed_selector = Selector::id(renamed.id);
            let restored = self.store.icons().update(&renamed_selector, restore);
            if let Err(rollback) = restored.await {
                tracing::warn!(icon = %original.name, "Icon row rollback failed: {}", rollback);
            }
            return Err(error.into());
        }
        Ok(renamed)
    }

    /// Delete the row, then the file
    pub(crate) async fn remove(&self, selector: &Selector) -> Result<(), Failure> {
        let icon = self.stored(selector).await?;
        if !self.store.icons().delete(selector).await? {
            return Err(no_rows_removed());
        }
        self.storage.remove(&icon.name).await?;
        Ok(())
    }
}

fn check_icon_name(name: &str) -> Result<(), ClassifiedError> {
    if ICON_NAME_PATTERN.is_match(name) {
        return Ok(());
    }
    Err(ClassifiedError::new(
        ICON_NAME_TITLE,
        format!("Device icon name {} does not meet regex pattern: {}", name, ICON_NAME_REGEX),
        ErrorCode::ParameterValidationError,
    ))
}
