//! Service layer
//!
//! Services wrap repository calls and hand back an [`Envelope`]: the payload
//! on success or a [`ClassifiedError`] carrying the title of the operation
//! that failed. Filter validation for update and delete happens here; deciding
//! that an empty top-level listing is "not found" is left to the handlers.

mod configurations;
mod devices;
mod groups;
mod icons;
mod resource;
mod series;
mod types;

pub use configurations::ConfigurationService;
pub use devices::DeviceService;
pub use groups::GroupService;
pub use icons::{IconService, ICON_NAME_TITLE};
pub use resource::{ResourceService, Titles};
pub use series::SeriesService;
pub use types::TypeService;

use crate::classify::{ClassifiedError, Failure};
use crate::repository::{RepositoryError, RepositoryOperation, Store};

/// Outcome of a service call
pub type Envelope<T> = Result<T, ClassifiedError>;

pub static DEVICE_TITLES: Titles = Titles {
    list: "Get devices failed",
    add: "Add device failed",
    update: "Update device failed",
    delete: "Delete device failed",
};

pub static GROUP_TITLES: Titles = Titles {
    list: "Get device groups failed",
    add: "Add device group failed",
    update: "Update device group failed",
    delete: "Delete device group failed",
};

pub static TYPE_TITLES: Titles = Titles {
    list: "Get device types failed",
    add: "Add device type failed",
    update: "Update device type failed",
    delete: "Delete device type failed",
};

pub static ICON_TITLES: Titles = Titles {
    list: "Get device icons failed",
    add: "Add device icon failed",
    update: "Update device icon failed",
    delete: "Delete device icon failed",
};

pub static CONFIGURATION_TITLES: Titles = Titles {
    list: "Get configurations failed",
    add: "Add configuration failed",
    update: "Update configuration failed",
    delete: "Delete configuration failed",
};

pub static LOCATION_TITLES: Titles = Titles {
    list: "Get locations failed",
    add: "Add location failed",
    update: "Update location failed",
    delete: "Delete location failed",
};

pub static MEASUREMENT_TITLES: Titles = Titles {
    list: "Get measurements failed",
    add: "Add measurement failed",
    update: "Update measurement failed",
    delete: "Delete measurements failed",
};

pub fn devices<S: Store>(store: &S) -> ResourceService<'_, S::Devices> {
    ResourceService::new(store.devices(), &DEVICE_TITLES)
}

pub fn groups<S: Store>(store: &S) -> ResourceService<'_, S::Groups> {
    ResourceService::new(store.groups(), &GROUP_TITLES)
}

pub fn types<S: Store>(store: &S) -> ResourceService<'_, S::Types> {
    ResourceService::new(store.types(), &TYPE_TITLES)
}

pub fn icons<S: Store>(store: &S) -> ResourceService<'_, S::Icons> {
    ResourceService::new(store.icons(), &ICON_TITLES)
}

pub fn configurations<S: Store>(store: &S) -> ResourceService<'_, S::Configurations> {
    ResourceService::new(store.configurations(), &CONFIGURATION_TITLES)
}

/// A delete that found its target but removed nothing
pub(crate) fn no_rows_removed() -> Failure {
    RepositoryError::database_error(RepositoryOperation::Delete, "No rows removed").into()
}

/// Optional id for not-found messages
pub(crate) fn or_null(value: Option<i32>) -> String {
    value.map_or_else(|| "null".to_string(), |v| v.to_string())
}

/// A device or type whose reference to `entity` is unset
pub(crate) fn null_reference(title: &str, entity: &str) -> Failure {
    ClassifiedError::conflict(title, format!("{} ID is null", entity)).into()
}
