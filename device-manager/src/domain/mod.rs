//! Domain records, write payloads and filter sets
//!
//! Each entity comes as three shapes: the persisted record, the payload
//! accepted on add/update (validated with `validator`), and the filter set
//! used to narrow list, update and delete calls. A filter left as `None` is
//! ignored rather than matched.

pub mod configuration;
pub mod device;
pub mod device_group;
pub mod device_icon;
pub mod device_type;
pub mod location;
pub mod measurement;
pub mod time;

use std::borrow::Cow;
use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

pub use configuration::{Configuration, ConfigurationInput};
pub use device::{Device, DeviceFilter, DeviceInput, DeviceSelector};
pub use device_group::{DeviceGroup, DeviceGroupInput};
pub use device_icon::{DeviceIcon, DeviceIconInput, ICON_NAME_PATTERN};
pub use device_type::{DeviceType, DeviceTypeFilter, DeviceTypeInput};
pub use location::{Location, LocationInput};
pub use measurement::{Measurement, MeasurementInput};
pub use time::TimeFilter;

/// Entity names: letters, digits and `_ .,-`, 1 to 50 characters
pub static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_ .,-]{1,50}$").expect("valid name pattern"));

/// Free-text descriptions, 1 to 100 characters
pub static DESCRIPTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_ .,-]{1,100}$").expect("valid description pattern")
});

/// A set of optional filters narrowing a repository call
pub trait FilterSet {
    /// Filter names paired with their rendered values, `None` when unset
    fn entries(&self) -> Vec<(&'static str, Option<String>)>;

    /// Whether every filter is unset
    fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, value)| value.is_none())
    }

    /// Render as `[name: value, ...]`, printing unset filters as `null`
    fn describe(&self) -> String {
        let parts: Vec<String> = self
            .entries()
            .into_iter()
            .map(|(name, value)| format!("{}: {}", name, value.as_deref().unwrap_or("null")))
            .collect();
        format!("[{}]", parts.join(", "))
    }
}

/// Id/name selector shared by the named entities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub id: Option<i32>,
    pub name: Option<String>,
}

impl Selector {
    /// Select by id only
    pub fn id(id: i32) -> Self {
        Self {
            id: Some(id),
            name: None,
        }
    }

    /// Select by name only
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    /// Whether a record with `id` and `name` matches every set filter
    pub fn matches(&self, id: i32, name: &str) -> bool {
        self.id.is_none_or(|v| v == id) && self.name.as_deref().is_none_or(|v| v == name)
    }
}

impl FilterSet for Selector {
    fn entries(&self) -> Vec<(&'static str, Option<String>)> {
        vec![("id", render(&self.id)), ("name", self.name.clone())]
    }
}

impl From<&Selector> for Selector {
    fn from(selector: &Selector) -> Self {
        selector.clone()
    }
}

/// Render an optional filter value for messages
pub(crate) fn render<T: Display>(value: &Option<T>) -> Option<String> {
    value.as_ref().map(ToString::to_string)
}

/// Require a JSON object (not an array or scalar)
pub(crate) fn validate_json_object(value: &serde_json::Value) -> Result<(), ValidationError> {
    if value.is_object() {
        return Ok(());
    }
    let mut error = ValidationError::new("json_object");
    error.add_param(Cow::from("value"), value);
    Err(error)
}
