use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{render, FilterSet, NAME_PATTERN};

/// A managed device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i32,
    pub name: String,
    pub device_type_id: Option<i32>,
    pub device_group_id: Option<i32>,
    pub configuration_id: Option<i32>,
    /// Generated on add, never client supplied
    pub authentication_key: String,
}

/// Payload accepted on add and full-replace update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeviceInput {
    #[validate(required, regex = "NAME_PATTERN")]
    pub name: Option<String>,
    pub device_type_id: Option<i32>,
    pub device_group_id: Option<i32>,
    pub configuration_id: Option<i32>,
}

impl DeviceInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Stored name; validation guarantees presence before storage is reached
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// List filters for devices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub device_type_id: Option<i32>,
    pub device_group_id: Option<i32>,
    pub configuration_id: Option<i32>,
    pub authentication_key: Option<String>,
}

impl DeviceFilter {
    pub fn id(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn matches(&self, device: &Device) -> bool {
        self.id.is_none_or(|v| v == device.id)
            && self.name.as_deref().is_none_or(|v| v == device.name)
            && self.device_type_id.is_none_or(|v| Some(v) == device.device_type_id)
            && self.device_group_id.is_none_or(|v| Some(v) == device.device_group_id)
            && self.configuration_id.is_none_or(|v| Some(v) == device.configuration_id)
            && self
                .authentication_key
                .as_deref()
                .is_none_or(|v| v == device.authentication_key)
    }
}

impl FilterSet for DeviceFilter {
    fn entries(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("id", render(&self.id)),
            ("name", self.name.clone()),
            ("deviceTypeId", render(&self.device_type_id)),
            ("deviceGroupId", render(&self.device_group_id)),
            ("configurationId", render(&self.configuration_id)),
            ("authenticationKey", self.authentication_key.clone()),
        ]
    }
}

/// Update and delete target for devices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSelector {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub authentication_key: Option<String>,
}

impl DeviceSelector {
    pub fn id(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

impl FilterSet for DeviceSelector {
    fn entries(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("id", render(&self.id)),
            ("name", self.name.clone()),
            ("authenticationKey", self.authentication_key.clone()),
        ]
    }
}

impl From<&DeviceSelector> for DeviceFilter {
    fn from(selector: &DeviceSelector) -> Self {
        Self {
            id: selector.id,
            name: selector.name.clone(),
            authentication_key: selector.authentication_key.clone(),
            ..Default::default()
        }
    }
}

/// Fresh 32 character authentication key
pub fn generate_authentication_key() -> String {
    Uuid::new_v4().simple().to_string()
}
