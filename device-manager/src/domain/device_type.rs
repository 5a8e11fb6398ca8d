use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{render, FilterSet, Selector, NAME_PATTERN};

/// A device model, optionally pictured by an icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeviceType {
    pub id: i32,
    pub name: String,
    pub device_icon_id: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeviceTypeInput {
    #[validate(required, regex = "NAME_PATTERN")]
    pub name: Option<String>,
    pub device_icon_id: Option<i32>,
}

impl DeviceTypeInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            device_icon_id: None,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceTypeFilter {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub device_icon_id: Option<i32>,
}

impl DeviceTypeFilter {
    pub fn matches(&self, device_type: &DeviceType) -> bool {
        self.id.is_none_or(|v| v == device_type.id)
            && self.name.as_deref().is_none_or(|v| v == device_type.name)
            && self
                .device_icon_id
                .is_none_or(|v| Some(v) == device_type.device_icon_id)
    }
}

impl From<&Selector> for DeviceTypeFilter {
    fn from(selector: &Selector) -> Self {
        Self {
            id: selector.id,
            name: selector.name.clone(),
            device_icon_id: None,
        }
    }
}

impl FilterSet for DeviceTypeFilter {
    fn entries(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("id", render(&self.id)),
            ("name", self.name.clone()),
            ("deviceIconId", render(&self.device_icon_id)),
        ]
    }
}
