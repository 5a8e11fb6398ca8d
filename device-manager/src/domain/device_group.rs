use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{DESCRIPTION_PATTERN, NAME_PATTERN};

/// A named group of devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeviceGroup {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeviceGroupInput {
    #[validate(required, regex = "NAME_PATTERN")]
    pub name: Option<String>,
    #[validate(regex = "DESCRIPTION_PATTERN")]
    pub description: Option<String>,
}

impl DeviceGroupInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}
