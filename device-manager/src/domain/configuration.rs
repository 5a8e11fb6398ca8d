use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{validate_json_object, DESCRIPTION_PATTERN, NAME_PATTERN};

/// Named configuration document pushed to devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub content: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationInput {
    #[validate(required, regex = "NAME_PATTERN")]
    pub name: Option<String>,
    #[validate(regex = "DESCRIPTION_PATTERN")]
    pub description: Option<String>,
    #[validate(custom = "validate_json_object")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub content: Option<Value>,
}

impl ConfigurationInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}
