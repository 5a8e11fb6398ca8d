use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Icon file names: up to 25 safe characters followed by `.png`
pub const ICON_NAME_REGEX: &str = "^[A-Za-z0-9-_]{1,25}.(png)$";

pub static ICON_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ICON_NAME_REGEX).expect("valid icon name pattern"));

/// Metadata row for an icon file kept in icon storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeviceIcon {
    pub id: i32,
    pub name: String,
}

/// Rename payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeviceIconInput {
    #[validate(required)]
    pub name: Option<String>,
}

impl DeviceIconInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_name_pattern() {
        assert!(ICON_NAME_PATTERN.is_match("thermometer.png"));
        assert!(ICON_NAME_PATTERN.is_match("door_sensor-2.png"));
        assert!(!ICON_NAME_PATTERN.is_match("thermometer.jpg"));
        assert!(!ICON_NAME_PATTERN.is_match("../etc.png/x"));
        assert!(!ICON_NAME_PATTERN.is_match(&format!("{}.png", "a".repeat(26))));
    }
}
