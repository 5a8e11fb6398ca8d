use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{time, validate_json_object};

/// A reading reported by a device; `content` is an arbitrary JSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub device_id: i32,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub content: Value,
    #[serde(with = "time::required")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "24-12-2016 18:30:05"))]
    pub time: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MeasurementInput {
    #[validate(required)]
    pub device_id: Option<i32>,
    #[validate(required, custom = "validate_json_object")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub content: Option<Value>,
    #[serde(default, with = "time::optional")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub time: Option<NaiveDateTime>,
}

impl MeasurementInput {
    pub fn new(device_id: i32, content: Value) -> Self {
        Self {
            device_id: Some(device_id),
            content: Some(content),
            time: None,
        }
    }

    #[must_use]
    pub fn at(mut self, time: NaiveDateTime) -> Self {
        self.time = Some(time);
        self
    }
}
