use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::time;

/// A position reported by a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub device_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(with = "time::required")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "24-12-2016 18:30:05"))]
    pub time: NaiveDateTime,
}

/// Payload for a new location update; an absent time means "now"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    #[validate(required)]
    pub device_id: Option<i32>,
    #[validate(required)]
    pub latitude: Option<f64>,
    #[validate(required)]
    pub longitude: Option<f64>,
    #[serde(default, with = "time::optional")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub time: Option<NaiveDateTime>,
}

impl LocationInput {
    pub fn new(device_id: i32, latitude: f64, longitude: f64) -> Self {
        Self {
            device_id: Some(device_id),
            latitude: Some(latitude),
            longitude: Some(longitude),
            time: None,
        }
    }

    #[must_use]
    pub fn at(mut self, time: NaiveDateTime) -> Self {
        self.time = Some(time);
        self
    }
}
