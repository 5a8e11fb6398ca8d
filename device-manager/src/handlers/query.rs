//! Query string filters
//!
//! Every filter is optional. An empty value (`?name=`) counts as absent, and a
//! value that does not parse as the filter's type is a validation failure
//! naming the parameter.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn list(query: QueryParams) -> Result<(), ClassifiedError> {
//!     let window = query.time_filter()?;
//!     // ?startTime=01-01-2017%2000:00:05&endTime=01-01-2017%2000:00:15
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use chrono::NaiveDateTime;

use crate::classify::ClassifiedError;
use crate::domain::{time, DeviceFilter, DeviceSelector, DeviceTypeFilter, Selector, TimeFilter};

/// Raw query string parameters
#[derive(Debug, Clone, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    /// Non-empty value of `name`
    pub fn text(&self, name: &str) -> Option<String> {
        self.raw(name).map(str::to_string)
    }

    /// Value of `name` that must be present
    pub fn required_text(&self, name: &str) -> Result<String, ClassifiedError> {
        self.text(name)
            .ok_or_else(|| ClassifiedError::missing_parameter(name))
    }

    pub fn int(&self, name: &str) -> Result<Option<i32>, ClassifiedError> {
        self.parsed(name)
    }

    /// Timestamp in `dd-MM-yyyy HH:mm:ss`
    pub fn time(&self, name: &str) -> Result<Option<NaiveDateTime>, ClassifiedError> {
        self.raw(name)
            .map(|raw| time::parse(raw).map_err(|_| ClassifiedError::invalid_parameter(name, raw)))
            .transpose()
    }

    /// `id` and `name`
    pub fn selector(&self) -> Result<Selector, ClassifiedError> {
        Ok(Selector {
            id: self.int("id")?,
            name: self.text("name"),
        })
    }

    pub fn device_filter(&self) -> Result<DeviceFilter, ClassifiedError> {
        Ok(DeviceFilter {
            id: self.int("id")?,
            name: self.text("name"),
            device_type_id: self.int("deviceTypeId")?,
            device_group_id: self.int("deviceGroupId")?,
            configuration_id: self.int("configurationId")?,
            authentication_key: self.text("authenticationKey"),
        })
    }

    pub fn device_selector(&self) -> Result<DeviceSelector, ClassifiedError> {
        Ok(DeviceSelector {
            id: self.int("id")?,
            name: self.text("name"),
            authentication_key: self.text("authenticationKey"),
        })
    }

    pub fn type_filter(&self) -> Result<DeviceTypeFilter, ClassifiedError> {
        Ok(DeviceTypeFilter {
            id: self.int("id")?,
            name: self.text("name"),
            device_icon_id: self.int("deviceIconId")?,
        })
    }

    /// `deviceId` plus the time window
    pub fn time_filter(&self) -> Result<TimeFilter, ClassifiedError> {
        Ok(TimeFilter {
            device_id: self.int("deviceId")?,
            exact_time: self.time("exactTime")?,
            start_time: self.time("startTime")?,
            end_time: self.time("endTime")?,
        })
    }

    fn raw(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn parsed<T: FromStr>(&self, name: &str) -> Result<Option<T>, ClassifiedError> {
        self.raw(name)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| ClassifiedError::invalid_parameter(name, raw))
            })
            .transpose()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for QueryParams {
    type Rejection = ClassifiedError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ClassifiedError::validation(format!("Invalid query string: {}", rejection.body_text()))
            })?;
        Ok(Self(params))
    }
}

#[cfg(test)]
impl<const N: usize> From<[(&str, &str); N]> for QueryParams {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
