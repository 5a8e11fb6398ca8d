//! OpenAPI document of the entity schemas
//!
//! Served as JSON at [`OPENAPI_PATH`]. Collection profile links point into
//! the documentation by entity index, in the order the schemas are listed
//! below.

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::domain::{
    Configuration, ConfigurationInput, Device, DeviceGroup, DeviceGroupInput, DeviceIcon,
    DeviceIconInput, DeviceInput, DeviceType, DeviceTypeInput, Location, LocationInput,
    Measurement, MeasurementInput,
};
use crate::repository::Store;
use crate::state::AppState;

/// Where the document is served
pub const OPENAPI_PATH: &str = "/api-doc/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Device Manager",
        description = "IoT device fleet management, Collection+JSON over HTTP"
    ),
    components(schemas(
        Device,
        DeviceGroup,
        DeviceIcon,
        DeviceType,
        Location,
        Measurement,
        Configuration,
        DeviceInput,
        DeviceGroupInput,
        DeviceIconInput,
        DeviceTypeInput,
        LocationInput,
        MeasurementInput,
        ConfigurationInput,
    ))
)]
pub struct ApiDoc;

/// Routes serving the document
pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new().route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}
