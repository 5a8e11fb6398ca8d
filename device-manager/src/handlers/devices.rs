//! `/api/devices`

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use super::error::{JsonBody, PathId};
use super::query::QueryParams;
use super::response::{collection, no_content, require_items, single, Reply};
use crate::classify::ClassifiedError;
use crate::collection::RequestContext;
use crate::domain::{DeviceFilter, DeviceInput, DeviceSelector};
use crate::repository::Store;
use crate::service::{self, DeviceService, DEVICE_TITLES};
use crate::state::AppState;

pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/api/devices",
            get(list::<S>).post(add::<S>).put(update::<S>).delete(delete::<S>),
        )
        .route(
            "/api/devices/{id}",
            get(get_by_id::<S>).put(update_by_id::<S>).delete(delete_by_id::<S>),
        )
        .route("/api/devices/{id}/group", get(group::<S>))
        .route("/api/devices/{id}/type", get(device_type::<S>))
        .route("/api/devices/{id}/icon", get(icon::<S>))
        .route("/api/devices/{id}/configuration", get(configuration::<S>))
        .route("/api/devices/{id}/locations", get(locations::<S>))
        .route("/api/devices/{id}/measurements", get(measurements::<S>))
}

async fn list<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
) -> Reply {
    let filter = query.device_filter()?;
    let devices = service::devices(state.store()).list(&filter).await?;
    require_items(devices, &filter, &ctx, DEVICE_TITLES.list)
}

async fn get_by_id<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply {
    let filter = DeviceFilter::id(id);
    let devices = service::devices(state.store()).list(&filter).await?;
    require_items(devices, &filter, &ctx, DEVICE_TITLES.list)
}

async fn add<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    JsonBody(input): JsonBody<DeviceInput>,
) -> Reply {
    let device = service::devices(state.store()).add(input).await?;
    single(device, &ctx, DEVICE_TITLES.add)
}

async fn update<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
    JsonBody(input): JsonBody<DeviceInput>,
) -> Reply {
    let selector = query.device_selector()?;
    let device = service::devices(state.store()).update(&selector, input).await?;
    single(device, &ctx, DEVICE_TITLES.update)
}

async fn update_by_id<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    JsonBody(input): JsonBody<DeviceInput>,
) -> Reply {
    let device = service::devices(state.store())
        .update(&DeviceSelector::id(id), input)
        .await?;
    single(device, &ctx, DEVICE_TITLES.update)
}

async fn delete<S: Store>(
    State(state): State<AppState<S>>,
    query: QueryParams,
) -> Result<Response, ClassifiedError> {
    let selector = query.device_selector()?;
    service::devices(state.store()).delete(&selector).await?;
    Ok(no_content().into_response())
}

async fn delete_by_id<S: Store>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> Result<Response, ClassifiedError> {
    service::devices(state.store())
        .delete(&DeviceSelector::id(id))
        .await?;
    Ok(no_content().into_response())
}

async fn group<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply {
    let group = DeviceService::new(state.store()).group(id).await?;
    single(group, &ctx, "Get device's group failed")
}

async fn device_type<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply {
    let device_type = DeviceService::new(state.store()).device_type(id).await?;
    single(device_type, &ctx, "Get device's type failed")
}

async fn icon<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply {
    let icon = DeviceService::new(state.store()).icon(id).await?;
    single(icon, &ctx, "Get device's icon failed")
}

async fn configuration<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply {
    let configuration = DeviceService::new(state.store()).configuration(id).await?;
    single(configuration, &ctx, "Get device's configuration failed")
}

async fn locations<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    query: QueryParams,
) -> Reply {
    let window = query.time_filter()?;
    let rows = DeviceService::new(state.store()).locations(id, &window).await?;
    collection(&rows, &ctx, "Get device's location updates failed")
}

async fn measurements<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    query: QueryParams,
) -> Reply {
    let window = query.time_filter()?;
    let rows = DeviceService::new(state.store()).measurements(id, &window).await?;
    collection(&rows, &ctx, "Get device's measurements failed")
}
