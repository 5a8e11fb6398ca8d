//! `/api/device-types`

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
use crate::domain::{DeviceIconInput, DeviceInput, DeviceTypeFilter, DeviceTypeInput, Selector};
use crate::repository::Store;
use crate::service::{self, TypeService, TYPE_TITLES};
use crate::state::AppState;

pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/api/device-types",
            get(list::<S>).post(add::<S>).put(update::<S>).delete(delete::<S>),
        )
        .route(
            "/api/device-types/{id}",
            get(get_by_id::<S>).put(update_by_id::<S>).delete(delete_by_id::<S>),
        )
        .route(
            "/api/device-types/{id}/devices",
            get(devices::<S>).post(add_device::<S>),
        )
        .route(
            "/api/device-types/{id}/icon",
            get(icon::<S>).put(rename_icon::<S>).delete(delete_icon::<S>),
        )
}

async fn list<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
) -> Reply {
    let filter = query.type_filter()?;
    let types = service::types(state.store()).list(&filter).await?;
    require_items(types, &filter, &ctx, TYPE_TITLES.list)
}

async fn get_by_id<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply {
    let filter = DeviceTypeFilter::from(&Selector::id(id));
    let types = service::types(state.store()).list(&filter).await?;
    require_items(types, &filter, &ctx, TYPE_TITLES.list)
}

async fn add<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    JsonBody(input): JsonBody<DeviceTypeInput>,
) -> Reply {
    let device_type = service::types(state.store()).add(input).await?;
    single(device_type, &ctx, TYPE_TITLES.add)
}

async fn update<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
    JsonBody(input): JsonBody<DeviceTypeInput>,
) -> Reply {
    let selector = query.selector()?;
    let device_type = service::types(state.store()).update(&selector, input).await?;
    single(device_type, &ctx, TYPE_TITLES.update)
}

async fn update_by_id<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    JsonBody(input): JsonBody<DeviceTypeInput>,
) -> Reply {
    let device_type = service::types(state.store())
        .update(&Selector::id(id), input)
        .await?;
    single(device_type, &ctx, TYPE_TITLES.update)
}

async fn delete<S: Store>(
    State(state): State<AppState<S>>,
    query: QueryParams,
) -> Result<Response, ClassifiedError> {
    let selector = query.selector()?;
    service::types(state.store()).delete(&selector).await?;
    Ok(no_content().into_response())
}

async fn delete_by_id<S: Store>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> Result<Response, ClassifiedError> {
    service::types(state.store()).delete(&Selector::id(id)).await?;
    Ok(no_content().into_response())
}

/// Devices of the type, narrowed by `deviceGroupId` and `configurationId`
async fn devices<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    query: QueryParams,
) -> Reply {
    let devices = TypeService::new(state.store(), state.icons())
        .devices(id, query.int("deviceGroupId")?, query.int("configurationId")?)
        .await?;
    collection(&devices, &ctx, "Get type's devices failed")
}

async fn add_device<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    JsonBody(input): JsonBody<DeviceInput>,
) -> Reply {
    let device = TypeService::new(state.store(), state.icons())
        .add_device(id, input)
        .await?;
    single(device, &ctx, "Add device with type failed")
}

async fn icon<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply {
    let icon = TypeService::new(state.store(), state.icons()).icon(id).await?;
    single(icon, &ctx, "Get device type's icon failed")
}

async fn rename_icon<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    JsonBody(input): JsonBody<DeviceIconInput>,
) -> Reply {
    let icon = TypeService::new(state.store(), state.icons())
        .rename_icon(id, input)
        .await?;
    single(icon, &ctx, "Rename device type's icon failed")
}

async fn delete_icon<S: Store>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> Result<Response, ClassifiedError> {
    TypeService::new(state.store(), state.icons())
        .delete_icon(id)
        .await?;
    Ok(no_content().into_response())
}
