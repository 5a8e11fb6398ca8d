//! `/api/device-groups`

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
use crate::domain::{DeviceGroupInput, DeviceInput, Selector};
use crate::repository::Store;
use crate::service::{self, GroupService, GROUP_TITLES};
use crate::state::AppState;

pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/api/device-groups",
            get(list::<S>).post(add::<S>).put(update::<S>).delete(delete::<S>),
        )
        .route(
            "/api/device-groups/{id}",
            get(get_by_id::<S>).put(update_by_id::<S>).delete(delete_by_id::<S>),
        )
        .route(
            "/api/device-groups/{id}/devices",
            get(devices::<S>).post(add_device::<S>),
        )
        .route(
            "/api/device-groups/{id}/locations",
            get(locations::<S>).delete(delete_locations::<S>),
        )
        .route(
            "/api/device-groups/{id}/measurements",
            get(measurements::<S>).delete(delete_measurements::<S>),
        )
}

async fn list<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
) -> Reply {
    let filter = query.selector()?;
    let groups = service::groups(state.store()).list(&filter).await?;
    require_items(groups, &filter, &ctx, GROUP_TITLES.list)
}

async fn get_by_id<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply {
    let filter = Selector::id(id);
    let groups = service::groups(state.store()).list(&filter).await?;
    require_items(groups, &filter, &ctx, GROUP_TITLES.list)
}

async fn add<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    JsonBody(input): JsonBody<DeviceGroupInput>,
) -> Reply {
    let group = service::groups(state.store()).add(input).await?;
    single(group, &ctx, GROUP_TITLES.add)
}

async fn update<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
    JsonBody(input): JsonBody<DeviceGroupInput>,
) -> Reply {
    let selector = query.selector()?;
    let group = service::groups(state.store()).update(&selector, input).await?;
    single(group, &ctx, GROUP_TITLES.update)
}

async fn update_by_id<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    JsonBody(input): JsonBody<DeviceGroupInput>,
) -> Reply {
    let group = service::groups(state.store())
        .update(&Selector::id(id), input)
        .await?;
    single(group, &ctx, GROUP_TITLES.update)
}

async fn delete<S: Store>(
    State(state): State<AppState<S>>,
    query: QueryParams,
) -> Result<Response, ClassifiedError> {
    let selector = query.selector()?;
    service::groups(state.store()).delete(&selector).await?;
    Ok(no_content().into_response())
}

async fn delete_by_id<S: Store>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> Result<Response, ClassifiedError> {
    service::groups(state.store()).delete(&Selector::id(id)).await?;
    Ok(no_content().into_response())
}

async fn devices<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply {
    let devices = GroupService::new(state.store()).devices(id).await?;
    collection(&devices, &ctx, "Get group's devices failed")
}

async fn add_device<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    JsonBody(input): JsonBody<DeviceInput>,
) -> Reply {
    let device = GroupService::new(state.store()).add_device(id, input).await?;
    single(device, &ctx, "Add device to group failed")
}

async fn locations<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    query: QueryParams,
) -> Reply {
    let window = query.time_filter()?;
    let rows = GroupService::new(state.store()).locations(id, &window).await?;
    collection(&rows, &ctx, "Get group's location updates failed")
}

async fn delete_locations<S: Store>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
    query: QueryParams,
) -> Result<Response, ClassifiedError> {
    let window = query.time_filter()?;
    GroupService::new(state.store())
        .delete_locations(id, &window)
        .await?;
    Ok(no_content().into_response())
}

async fn measurements<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    query: QueryParams,
) -> Reply {
    let window = query.time_filter()?;
    let rows = GroupService::new(state.store()).measurements(id, &window).await?;
    collection(&rows, &ctx, "Get group's measurements failed")
}

async fn delete_measurements<S: Store>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
    query: QueryParams,
) -> Result<Response, ClassifiedError> {
    let window = query.time_filter()?;
    GroupService::new(state.store())
        .delete_measurements(id, &window)
        .await?;
    Ok(no_content().into_response())
}
