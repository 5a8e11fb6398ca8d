//! `/api/configurations`

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
use crate::domain::{ConfigurationInput, DeviceInput, Selector};
use crate::repository::Store;
use crate::service::{self, ConfigurationService, CONFIGURATION_TITLES};
use crate::state::AppState;

pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/api/configurations",
            get(list::<S>).post(add::<S>).put(update::<S>).delete(delete::<S>),
        )
        .route(
            "/api/configurations/{id}",
            get(get_by_id::<S>).put(update_by_id::<S>).delete(delete_by_id::<S>),
        )
        .route(
            "/api/configurations/{id}/devices",
            get(devices::<S>).post(add_device::<S>),
        )
}

async fn list<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
) -> Reply {
    let filter = query.selector()?;
    let configurations = service::configurations(state.store()).list(&filter).await?;
    require_items(configurations, &filter, &ctx, CONFIGURATION_TITLES.list)
}

async fn get_by_id<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply {
    let filter = Selector::id(id);
    let configurations = service::configurations(state.store()).list(&filter).await?;
    require_items(configurations, &filter, &ctx, CONFIGURATION_TITLES.list)
}

async fn add<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    JsonBody(input): JsonBody<ConfigurationInput>,
) -> Reply {
    let configuration = service::configurations(state.store()).add(input).await?;
    single(configuration, &ctx, CONFIGURATION_TITLES.add)
}

async fn update<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
    JsonBody(input): JsonBody<ConfigurationInput>,
) -> Reply {
    let selector = query.selector()?;
    let configuration = service::configurations(state.store())
        .update(&selector, input)
        .await?;
    single(configuration, &ctx, CONFIGURATION_TITLES.update)
}

async fn update_by_id<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    JsonBody(input): JsonBody<ConfigurationInput>,
) -> Reply {
    let configuration = service::configurations(state.store())
        .update(&Selector::id(id), input)
        .await?;
    single(configuration, &ctx, CONFIGURATION_TITLES.update)
}

async fn delete<S: Store>(
    State(state): State<AppState<S>>,
    query: QueryParams,
) -> Result<Response, ClassifiedError> {
    let selector = query.selector()?;
    service::configurations(state.store()).delete(&selector).await?;
    Ok(no_content().into_response())
}

async fn delete_by_id<S: Store>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> Result<Response, ClassifiedError> {
    service::configurations(state.store())
        .delete(&Selector::id(id))
        .await?;
    Ok(no_content().into_response())
}

/// Devices using the configuration, narrowed by `deviceTypeId` and `deviceGroupId`
async fn devices<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    query: QueryParams,
) -> Reply {
    let devices = ConfigurationService::new(state.store())
        .devices(id, query.int("deviceTypeId")?, query.int("deviceGroupId")?)
        .await?;
    collection(&devices, &ctx, "Get configuration's devices failed")
}

async fn add_device<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    JsonBody(input): JsonBody<DeviceInput>,
) -> Reply {
    let device = ConfigurationService::new(state.store())
        .add_device(id, input)
        .await?;
    single(device, &ctx, "Add device with configuration failed")
}
