//! `/api/device-icons`
//!
//! Icons are uploaded as multipart files and served back as PNG. The row
//! routes share the `{id}` segment with the image route: a value ending in
//! `.png` names a file, anything else must be a numeric id.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use super::error::{JsonBody, PathId};
use super::query::QueryParams;
use super::response::{collection, no_content, require_items, single, Reply};
use crate::classify::ClassifiedError;
use crate::collection::RequestContext;
use crate::domain::{DeviceIconInput, DeviceTypeInput, Selector};
use crate::repository::Store;
use crate::service::{IconService, ICON_TITLES};
use crate::state::AppState;

/// Multipart field carrying the image
const ICON_FIELD: &str = "icon";

const PNG: &str = "image/png";

pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/api/device-icons",
            get(list::<S>).post(add::<S>).put(update::<S>).delete(delete::<S>),
        )
        .route(
            "/api/device-icons/{id}",
            get(get_by_id_or_file::<S>)
                .put(update_by_id::<S>)
                .delete(delete_by_id::<S>),
        )
        .route(
            "/api/device-icons/{id}/types",
            get(types::<S>).post(add_type::<S>),
        )
}

async fn list<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
) -> Reply {
    let filter = query.selector()?;
    let icons = IconService::new(state.store(), state.icons()).list(&filter).await?;
    require_items(icons, &filter, &ctx, ICON_TITLES.list)
}

async fn get_by_id_or_file<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Path(raw): Path<String>,
) -> Result<Response, ClassifiedError> {
    let service = IconService::new(state.store(), state.icons());
    if raw.ends_with(".png") {
        let image = service.file(&raw).await?;
        return Ok(([(header::CONTENT_TYPE, PNG)], image).into_response());
    }

    let id = raw
        .parse()
        .map_err(|_| ClassifiedError::invalid_parameter("id", &raw))?;
    let filter = Selector::id(id);
    let icons = service.list(&filter).await?;
    Ok(require_items(icons, &filter, &ctx, ICON_TITLES.list)?.into_response())
}

/// Store an uploaded image under `?name=`
async fn add<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
    multipart: Result<Multipart, MultipartRejection>,
) -> Reply {
    let name = query.required_text("name")?;
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!("Rejected icon upload: {}", rejection.body_text());
        ClassifiedError::invalid_body()
    })?;
    let image = icon_field(&mut multipart).await?;

    let icon = IconService::new(state.store(), state.icons())
        .add(&name, &image)
        .await?;
    single(icon, &ctx, ICON_TITLES.add)
}

async fn icon_field(multipart: &mut Multipart) -> Result<Bytes, ClassifiedError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ClassifiedError::invalid_body())?
    {
        if field.name() == Some(ICON_FIELD) {
            return field.bytes().await.map_err(|_| ClassifiedError::invalid_body());
        }
    }
    Err(ClassifiedError::missing_parameter(ICON_FIELD))
}

async fn update<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
    JsonBody(input): JsonBody<DeviceIconInput>,
) -> Reply {
    let selector = query.selector()?;
    let icon = IconService::new(state.store(), state.icons())
        .update(&selector, input)
        .await?;
    single(icon, &ctx, ICON_TITLES.update)
}

async fn update_by_id<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    JsonBody(input): JsonBody<DeviceIconInput>,
) -> Reply {
    let icon = IconService::new(state.store(), state.icons())
        .update(&Selector::id(id), input)
        .await?;
    single(icon, &ctx, ICON_TITLES.update)
}

async fn delete<S: Store>(
    State(state): State<AppState<S>>,
    query: QueryParams,
) -> Result<Response, ClassifiedError> {
    let selector = query.selector()?;
    IconService::new(state.store(), state.icons())
        .delete(&selector)
        .await?;
    Ok(no_content().into_response())
}

async fn delete_by_id<S: Store>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> Result<Response, ClassifiedError> {
    IconService::new(state.store(), state.icons())
        .delete(&Selector::id(id))
        .await?;
    Ok(no_content().into_response())
}

async fn types<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply {
    let types = IconService::new(state.store(), state.icons()).types(id).await?;
    collection(&types, &ctx, "Get icon's types failed")
}

async fn add_type<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    PathId(id): PathId,
    JsonBody(input): JsonBody<DeviceTypeInput>,
) -> Reply {
    let device_type = IconService::new(state.store(), state.icons())
        .add_type(id, input)
        .await?;
    single(device_type, &ctx, "Add type with icon failed")
}
