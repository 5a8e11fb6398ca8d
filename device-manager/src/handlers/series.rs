//! `/api/locations` and `/api/measurements`
//!
//! Time series records have no id of their own: they are listed and deleted
//! by device and time window, and never updated.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use super::error::JsonBody;
use super::query::QueryParams;
use super::response::{no_content, require_items, single, Reply};
use crate::classify::ClassifiedError;
use crate::collection::RequestContext;
use crate::domain::{LocationInput, MeasurementInput};
use crate::repository::Store;
use crate::service::{SeriesService, LOCATION_TITLES, MEASUREMENT_TITLES};
use crate::state::AppState;

pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/api/locations",
            get(list_locations::<S>)
                .post(add_location::<S>)
                .delete(delete_locations::<S>),
        )
        .route(
            "/api/measurements",
            get(list_measurements::<S>)
                .post(add_measurement::<S>)
                .delete(delete_measurements::<S>),
        )
}

fn locations<S: Store>(store: &S) -> SeriesService<'_, S, S::Locations> {
    SeriesService::new(store, store.locations(), &LOCATION_TITLES)
}

fn measurements<S: Store>(store: &S) -> SeriesService<'_, S, S::Measurements> {
    SeriesService::new(store, store.measurements(), &MEASUREMENT_TITLES)
}

async fn list_locations<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
) -> Reply {
    let filter = query.time_filter()?;
    let rows = locations(state.store()).list(&filter).await?;
    require_items(rows, &filter, &ctx, LOCATION_TITLES.list)
}

async fn add_location<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    JsonBody(input): JsonBody<LocationInput>,
) -> Reply {
    let location = locations(state.store()).add(input).await?;
    single(location, &ctx, LOCATION_TITLES.add)
}

async fn delete_locations<S: Store>(
    State(state): State<AppState<S>>,
    query: QueryParams,
) -> Result<Response, ClassifiedError> {
    let filter = query.time_filter()?;
    locations(state.store()).delete(&filter).await?;
    Ok(no_content().into_response())
}

async fn list_measurements<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    query: QueryParams,
) -> Reply {
    let filter = query.time_filter()?;
    let rows = measurements(state.store()).list(&filter).await?;
    require_items(rows, &filter, &ctx, MEASUREMENT_TITLES.list)
}

async fn add_measurement<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    JsonBody(input): JsonBody<MeasurementInput>,
) -> Reply {
    let measurement = measurements(state.store()).add(input).await?;
    single(measurement, &ctx, MEASUREMENT_TITLES.add)
}

async fn delete_measurements<S: Store>(
    State(state): State<AppState<S>>,
    query: QueryParams,
) -> Result<Response, ClassifiedError> {
    let filter = query.time_filter()?;
    measurements(state.store()).delete(&filter).await?;
    Ok(no_content().into_response())
}
