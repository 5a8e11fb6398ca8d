//! Success responses

use axum::http::StatusCode;

use crate::classify::{classify, ClassifiedError};
use crate::collection::{to_collection, CollectionDocument, RequestContext, Resource};
use crate::domain::FilterSet;

/// Handler outcome for Collection+JSON endpoints
pub type Reply = Result<CollectionDocument, ClassifiedError>;

/// Render records, classifying a mapping failure under `title`
pub fn collection<R: Resource>(records: &[R], ctx: &RequestContext, title: &str) -> Reply {
    to_collection(records, ctx).map_err(|f| classify(f, title))
}

/// Render a single record
pub fn single<R: Resource>(record: R, ctx: &RequestContext, title: &str) -> Reply {
    collection(std::slice::from_ref(&record), ctx, title)
}

/// Render a top-level listing; nothing matching `filters` is not found
pub fn require_items<R: Resource, F: FilterSet>(
    records: Vec<R>,
    filters: &F,
    ctx: &RequestContext,
    title: &str,
) -> Reply {
    if records.is_empty() {
        return Err(ClassifiedError::not_found(
            title,
            format!("Items not found using given parameters: {}", filters.describe()),
        ));
    }
    collection(&records, ctx, title)
}

/// Successful delete
pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}
