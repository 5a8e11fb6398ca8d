use std::collections::HashSet;
use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::{header, request::Parts};

use super::{CollectionDocument, Item, Link, Property, Query, Template};
use crate::classify::Failure;

/// Base address of the API documentation; profile links point below it
const PROFILE_BASE: &str = "/api-doc/index.html#/docs/types-";

/// Where the current request was addressed
///
/// Mappers take this explicitly instead of reading the current request from
/// ambient state, so mapping stays a pure function of the records and context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    origin: String,
    href: String,
}

impl RequestContext {
    /// `origin` is `scheme://host[:port]`, `path` includes any query string
    pub fn new(origin: impl Into<String>, path: &str) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        let href = format!("{}{}", origin, path);
        Self { origin, href }
    }

    /// Build from request parts, honouring `X-Forwarded-Proto`
    pub fn from_parts(parts: &Parts) -> Self {
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("http");
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| parts.uri.authority().map(|authority| authority.as_str()))
            .unwrap_or("localhost");
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        Self::new(format!("{}://{}", scheme, host), path)
    }

    /// Absolute URI of the current request
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Absolute URI for a server path
    pub fn resolve(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

/// A record that can be rendered as a Collection+JSON item
pub trait Resource {
    /// Server path of the resource collection, e.g. `/api/devices`
    const PATH: &'static str;

    /// Index of the resource type in the API documentation
    const PROFILE: usize;

    /// Server path of this record
    fn item_path(&self) -> String;

    /// Ordered item data
    fn to_properties(&self) -> Result<Vec<Property>, Failure>;

    /// Relation links derived from the record's references
    fn to_links(&self, _ctx: &RequestContext) -> Vec<Link> {
        Vec::new()
    }

    /// Query templates offered with the collection
    fn queries(ctx: &RequestContext) -> Vec<Query>;

    /// Write template; `None` for resources without a JSON write form
    fn template() -> Option<Template>;
}

/// Render one record as an item
pub fn to_item<R: Resource>(record: &R, ctx: &RequestContext) -> Result<Item, Failure> {
    Ok(Item {
        href: ctx.resolve(&record.item_path()),
        data: record.to_properties()?,
    })
}

/// Render records as a collection at the current request URI
///
/// Links shared between items appear once, in first-seen order, followed by
/// the profile link of the resource type.
pub fn to_collection<R: Resource>(
    records: &[R],
    ctx: &RequestContext,
) -> Result<CollectionDocument, Failure> {
    let mut document = CollectionDocument::empty(ctx.href());
    let collection = &mut document.collection;

    let mut seen = HashSet::new();
    for record in records {
        collection.items.push(to_item(record, ctx)?);
        for link in record.to_links(ctx) {
            if seen.insert(link.clone()) {
                collection.links.push(link);
            }
        }
    }

    collection.links.push(Link::new(
        ctx.resolve(&format!("{}{}", PROFILE_BASE, R::PROFILE)),
        "profile",
        "Profile",
    ));
    collection.queries = R::queries(ctx);
    collection.template = R::template();

    Ok(document)
}
