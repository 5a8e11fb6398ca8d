//! Collection+JSON documents
//!
//! Wire model for `application/vnd.collection+json` plus the generic builder
//! that turns typed records into a collection. Every success and error body the
//! service produces is one of these documents.
//!
//! ```json
//! { "collection": { "version": "1.0", "href": "...", "links": [], "items": [],
//!                   "queries": [], "template": { "data": [] } } }
//! ```

mod builder;

pub use builder::{to_collection, to_item, RequestContext, Resource};

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::ClassifiedError;

/// Media type of every document
pub const COLLECTION_JSON: &str = "application/vnd.collection+json; charset=utf-8";

/// Document format version
pub const VERSION: &str = "1.0";

/// Top-level wrapper: `{"collection": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDocument {
    pub collection: Collection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub version: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queries: Vec<Query>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// One record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub href: String,
    pub data: Vec<Property>,
}

impl Item {
    /// Value of the named property, if present
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.data
            .iter()
            .find(|property| property.name == name)
            .map(|property| &property.value)
    }
}

/// Named, prompted value; absent values are an explicit `null`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub value: Value,
}

impl Property {
    pub fn new(name: &str, prompt: &str, value: impl Into<Value>) -> Self {
        Self {
            name: name.to_string(),
            prompt: Some(prompt.to_string()),
            value: value.into(),
        }
    }

    /// Optional field, rendered as `null` when absent
    pub fn optional<T: Into<Value>>(name: &str, prompt: &str, value: Option<T>) -> Self {
        Self::new(name, prompt, value.map_or(Value::Null, Into::into))
    }

    /// Unprompted blank, as used by query templates
    pub fn blank(name: &str) -> Self {
        Self {
            name: name.to_string(),
            prompt: None,
            value: Value::String(String::new()),
        }
    }

    /// Prompted blank, as used by write templates
    pub fn prompted(name: &str, prompt: &str) -> Self {
        Self::new(name, prompt, "")
    }
}

/// Relation link
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: impl Into<String>, prompt: &str) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            prompt: Some(prompt.to_string()),
        }
    }
}

/// Query template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub href: String,
    pub rel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub data: Vec<Property>,
}

impl Query {
    /// `search` query over the given filter names, all blank
    pub fn search(href: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            href: href.into(),
            rel: "search".to_string(),
            prompt: Some("Search".to_string()),
            data: fields.iter().map(|field| Property::blank(field)).collect(),
        }
    }
}

/// Write template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub data: Vec<Property>,
}

impl Template {
    /// Template of prompted blanks
    pub fn of(fields: &[(&str, &str)]) -> Self {
        Self {
            data: fields
                .iter()
                .map(|(name, prompt)| Property::prompted(name, prompt))
                .collect(),
        }
    }
}

/// Error object; `code` is the numeric string of the error code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub title: String,
    pub code: String,
    pub message: String,
}

impl CollectionDocument {
    /// Empty collection at `href`
    pub fn empty(href: impl Into<String>) -> Self {
        Self {
            collection: Collection {
                version: VERSION.to_string(),
                href: href.into(),
                links: Vec::new(),
                items: Vec::new(),
                queries: Vec::new(),
                template: None,
                error: None,
            },
        }
    }

    /// Error document for a classified failure
    pub fn error(href: impl Into<String>, error: &ClassifiedError) -> Self {
        let mut document = Self::empty(href);
        document.collection.error = Some(ErrorBody {
            title: error.title.clone(),
            code: error.code.code().to_string(),
            message: error.message.clone(),
        });
        document
    }

    /// Serve with an explicit status
    pub fn with_status(self, status: StatusCode) -> Response {
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(COLLECTION_JSON),
        );
        response
    }
}

impl IntoResponse for CollectionDocument {
    fn into_response(self) -> Response {
        self.with_status(StatusCode::OK)
    }
}
