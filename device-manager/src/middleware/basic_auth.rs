//! HTTP Basic authentication middleware
//!
//! A single configured credential pair guards every path except the public
//! patterns. Failures answer 401 with a `WWW-Authenticate` challenge.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use regex::Regex;

use crate::{config::AuthConfig, error::Error};

struct Credentials {
    pair: Option<(String, String)>,
    realm: String,
    public: Vec<Regex>,
}

/// Basic authentication middleware state
#[derive(Clone)]
pub struct BasicAuth {
    inner: Arc<Credentials>,
}

impl BasicAuth {
    pub fn new(config: &AuthConfig) -> Self {
        let public = config
            .public_paths
            .iter()
            .filter_map(|pattern| match compile_public_pattern(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!(pattern = %pattern, "Ignoring invalid public path pattern: {}", e);
                    None
                }
            })
            .collect();

        let pair = match config.credentials() {
            Ok((username, password)) => Some((username.to_string(), password.to_string())),
            Err(e) => {
                tracing::warn!("No usable credentials, rejecting every protected request: {}", e);
                None
            }
        };

        Self {
            inner: Arc::new(Credentials {
                pair,
                realm: config.realm.clone(),
                public,
            }),
        }
    }

    /// Whether `path` is served without credentials
    pub fn is_public(&self, path: &str) -> bool {
        self.inner.public.iter().any(|regex| regex.is_match(path))
    }

    /// Whether the headers carry the configured credentials
    pub fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let Some((expected_user, expected_password)) = &self.inner.pair else {
            return false;
        };
        let Some((username, password)) = decode_basic(headers) else {
            return false;
        };
        username == *expected_user && password == *expected_password
    }

    /// Middleware function rejecting requests without valid credentials
    pub async fn middleware(
        State(auth): State<Self>,
        request: Request<Body>,
        next: Next,
    ) -> Result<Response, Error> {
        let path = request.uri().path();
        if auth.is_public(path) || auth.is_authorized(request.headers()) {
            return Ok(next.run(request).await);
        }

        tracing::debug!(path = %path, "Rejected request without valid credentials");
        Err(Error::Unauthorized(auth.inner.realm.clone()))
    }
}

/// `user:password` from an `Authorization: Basic ...` header
fn decode_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Anchored regex for a path pattern
///
/// `**` matches any run of characters, `*` stays within one path segment.
fn compile_public_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let body = pattern
        .split("**")
        .map(|part| {
            part.split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join("[^/]*")
        })
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{}$", body))
}
