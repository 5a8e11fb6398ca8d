//! Error rendering and rejecting extractors
//!
//! Handlers return [`ClassifiedError`] directly. Its response carries the
//! error in the response extensions; [`render_errors`] picks it up on the way
//! out, writes the final Collection+JSON body with the request URI as `href`
//! and logs the failure with the request id.

use std::any::Any;

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::classify::{ClassifiedError, ErrorCode, HTTP_REQUEST_TITLE};
use crate::collection::{CollectionDocument, RequestContext};
use crate::ids::RequestId;

impl IntoResponse for ClassifiedError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = CollectionDocument::error("", &self).with_status(status);
        response.extensions_mut().insert(self);
        response
    }
}

/// Rewrite classified failures with the request URI and log them
///
/// Bare 408 and 413 answers from the timeout and body limit layers are
/// classified here, since those layers never see a [`ClassifiedError`].
pub async fn render_errors(ctx: RequestContext, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let request_id = RequestId::from_headers(request.headers());

    let mut response = next.run(request).await;
    let error = match response.extensions_mut().remove::<ClassifiedError>() {
        Some(error) => error,
        None => match response.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ClassifiedError::body_too_large(),
            StatusCode::REQUEST_TIMEOUT => ClassifiedError::timed_out(),
            _ => return response,
        },
    };

    let request_id = request_id.map(|id| id.to_string()).unwrap_or_default();
    if error.is_client_error() {
        tracing::warn!(
            request_id = %request_id,
            method = %method,
            href = %ctx.href(),
            code = error.code.code(),
            "{}: {}", error.title, error.message
        );
    } else {
        tracing::error!(
            request_id = %request_id,
            method = %method,
            href = %ctx.href(),
            code = error.code.code(),
            "{}: {}", error.title, error.message
        );
    }

    let mut rendered = CollectionDocument::error(ctx.href(), &error).with_status(response.status());
    if let Some(challenge) = response.headers().get(header::WWW_AUTHENTICATE) {
        rendered
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, challenge.clone());
    }
    rendered
}

/// Response for a request whose handler panicked
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Request handler panicked: {}", detail);
    ClassifiedError::unhandled("Request handler panicked").into_response()
}

/// Route exists but not for this method
pub async fn unsupported_method(method: Method, uri: Uri) -> ClassifiedError {
    ClassifiedError::unsupported_method(&method, uri.path())
}

/// No route matched
pub async fn not_found_route(method: Method, uri: Uri) -> ClassifiedError {
    ClassifiedError::new(
        HTTP_REQUEST_TITLE,
        format!("No handler found for {} {}", method, uri.path()),
        ErrorCode::NoItemsFound,
    )
}

/// JSON request body; anything undecodable is a validation failure
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ClassifiedError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(ClassifiedError::body_too_large())
            }
            Err(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                Err(ClassifiedError::invalid_body())
            }
        }
    }
}

/// Numeric `{id}` path segment
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub i32);

impl<S: Send + Sync> FromRequestParts<S> for PathId {
    type Rejection = ClassifiedError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ClassifiedError::missing_parameter("id"))?;
        raw.parse()
            .map(Self)
            .map_err(|_| ClassifiedError::invalid_parameter("id", raw))
    }
}
