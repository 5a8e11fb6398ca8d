//! Failure classification
//!
//! Every failure raised while serving a resource request is folded into a
//! [`ClassifiedError`]: a title, a message and an [`ErrorCode`]. This triple is
//! the only error shape that crosses the HTTP boundary.
//!
//! # Example
//!
//! ```rust
//! use device_manager::classify::{classify, ErrorCode, Failure};
//!
//! let error = classify(Failure::not_found("[id: 3]"), "Get devices failed");
//! assert_eq!(error.code, ErrorCode::NoItemsFound);
//! assert_eq!(error.code.status_code().as_u16(), 404);
//! ```

use std::fmt;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::repository::{RepositoryError, RepositoryErrorKind};

/// Title used for request parameter and body validation failures
pub const VALIDATION_TITLE: &str = "Parameter validation error";

/// Title used for routing failures (unknown path, unsupported method)
pub const HTTP_REQUEST_TITLE: &str = "HTTP request error";

/// Title used for failures nothing else claimed
pub const UNHANDLED_TITLE: &str = "Unhandled error";

/// Message used when storage details must stay hidden
pub const DATABASE_ERROR_MESSAGE: &str = "Database error occurred";

/// Closed error taxonomy rendered on the wire as a numeric string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Malformed or missing client input
    ParameterValidationError,
    /// Lookup matched nothing
    NoItemsFound,
    /// Storage or unexpected failure
    InternalError,
    /// Uniqueness or foreign key constraint violated
    ParameterConflict,
}

impl ErrorCode {
    /// Wire value of the code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ParameterValidationError => "1001",
            Self::NoItemsFound => "1002",
            Self::InternalError => "1003",
            Self::ParameterConflict => "1004",
        }
    }

    /// HTTP status the code maps to
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ParameterValidationError => StatusCode::BAD_REQUEST,
            Self::NoItemsFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ParameterConflict => StatusCode::CONFLICT,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParameterValidationError => write!(f, "parameter_validation_error"),
            Self::NoItemsFound => write!(f, "no_items_found"),
            Self::InternalError => write!(f, "internal_error"),
            Self::ParameterConflict => write!(f, "parameter_conflict"),
        }
    }
}

/// A failure that has been given its final title, message and code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    /// Human readable title, usually naming the failed operation
    pub title: String,
    /// Detail message
    pub message: String,
    /// Taxonomy code
    pub code: ErrorCode,
    /// HTTP status override; `None` means the code's own status
    pub status: Option<StatusCode>,
}

impl ClassifiedError {
    /// Create a new classified error
    pub fn new(title: impl Into<String>, message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            code,
            status: None,
        }
    }

    /// Parameter validation failure with the shared validation title
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(VALIDATION_TITLE, message, ErrorCode::ParameterValidationError)
    }

    /// Rejected value for a named request parameter
    pub fn invalid_parameter(name: &str, value: impl fmt::Display) -> Self {
        Self::validation(format!("Invalid value ({value}) for parameter {name}"))
    }

    /// Required request parameter was absent
    pub fn missing_parameter(name: &str) -> Self {
        Self::validation(format!("Missing request parameter {name}"))
    }

    /// Request body absent or not decodable
    pub fn invalid_body() -> Self {
        Self::validation("Request body missing or invalid")
    }

    /// Nothing matched the request
    pub fn not_found(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, ErrorCode::NoItemsFound)
    }

    /// Conflicting parameters
    pub fn conflict(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, ErrorCode::ParameterConflict)
    }

    /// Internal failure
    pub fn internal(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, ErrorCode::InternalError)
    }

    /// Method is routed for another verb but not this one
    pub fn unsupported_method(method: &http::Method, path: &str) -> Self {
        Self {
            status: Some(StatusCode::NOT_IMPLEMENTED),
            ..Self::internal(
                HTTP_REQUEST_TITLE,
                format!("Method {method} not supported for {path}"),
            )
        }
    }

    /// Request body larger than the configured limit
    pub fn body_too_large() -> Self {
        Self {
            status: Some(StatusCode::PAYLOAD_TOO_LARGE),
            ..Self::new(
                HTTP_REQUEST_TITLE,
                "Request body exceeds the size limit",
                ErrorCode::ParameterValidationError,
            )
        }
    }

    /// Request did not complete within the configured timeout
    pub fn timed_out() -> Self {
        Self {
            status: Some(StatusCode::REQUEST_TIMEOUT),
            ..Self::internal(HTTP_REQUEST_TITLE, "Request timed out")
        }
    }

    /// Failure that escaped every other classification
    pub fn unhandled(message: impl Into<String>) -> Self {
        Self::internal(UNHANDLED_TITLE, message)
    }

    /// Status the error is served with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.status.unwrap_or_else(|| self.code.status_code())
    }

    /// Whether the failure is the client's fault
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.title, self.code.code(), self.message)
    }
}

impl std::error::Error for ClassifiedError {}

/// Raw failure raised below the HTTP boundary
#[derive(Debug, Clone)]
pub enum Failure {
    /// Lookup returned nothing; carries the detail message
    NotFound(String),
    /// Storage layer failure
    Repository(RepositoryError),
    /// Already classified; passes through unchanged
    Classified(ClassifiedError),
    /// Anything else, described by its string form
    Unexpected(String),
}

impl Failure {
    /// Lookup returned nothing
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<RepositoryError> for Failure {
    fn from(error: RepositoryError) -> Self {
        Self::Repository(error)
    }
}

impl From<ClassifiedError> for Failure {
    fn from(error: ClassifiedError) -> Self {
        Self::Classified(error)
    }
}

impl From<serde_json::Error> for Failure {
    fn from(error: serde_json::Error) -> Self {
        Self::Unexpected(error.to_string())
    }
}

impl From<std::io::Error> for Failure {
    fn from(error: std::io::Error) -> Self {
        Self::Unexpected(error.to_string())
    }
}

/// Classify a raw failure under the given title
///
/// Rules, in priority order: not found, constraint violation, storage
/// failure, already classified, anything else.
pub fn classify(failure: Failure, title: &str) -> ClassifiedError {
    match failure {
        Failure::NotFound(message) => ClassifiedError::not_found(title, message),
        Failure::Repository(error) => classify_repository_error(error, title),
        Failure::Classified(error) => error,
        Failure::Unexpected(message) => ClassifiedError::internal(title, message),
    }
}

fn classify_repository_error(error: RepositoryError, title: &str) -> ClassifiedError {
    if error.kind == RepositoryErrorKind::NotFound {
        return ClassifiedError::not_found(title, error.message);
    }

    if error.is_conflict() {
        let message = match error.constraint {
            Some(constraint) => format!("Constraint error on {constraint}"),
            None if !error.message.is_empty() => error.message,
            None => "Constraint violation".to_string(),
        };
        return ClassifiedError::conflict(title, message);
    }

    tracing::error!(
        operation = %error.operation,
        kind = %error.kind,
        "Repository error: {}", error.message
    );
    ClassifiedError::internal(title, DATABASE_ERROR_MESSAGE)
}
