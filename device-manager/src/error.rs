//! Infrastructure errors
//!
//! Failures of startup and plumbing: configuration, pool creation, migrations,
//! sockets. Request handling failures use
//! [`ClassifiedError`](crate::classify::ClassifiedError) instead; only
//! authentication failures of this type ever reach a client.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::classify::{ClassifiedError, ErrorCode};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Database connection or driver error
    #[error("Database error: {0}")]
    Database(Box<sqlx::Error>),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(Box<sqlx::migrate::MigrateError>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or wrong credentials; carries the realm to announce
    #[error("Authentication failed for realm {0}")]
    Unauthorized(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Database(Box::new(err))
    }
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Error::Migration(Box::new(err))
    }
}

/// Title of authentication failures
const AUTH_TITLE: &str = "Authentication error";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Unauthorized(realm) => {
                let error = ClassifiedError {
                    status: Some(StatusCode::UNAUTHORIZED),
                    ..ClassifiedError::new(
                        AUTH_TITLE,
                        "Full authentication is required to access this resource",
                        ErrorCode::ParameterValidationError,
                    )
                };
                let mut response = error.into_response();
                let challenge = format!("Basic realm=\"{}\"", realm.replace('"', "'"));
                if let Ok(value) = HeaderValue::from_str(&challenge) {
                    response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
                }
                response
            }
            other => {
                tracing::error!("Internal error: {}", other);
                ClassifiedError::unhandled("Internal server error").into_response()
            }
        }
    }
}
