//! Storage access
//!
//! Repositories wrap the stored functions of the database schema, one typed
//! call per operation. The service layer only sees the [`Store`] trait; the
//! PostgreSQL implementation lives in [`postgres`], and tests run against an
//! in-memory store with the same constraint behavior.
//!
//! # Example
//!
//! ```rust,ignore
//! use device_manager::domain::DeviceFilter;
//! use device_manager::repository::{PgStore, Repository, Store};
//!
//! let store = PgStore::new(pool);
//! let devices = store.devices().list(&DeviceFilter::id(3)).await?;
//! ```

mod error;
mod traits;

pub mod postgres;

#[cfg(test)]
pub(crate) mod memory;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use postgres::PgStore;
pub use traits::{ReplaceRepository, Repository, RepositoryResult, Store};
