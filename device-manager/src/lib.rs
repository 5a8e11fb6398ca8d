//! # device-manager
//!
//! IoT device fleet management backend. Devices, device groups, device types,
//! device icons, configurations, location updates and measurements are kept
//! in PostgreSQL and served over HTTP as Collection+JSON hypermedia.
//!
//! ## Features
//!
//! - **Filtered CRUD**: every resource supports optional, composable filters on
//!   get, add, full-replace update and delete
//! - **Hypermedia**: items, relation links, search queries and write templates
//! - **Error taxonomy**: every failure becomes a titled, coded Collection+JSON
//!   error body with a matching HTTP status
//! - **Icon files**: PNG icons stored on disk next to their rows
//! - **Basic authentication**, request IDs, structured logging, health probes
//!
//! ## Example
//!
//! ```rust,no_run
//! use device_manager::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let database = config.database.clone().ok_or_else(|| anyhow::anyhow!("no database"))?;
//!     let store = PgStore::new(connect(&database).await?);
//!
//!     let app = router(AppState::new(config.clone(), store));
//!     Server::new(config).serve(app).await?;
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod collection;
pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod icons;
pub mod ids;
pub mod mapper;
pub mod middleware;
pub mod observability;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod validation;

#[cfg(feature = "openapi")]
pub mod openapi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::classify::{classify, ClassifiedError, ErrorCode, Failure};
    pub use crate::collection::{CollectionDocument, RequestContext, Resource};
    pub use crate::config::Config;
    pub use crate::database::{connect, create_pool};
    pub use crate::domain::{
        Configuration, Device, DeviceGroup, DeviceIcon, DeviceType, FilterSet, Location,
        Measurement, Selector, TimeFilter,
    };
    pub use crate::error::{Error, Result};
    pub use crate::handlers::router;
    pub use crate::health::{health, readiness};
    pub use crate::icons::IconStorage;
    pub use crate::ids::{MakeTypedRequestId, RequestId, RequestIdError};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{PgStore, ReplaceRepository, Repository, Store};
    pub use crate::server::Server;
    pub use crate::state::AppState;

    pub use tracing::{debug, error, info, warn};
}
