//! Application state shared across handlers

use std::sync::Arc;

use crate::{config::Config, icons::IconStorage, repository::Store};

/// Application state shared across handlers
///
/// Generic over the [`Store`] so the same router runs against PostgreSQL in
/// production and an in-memory store in tests.
#[derive(Clone)]
pub struct AppState<S: Store> {
    config: Arc<Config>,
    store: S,
    icons: Arc<IconStorage>,
}

impl<S: Store> AppState<S> {
    /// Create state over `store`, storing icon files under `config.icons.root`
    pub fn new(config: Config, store: S) -> Self {
        let icons = IconStorage::new(config.icons.root.clone());
        Self {
            config: Arc::new(config),
            store,
            icons: Arc::new(icons),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the icon file storage
    pub fn icons(&self) -> &IconStorage {
        &self.icons
    }
}
