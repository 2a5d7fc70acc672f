//! API handlers for the Web UI.

pub mod file;

pub use file::*;

use chrono_tz::Tz;
use std::sync::Arc;

use crate::store::{Catalog, StoreDirectory, UploadStore};

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Handle to the store directory.
    pub dir: Arc<dyn StoreDirectory>,
    /// Upload writer over `dir`.
    pub uploads: UploadStore,
    /// Listing view over `dir`.
    pub catalog: Catalog,
}

impl AppState {
    /// Create state over the given store directory.
    pub fn new(dir: Arc<dyn StoreDirectory>) -> Self {
        Self {
            uploads: UploadStore::new(dir.clone()),
            catalog: Catalog::new(dir.clone()),
            dir,
        }
    }

    /// Display listing timestamps in the given zone.
    pub fn with_timezone(mut self, timezone: Option<Tz>) -> Self {
        self.catalog = self.catalog.with_timezone(timezone);
        self
    }
}
