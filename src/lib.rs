//! filedrop - a minimal file-drop service.
//!
//! Clients upload files over HTTP, the server stores them under collision-safe
//! names, and other clients list and download them.

pub mod config;
pub mod datetime;
pub mod error;
pub mod logging;
pub mod store;
pub mod web;

pub use config::Config;
pub use error::{FiledropError, Result};
pub use store::{
    Catalog, CatalogEntry, LocalDirectory, MemoryDirectory, StoreDirectory, UploadStore,
};
pub use web::WebServer;
