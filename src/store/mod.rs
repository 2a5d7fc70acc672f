//! Upload storage for filedrop.
//!
//! This module provides the naming and storage core:
//! - Filename sanitizing
//! - Collision-free name resolution (`name (1).ext`, `name (2).ext`, ...)
//! - Exclusive file creation in the store directory
//! - Listing by recency and download lookup

mod catalog;
mod directory;
pub mod download;
mod resolve;
mod sanitize;
mod upload;

pub use catalog::{human_size, Catalog, CatalogEntry};
pub use directory::{LocalDirectory, MemoryDirectory, StoreDirectory, StoredFile};
pub use download::DownloadTarget;
pub use resolve::{resolve, split_name_ext};
pub use sanitize::sanitize;
pub use upload::{BatchOutcome, UploadItem, UploadStore};

/// Default maximum upload request size (1 GiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 1024 * 1024 * 1024;
