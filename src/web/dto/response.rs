//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::store::CatalogEntry;

/// Upload response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Always `true` on success.
    pub ok: bool,
    /// Number of files stored.
    pub saved: usize,
}

impl UploadResponse {
    /// Create a successful upload response.
    pub fn new(saved: usize) -> Self {
        Self { ok: true, saved }
    }
}

/// File listing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileListResponse {
    /// Always `true` on success.
    pub ok: bool,
    /// Stored files, most recently modified first.
    pub files: Vec<FileEntry>,
}

impl FileListResponse {
    /// Create a successful listing response.
    pub fn new(files: Vec<FileEntry>) -> Self {
        Self { ok: true, files }
    }
}

/// A stored file in listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileEntry {
    /// Stored filename (use with `/d/{name}`).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Human-readable size.
    pub size_h: String,
    /// Modification time, seconds since the Unix epoch.
    pub mtime: i64,
    /// Modification time as "YYYY-MM-DD HH:MM".
    pub mtime_h: String,
}

impl From<CatalogEntry> for FileEntry {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            name: entry.name,
            size: entry.size,
            size_h: entry.size_h,
            mtime: entry.mtime,
            mtime_h: entry.mtime_h,
        }
    }
}
