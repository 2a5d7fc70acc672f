//! Listing of stored files.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono_tz::Tz;

use super::directory::StoreDirectory;
use crate::datetime::{format_system_time, unix_seconds, LISTING_FORMAT};
use crate::Result;

/// A stored file as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Stored filename.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Human-readable size (e.g. "2.0 KB").
    pub size_h: String,
    /// Modification time in seconds since the Unix epoch.
    pub mtime: i64,
    /// Modification time as "YYYY-MM-DD HH:MM".
    pub mtime_h: String,
}

/// Format a byte count with binary prefixes.
///
/// Values of 1024 TB and above are divided once more and shown in PB, so
/// `1024^5` bytes reads `1.0 PB` rather than `1024.0 PB`.
pub fn human_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut n = bytes as f64;
    for unit in ["KB", "MB", "GB", "TB"] {
        n /= 1024.0;
        if n < 1024.0 {
            return format!("{n:.1} {unit}");
        }
    }
    format!("{:.1} PB", n / 1024.0)
}

/// Read-only view over the store directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: Arc<dyn StoreDirectory>,
    /// Zone for `mtime_h`; host local time when unset.
    timezone: Option<Tz>,
}

impl Catalog {
    /// Create a catalog over the given directory.
    pub fn new(dir: Arc<dyn StoreDirectory>) -> Self {
        Self {
            dir,
            timezone: None,
        }
    }

    /// Display modification times in the given zone.
    pub fn with_timezone(mut self, timezone: Option<Tz>) -> Self {
        self.timezone = timezone;
        self
    }

    /// List regular files, most recently modified first.
    ///
    /// Files with identical modification times are ordered by name. Every
    /// call reads the directory again.
    pub fn list(&self) -> Result<Vec<CatalogEntry>> {
        let mut files = self.dir.entries()?;
        files.sort_by(|a, b| {
            Reverse(a.modified)
                .cmp(&Reverse(b.modified))
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(files
            .into_iter()
            .map(|f| CatalogEntry {
                size_h: human_size(f.size),
                mtime: unix_seconds(f.modified),
                mtime_h: format_system_time(f.modified, self.timezone, LISTING_FORMAT),
                name: f.name,
                size: f.size,
            })
            .collect())
    }
}
