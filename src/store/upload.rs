//! Upload persistence.

use std::io::Read;
use std::sync::Arc;

use super::directory::StoreDirectory;
use super::resolve::resolve;
use super::sanitize::sanitize;
use crate::{FiledropError, Result};

/// One file submitted in an upload request.
#[derive(Debug, Clone, Default)]
pub struct UploadItem {
    /// Filename as sent by the client.
    pub file_name: Option<String>,
    /// File content.
    pub content: Option<Vec<u8>>,
}

impl UploadItem {
    /// Create an item with both a name and content.
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            content: Some(content.into()),
        }
    }
}

/// Result of saving a batch of uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Stored names, in submission order.
    pub stored: Vec<String>,
    /// Number of items skipped because they could not be saved.
    pub skipped: usize,
}

impl BatchOutcome {
    /// Number of files saved.
    pub fn saved(&self) -> usize {
        self.stored.len()
    }
}

/// Writes uploaded files into the store under collision-free names.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: Arc<dyn StoreDirectory>,
}

impl UploadStore {
    /// Create an upload store over the given directory.
    pub fn new(dir: Arc<dyn StoreDirectory>) -> Self {
        Self { dir }
    }

    /// Save one file and return the name it was stored under.
    ///
    /// The name is sanitized, then resolved against a snapshot of the
    /// directory. The file is created exclusively, so if another writer took
    /// the candidate after the snapshot was read, the candidate is added to the
    /// snapshot and the next one is tried. An existing file is never
    /// overwritten.
    ///
    /// # Errors
    ///
    /// * [`FiledropError::Validation`] if `raw_name` is empty or sanitizes to
    ///   nothing; nothing is written.
    /// * [`FiledropError::Storage`] if the content could not be written.
    pub fn save(&self, raw_name: &str, content: &mut dyn Read) -> Result<String> {
        if raw_name.is_empty() {
            return Err(FiledropError::Validation("empty filename".to_string()));
        }

        let name = sanitize(raw_name);
        if name.is_empty() {
            return Err(FiledropError::Validation(format!(
                "filename {raw_name:?} has no usable characters"
            )));
        }

        let mut taken = self.dir.names()?;
        loop {
            let candidate = resolve(&name, &taken);
            match self.dir.create_new(&candidate, content) {
                Ok(size) => {
                    tracing::info!(
                        original = %raw_name,
                        stored = %candidate,
                        size,
                        "Stored upload"
                    );
                    return Ok(candidate);
                }
                Err(FiledropError::AlreadyExists(_)) => {
                    tracing::debug!(candidate = %candidate, "Name taken concurrently, retrying");
                    taken.insert(candidate);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Save every item of an upload request in order.
    ///
    /// Items without a filename or content, or whose name is unusable, are
    /// skipped. A storage failure stops the batch; files saved before it
    /// stay in place.
    pub fn save_batch(&self, items: Vec<UploadItem>) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();

        for item in items {
            let (Some(file_name), Some(content)) = (item.file_name, item.content) else {
                tracing::debug!("Skipping upload part without filename or content");
                outcome.skipped += 1;
                continue;
            };

            match self.save(&file_name, &mut content.as_slice()) {
                Ok(stored) => outcome.stored.push(stored),
                Err(FiledropError::Validation(reason)) => {
                    tracing::debug!(reason = %reason, "Skipping upload");
                    outcome.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(outcome)
    }
}
