//! Download lookup.

use super::directory::StoreDirectory;
use super::sanitize::sanitize;
use crate::{FiledropError, Result};

/// A stored file ready to be sent to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Stored filename.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type inferred from the extension.
    pub content_type: String,
}

/// Resolve a requested name to a regular file in the store.
///
/// The request is sanitized first, so only a plain file directly inside the
/// store can ever be returned.
pub fn lookup(dir: &dyn StoreDirectory, requested: &str) -> Result<DownloadTarget> {
    let name = sanitize(requested);
    if name.is_empty() {
        return Err(FiledropError::NotFound(format!("File: {requested}")));
    }

    let file = dir
        .stat(&name)?
        .ok_or_else(|| FiledropError::NotFound(format!("File: {name}")))?;

    let content_type = mime_guess::from_path(&file.name)
        .first_or_octet_stream()
        .to_string();

    Ok(DownloadTarget {
        name: file.name,
        size: file.size,
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::directory::{LocalDirectory, MemoryDirectory};
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn seeded() -> MemoryDirectory {
        let dir = MemoryDirectory::new();
        let now = SystemTime::now();
        dir.insert("photo.png", vec![0u8; 10], now);
        dir.insert("notes.txt", b"hi".to_vec(), now);
        dir.insert("blob.unknownext", b"??".to_vec(), now);
        dir.insert("README", b"read me".to_vec(), now);
        dir
    }

    #[test]
    fn test_lookup_infers_content_type() {
        let dir = seeded();

        let png = lookup(&dir, "photo.png").unwrap();
        assert_eq!(png.content_type, "image/png");
        assert_eq!(png.size, 10);

        assert_eq!(lookup(&dir, "notes.txt").unwrap().content_type, "text/plain");
    }

    #[test]
    fn test_lookup_unknown_extension_is_octet_stream() {
        let dir = seeded();

        assert_eq!(
            lookup(&dir, "blob.unknownext").unwrap().content_type,
            "application/octet-stream"
        );
        assert_eq!(
            lookup(&dir, "README").unwrap().content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_lookup_sanitizes_request() {
        let dir = seeded();

        let target = lookup(&dir, "../../photo.png").unwrap();

        assert_eq!(target.name, "photo.png");
    }

    #[test]
    fn test_lookup_missing() {
        let dir = seeded();

        assert!(matches!(
            lookup(&dir, "missing.txt"),
            Err(FiledropError::NotFound(_))
        ));
        assert!(matches!(lookup(&dir, ""), Err(FiledropError::NotFound(_))));
        assert!(matches!(lookup(&dir, ".."), Err(FiledropError::NotFound(_))));
    }

    #[test]
    fn test_lookup_never_escapes_store() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("secret.txt"), b"outside").unwrap();
        let store_path = root.path().join("uploads");
        let dir = LocalDirectory::open(&store_path).unwrap();
        std::fs::create_dir(store_path.join("sub")).unwrap();

        for requested in ["../secret.txt", "..", "sub", "/etc/passwd", "..\\secret.txt"] {
            assert!(
                matches!(lookup(&dir, requested), Err(FiledropError::NotFound(_))),
                "requested: {requested:?}"
            );
        }
    }
}
