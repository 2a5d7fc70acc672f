//! Store directory backends.
//!
//! The store directory is the single shared resource of the service. It is
//! reached through the [`StoreDirectory`] trait so that the upload and listing
//! logic can run against the local filesystem or an in-memory map.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use crate::{FiledropError, Result};

/// A regular file held in the store directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Filename, unique within the store.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
}

/// Access to the directory holding uploaded files.
pub trait StoreDirectory: Send + Sync + fmt::Debug {
    /// Names of every entry currently present, including non-regular files.
    fn names(&self) -> Result<HashSet<String>>;

    /// Create `name` and fill it from `content`, failing with
    /// [`FiledropError::AlreadyExists`] if the name is taken.
    ///
    /// The existence check and the creation are a single atomic step.
    /// `content` is not read when the name is taken. Returns the number of
    /// bytes written.
    fn create_new(&self, name: &str, content: &mut dyn Read) -> Result<u64>;

    /// All regular files, in no particular order.
    fn entries(&self) -> Result<Vec<StoredFile>>;

    /// Metadata for `name` if it is a regular file.
    fn stat(&self, name: &str) -> Result<Option<StoredFile>>;

    /// Full content of `name`.
    fn read(&self, name: &str) -> Result<Vec<u8>>;
}

/// Reject anything that is not a single, plain path component.
fn check_component(name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c: char| c == '/' || c == '\\' || c == '\0')
    {
        return Err(FiledropError::Validation(format!(
            "invalid stored name: {name:?}"
        )));
    }
    Ok(())
}

/// Store directory on the local filesystem.
///
/// Files live directly under the base path with their stored names:
/// ```text
/// {base_path}/
/// ├── report.pdf
/// ├── report (1).pdf
/// └── notes.txt
/// ```
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    /// Base directory for uploaded files.
    base_path: PathBuf,
}

impl LocalDirectory {
    /// Open the store at the given path.
    ///
    /// The directory will be created if it doesn't exist.
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the full path for a stored name.
    ///
    /// Fails for names that are not a single path component, so the result
    /// always lies directly inside the base path.
    pub fn file_path(&self, name: &str) -> Result<PathBuf> {
        check_component(name)?;
        Ok(self.base_path.join(name))
    }
}

impl StoreDirectory for LocalDirectory {
    fn names(&self) -> Result<HashSet<String>> {
        let mut names = HashSet::new();
        for entry in fs::read_dir(&self.base_path)? {
            names.insert(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn create_new(&self, name: &str, content: &mut dyn Read) -> Result<u64> {
        let path = self.file_path(name)?;

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(FiledropError::AlreadyExists(name.to_string()));
            }
            Err(e) => {
                return Err(FiledropError::Storage(format!("cannot create {name}: {e}")));
            }
        };

        let written = io::copy(content, &mut file).and_then(|n| file.sync_all().map(|()| n));
        match written {
            Ok(n) => Ok(n),
            Err(e) => {
                drop(file);
                // Leave no partial file behind
                if let Err(remove_err) = fs::remove_file(&path) {
                    tracing::warn!(file = %name, error = %remove_err, "Failed to remove partial upload");
                }
                Err(FiledropError::Storage(format!("failed to write {name}: {e}")))
            }
        }
    }

    fn entries(&self) -> Result<Vec<StoredFile>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };

            // Follows symlinks; entries removed mid-listing are skipped
            let meta = match fs::metadata(entry.path()) {
                Ok(meta) => meta,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !meta.is_file() {
                continue;
            }

            files.push(StoredFile {
                name,
                size: meta.len(),
                modified: meta.modified()?,
            });
        }

        Ok(files)
    }

    fn stat(&self, name: &str) -> Result<Option<StoredFile>> {
        let Ok(path) = self.file_path(name) else {
            return Ok(None);
        };

        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(Some(StoredFile {
                name: name.to_string(),
                size: meta.len(),
                modified: meta.modified()?,
            })),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.file_path(name)?;

        match fs::read(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FiledropError::NotFound(format!("File: {name}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug)]
struct MemoryFile {
    data: Vec<u8>,
    modified: SystemTime,
}

/// Store directory kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    files: Mutex<BTreeMap<String, MemoryFile>>,
}

impl MemoryDirectory {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a file in place directly, replacing any previous content.
    pub fn insert(&self, name: &str, data: impl Into<Vec<u8>>, modified: SystemTime) {
        self.lock().insert(
            name.to_string(),
            MemoryFile {
                data: data.into(),
                modified,
            },
        );
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, MemoryFile>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn to_stored(name: &str, file: &MemoryFile) -> StoredFile {
        StoredFile {
            name: name.to_string(),
            size: file.data.len() as u64,
            modified: file.modified,
        }
    }
}

impl StoreDirectory for MemoryDirectory {
    fn names(&self) -> Result<HashSet<String>> {
        Ok(self.lock().keys().cloned().collect())
    }

    fn create_new(&self, name: &str, content: &mut dyn Read) -> Result<u64> {
        check_component(name)?;

        let mut files = self.lock();
        if files.contains_key(name) {
            return Err(FiledropError::AlreadyExists(name.to_string()));
        }

        let mut data = Vec::new();
        content
            .read_to_end(&mut data)
            .map_err(|e| FiledropError::Storage(format!("failed to write {name}: {e}")))?;
        let size = data.len() as u64;

        files.insert(
            name.to_string(),
            MemoryFile {
                data,
                modified: SystemTime::now(),
            },
        );
        Ok(size)
    }

    fn entries(&self) -> Result<Vec<StoredFile>> {
        Ok(self
            .lock()
            .iter()
            .map(|(name, file)| Self::to_stored(name, file))
            .collect())
    }

    fn stat(&self, name: &str) -> Result<Option<StoredFile>> {
        Ok(self.lock().get(name).map(|file| Self::to_stored(name, file)))
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        self.lock()
            .get(name)
            .map(|file| file.data.clone())
            .ok_or_else(|| FiledropError::NotFound(format!("File: {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_local() -> (TempDir, LocalDirectory) {
        let temp_dir = TempDir::new().unwrap();
        let dir = LocalDirectory::open(temp_dir.path()).unwrap();
        (temp_dir, dir)
    }

    /// Reader that fails after producing a few bytes.
    struct FailingReader {
        sent: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away"));
            }
            self.sent = true;
            buf[..4].copy_from_slice(b"part");
            Ok(4)
        }
    }

    #[test]
    fn test_open_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("uploads");

        assert!(!path.exists());

        let dir = LocalDirectory::open(&path).unwrap();

        assert!(path.is_dir());
        assert_eq!(dir.base_path(), path);
    }

    #[test]
    fn test_file_path_rejects_traversal() {
        let (_temp_dir, dir) = setup_local();

        assert!(dir.file_path("ok.txt").is_ok());
        assert!(matches!(dir.file_path(".."), Err(FiledropError::Validation(_))));
        assert!(matches!(dir.file_path("."), Err(FiledropError::Validation(_))));
        assert!(matches!(dir.file_path(""), Err(FiledropError::Validation(_))));
        assert!(matches!(
            dir.file_path("../escape"),
            Err(FiledropError::Validation(_))
        ));
        assert!(matches!(
            dir.file_path("a\\b"),
            Err(FiledropError::Validation(_))
        ));
    }

    #[test]
    fn test_create_new_and_read() {
        let (_temp_dir, dir) = setup_local();

        let written = dir.create_new("hello.txt", &mut &b"Hello, World!"[..]).unwrap();

        assert_eq!(written, 13);
        assert_eq!(dir.read("hello.txt").unwrap(), b"Hello, World!");
    }

    #[test]
    fn test_create_new_refuses_existing() {
        let (_temp_dir, dir) = setup_local();
        dir.create_new("a.txt", &mut &b"first"[..]).unwrap();

        let result = dir.create_new("a.txt", &mut &b"second"[..]);

        assert!(matches!(result, Err(FiledropError::AlreadyExists(_))));
        assert_eq!(dir.read("a.txt").unwrap(), b"first");
    }

    #[test]
    fn test_create_new_refuses_directory_name() {
        let (temp_dir, dir) = setup_local();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let result = dir.create_new("sub", &mut &b"data"[..]);

        assert!(matches!(result, Err(FiledropError::AlreadyExists(_))));
    }

    #[test]
    fn test_failed_write_removes_partial_file() {
        let (temp_dir, dir) = setup_local();

        let result = dir.create_new("broken.bin", &mut FailingReader { sent: false });

        assert!(matches!(result, Err(FiledropError::Storage(_))));
        assert!(!temp_dir.path().join("broken.bin").exists());
    }

    #[test]
    fn test_names_include_directories() {
        let (temp_dir, dir) = setup_local();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        dir.create_new("f.txt", &mut &b""[..]).unwrap();

        let names = dir.names().unwrap();

        assert!(names.contains("sub"));
        assert!(names.contains("f.txt"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_entries_skip_directories() {
        let (temp_dir, dir) = setup_local();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        dir.create_new("f.txt", &mut &b"abc"[..]).unwrap();

        let entries = dir.entries().unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "f.txt");
        assert_eq!(entries[0].size, 3);
    }

    #[test]
    fn test_stat() {
        let (temp_dir, dir) = setup_local();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        dir.create_new("f.txt", &mut &b"abcd"[..]).unwrap();

        let stat = dir.stat("f.txt").unwrap().unwrap();
        assert_eq!(stat.size, 4);

        assert!(dir.stat("sub").unwrap().is_none());
        assert!(dir.stat("missing").unwrap().is_none());
        assert!(dir.stat("..").unwrap().is_none());
    }

    #[test]
    fn test_read_not_found() {
        let (_temp_dir, dir) = setup_local();

        let result = dir.read("nonexistent.txt");

        assert!(matches!(result, Err(FiledropError::NotFound(_))));
    }

    #[test]
    fn test_binary_content() {
        let (_temp_dir, dir) = setup_local();
        let content: Vec<u8> = (0..=255).collect();

        dir.create_new("binary.bin", &mut content.as_slice()).unwrap();

        assert_eq!(dir.read("binary.bin").unwrap(), content);
    }

    #[test]
    fn test_memory_directory() {
        let dir = MemoryDirectory::new();

        assert_eq!(dir.create_new("a.txt", &mut &b"one"[..]).unwrap(), 3);
        assert!(matches!(
            dir.create_new("a.txt", &mut &b"two"[..]),
            Err(FiledropError::AlreadyExists(_))
        ));
        assert!(matches!(
            dir.create_new("../a.txt", &mut &b"two"[..]),
            Err(FiledropError::Validation(_))
        ));

        assert_eq!(dir.read("a.txt").unwrap(), b"one");
        assert_eq!(dir.stat("a.txt").unwrap().unwrap().size, 3);
        assert!(dir.stat("b.txt").unwrap().is_none());
        assert!(matches!(dir.read("b.txt"), Err(FiledropError::NotFound(_))));
        assert_eq!(dir.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_memory_directory_insert() {
        let dir = MemoryDirectory::new();
        let when = SystemTime::UNIX_EPOCH;

        dir.insert("seed.bin", vec![1, 2, 3], when);

        let stat = dir.stat("seed.bin").unwrap().unwrap();
        assert_eq!(stat.modified, when);
        assert!(dir.names().unwrap().contains("seed.bin"));
    }
}
