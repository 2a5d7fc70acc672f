//! Error types for filedrop.

use thiserror::Error;

/// Common error type for filedrop.
#[derive(Error, Debug)]
pub enum FiledropError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for client input (e.g. an unusable filename).
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A file with the requested name already exists in the store.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Failure while persisting an upload.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for filedrop operations.
pub type Result<T> = std::result::Result<T, FiledropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = FiledropError::Validation("empty filename".to_string());
        assert_eq!(err.to_string(), "validation error: empty filename");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = FiledropError::NotFound("File: a.txt".to_string());
        assert_eq!(err.to_string(), "File: a.txt not found");
    }

    #[test]
    fn test_already_exists_error_display() {
        let err = FiledropError::AlreadyExists("a.txt".to_string());
        assert_eq!(err.to_string(), "a.txt already exists");
    }

    #[test]
    fn test_storage_error_display() {
        let err = FiledropError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "storage error: disk full");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FiledropError = io_err.into();
        assert!(matches!(err, FiledropError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(FiledropError::Config("bad port".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
