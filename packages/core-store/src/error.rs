//! Error types shared by every store.
//!
//! There is exactly one distinguished condition, [`Error::KeyNotFound`].
//! Everything else is an opaque failure that callers are not expected to
//! branch on.

use std::io;
use std::path::PathBuf;

/// Errors returned by `Reader` and `Store` operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No value is stored at the key, or (for `list`) the key has no children.
    #[error("key not found")]
    KeyNotFound,

    /// The operation context was cancelled before the operation ran.
    #[error("operation cancelled")]
    Cancelled,

    /// The operation context deadline passed before the operation ran.
    #[error("operation deadline exceeded")]
    DeadlineExceeded,

    /// The key cannot address a value (e.g. it is empty after trimming).
    #[error("invalid key '{key}'")]
    InvalidKey { key: String },

    /// The root directory of a local store could not be set up.
    #[error("invalid root path {}: {source}", .path.display())]
    RootPathInvalid {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backend does not implement this operation.
    #[error("operation not supported: {operation}")]
    Unsupported { operation: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Whether this is the distinguished "key not found" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound)
    }

    /// Whether the operation context stopped the operation.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled | Error::DeadlineExceeded)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn key_not_found_is_distinguished() {
        assert!(Error::KeyNotFound.is_not_found());
        assert!(!Error::Cancelled.is_not_found());

        // An I/O "not found" is not the store's KeyNotFound.
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        assert!(!Error::from(io_err).is_not_found());
    }

    #[test]
    fn cancellation_kinds() {
        assert!(Error::Cancelled.is_cancellation());
        assert!(Error::DeadlineExceeded.is_cancellation());
        assert!(!Error::KeyNotFound.is_cancellation());
    }

    #[test]
    fn error_display() {
        assert_eq!(format!("{}", Error::KeyNotFound), "key not found");

        let e = Error::InvalidKey {
            key: "/".to_string(),
        };
        assert_eq!(format!("{}", e), "invalid key '/'");

        let e = Error::Unsupported { operation: "list" };
        assert!(format!("{}", e).contains("list"));
    }

    #[test]
    fn root_path_error_has_source() {
        let e = Error::RootPathInvalid {
            path: PathBuf::from("/nope"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(format!("{}", e).contains("/nope"));
        assert!(StdError::source(&e).is_some());
    }
}
