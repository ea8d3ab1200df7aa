//! Error types for host storage access.

use std::path::PathBuf;

/// Result type for host storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while touching the host data directory.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path validation failed - potential security issue
    #[error("Path validation failed: {path:?} - {reason}")]
    PathValidation { path: PathBuf, reason: String },

    /// The host does not expose an application data directory
    #[error("Application data directory unavailable: {reason}")]
    Unavailable { reason: String },

    /// Directory creation failed
    #[error("Failed to create directory: {path:?} - {source}")]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Permissions error
    #[error("Permission denied: {operation} on {path:?}")]
    Permission { operation: String, path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl StorageError {
    /// True when the error means the file simply is not there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
