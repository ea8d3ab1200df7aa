//! Error type definitions for the commander card library
//!
//! This module defines all error types used throughout the crate, providing
//! a hierarchical error system that keeps remote failures, cache damage and
//! host storage problems apart.

use thiserror::Error;

/// Top-level application error type
///
/// This enum represents all possible errors that can occur in the library.
/// It uses `thiserror` to provide automatic error trait implementations and
/// proper error chaining.
#[derive(Error, Debug)]
pub enum AppError {
    /// Remote source errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Cache entry errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Host storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] host_storage::StorageError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// External service errors
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system errors outside the sandboxed host storage
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Remote source specific errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// The remote host could not be reached
    #[error("Source unreachable: {url} - {message}")]
    Unreachable { url: String, message: String },

    /// Parsing errors for source data
    #[error("Parse error: {source_type} - {message}")]
    ParseError { source_type: String, message: String },

    /// The bulk-data index does not list the requested dataset variant
    #[error("Dataset not found: {dataset} bulk data not found")]
    DatasetNotFound { dataset: String },

    /// HTTP errors from external sources
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },
}

/// Cache entry specific errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// The entry could not be parsed
    #[error("Corrupt cache entry: {file} - {message}")]
    Corrupt { file: String, message: String },

    /// The entry was written by an incompatible version
    #[error("Cache version mismatch: {file} has version {found}, expected {expected}")]
    VersionMismatch {
        file: String,
        found: String,
        expected: String,
    },

    /// No host data directory is available
    #[error("Cache unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an external service error
    pub fn external_service<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True when the underlying failure was an HTTP 404.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Source(source) => source.is_not_found(),
            Self::Http(e) => e.status().is_some_and(|s| s == reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}

impl SourceError {
    /// Create a parse error
    pub fn parse_error<S: Into<String>, M: Into<String>>(source_type: S, message: M) -> Self {
        Self::ParseError {
            source_type: source_type.into(),
            message: message.into(),
        }
    }

    /// Create an unreachable-host error
    pub fn unreachable<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Unreachable {
            url: url.into(),
            message: message.into(),
        }
    }

    /// True for an HTTP 404 response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let not_found = AppError::from(SourceError::Http {
            status: 404,
            message: "Not Found".to_string(),
        });
        assert!(not_found.is_not_found());

        let server_error = AppError::from(SourceError::Http {
            status: 500,
            message: "Internal Server Error".to_string(),
        });
        assert!(!server_error.is_not_found());
        assert!(!AppError::internal("boom").is_not_found());
    }

    #[test]
    fn test_dataset_not_found_message() {
        let err = SourceError::DatasetNotFound {
            dataset: "Oracle cards".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Dataset not found: Oracle cards bulk data not found"
        );
    }
}
