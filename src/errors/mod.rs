//! Centralized error handling for the commander card library
//!
//! This module provides a single error hierarchy shared by the loader, the
//! cache store, the remote sources and the synergy collaborator.
//!
//! # Error Categories
//!
//! - **Source Errors**: Remote bulk-data and synergy fetches, payload parsing
//! - **Cache Errors**: Corrupt or incompatible cache entries
//! - **Storage Errors**: Host data-directory access (from `host-storage`)
//! - **Configuration Errors**: Unreadable or invalid configuration files
//!
//! Cache and storage errors are degraded to log lines by the cache store and
//! never reach the caller of a corpus load.
//!
//! # Usage
//!
//! ```rust
//! use commander_library::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("missing [sources] section"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;

/// Convenience type alias for Cache Results
pub type CacheResult<T> = Result<T, CacheError>;
