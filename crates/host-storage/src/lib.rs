//! # Host Storage
//!
//! Access to a per-application data directory on the host, confined to a
//! sandboxed base path, plus the retention and naming rules used for
//! timestamped snapshot files.
//!
//! Consumers depend on the [`HostStorage`] trait so that persistence can be
//! swapped for a test double or left out entirely when the host exposes no
//! data directory.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use host_storage::{HostStorage, SandboxedStorage, resolve_app_data_dir};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = SandboxedStorage::builder()
//!     .base_directory(resolve_app_data_dir("commander-library")?)
//!     .build()
//!     .await?;
//!
//! storage.ensure_dir("card-library-cache").await?;
//! storage.write("card-library-cache/cardlibrary_1.json", b"{}").await?;
//! let names = storage.list_files("card-library-cache").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Retention
//!
//! ```rust
//! use host_storage::{RetentionPolicy, TimestampedName};
//! use std::time::Duration;
//!
//! let policy = RetentionPolicy::new()
//!     .max_age(Duration::from_secs(24 * 60 * 60))
//!     .keep_latest(3);
//! let naming = TimestampedName::new("cardlibrary_", "json");
//!
//! assert_eq!(naming.parse(&naming.format(42)), Some(42));
//! let entries = vec![(1, "a"), (2, "b"), (3, "c"), (4, "d")];
//! assert_eq!(policy.surplus(entries), vec![(1, "a")]);
//! ```

use async_trait::async_trait;
use std::path::Path;

pub mod error;
pub mod manager;
pub mod naming;
pub mod policy;
pub mod security;

pub use error::{Result, StorageError};
pub use manager::{SandboxedStorage, SandboxedStorageBuilder, resolve_app_data_dir};
pub use naming::TimestampedName;
pub use policy::RetentionPolicy;

/// Host data-directory operations. All paths are relative to [`HostStorage::data_dir`].
#[async_trait]
pub trait HostStorage: Send + Sync + std::fmt::Debug {
    /// Absolute path of the application data directory.
    fn data_dir(&self) -> &Path;

    /// Create a directory (and parents) if missing.
    async fn ensure_dir(&self, path: &str) -> Result<()>;

    /// File names (not paths) directly inside `dir`. Missing directories yield an empty list.
    async fn list_files(&self, dir: &str) -> Result<Vec<String>>;

    async fn read_to_string(&self, path: &str) -> Result<String>;

    async fn write(&self, path: &str, contents: &[u8]) -> Result<()>;

    async fn remove_file(&self, path: &str) -> Result<()>;

    async fn exists(&self, path: &str) -> Result<bool>;
}
