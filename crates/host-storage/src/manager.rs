//! Filesystem-backed host storage rooted at a sandboxed data directory.

use crate::error::{Result, StorageError};
use crate::security::{set_secure_permissions, validate_path_within_sandbox, validate_relative_path};
use crate::HostStorage;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Resolves `<platform data dir>/<app_name>`.
///
/// # Errors
/// Returns [`StorageError::Unavailable`] when the platform exposes no data directory.
pub fn resolve_app_data_dir(app_name: &str) -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(app_name))
        .ok_or_else(|| StorageError::Unavailable {
            reason: "platform data directory could not be determined".to_string(),
        })
}

/// Host storage whose every path is confined to a base directory.
#[derive(Clone, Debug)]
pub struct SandboxedStorage {
    base_dir: PathBuf,
}

impl SandboxedStorage {
    /// Create a new builder for configuring the storage.
    #[must_use]
    pub fn builder() -> SandboxedStorageBuilder {
        SandboxedStorageBuilder::new()
    }

    /// Validate a relative path and construct the full path within the sandbox.
    fn validate_and_get_path(&self, relative: &str) -> Result<PathBuf> {
        validate_relative_path(relative)?;
        let full_path = self.base_dir.join(relative);
        validate_path_within_sandbox(&full_path, &self.base_dir)?;
        tracing::trace!("Resolved sandbox path {} -> {}", relative, full_path.display());
        Ok(full_path)
    }
}

#[async_trait]
impl HostStorage for SandboxedStorage {
    fn data_dir(&self) -> &Path {
        &self.base_dir
    }

    async fn ensure_dir(&self, path: &str) -> Result<()> {
        let dir_path = self.validate_and_get_path(path)?;
        fs::create_dir_all(&dir_path)
            .await
            .map_err(|e| StorageError::DirectoryCreation {
                path: dir_path,
                source: e,
            })
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        let dir_path = self.validate_and_get_path(dir)?;
        let mut names = Vec::new();
        if !dir_path.is_dir() {
            return Ok(names);
        }

        let mut entries = fs::read_dir(&dir_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file()
                && let Some(name) = entry.file_name().to_str()
            {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    async fn read_to_string(&self, path: &str) -> Result<String> {
        let file_path = self.validate_and_get_path(path)?;
        Ok(fs::read_to_string(&file_path).await?)
    }

    async fn write(&self, path: &str, contents: &[u8]) -> Result<()> {
        let file_path = self.validate_and_get_path(path)?;
        if let Some(parent) = file_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::DirectoryCreation {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        fs::write(&file_path, contents).await?;
        tracing::trace!("Wrote {} bytes to {}", contents.len(), file_path.display());
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        let file_path = self.validate_and_get_path(path)?;
        fs::remove_file(&file_path).await?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let file_path = self.validate_and_get_path(path)?;
        Ok(file_path.exists())
    }
}

/// Builder for configuring a `SandboxedStorage`.
pub struct SandboxedStorageBuilder {
    base_directory: Option<PathBuf>,
}

impl SandboxedStorageBuilder {
    fn new() -> Self {
        Self {
            base_directory: None,
        }
    }

    /// Set the base directory for file storage.
    #[must_use]
    pub fn base_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.base_directory = Some(path.into());
        self
    }

    /// Build the `SandboxedStorage`, creating and securing the base directory.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Base directory is not set
    /// - Base directory cannot be created or secured
    pub async fn build(self) -> Result<SandboxedStorage> {
        let base_dir = self
            .base_directory
            .ok_or_else(|| StorageError::Configuration {
                message: "Base directory is required".to_string(),
            })?;

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StorageError::DirectoryCreation {
                path: base_dir.clone(),
                source: e,
            })?;

        set_secure_permissions(&base_dir).await?;

        tracing::debug!("SandboxedStorage initialized - base_dir: {:?}", base_dir);

        Ok(SandboxedStorage { base_dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_remove() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        let storage = SandboxedStorage::builder()
            .base_directory(temp_dir.path())
            .build()
            .await?;

        storage.write("cache/entry.json", b"{\"a\":1}").await?;
        assert!(storage.exists("cache/entry.json").await?);
        assert_eq!(storage.read_to_string("cache/entry.json").await?, "{\"a\":1}");

        storage.remove_file("cache/entry.json").await?;
        assert!(!storage.exists("cache/entry.json").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_files_returns_names_only() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let temp_dir = tempfile::tempdir()?;
        let storage = SandboxedStorage::builder()
            .base_directory(temp_dir.path())
            .build()
            .await?;

        assert!(storage.list_files("cache").await?.is_empty());

        storage.ensure_dir("cache/nested").await?;
        storage.write("cache/one.json", b"1").await?;
        storage.write("cache/two.json", b"2").await?;

        let mut names = storage.list_files("cache").await?;
        names.sort();
        assert_eq!(names, vec!["one.json".to_string(), "two.json".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        let storage = SandboxedStorage::builder()
            .base_directory(temp_dir.path().join("data"))
            .build()
            .await?;

        assert!(storage.write("../escape.json", b"x").await.is_err());
        assert!(storage.read_to_string("/etc/hostname").await.is_err());
        assert!(!temp_dir.path().join("escape.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        let storage = SandboxedStorage::builder()
            .base_directory(temp_dir.path())
            .build()
            .await?;

        let err = storage
            .read_to_string("absent.json")
            .await
            .expect_err("absent file must fail");
        assert!(err.is_not_found());
        Ok(())
    }

    #[tokio::test]
    async fn test_builder_requires_base_directory() {
        assert!(SandboxedStorage::builder().build().await.is_err());
    }
}
