//! Path checks and directory permissions for the sandboxed data directory.

use crate::error::{Result, StorageError};
use std::path::{Component, Path, PathBuf};

/// Restricts the data directory to the current user (Unix only).
pub async fn set_secure_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o700);
        tokio::fs::set_permissions(path, perms)
            .await
            .map_err(|_e| StorageError::Permission {
                operation: "set secure permissions".to_string(),
                path: path.to_path_buf(),
            })?;
    }

    #[cfg(not(unix))]
    {
        if !path.exists() {
            return Err(StorageError::PathValidation {
                path: path.to_path_buf(),
                reason: "Directory does not exist".to_string(),
            });
        }
    }

    Ok(())
}

/// Rejects relative paths that are empty, absolute, contain null bytes, or
/// climb above the sandbox root lexically.
pub fn validate_relative_path(relative: &str) -> Result<()> {
    if relative.is_empty() {
        return Err(StorageError::PathValidation {
            path: PathBuf::from(relative),
            reason: "Filepath cannot be empty".to_string(),
        });
    }

    if relative.contains('\0') {
        return Err(StorageError::PathValidation {
            path: PathBuf::from(relative),
            reason: "Filepath contains null bytes".to_string(),
        });
    }

    let path = Path::new(relative);
    if path.is_absolute() {
        return Err(StorageError::PathValidation {
            path: path.to_path_buf(),
            reason: "Absolute paths not allowed - use relative paths within sandbox".to_string(),
        });
    }

    let mut depth: i32 = 0;
    for component in path.components() {
        match component {
            Component::ParentDir => depth -= 1,
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::PathValidation {
                    path: path.to_path_buf(),
                    reason: "Path contains a root or prefix component".to_string(),
                });
            }
        }
        if depth < 0 {
            return Err(StorageError::PathValidation {
                path: path.to_path_buf(),
                reason: "Path escapes sandbox".to_string(),
            });
        }
    }

    Ok(())
}

/// Validates that a resolved path is within the sandbox directory.
/// Resolves symlinks of whatever part of the path already exists.
pub fn validate_path_within_sandbox(resolved_path: &Path, sandbox_base: &Path) -> Result<()> {
    let canonical_base =
        sandbox_base
            .canonicalize()
            .map_err(|e| StorageError::PathValidation {
                path: sandbox_base.to_path_buf(),
                reason: format!("Failed to resolve sandbox base: {e}"),
            })?;

    // Walk up to the nearest existing ancestor, canonicalize it, re-append the rest.
    let mut existing = resolved_path.to_path_buf();
    let mut tail = Vec::new();
    while !existing.exists() {
        let Some(name) = existing.file_name().map(|n| n.to_os_string()) else {
            return Err(StorageError::PathValidation {
                path: resolved_path.to_path_buf(),
                reason: "Path has no existing ancestor".to_string(),
            });
        };
        tail.push(name);
        if !existing.pop() {
            break;
        }
    }

    let mut canonical_path =
        existing
            .canonicalize()
            .map_err(|e| StorageError::PathValidation {
                path: existing.clone(),
                reason: format!("Failed to resolve path: {e}"),
            })?;
    for name in tail.into_iter().rev() {
        canonical_path.push(name);
    }

    if !canonical_path.starts_with(&canonical_base) {
        return Err(StorageError::PathValidation {
            path: resolved_path.to_path_buf(),
            reason: format!(
                "Path escapes sandbox: resolves to '{}' (outside '{}')",
                canonical_path.display(),
                canonical_base.display()
            ),
        });
    }

    Ok(())
}
