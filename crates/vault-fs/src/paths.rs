//! Relative path validation for vault-scoped file access.

use std::path::{Component, Path};

/// Error type for path validation.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("absolute paths are not allowed: {0}")]
    Absolute(String),
    #[error("path escapes the vault root: {0}")]
    Traversal(String),
}

/// Validate a vault-relative path and return it in normalized form.
///
/// Rejects empty paths, absolute paths, and any path containing a `..`
/// component. `.` components and redundant separators are stripped.
pub fn validate_relative_path(path: &str) -> Result<String, PathError> {
    if path.trim().is_empty() {
        return Err(PathError::Empty);
    }

    let mut parts: Vec<&str> = Vec::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().unwrap_or_default()),
            Component::CurDir => {}
            Component::ParentDir => return Err(PathError::Traversal(path.to_string())),
            Component::RootDir | Component::Prefix(_) => {
                return Err(PathError::Absolute(path.to_string()))
            }
        }
    }

    if parts.is_empty() {
        return Err(PathError::Empty);
    }

    Ok(parts.join("/"))
}
