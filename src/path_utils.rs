//! Path utilities for artifact paths
//!
//! Artifact paths arrive from the compiled-in manifest and are joined both onto
//! the remote base URL and onto the local installation root, so they are
//! validated once, up front, before either happens.

use std::path::{Component, Path, PathBuf};

use crate::error::{CcoError, Result};

/// Check that `relative` is a safe artifact path.
///
/// Rejects empty paths, absolute paths, Windows drive or UNC prefixes,
/// backslashes and any `..` segment.
pub fn validate_relative_path(relative: &str) -> Result<()> {
    let invalid = |reason: &str| CcoError::InvalidArtifactPath {
        path: relative.to_string(),
        reason: reason.to_string(),
    };

    if relative.trim().is_empty() {
        return Err(invalid("path is empty"));
    }
    if relative.contains('\\') {
        return Err(invalid("backslashes are not allowed"));
    }
    if relative.starts_with('/') {
        return Err(invalid("path is absolute"));
    }

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(invalid("parent directory traversal")),
            Component::RootDir | Component::Prefix(_) => return Err(invalid("path is absolute")),
        }
    }

    // `C:foo` parses as a normal component on Unix
    if relative.len() >= 2 && relative.as_bytes()[1] == b':' {
        return Err(invalid("drive prefixes are not allowed"));
    }

    Ok(())
}

/// Join a validated artifact path onto `root`.
pub fn resolve_under(root: &Path, relative: &str) -> Result<PathBuf> {
    validate_relative_path(relative)?;
    Ok(root.join(relative))
}

/// Convert path to a forward-slash string relative to `root`, for display and
/// manifest comparisons.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
