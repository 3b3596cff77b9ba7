//! Legacy reconciliation
//!
//! Garbage-collects artifacts that earlier schema generations installed but
//! the current manifest no longer contains. An entry is removed only when it
//! matches a [`LegacyPattern`] and is not covered by the current manifest,
//! so an overly broad pattern can never delete a current artifact.
//!
//! Everything here is best effort: a failed removal is a warning and the
//! remaining entries are still processed.

pub mod external;
pub mod patterns;

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::domain::Manifest;
use crate::path_utils::{relative_display, resolve_under};

pub use external::{
    AbsentTool, CommandTool, ExternalTool, LEGACY_REGISTRATIONS, LegacyRegistration,
    deregister_all, probe_tool,
};
pub use patterns::{EntryKind, LEGACY_GENERATIONS, LegacyPattern, all_patterns};

/// Result of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Removed (or, in a dry run, removable) paths relative to the root,
    /// sorted
    pub removed: Vec<String>,
    /// One message per entry that could not be removed
    pub warnings: Vec<String>,
}

/// Remove every on-disk entry under `root` that matches one of `patterns`
/// and is not covered by `manifest`.
pub fn reconcile(
    root: &Path,
    manifest: &Manifest,
    patterns: &[LegacyPattern],
    dry_run: bool,
) -> ReconcileReport {
    let mut candidates = BTreeSet::new();
    let mut report = ReconcileReport::default();

    for pattern in patterns {
        match collect_candidates(root, pattern) {
            Ok(found) => candidates.extend(found),
            Err(e) => {
                let message = format!("could not scan for {pattern:?}: {e}");
                warn!("{message}");
                report.warnings.push(message);
            }
        }
    }

    for relative in candidates {
        if manifest.covers(&relative) {
            debug!(path = %relative, "legacy pattern matches a current artifact, keeping");
            continue;
        }
        if dry_run {
            report.removed.push(relative);
            continue;
        }
        match remove_entry(root, &relative) {
            Ok(true) => {
                info!(path = %relative, "removed legacy artifact");
                report.removed.push(relative);
            }
            Ok(false) => {}
            Err(e) => {
                let message = format!("failed to remove {relative}: {e}");
                warn!("{message}");
                report.warnings.push(message);
            }
        }
    }

    report
}

/// Paths (relative, forward slashes) that exist and match `pattern`
fn collect_candidates(root: &Path, pattern: &LegacyPattern) -> io::Result<Vec<String>> {
    match pattern {
        LegacyPattern::ExactFile(path) => {
            let full = resolve_under(root, path).map_err(io::Error::other)?;
            let is_file = full
                .symlink_metadata()
                .is_ok_and(|meta| !meta.file_type().is_dir());
            Ok(if is_file { vec![(*path).to_string()] } else { Vec::new() })
        }
        LegacyPattern::Directory(path) => {
            let full = resolve_under(root, path).map_err(io::Error::other)?;
            let is_dir = full
                .symlink_metadata()
                .is_ok_and(|meta| meta.file_type().is_dir());
            Ok(if is_dir { vec![(*path).to_string()] } else { Vec::new() })
        }
        LegacyPattern::Prefixed { dir, .. } => {
            let scan_root = resolve_under(root, dir).map_err(io::Error::other)?;
            if !scan_root.is_dir() {
                return Ok(Vec::new());
            }
            let mut found = Vec::new();
            for entry in WalkDir::new(&scan_root).min_depth(1).max_depth(1) {
                let entry = entry.map_err(io::Error::other)?;
                let name = entry.file_name().to_string_lossy();
                if pattern.matches_name(&name, entry.file_type().is_dir()) {
                    found.push(relative_display(root, entry.path()));
                }
            }
            Ok(found)
        }
    }
}

/// Remove `root/relative`. Directories go recursively; symlinks are removed
/// as links. Returns `false` when the entry no longer exists.
fn remove_entry(root: &Path, relative: &str) -> io::Result<bool> {
    let path = root.join(relative);
    let meta = match path.symlink_metadata() {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if meta.file_type().is_dir() {
        fs::remove_dir_all(&path)?;
    } else {
        fs::remove_file(&path)?;
    }
    Ok(true)
}
