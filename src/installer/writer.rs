//! Atomic file writes
//!
//! Content goes to a temporary sibling of the target, is synced, and is then
//! renamed over the target. A reader sees either the old file or the new one,
//! never a partial write. A failure before the rename drops the temporary file
//! and leaves the target as it was.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::content::equivalent_ignoring_stamp;
use crate::error::{CcoError, Result};
use crate::path_utils::resolve_under;

/// What happened to one installed artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { bytes: u64 },
    /// The target already held equivalent content; nothing was written
    Unchanged { bytes: u64 },
}

impl WriteOutcome {
    pub fn bytes(self) -> u64 {
        match self {
            WriteOutcome::Written { bytes } | WriteOutcome::Unchanged { bytes } => bytes,
        }
    }

    pub fn changed(self) -> bool {
        matches!(self, WriteOutcome::Written { .. })
    }
}

/// Install `content` at `root/relative_path`, skipping the write when the
/// existing file is equivalent.
pub fn install_artifact(root: &Path, relative_path: &str, content: &[u8]) -> Result<WriteOutcome> {
    let target = resolve_under(root, relative_path)?;
    let bytes = content.len() as u64;

    if target.is_file() {
        if let Ok(existing) = std::fs::read(&target) {
            if equivalent_ignoring_stamp(&existing, content) {
                return Ok(WriteOutcome::Unchanged { bytes });
            }
        }
    }

    write_atomic(&target, content)?;
    Ok(WriteOutcome::Written { bytes })
}

/// Atomically replace `target` with `content`, creating parent directories.
pub fn write_atomic(target: &Path, content: &[u8]) -> Result<()> {
    write_atomic_with(target, content, |_| Ok(()))
}

/// [`write_atomic`] with a hook that runs after the temporary file is
/// complete and before it is renamed into place.
fn write_atomic_with<F>(target: &Path, content: &[u8], before_rename: F) -> Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    if target.is_dir() {
        return Err(CcoError::write_failed(target, "target is a directory"));
    }
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| CcoError::write_failed(parent, e))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".cco-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| CcoError::write_failed(target, e))?;

    fill(&mut temp, content).map_err(|e| CcoError::write_failed(target, e))?;
    before_rename(temp.path()).map_err(|e| CcoError::write_failed(target, e))?;

    // On error the returned temp file is dropped, which deletes it
    temp.persist(target)
        .map_err(|e| CcoError::write_failed(target, e.error))?;
    Ok(())
}

fn fill(temp: &mut NamedTempFile, content: &[u8]) -> io::Result<()> {
    temp.write_all(content)?;
    temp.flush()?;
    temp.as_file().sync_all()
}
