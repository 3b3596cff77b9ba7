//! Interrupted-run detection
//!
//! A marker file is written at the installation root before artifacts are
//! installed and removed when the guard is dropped, on every exit path. If a
//! run finds the marker already present, the previous run was interrupted.
//! That is only reported: each write is atomic and repeatable, so a normal
//! install repairs whatever state the interrupted run left.
//!
//! ## Usage
//!
//! ```ignore
//! let marker = CrashMarker::acquire(&root)?;
//! if marker.previous_run_interrupted() { /* notice */ }
//! // install...
//! drop(marker); // or let it fall out of scope
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::content::marker::format_timestamp;
use crate::error::{CcoError, Result};

/// File name of the marker at the installation root
pub const CRASH_MARKER_FILE: &str = ".cco-install.lock";

/// Guard that owns the marker file for the duration of an install
#[derive(Debug)]
pub struct CrashMarker {
    path: PathBuf,
    previous_run_interrupted: bool,
}

impl CrashMarker {
    /// Write the marker under `root`, creating `root` if needed.
    pub fn acquire(root: &Path) -> Result<Self> {
        let path = root.join(CRASH_MARKER_FILE);
        let previous_run_interrupted = path.exists();
        if previous_run_interrupted {
            warn!(path = %path.display(), "found marker from an unfinished run");
        }

        fs::create_dir_all(root).map_err(|e| CcoError::write_failed(root, e))?;
        let content = format!(
            "pid: {}\nstarted: {}\n",
            std::process::id(),
            format_timestamp(Utc::now())
        );
        fs::write(&path, content).map_err(|e| CcoError::write_failed(&path, e))?;
        debug!(path = %path.display(), "crash marker written");

        Ok(Self {
            path,
            previous_run_interrupted,
        })
    }

    /// Whether a marker was already present when this one was acquired
    pub fn previous_run_interrupted(&self) -> bool {
        self.previous_run_interrupted
    }

    pub fn is_present(root: &Path) -> bool {
        root.join(CRASH_MARKER_FILE).exists()
    }
}

impl Drop for CrashMarker {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "crash marker released"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove crash marker"),
        }
    }
}
