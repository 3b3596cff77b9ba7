//! Progress bar display for installations

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

/// Per-artifact progress for one install run
pub struct ProgressDisplay {
    artifact_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a progress bar over `total_artifacts`; hidden when stderr is
    /// not a terminal so piped output stays clean.
    pub fn new(total_artifacts: u64) -> Self {
        if !Term::stderr().is_term() {
            return Self::hidden();
        }

        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let artifact_pb = ProgressBar::new(total_artifacts);
        artifact_pb.set_style(style);
        Self { artifact_pb }
    }

    pub fn hidden() -> Self {
        Self {
            artifact_pb: ProgressBar::hidden(),
        }
    }

    /// Show the artifact currently being fetched
    pub fn start_artifact(&self, relative_path: &str) {
        // Truncate long paths for display
        let display_path = if relative_path.len() > 50 {
            let cut = relative_path.len() - 47;
            let cut = (cut..relative_path.len())
                .find(|&i| relative_path.is_char_boundary(i))
                .unwrap_or(cut);
            format!("...{}", &relative_path[cut..])
        } else {
            relative_path.to_string()
        };
        self.artifact_pb.set_message(display_path);
    }

    pub fn inc(&self) {
        self.artifact_pb.inc(1);
    }

    pub fn finish(&self) {
        self.artifact_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.artifact_pb.abandon();
    }
}
