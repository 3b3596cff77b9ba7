//! Uninstall operation module
//!
//! Removes installed artifacts group by group. Only entries following the
//! managed naming convention are touched: `cco-*` files under `rules/` and
//! `agents/`, `cco-*` directories under `skills/`. Anything else in those
//! directories belongs to the user.

pub mod confirmation;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::domain::{ArtifactGroup, is_managed_name};
use crate::error::{CcoError, Result};
use crate::path_utils::relative_display;
use crate::reconciler::{ExternalTool, LEGACY_REGISTRATIONS, deregister_all, probe_tool};

pub use confirmation::{AssumeYes, InquirePrompter, Prompter};

/// How removal is confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallMode {
    /// One confirmation for everything
    All,
    /// One confirmation per group that has installed entries
    PerGroup,
}

/// What an uninstall run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallReport {
    /// Removed (or, in a dry run, removable) paths relative to the root
    pub removed: Vec<String>,
    /// Groups the user declined to remove
    pub declined: Vec<ArtifactGroup>,
    pub warnings: Vec<String>,
    pub deregistered: Vec<String>,
    pub dry_run: bool,
}

/// Managed entries per group currently under `root`, sorted
pub fn find_installed(root: &Path) -> BTreeMap<ArtifactGroup, Vec<String>> {
    let mut installed = BTreeMap::new();
    for group in ArtifactGroup::ALL {
        let dir = root.join(group.dir_name());
        if !dir.is_dir() {
            continue;
        }
        let mut entries: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                let name = entry.file_name().to_string_lossy();
                is_managed_name(&name) && entry.file_type().is_dir() == group.entries_are_dirs()
            })
            .map(|entry| relative_display(root, entry.path()))
            .collect();
        if !entries.is_empty() {
            entries.sort();
            installed.insert(group, entries);
        }
    }
    installed
}

pub struct Uninstaller<'a> {
    root: &'a Path,
    prompter: &'a dyn Prompter,
    dry_run: bool,
    external_cleanup: bool,
    tool_probe: Box<dyn Fn(&str) -> Box<dyn ExternalTool>>,
}

impl<'a> Uninstaller<'a> {
    pub fn new(root: &'a Path, prompter: &'a dyn Prompter) -> Self {
        Self {
            root,
            prompter,
            dry_run: false,
            external_cleanup: true,
            tool_probe: Box::new(probe_tool),
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn external_cleanup(mut self, enabled: bool) -> Self {
        self.external_cleanup = enabled;
        self
    }

    #[allow(dead_code)] // Used in tests
    pub fn with_tool_probe<P>(mut self, probe: P) -> Self
    where
        P: Fn(&str) -> Box<dyn ExternalTool> + 'static,
    {
        self.tool_probe = Box::new(probe);
        self
    }

    pub fn run(&self, mode: UninstallMode) -> Result<UninstallReport> {
        let installed = find_installed(self.root);
        let mut report = UninstallReport {
            dry_run: self.dry_run,
            ..UninstallReport::default()
        };

        let selected: Vec<(ArtifactGroup, Vec<String>)> = match mode {
            UninstallMode::All => {
                let all: Vec<String> = installed.values().flatten().cloned().collect();
                if all.is_empty() {
                    debug!(root = %self.root.display(), "nothing installed");
                } else if self.dry_run
                    || self
                        .prompter
                        .confirm(&confirmation::confirm_all_message(all.len()))?
                {
                    return self.finish(installed.into_iter().collect(), report);
                } else {
                    report.declined.extend(installed.keys().copied());
                }
                Vec::new()
            }
            UninstallMode::PerGroup => {
                let mut selected = Vec::new();
                for (group, entries) in installed {
                    let message = confirmation::confirm_group_message(group, entries.len());
                    if self.dry_run || self.prompter.confirm(&message)? {
                        selected.push((group, entries));
                    } else {
                        report.declined.push(group);
                    }
                }
                selected
            }
        };

        self.finish(selected, report)
    }

    fn finish(
        &self,
        selected: Vec<(ArtifactGroup, Vec<String>)>,
        mut report: UninstallReport,
    ) -> Result<UninstallReport> {
        for (group, entries) in selected {
            for relative in entries {
                if self.dry_run {
                    report.removed.push(relative);
                    continue;
                }
                match remove_managed(self.root, &relative) {
                    Ok(()) => {
                        info!(%group, path = %relative, "removed");
                        report.removed.push(relative);
                    }
                    Err(e) => {
                        let err = CcoError::RemoveFailed {
                            path: relative,
                            reason: e.to_string(),
                        };
                        warn!("{err}");
                        report.warnings.push(err.to_string());
                    }
                }
            }
        }

        if !self.dry_run && self.external_cleanup {
            report.deregistered = deregister_all(LEGACY_REGISTRATIONS, &self.tool_probe);
        }
        Ok(report)
    }
}

fn remove_managed(root: &Path, relative: &str) -> io::Result<()> {
    let path = root.join(relative);
    let meta = path.symlink_metadata()?;
    if meta.file_type().is_dir() {
        fs::remove_dir_all(&path)
    } else {
        fs::remove_file(&path)
    }
}
