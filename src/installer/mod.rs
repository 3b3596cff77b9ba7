//! Install orchestration
//!
//! This module handles:
//! - Driving one install run through its phases (resolve, verify, install,
//!   reconcile, stamp)
//! - Tallying per-artifact outcomes
//! - Writing artifacts atomically (see [`writer`])
//! - Rendering the end-of-run summary (see [`summary`])
//!
//! Only the critical artifact can abort a run. Every other failure is counted
//! and the loop moves on, so one missing skill never blocks the rest.

pub mod summary;
pub mod writer;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::content::{read_marker, stamp_marker, validate};
use crate::crash_marker::CrashMarker;
use crate::domain::{ArtifactGroup, Manifest, ManifestEntry, PRIMARY_ARTIFACT};
use crate::error::{CcoError, Result};
use crate::progress::ProgressDisplay;
use crate::reconciler::{
    ExternalTool, LEGACY_REGISTRATIONS, ReconcileReport, all_patterns, deregister_all, probe_tool,
    reconcile,
};
use crate::resolver::{
    RemoteRevision, VersionTransition, installed_version, normalize_version, resolve_revision,
};
use crate::transport::{FetchStatus, Fetcher, RemoteSource};

pub use writer::{WriteOutcome, install_artifact, write_atomic};

/// Phase of an install run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPhase {
    Idle,
    ResolvingVersion,
    VerifyingSource,
    Installing,
    Reconciling,
    UpdatingMarker,
    Done,
    Aborted,
}

impl fmt::Display for InstallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallPhase::Idle => "idle",
            InstallPhase::ResolvingVersion => "resolving version",
            InstallPhase::VerifyingSource => "verifying source",
            InstallPhase::Installing => "installing",
            InstallPhase::Reconciling => "reconciling",
            InstallPhase::UpdatingMarker => "updating marker",
            InstallPhase::Done => "done",
            InstallPhase::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// One artifact that could not be installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFailure {
    pub path: String,
    pub reason: String,
}

/// Per-artifact outcome counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallTally {
    pub succeeded: usize,
    pub failed: usize,
    /// Successes per group
    pub per_group: BTreeMap<ArtifactGroup, usize>,
    /// Bytes of successfully installed content, written or not
    pub bytes: u64,
    /// Successes whose target already held equivalent content
    pub unchanged: usize,
    pub failures: Vec<ArtifactFailure>,
}

impl InstallTally {
    fn record_success(&mut self, group: ArtifactGroup, outcome: WriteOutcome) {
        self.succeeded += 1;
        *self.per_group.entry(group).or_default() += 1;
        self.bytes += outcome.bytes();
        if !outcome.changed() {
            self.unchanged += 1;
        }
    }

    fn record_failure(&mut self, path: &str, reason: String) {
        self.failed += 1;
        self.failures.push(ArtifactFailure {
            path: path.to_string(),
            reason,
        });
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Successes that actually wrote a file
    pub fn changed(&self) -> usize {
        self.succeeded - self.unchanged
    }

    pub fn in_group(&self, group: ArtifactGroup) -> usize {
        self.per_group.get(&group).copied().unwrap_or(0)
    }
}

/// Everything one run did, for the summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub revision: RemoteRevision,
    pub transition: VersionTransition,
    pub tally: InstallTally,
    pub legacy: ReconcileReport,
    /// Legacy registrations removed from external tools
    pub deregistered: Vec<String>,
    pub previous_run_interrupted: bool,
    pub dry_run: bool,
    /// Artifacts a dry run would install, in install order
    pub planned: Vec<String>,
}

/// Runs the install state machine against one root
pub struct Installer<'a> {
    config: &'a SyncConfig,
    fetcher: Fetcher,
    dry_run: bool,
    show_progress: bool,
    tool_probe: Box<dyn Fn(&str) -> Box<dyn ExternalTool>>,
    phase: InstallPhase,
}

impl<'a> Installer<'a> {
    pub fn new(config: &'a SyncConfig, fetcher: Fetcher) -> Self {
        Self {
            config,
            fetcher,
            dry_run: false,
            show_progress: false,
            tool_probe: Box::new(probe_tool),
            phase: InstallPhase::Idle,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
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

    #[allow(dead_code)] // Used in tests
    pub fn phase(&self) -> InstallPhase {
        self.phase
    }

    fn enter(&mut self, phase: InstallPhase) {
        debug!(from = %self.phase, to = %phase, "install phase");
        self.phase = phase;
    }

    pub fn run(&mut self, manifest: &Manifest) -> Result<InstallReport> {
        let root = self.config.root.clone();

        self.enter(InstallPhase::ResolvingVersion);
        let revision = resolve_revision(
            &self.fetcher,
            &self.config.tags_url,
            &self.config.default_branch,
        );
        let source = RemoteSource::new(self.config.base_url.clone(), revision.reference.clone());
        info!(reference = %revision.reference, "resolved remote revision");

        self.enter(InstallPhase::VerifyingSource);
        let (critical, verified) = match self.verify_source(manifest, &source) {
            Ok(verified) => verified,
            Err(e) => {
                self.enter(InstallPhase::Aborted);
                return Err(e);
            }
        };

        let target_version = match &revision.version {
            Some(version) => version.clone(),
            None => read_marker(&verified)
                .ok()
                .flatten()
                .map(|marker| marker.version)
                .unwrap_or_else(|| normalize_version(&revision.reference)),
        };

        let installed = match installed_version(&root) {
            Ok(marker) => marker,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable installed version marker");
                None
            }
        };
        let transition = VersionTransition::between(
            installed.as_ref().map(|marker| marker.version.as_str()),
            &target_version,
        );

        if self.dry_run {
            let legacy = reconcile(&root, manifest, &all_patterns(), true);
            self.enter(InstallPhase::Done);
            return Ok(InstallReport {
                revision,
                transition,
                tally: InstallTally::default(),
                legacy,
                deregistered: Vec::new(),
                previous_run_interrupted: CrashMarker::is_present(&root),
                dry_run: true,
                planned: manifest
                    .in_install_order()
                    .into_iter()
                    .map(|entry| entry.relative_path.clone())
                    .collect(),
            });
        }

        let crash_marker = CrashMarker::acquire(&root)?;
        if crash_marker.previous_run_interrupted() {
            eprintln!("Previous installation may have been interrupted; repairing.");
        }

        self.enter(InstallPhase::Installing);
        let tally = match self.install_entries(manifest, &source, &critical, verified) {
            Ok(tally) => tally,
            Err(e) => {
                self.enter(InstallPhase::Aborted);
                return Err(e);
            }
        };

        self.enter(InstallPhase::Reconciling);
        let legacy = reconcile(&root, manifest, &all_patterns(), false);
        let deregistered = if self.config.external_cleanup {
            deregister_all(LEGACY_REGISTRATIONS, &self.tool_probe)
        } else {
            Vec::new()
        };

        self.enter(InstallPhase::UpdatingMarker);
        if let Err(e) = stamp_installed_marker(&root) {
            warn!(error = %e, "failed to update last_update_check");
        }

        let previous_run_interrupted = crash_marker.previous_run_interrupted();
        drop(crash_marker);
        self.enter(InstallPhase::Done);

        Ok(InstallReport {
            revision,
            transition,
            tally,
            legacy,
            deregistered,
            previous_run_interrupted,
            dry_run: false,
            planned: Vec::new(),
        })
    }

    /// Fetch and validate the critical artifact; its bytes are returned for
    /// reuse by the install loop.
    fn verify_source(
        &self,
        manifest: &Manifest,
        source: &RemoteSource,
    ) -> Result<(ManifestEntry, Vec<u8>)> {
        let entry = manifest
            .verification_entry()
            .cloned()
            .ok_or_else(|| CcoError::SourceVerificationFailed {
                reference: source.reference.clone(),
                reason: "manifest has no critical artifact".to_string(),
            })?;

        let outcome = self.fetcher.fetch_artifact(source, &entry.relative_path);
        match outcome.status {
            FetchStatus::Ok(bytes) if validate(&bytes) => {
                debug!(path = %entry.relative_path, attempts = outcome.attempts, "source verified");
                Ok((entry, bytes))
            }
            FetchStatus::Ok(_) => Err(CcoError::SourceVerificationFailed {
                reference: source.reference.clone(),
                reason: CcoError::InvalidContent {
                    path: entry.relative_path,
                }
                .to_string(),
            }),
            FetchStatus::RetryableError(reason) | FetchStatus::PermanentError(reason) => {
                Err(CcoError::SourceVerificationFailed {
                    reference: source.reference.clone(),
                    reason: format!("{}: {reason}", entry.relative_path),
                })
            }
        }
    }

    fn install_entries(
        &self,
        manifest: &Manifest,
        source: &RemoteSource,
        critical: &ManifestEntry,
        verified: Vec<u8>,
    ) -> Result<InstallTally> {
        let entries = manifest.in_install_order();
        let progress = if self.show_progress {
            ProgressDisplay::new(entries.len() as u64)
        } else {
            ProgressDisplay::hidden()
        };

        let mut verified = Some(verified);
        let mut tally = InstallTally::default();
        for entry in entries {
            progress.start_artifact(&entry.relative_path);
            let reused = if entry.relative_path == critical.relative_path {
                verified.take()
            } else {
                None
            };

            match self.install_one(entry, source, reused) {
                Ok(outcome) => {
                    debug!(path = %entry.relative_path, changed = outcome.changed(), "installed");
                    tally.record_success(entry.group, outcome);
                }
                Err(reason) if entry.critical => {
                    progress.abandon();
                    return Err(CcoError::CriticalArtifactFailed {
                        path: entry.relative_path.clone(),
                        reason,
                    });
                }
                Err(reason) => {
                    warn!(path = %entry.relative_path, %reason, "skipping artifact");
                    tally.record_failure(&entry.relative_path, reason);
                }
            }
            progress.inc();
        }
        progress.finish();
        Ok(tally)
    }

    /// Fetch, validate and write one entry. The error is a display reason.
    fn install_one(
        &self,
        entry: &ManifestEntry,
        source: &RemoteSource,
        prefetched: Option<Vec<u8>>,
    ) -> std::result::Result<WriteOutcome, String> {
        let bytes = match prefetched {
            Some(bytes) => bytes,
            None => {
                let outcome = self.fetcher.fetch_artifact(source, &entry.relative_path);
                match outcome.status {
                    FetchStatus::Ok(bytes) => bytes,
                    FetchStatus::RetryableError(reason) => {
                        return Err(format!("{reason} (after {} attempts)", outcome.attempts));
                    }
                    FetchStatus::PermanentError(reason) => return Err(reason),
                }
            }
        };

        if !validate(&bytes) {
            return Err(CcoError::InvalidContent {
                path: entry.relative_path.clone(),
            }
            .to_string());
        }

        install_artifact(&self.config.root, &entry.relative_path, &bytes).map_err(|e| e.to_string())
    }
}

/// Rewrite `last_update_check` in the installed primary artifact.
fn stamp_installed_marker(root: &Path) -> Result<()> {
    let path = root.join(PRIMARY_ARTIFACT);
    let content = std::fs::read_to_string(&path).map_err(|e| CcoError::read_failed(&path, e))?;
    match stamp_marker(&content, Utc::now()) {
        Some(stamped) => write_atomic(&path, stamped.as_bytes()),
        None => {
            debug!(path = %path.display(), "primary artifact has no header to stamp");
            Ok(())
        }
    }
}
