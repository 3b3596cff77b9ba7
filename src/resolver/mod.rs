//! Version resolution
//!
//! This module handles:
//! - Picking the remote revision to synchronize against (newest tag, or the
//!   default branch when no tag is published)
//! - Reading the version marker of the current installation
//! - Describing the transition between the two for the summary
//!
//! The installed marker is passed in and out explicitly; nothing here keeps
//! state between calls.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::content::{VersionMarker, read_marker};
use crate::domain::PRIMARY_ARTIFACT;
use crate::error::{CcoError, Result};
use crate::transport::{FetchStatus, Fetcher};

/// Entry of the tag listing endpoint; extra fields are ignored
#[derive(Debug, Clone, Deserialize)]
struct TagRecord {
    name: String,
}

/// How the revision was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionSource {
    Tag,
    DefaultBranch,
}

/// Remote revision to install from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRevision {
    /// Path segment used in artifact URLs (`v4.2.0`, `main`)
    pub reference: String,
    /// Version this revision ships, when known before fetching anything
    pub version: Option<String>,
    pub source: RevisionSource,
}

impl RemoteRevision {
    pub fn tag(name: &str) -> Self {
        Self {
            reference: name.to_string(),
            version: Some(normalize_version(name)),
            source: RevisionSource::Tag,
        }
    }

    pub fn branch(name: &str) -> Self {
        Self {
            reference: name.to_string(),
            version: None,
            source: RevisionSource::DefaultBranch,
        }
    }
}

/// Strip whitespace and a leading `v` from a tag or marker version
pub fn normalize_version(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed)
        .to_string()
}

/// Parse the tag listing (JSON array of `{ "name": ... }`, newest first)
pub fn parse_tags(bytes: &[u8]) -> Result<Vec<String>> {
    let records: Vec<TagRecord> = serde_json::from_slice(bytes)?;
    Ok(records
        .into_iter()
        .map(|r| r.name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

/// Newest published tag, or `default_branch` when there is none or the
/// listing cannot be fetched.
pub fn resolve_revision(fetcher: &Fetcher, tags_url: &str, default_branch: &str) -> RemoteRevision {
    let (status, attempts) = fetcher.get(tags_url);
    let tags = match status {
        FetchStatus::Ok(bytes) => match parse_tags(&bytes) {
            Ok(tags) => tags,
            Err(e) => {
                warn!(tags_url, error = %e, "tag listing is not valid JSON");
                Vec::new()
            }
        },
        FetchStatus::RetryableError(reason) | FetchStatus::PermanentError(reason) => {
            warn!(tags_url, attempts, %reason, "tag listing unavailable");
            Vec::new()
        }
    };

    match tags.first() {
        Some(tag) => {
            debug!(tag = %tag, "resolved latest tag");
            RemoteRevision::tag(tag)
        }
        None => {
            warn!(branch = default_branch, "no release tag found, using default branch");
            RemoteRevision::branch(default_branch)
        }
    }
}

/// Read the marker of the current installation under `root`.
///
/// A missing primary artifact, or one without a marker, is `Ok(None)`.
pub fn installed_version(root: &Path) -> Result<Option<VersionMarker>> {
    let path = root.join(PRIMARY_ARTIFACT);
    let content = match std::fs::read(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CcoError::read_failed(&path, e)),
    };
    read_marker(&content).map_err(|e| CcoError::MarkerParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Relation between installed and target version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionTransition {
    FreshInstall { to: String },
    UpToDate { version: String },
    Changed { from: String, to: String },
}

impl VersionTransition {
    pub fn between(installed: Option<&str>, target: &str) -> Self {
        let target = normalize_version(target);
        match installed.map(normalize_version) {
            None => VersionTransition::FreshInstall { to: target },
            Some(current) if current == target => VersionTransition::UpToDate { version: target },
            Some(current) => VersionTransition::Changed {
                from: current,
                to: target,
            },
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn target(&self) -> &str {
        match self {
            VersionTransition::FreshInstall { to } | VersionTransition::Changed { to, .. } => to,
            VersionTransition::UpToDate { version } => version,
        }
    }
}

impl fmt::Display for VersionTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionTransition::FreshInstall { to } => write!(f, "Fresh install ({to})"),
            VersionTransition::UpToDate { version } => {
                write!(f, "Already up to date ({version})")
            }
            VersionTransition::Changed { from, to } => write!(f, "{from} → {to}"),
        }
    }
}
