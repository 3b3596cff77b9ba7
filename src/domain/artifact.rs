//! Artifact domain types

use std::fmt;

/// Group an artifact belongs to; also the top-level directory it installs into.
///
/// Ordering follows install order: rules, then skills, then agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArtifactGroup {
    Rules,
    Skills,
    Agents,
}

impl ArtifactGroup {
    pub const ALL: [ArtifactGroup; 3] = [
        ArtifactGroup::Rules,
        ArtifactGroup::Skills,
        ArtifactGroup::Agents,
    ];

    /// Directory name under the installation root
    pub fn dir_name(self) -> &'static str {
        match self {
            ArtifactGroup::Rules => "rules",
            ArtifactGroup::Skills => "skills",
            ArtifactGroup::Agents => "agents",
        }
    }

    /// Whether managed entries of this group are directories (one per skill)
    /// rather than single files.
    pub fn entries_are_dirs(self) -> bool {
        matches!(self, ArtifactGroup::Skills)
    }
}

impl fmt::Display for ArtifactGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One artifact that should exist after a successful install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path relative to both the remote revision root and the installation root
    pub relative_path: String,

    pub group: ArtifactGroup,

    /// A failure on a critical entry aborts the whole run
    pub critical: bool,
}

impl ManifestEntry {
    pub fn new(relative_path: impl Into<String>, group: ArtifactGroup) -> Self {
        Self {
            relative_path: relative_path.into(),
            group,
            critical: false,
        }
    }

    pub fn critical(relative_path: impl Into<String>, group: ArtifactGroup) -> Self {
        Self {
            relative_path: relative_path.into(),
            group,
            critical: true,
        }
    }
}
