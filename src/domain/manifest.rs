//! The compiled-in, version-pinned artifact list

use super::artifact::{ArtifactGroup, ManifestEntry};

/// Name prefix shared by every artifact cco manages
pub const MANAGED_PREFIX: &str = "cco-";

/// Primary artifact; carries the version marker and doubles as the source
/// verification probe
pub const PRIMARY_ARTIFACT: &str = "rules/cco-rules.md";

const SKILLS: &[&str] = &[
    "cco-align",
    "cco-blueprint",
    "cco-commit",
    "cco-docs",
    "cco-optimize",
    "cco-pr",
    "cco-preflight",
    "cco-research",
    "cco-tune",
];

const AGENTS: &[&str] = &["cco-agent-analyze", "cco-agent-apply", "cco-agent-research"];

/// Complete set of artifacts for one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    /// Manifest shipped with this build
    pub fn current() -> Self {
        let mut entries = vec![ManifestEntry::critical(
            PRIMARY_ARTIFACT,
            ArtifactGroup::Rules,
        )];
        entries.extend(
            SKILLS
                .iter()
                .map(|name| ManifestEntry::new(format!("skills/{name}/SKILL.md"), ArtifactGroup::Skills)),
        );
        entries.extend(
            AGENTS
                .iter()
                .map(|name| ManifestEntry::new(format!("agents/{name}.md"), ArtifactGroup::Agents)),
        );
        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by group (rules, skills, agents), keeping declaration
    /// order within a group.
    pub fn in_install_order(&self) -> Vec<&ManifestEntry> {
        let mut ordered: Vec<&ManifestEntry> = self.entries.iter().collect();
        ordered.sort_by_key(|entry| entry.group);
        ordered
    }

    /// The entry used to verify the remote source. Falls back to the first
    /// entry in install order when none is flagged critical.
    pub fn verification_entry(&self) -> Option<&ManifestEntry> {
        self.entries
            .iter()
            .find(|entry| entry.critical)
            .or_else(|| self.in_install_order().into_iter().next())
    }

    /// True when `path` is a manifest path, or a directory that contains one.
    ///
    /// `path` is relative to the installation root and uses forward slashes.
    pub fn covers(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        self.entries.iter().any(|entry| {
            entry.relative_path == path
                || entry
                    .relative_path
                    .strip_prefix(path)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

/// Whether a directory entry name follows the managed naming convention
pub fn is_managed_name(name: &str) -> bool {
    name.starts_with(MANAGED_PREFIX) && name.len() > MANAGED_PREFIX.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_manifest_has_single_critical_primary() {
        let manifest = Manifest::current();
        let critical: Vec<_> = manifest.entries().iter().filter(|e| e.critical).collect();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].relative_path, PRIMARY_ARTIFACT);
        assert_eq!(manifest.len(), 13);
    }

    #[test]
    fn test_current_manifest_follows_naming_convention() {
        for entry in Manifest::current().entries() {
            let top = entry
                .relative_path
                .split('/')
                .nth(1)
                .unwrap_or_default();
            assert!(is_managed_name(top), "{} is not managed", entry.relative_path);
        }
    }

    #[test]
    fn test_install_order_groups_rules_skills_agents() {
        let manifest = Manifest::new(vec![
            ManifestEntry::new("agents/cco-a.md", ArtifactGroup::Agents),
            ManifestEntry::new("skills/cco-s/SKILL.md", ArtifactGroup::Skills),
            ManifestEntry::critical("rules/cco-rules.md", ArtifactGroup::Rules),
            ManifestEntry::new("agents/cco-b.md", ArtifactGroup::Agents),
        ]);
        let order: Vec<&str> = manifest
            .in_install_order()
            .iter()
            .map(|e| e.relative_path.as_str())
            .collect();
        assert_eq!(
            order,
            vec![
                "rules/cco-rules.md",
                "skills/cco-s/SKILL.md",
                "agents/cco-a.md",
                "agents/cco-b.md"
            ]
        );
    }

    #[test]
    fn test_covers_files_and_parent_dirs() {
        let manifest = Manifest::current();
        assert!(manifest.covers("rules/cco-rules.md"));
        assert!(manifest.covers("skills/cco-optimize"));
        assert!(manifest.covers("skills/cco-optimize/"));
        assert!(!manifest.covers("skills/cco-opt"));
        assert!(!manifest.covers("skills/cco-removed"));
        assert!(!manifest.covers("agents/cco-agent-old.md"));
    }

    #[test]
    fn test_verification_entry_prefers_critical() {
        let manifest = Manifest::new(vec![
            ManifestEntry::new("rules/cco-extra.md", ArtifactGroup::Rules),
            ManifestEntry::critical("rules/cco-rules.md", ArtifactGroup::Rules),
        ]);
        assert_eq!(
            manifest.verification_entry().map(|e| e.relative_path.as_str()),
            Some("rules/cco-rules.md")
        );
    }

    #[test]
    fn test_is_managed_name() {
        assert!(is_managed_name("cco-commit"));
        assert!(!is_managed_name("cco-"));
        assert!(!is_managed_name("my-notes.md"));
    }
}
