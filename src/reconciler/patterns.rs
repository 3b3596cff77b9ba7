//! Legacy artifact patterns, one table per schema generation
//!
//! Generations are only ever appended. A user may jump from any old release
//! straight to the current one, so every historical layout stays listed.

/// Kind of directory entry a prefix scan matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// Rule identifying an artifact from an earlier schema generation.
///
/// Paths are relative to the installation root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyPattern {
    /// A single file; used for old names without a recognizable prefix
    ExactFile(&'static str),
    /// A whole directory, removed recursively
    Directory(&'static str),
    /// Entries of `kind` directly inside `dir` whose name starts with
    /// `prefix` and ends with `suffix`
    Prefixed {
        dir: &'static str,
        prefix: &'static str,
        suffix: &'static str,
        kind: EntryKind,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct LegacyGeneration {
    pub name: &'static str,
    pub patterns: &'static [LegacyPattern],
}

pub const LEGACY_GENERATIONS: &[LegacyGeneration] = &[
    LegacyGeneration {
        name: "v1 slash commands",
        patterns: &[
            LegacyPattern::ExactFile("CCO.md"),
            LegacyPattern::ExactFile("rules/core.md"),
            LegacyPattern::ExactFile("rules/ai.md"),
            LegacyPattern::ExactFile("rules/tools.md"),
            LegacyPattern::Directory("commands/cco"),
            LegacyPattern::Directory("cco"),
        ],
    },
    LegacyGeneration {
        name: "v2-v3 prefixed commands",
        patterns: &[
            LegacyPattern::ExactFile("rules/adaptive.md"),
            LegacyPattern::Directory("rules/cco"),
            LegacyPattern::Prefixed {
                dir: "commands",
                prefix: "cco-",
                suffix: ".md",
                kind: EntryKind::File,
            },
        ],
    },
    LegacyGeneration {
        name: "v4 rules, skills and agents",
        patterns: &[
            LegacyPattern::Prefixed {
                dir: "rules",
                prefix: "cco-",
                suffix: ".md",
                kind: EntryKind::File,
            },
            LegacyPattern::Prefixed {
                dir: "skills",
                prefix: "cco-",
                suffix: "",
                kind: EntryKind::Dir,
            },
            LegacyPattern::Prefixed {
                dir: "agents",
                prefix: "cco-",
                suffix: ".md",
                kind: EntryKind::File,
            },
        ],
    },
];

/// All patterns across generations, oldest first
pub fn all_patterns() -> Vec<LegacyPattern> {
    LEGACY_GENERATIONS
        .iter()
        .flat_map(|generation| generation.patterns.iter().copied())
        .collect()
}

impl LegacyPattern {
    /// Whether `name` (an entry directly inside the scanned directory) matches
    /// a prefix pattern
    pub fn matches_name(&self, name: &str, is_dir: bool) -> bool {
        match self {
            LegacyPattern::Prefixed {
                prefix,
                suffix,
                kind,
                ..
            } => {
                let kind_ok = match kind {
                    EntryKind::Dir => is_dir,
                    EntryKind::File => !is_dir,
                };
                kind_ok
                    && name.len() > prefix.len() + suffix.len()
                    && name.starts_with(prefix)
                    && name.ends_with(suffix)
            }
            _ => false,
        }
    }
}
