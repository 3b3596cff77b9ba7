//! Run configuration for cco
//!
//! Every setting comes from a command-line flag or its environment variable
//! (see [`crate::cli::Cli`]); there is no configuration file. [`SyncConfig`]
//! is the validated form the commands work with.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::{CcoError, Result};

/// Raw artifact host; artifacts live at `{base}/{revision}/{path}`
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/sungurerdim/ClaudeCodeOptimizer";

/// Tag listing, newest first
pub const DEFAULT_TAGS_URL: &str = "https://api.github.com/repos/sungurerdim/ClaudeCodeOptimizer/tags";

/// Branch used when no release tag is published
pub const DEFAULT_BRANCH: &str = "main";

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Directory under the home directory used when no root is given
pub const DEFAULT_ROOT_DIR: &str = ".claude";

/// Validated settings shared by all commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub root: PathBuf,
    pub base_url: String,
    pub tags_url: String,
    pub default_branch: String,
    pub timeout: Duration,
    /// Run pip / plugin host deregistration after installing or uninstalling
    pub external_cleanup: bool,
}

impl SyncConfig {
    /// Build from parsed arguments, resolving the default root.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = match &cli.root {
            Some(root) => root.clone(),
            None => default_root()?,
        };
        Self::new(
            root,
            &cli.base_url,
            &cli.tags_url,
            &cli.branch,
            cli.timeout,
            !cli.no_external_cleanup,
        )
    }

    pub fn new(
        root: PathBuf,
        base_url: &str,
        tags_url: &str,
        default_branch: &str,
        timeout_secs: u64,
        external_cleanup: bool,
    ) -> Result<Self> {
        if root.as_os_str().is_empty() {
            return Err(CcoError::ConfigInvalid {
                message: "installation root must not be empty".to_string(),
            });
        }
        let base_url = base_url.trim().trim_end_matches('/');
        if !is_http_url(base_url) {
            return Err(CcoError::ConfigInvalid {
                message: format!("base URL must start with http:// or https://, got '{base_url}'"),
            });
        }
        let tags_url = tags_url.trim();
        if !is_http_url(tags_url) {
            return Err(CcoError::ConfigInvalid {
                message: format!("tags URL must start with http:// or https://, got '{tags_url}'"),
            });
        }
        let default_branch = default_branch.trim();
        if default_branch.is_empty() || default_branch.contains('/') {
            return Err(CcoError::ConfigInvalid {
                message: format!("invalid branch name '{default_branch}'"),
            });
        }
        if timeout_secs == 0 {
            return Err(CcoError::ConfigInvalid {
                message: "timeout must be at least one second".to_string(),
            });
        }

        Ok(Self {
            root,
            base_url: base_url.to_string(),
            tags_url: tags_url.to_string(),
            default_branch: default_branch.to_string(),
            timeout: Duration::from_secs(timeout_secs),
            external_cleanup,
        })
    }
}

/// `~/.claude`
pub fn default_root() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_ROOT_DIR))
        .ok_or(CcoError::HomeNotFound)
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(base: &str, tags: &str, branch: &str, timeout: u64) -> Result<SyncConfig> {
        SyncConfig::new(PathBuf::from("/tmp/claude"), base, tags, branch, timeout, true)
    }

    #[test]
    fn test_defaults_are_valid() {
        let cfg = config(DEFAULT_BASE_URL, DEFAULT_TAGS_URL, DEFAULT_BRANCH, DEFAULT_TIMEOUT_SECS)
            .unwrap();
        assert_eq!(cfg.timeout, Duration::from_secs(15));
        assert_eq!(cfg.default_branch, "main");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let cfg = config("http://127.0.0.1:8080/raw/", DEFAULT_TAGS_URL, "main", 5).unwrap();
        assert_eq!(cfg.base_url, "http://127.0.0.1:8080/raw");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            config("ftp://host", DEFAULT_TAGS_URL, "main", 5),
            Err(CcoError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            config(DEFAULT_BASE_URL, "tags.json", "main", 5),
            Err(CcoError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            config(DEFAULT_BASE_URL, DEFAULT_TAGS_URL, "", 5),
            Err(CcoError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            config(DEFAULT_BASE_URL, DEFAULT_TAGS_URL, "main", 0),
            Err(CcoError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_from_cli_uses_explicit_root() {
        let cli = Cli::try_parse_from([
            "cco",
            "--root",
            "/srv/claude",
            "--no-external-cleanup",
            "version",
        ])
        .unwrap();
        let cfg = SyncConfig::from_cli(&cli).unwrap();
        assert_eq!(cfg.root, PathBuf::from("/srv/claude"));
        assert!(!cfg.external_cleanup);
    }
}
