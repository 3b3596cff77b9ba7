//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - uninstall: Uninstall command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod install;
pub mod uninstall;

pub use install::InstallArgs;
pub use uninstall::UninstallArgs;

use crate::config::{DEFAULT_BASE_URL, DEFAULT_BRANCH, DEFAULT_TAGS_URL, DEFAULT_TIMEOUT_SECS};

/// cco - Claude Code prompt artifact synchronizer
///
/// Keep rules, skills and agents in sync with the latest published release.
#[derive(Parser, Debug)]
#[command(
    name = "cco",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Synchronize Claude Code rules, skills and agents",
    long_about = "cco installs the rules, skills and agents of the latest release into your \
                  Claude configuration directory, removes files left behind by older releases, \
                  and can be re-run at any time.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  cco install              \x1b[90m# Install or update to the latest release\x1b[0m\n   \
                  cco install --dry-run    \x1b[90m# Show what would change\x1b[0m\n   \
                  cco uninstall            \x1b[90m# Choose groups to remove\x1b[0m\n   \
                  cco uninstall --all -y   \x1b[90m# Remove everything without asking\x1b[0m\n   \
                  cco version              \x1b[90m# Show the installed version\x1b[0m\n"
)]
pub struct Cli {
    /// Installation root (defaults to ~/.claude)
    #[arg(long, global = true, env = "CCO_HOME", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Base URL serving raw artifacts as {base}/{revision}/{path}
    #[arg(long, global = true, env = "CCO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// URL of the tag listing (JSON array of {"name": ...}, newest first)
    #[arg(long, global = true, env = "CCO_TAGS_URL", default_value = DEFAULT_TAGS_URL)]
    pub tags_url: String,

    /// Branch to install from when no release tag is published
    #[arg(long, global = true, env = "CCO_BRANCH", default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "CCO_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..=600),
        value_name = "SECS"
    )]
    pub timeout: u64,

    /// Skip deregistration from pip and the plugin host
    #[arg(long, global = true, env = "CCO_NO_EXTERNAL_CLEANUP")]
    pub no_external_cleanup: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install or update artifacts from the latest release
    Install(InstallArgs),

    /// Remove installed artifacts
    Uninstall(UninstallArgs),

    /// Show the installed version
    Version,
}
