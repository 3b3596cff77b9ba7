use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install or update to the latest release:\n    cco install\n\n\
                   Preview without touching the filesystem:\n    cco install --dry-run\n\n\
                   Install into another directory:\n    cco --root ./claude-home install")]
pub struct InstallArgs {
    /// Show what would be installed and removed without writing anything
    #[arg(long)]
    pub dry_run: bool,
}
