use clap::Parser;

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Choose what to remove group by group:\n    cco uninstall\n\n\
                  Remove everything after one confirmation:\n    cco uninstall --all\n\n\
                  Remove everything without confirmation:\n    cco uninstall --all -y\n\n\
                  Show what would be removed:\n    cco uninstall --all --dry-run")]
pub struct UninstallArgs {
    /// Remove every group instead of asking per group
    #[arg(long)]
    pub all: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Show what would be uninstalled without actually uninstalling
    #[arg(long)]
    pub dry_run: bool,
}
