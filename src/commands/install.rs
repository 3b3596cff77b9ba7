//! Install command implementation
//!
//! The installation process:
//! 1. Resolve the newest published revision
//! 2. Verify the remote source through the critical artifact
//! 3. Install every manifest entry atomically
//! 4. Remove artifacts left by earlier releases
//! 5. Stamp the version marker and print the summary

use console::Term;

use crate::cli::InstallArgs;
use crate::config::SyncConfig;
use crate::domain::Manifest;
use crate::error::{CcoError, Result};
use crate::installer::Installer;
use crate::installer::summary::print_install_summary;
use crate::transport::{Fetcher, HttpTransport, RetryPolicy};

/// Run install command
pub fn run(config: &SyncConfig, args: InstallArgs) -> Result<()> {
    let transport = HttpTransport::new(config.timeout)?;
    let fetcher = Fetcher::new(transport, RetryPolicy::default());
    let manifest = Manifest::current();

    let report = Installer::new(config, fetcher)
        .dry_run(args.dry_run)
        .show_progress(Term::stderr().is_term())
        .run(&manifest)?;

    print_install_summary(&report);

    if report.tally.failed > 0 {
        return Err(CcoError::IncompleteInstall {
            failed: report.tally.failed,
            total: report.tally.total(),
        });
    }
    Ok(())
}
