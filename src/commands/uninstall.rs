//! Uninstall command CLI wrapper

use console::Style;

use crate::cli::UninstallArgs;
use crate::config::SyncConfig;
use crate::error::Result;
use crate::uninstall::confirmation::print_removal_plan;
use crate::uninstall::{
    AssumeYes, InquirePrompter, Prompter, UninstallMode, Uninstaller, find_installed,
};

/// Run uninstall command
pub fn run(config: &SyncConfig, args: UninstallArgs) -> Result<()> {
    let installed = find_installed(&config.root);
    let mode = if args.all {
        UninstallMode::All
    } else {
        UninstallMode::PerGroup
    };

    if mode == UninstallMode::All && !args.yes && !args.dry_run && !installed.is_empty() {
        let planned: Vec<String> = installed.values().flatten().cloned().collect();
        print_removal_plan(&planned);
    }

    let prompter: &dyn Prompter = if args.yes { &AssumeYes } else { &InquirePrompter };
    let report = Uninstaller::new(&config.root, prompter)
        .dry_run(args.dry_run)
        .external_cleanup(config.external_cleanup)
        .run(mode)?;

    let prefix = if report.dry_run { "[DRY RUN] Would remove" } else { "Removed" };
    for path in &report.removed {
        println!("{prefix} {path}");
    }
    for command in &report.deregistered {
        println!("Deregistered legacy install: {command}");
    }
    for warning in &report.warnings {
        eprintln!("{} {warning}", Style::new().yellow().apply_to("warning:"));
    }

    if !report.removed.is_empty() {
        if !report.dry_run {
            println!(
                "{}",
                Style::new()
                    .bold()
                    .apply_to(format!("Uninstalled {} artifact(s)", report.removed.len()))
            );
        }
    } else if report.deregistered.is_empty() {
        if installed.is_empty() {
            println!("Nothing to uninstall in {}", config.root.display());
        } else {
            println!("Nothing removed");
        }
    }
    Ok(())
}
