//! cco - Claude Code prompt artifact synchronizer
//!
//! Installs the rules, skills and agents of the latest published release into
//! a Claude configuration directory, keeps them current across releases, and
//! removes what earlier releases left behind.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod content;
mod crash_marker;
mod domain;
mod error;
mod installer;
mod path_utils;
mod progress;
mod reconciler;
mod resolver;
mod transport;
mod uninstall;

use cli::{Cli, Commands};
use config::SyncConfig;
use error::Result;

/// Environment variable holding the log filter directives
const LOG_ENV: &str = "CCO_LOG";

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "cco=debug" } else { "cco=warn" };
    let filter = if verbose {
        EnvFilter::new(default_directive)
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
    };

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("warning: logging disabled: {e}");
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = SyncConfig::from_cli(&cli)?;

    match cli.command {
        Commands::Install(args) => commands::install::run(&config, args),
        Commands::Uninstall(args) => commands::uninstall::run(&config, args),
        Commands::Version => commands::version::run(&config),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
