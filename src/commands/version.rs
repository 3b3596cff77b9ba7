//! Version command implementation

use tracing::warn;

use crate::config::SyncConfig;
use crate::content::marker::format_timestamp;
use crate::error::Result;
use crate::resolver::installed_version;

/// Run version command
pub fn run(config: &SyncConfig) -> Result<()> {
    println!("cco {}", env!("CARGO_PKG_VERSION"));

    let installed = match installed_version(&config.root) {
        Ok(marker) => marker,
        Err(e) => {
            warn!(error = %e, "unreadable version marker");
            None
        }
    };

    match installed {
        Some(marker) => {
            println!("Installed: {}", marker.version);
            if let Some(at) = marker.last_update_check {
                println!("Last update check: {}", format_timestamp(at));
            }
        }
        None => println!("Installed: not installed"),
    }
    println!("Root: {}", config.root.display());

    Ok(())
}
