//! Best-effort cleanup of registrations made by earlier generations
//!
//! Older releases were distributed as a Python package and as a host plugin.
//! Each tool is probed on `PATH`; a tool that is missing becomes an
//! [`AbsentTool`] so callers never special-case its absence.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

/// Capability to run an external program
pub trait ExternalTool {
    fn name(&self) -> &str;

    /// Run with `args`; `Ok(true)` when the program exited successfully
    fn run(&self, args: &[&str]) -> std::io::Result<bool>;
}

/// A program found on `PATH`
#[derive(Debug, Clone)]
pub struct CommandTool {
    name: String,
    program: PathBuf,
}

impl CommandTool {
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
        }
    }
}

impl ExternalTool for CommandTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, args: &[&str]) -> std::io::Result<bool> {
        let status = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        Ok(status.success())
    }
}

/// Stand-in for a program that is not installed
#[derive(Debug, Clone)]
pub struct AbsentTool {
    name: String,
}

impl AbsentTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ExternalTool for AbsentTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, _args: &[&str]) -> std::io::Result<bool> {
        Ok(false)
    }
}

/// Look `program` up on `PATH`
pub fn probe_tool(program: &str) -> Box<dyn ExternalTool> {
    match which::which(program) {
        Ok(path) => Box::new(CommandTool::new(program, path)),
        Err(_) => Box::new(AbsentTool::new(program)),
    }
}

/// One registration a previous generation may have left behind
#[derive(Debug, Clone, Copy)]
pub struct LegacyRegistration {
    pub tool: &'static str,
    pub args: &'static [&'static str],
}

pub const LEGACY_REGISTRATIONS: &[LegacyRegistration] = &[
    LegacyRegistration {
        tool: "pip",
        args: &["uninstall", "-y", "claude-code-optimizer"],
    },
    LegacyRegistration {
        tool: "pipx",
        args: &["uninstall", "claude-code-optimizer"],
    },
    LegacyRegistration {
        tool: "claude",
        args: &["plugin", "uninstall", "cco"],
    },
];

/// Run every deregistration whose tool `probe` finds.
///
/// Returns the `tool args...` command lines that exited successfully. Errors
/// and failures are logged at debug level and otherwise ignored.
pub fn deregister_all<P>(registrations: &[LegacyRegistration], probe: P) -> Vec<String>
where
    P: Fn(&str) -> Box<dyn ExternalTool>,
{
    let mut succeeded = Vec::new();
    for registration in registrations {
        let tool = probe(registration.tool);
        let command_line = format!("{} {}", tool.name(), registration.args.join(" "));
        match tool.run(registration.args) {
            Ok(true) => {
                debug!(command = %command_line, "deregistered legacy installation");
                succeeded.push(command_line);
            }
            Ok(false) => debug!(command = %command_line, "nothing to deregister"),
            Err(e) => debug!(command = %command_line, error = %e, "deregistration failed"),
        }
    }
    succeeded
}
