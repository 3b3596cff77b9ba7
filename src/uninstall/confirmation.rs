//! Confirmation dialogs for uninstall operation
//!
//! This module handles user confirmation and displays what would be uninstalled.

use inquire::Confirm;

use crate::domain::ArtifactGroup;
use crate::error::Result;

/// Asks the user a yes/no question
pub trait Prompter {
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// Interactive prompt on the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn confirm(&self, message: &str) -> Result<bool> {
        Ok(Confirm::new(message)
            .with_default(false)
            .with_help_message("Type 'y' to confirm, or press Enter to cancel")
            .prompt()?)
    }
}

/// Answers yes without asking (`--yes`)
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Prompter for AssumeYes {
    fn confirm(&self, _message: &str) -> Result<bool> {
        Ok(true)
    }
}

pub fn confirm_all_message(count: usize) -> String {
    format!("Remove {count} cco artifact(s)?")
}

pub fn confirm_group_message(group: ArtifactGroup, count: usize) -> String {
    format!("Remove {count} cco {group}?")
}

/// List what is about to be removed
pub fn print_removal_plan(entries: &[String]) {
    println!("\nThe following will be removed:");
    for entry in entries {
        println!("  - {entry}");
    }
    println!();
}
