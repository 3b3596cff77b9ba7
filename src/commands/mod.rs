//! Command implementations for cco CLI

pub mod install;
pub mod uninstall;
pub mod version;
