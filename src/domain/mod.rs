//! Domain models for cco
//!
//! Pure data describing what a complete installation consists of. These types
//! know nothing about the network or the filesystem.

pub mod artifact;
pub mod manifest;

pub use artifact::{ArtifactGroup, ManifestEntry};
pub use manifest::{MANAGED_PREFIX, Manifest, PRIMARY_ARTIFACT, is_managed_name};
