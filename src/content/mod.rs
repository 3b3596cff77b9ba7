//! Artifact content checks
//!
//! Artifacts are opaque prompt files that start with a YAML header between
//! `---` delimiter lines. cco only looks inside the header: to reject payloads
//! that are obviously not artifacts, and to read and refresh the version
//! marker carried by the primary artifact.

pub mod marker;
pub mod validator;

pub use marker::{VersionMarker, equivalent_ignoring_stamp, read_marker, stamp_marker};
pub use validator::{split_header, validate};
