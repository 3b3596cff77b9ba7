//! Error types and handling for cco
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Remote failures that are expected during a run (a 404 for one optional
//! artifact, a flaky connection) are modelled as [`crate::transport::FetchStatus`]
//! values and only turn into a [`CcoError`] once the orchestrator decides they
//! matter.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for cco operations
#[derive(Error, Diagnostic, Debug)]
pub enum CcoError {
    // Remote errors
    #[error("Invalid artifact path '{path}': {reason}")]
    #[diagnostic(
        code(cco::remote::invalid_path),
        help("Artifact paths must be relative and must not contain '..' segments")
    )]
    InvalidArtifactPath { path: String, reason: String },

    #[error("Failed to fetch '{path}': {reason}")]
    #[diagnostic(code(cco::remote::fetch_failed))]
    FetchFailed { path: String, reason: String },

    #[error("Content of '{path}' is not a valid artifact")]
    #[diagnostic(
        code(cco::remote::invalid_content),
        help("The remote returned something other than a prompt file (error page, redirect or empty body)")
    )]
    InvalidContent { path: String },

    #[error("Could not verify remote source at revision '{reference}': {reason}")]
    #[diagnostic(
        code(cco::remote::verification_failed),
        help("Check your network connection, or override the source with --base-url / CCO_BASE_URL")
    )]
    SourceVerificationFailed { reference: String, reason: String },

    #[error("Failed to build HTTP client: {reason}")]
    #[diagnostic(code(cco::remote::client))]
    HttpClient { reason: String },

    // Install errors
    #[error("Critical artifact '{path}' failed, installation aborted: {reason}")]
    #[diagnostic(
        code(cco::install::critical_failed),
        help("Files written before the failure were kept; re-run 'cco install' to finish")
    )]
    CriticalArtifactFailed { path: String, reason: String },

    #[error("Installation incomplete: {failed} of {total} artifact(s) failed")]
    #[diagnostic(
        code(cco::install::incomplete),
        help("Re-run 'cco install'; every step is safe to repeat")
    )]
    IncompleteInstall { failed: usize, total: usize },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(cco::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Could not determine home directory")]
    #[diagnostic(
        code(cco::config::no_home),
        help("Pass --root or set CCO_HOME to the installation directory")
    )]
    HomeNotFound,

    #[error("Failed to parse version marker in {path}: {reason}")]
    #[diagnostic(code(cco::config::marker_parse_failed))]
    MarkerParseFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(cco::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(cco::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to remove {path}: {reason}")]
    #[diagnostic(code(cco::fs::remove_failed))]
    RemoveFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(cco::fs::io_error))]
    IoError { message: String },

    // Interaction errors
    #[error("Prompt failed: {message}")]
    #[diagnostic(code(cco::ui::prompt_failed))]
    PromptFailed { message: String },
}

impl CcoError {
    /// Shorthand for a write failure at `path`
    pub fn write_failed(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        CcoError::FileWriteFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    /// Shorthand for a read failure at `path`
    pub fn read_failed(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        CcoError::FileReadFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CcoError {
    fn from(err: std::io::Error) -> Self {
        CcoError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CcoError {
    fn from(err: serde_json::Error) -> Self {
        CcoError::FetchFailed {
            path: "tag listing".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CcoError {
    fn from(err: serde_yaml::Error) -> Self {
        CcoError::MarkerParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for CcoError {
    fn from(err: inquire::InquireError) -> Self {
        CcoError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, CcoError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_code() {
        let err = CcoError::IncompleteInstall {
            failed: 1,
            total: 13,
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("cco::install::incomplete".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CcoError = io_err.into();
        assert!(matches!(err, CcoError::IoError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("<html>");
        let err: CcoError = parse.unwrap_err().into();
        assert!(matches!(err, CcoError::FetchFailed { .. }));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("key: [unclosed");
        let err: CcoError = parse.unwrap_err().into();
        assert!(matches!(err, CcoError::MarkerParseFailed { .. }));
    }

    test_error_contains!(
        test_incomplete_install_error,
        CcoError::IncompleteInstall {
            failed: 2,
            total: 13
        },
        "2 of 13"
    );

    test_error_contains!(
        test_critical_failed_error,
        CcoError::CriticalArtifactFailed {
            path: "rules/cco-rules.md".to_string(),
            reason: "HTTP 404".to_string(),
        },
        "rules/cco-rules.md",
        "aborted"
    );

    test_error_contains!(
        test_verification_failed_error,
        CcoError::SourceVerificationFailed {
            reference: "v4.2.0".to_string(),
            reason: "timed out".to_string(),
        },
        "v4.2.0",
        "timed out"
    );

    #[test]
    fn test_write_failed_helper() {
        let err = CcoError::write_failed(std::path::Path::new("/tmp/x.md"), "disk full");
        assert!(matches!(err, CcoError::FileWriteFailed { .. }));
        assert!(err.to_string().contains("disk full"));
    }
}
