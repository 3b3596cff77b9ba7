//! Remote source access
//!
//! [`Transport`] performs exactly one request. [`Fetcher`] layers the retry
//! policy on top and knows how artifact paths map to URLs. The split keeps
//! retry behavior testable against a scripted transport.

pub mod http;
pub mod retry;

pub use http::HttpTransport;
pub use retry::{Fetcher, RetryPolicy, Sleeper, ThreadSleeper};

/// Largest response body accepted from the remote
pub const MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

/// Result of one request, or of a request after retries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Ok(Vec<u8>),
    /// Connection failure, timeout, 5xx or rate limiting
    RetryableError(String),
    /// Anything else: 4xx, oversized body, invalid path
    PermanentError(String),
}

impl FetchStatus {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchStatus::RetryableError(_))
    }

    /// Failure reason, `None` on success
    pub fn reason(&self) -> Option<&str> {
        match self {
            FetchStatus::Ok(_) => None,
            FetchStatus::RetryableError(reason) | FetchStatus::PermanentError(reason) => {
                Some(reason)
            }
        }
    }
}

/// Outcome of fetching one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub path: String,
    pub status: FetchStatus,
    /// Requests actually sent; 0 when the path failed validation
    pub attempts: u32,
}

impl FetchOutcome {
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.status {
            FetchStatus::Ok(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// A single network round trip
pub trait Transport {
    fn get(&self, url: &str) -> FetchStatus;
}

/// Where artifacts of one revision are served from:
/// `{base_url}/{reference}/{relative_path}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSource {
    pub base_url: String,
    pub reference: String,
}

impl RemoteSource {
    pub fn new(base_url: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            reference: reference.into(),
        }
    }

    /// URL of `relative_path`; the path must already be validated
    pub fn artifact_url(&self, relative_path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.reference.trim_matches('/'),
            relative_path.trim_start_matches("./")
        )
    }
}
