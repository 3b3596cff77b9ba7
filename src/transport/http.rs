//! Blocking HTTP transport

use std::io::Read;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use super::{FetchStatus, MAX_RESPONSE_BYTES, Transport};
use crate::error::{CcoError, Result};

const USER_AGENT: &str = concat!("cco/", env!("CARGO_PKG_VERSION"));

/// `reqwest` client with a per-request timeout covering connect, headers and body
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    max_bytes: u64,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CcoError::HttpClient {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            max_bytes: MAX_RESPONSE_BYTES,
        })
    }

    /// Override the response size limit
    #[allow(dead_code)] // Used in tests
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> FetchStatus {
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(error) => return classify_transport_error(&error),
        };

        let status = response.status();
        if !status.is_success() {
            return classify_status(status);
        }

        if let Some(declared) = response.content_length() {
            if declared > self.max_bytes {
                return too_large(self.max_bytes);
            }
        }

        // Read one byte past the limit so an oversized body is detectable
        // without buffering it
        let mut body = Vec::new();
        if let Err(error) = response.take(self.max_bytes + 1).read_to_end(&mut body) {
            return FetchStatus::RetryableError(format!("failed to read response body: {error}"));
        }
        if body.len() as u64 > self.max_bytes {
            return too_large(self.max_bytes);
        }

        FetchStatus::Ok(body)
    }
}

fn too_large(limit: u64) -> FetchStatus {
    FetchStatus::PermanentError(format!("response exceeds {limit} bytes"))
}

fn classify_transport_error(error: &reqwest::Error) -> FetchStatus {
    if error.is_timeout() {
        return FetchStatus::RetryableError(format!("request timed out: {error}"));
    }
    if error.is_builder() {
        return FetchStatus::PermanentError(format!("invalid request: {error}"));
    }
    FetchStatus::RetryableError(format!("connection failed: {error}"))
}

/// Map a non-success status to a fetch status
pub fn classify_status(status: StatusCode) -> FetchStatus {
    let reason = format!("HTTP {status}");
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        FetchStatus::RetryableError(reason)
    } else {
        FetchStatus::PermanentError(reason)
    }
}
