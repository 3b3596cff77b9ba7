//! Retry with exponential backoff

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::{FetchOutcome, FetchStatus, RemoteSource, Transport};
use crate::path_utils::validate_relative_path;

/// Bounded retry schedule: `max_attempts` requests, waiting `base_delay`,
/// `2 * base_delay`, `4 * base_delay`... between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Same attempt bound, no waiting
    pub fn immediate() -> Self {
        Self {
            base_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Delay after failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }
}

/// Waits between attempts
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Transport plus retry policy
pub struct Fetcher {
    transport: Box<dyn Transport>,
    policy: RetryPolicy,
    sleeper: Box<dyn Sleeper>,
}

impl Fetcher {
    pub fn new(transport: impl Transport + 'static, policy: RetryPolicy) -> Self {
        Self {
            transport: Box::new(transport),
            policy,
            sleeper: Box::new(ThreadSleeper),
        }
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// GET `url`, retrying retryable failures up to the policy bound.
    ///
    /// Returns the final status and the number of requests sent.
    pub fn get(&self, url: &str) -> (FetchStatus, u32) {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let status = self.transport.get(url);
            if !status.is_retryable() || attempt >= max_attempts {
                if let Some(reason) = status.reason() {
                    debug!(url, attempt, reason, "request failed");
                }
                return (status, attempt);
            }

            let delay = self.policy.delay_after(attempt);
            warn!(
                url,
                attempt,
                max_attempts,
                reason = status.reason().unwrap_or_default(),
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "retrying request"
            );
            self.sleeper.sleep(delay);
            attempt += 1;
        }
    }

    /// Fetch one artifact of `source`.
    ///
    /// An unsafe `relative_path` is a permanent failure and no request is made.
    pub fn fetch_artifact(&self, source: &RemoteSource, relative_path: &str) -> FetchOutcome {
        if let Err(e) = validate_relative_path(relative_path) {
            return FetchOutcome {
                path: relative_path.to_string(),
                status: FetchStatus::PermanentError(e.to_string()),
                attempts: 0,
            };
        }

        let (status, attempts) = self.get(&source.artifact_url(relative_path));
        FetchOutcome {
            path: relative_path.to_string(),
            status,
            attempts,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Transport that replays scripted statuses and records requested URLs
    #[derive(Clone, Default)]
    pub(crate) struct ScriptedTransport {
        pub script: Rc<RefCell<VecDeque<FetchStatus>>>,
        pub requests: Rc<RefCell<Vec<String>>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(statuses: Vec<FetchStatus>) -> Self {
            Self {
                script: Rc::new(RefCell::new(statuses.into())),
                requests: Rc::default(),
            }
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for ScriptedTransport {
        fn get(&self, url: &str) -> FetchStatus {
            self.requests.borrow_mut().push(url.to_string());
            self.script
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| FetchStatus::PermanentError("script exhausted".into()))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSleeper {
        slept: Rc<RefCell<Vec<Duration>>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.slept.borrow_mut().push(duration);
        }
    }

    fn retryable() -> FetchStatus {
        FetchStatus::RetryableError("HTTP 503 Service Unavailable".into())
    }

    #[test]
    fn test_two_retryable_failures_then_success_takes_three_attempts() {
        let transport = ScriptedTransport::new(vec![
            retryable(),
            retryable(),
            FetchStatus::Ok(b"ok".to_vec()),
        ]);
        let sleeper = RecordingSleeper::default();
        let fetcher = Fetcher::new(transport.clone(), RetryPolicy::default())
            .with_sleeper(sleeper.clone());

        let (status, attempts) = fetcher.get("http://x/y");
        assert_eq!(status, FetchStatus::Ok(b"ok".to_vec()));
        assert_eq!(attempts, 3);
        assert_eq!(transport.request_count(), 3);
        assert_eq!(
            *sleeper.slept.borrow(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[test]
    fn test_permanent_error_is_not_retried() {
        let transport =
            ScriptedTransport::new(vec![FetchStatus::PermanentError("HTTP 404 Not Found".into())]);
        let fetcher = Fetcher::new(transport.clone(), RetryPolicy::immediate());

        let (status, attempts) = fetcher.get("http://x/missing");
        assert!(matches!(status, FetchStatus::PermanentError(_)));
        assert_eq!(attempts, 1);
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_retryable_errors_stop_at_bound() {
        let transport = ScriptedTransport::new(vec![retryable(), retryable(), retryable(), retryable()]);
        let sleeper = RecordingSleeper::default();
        let fetcher = Fetcher::new(transport.clone(), RetryPolicy::default())
            .with_sleeper(sleeper.clone());

        let (status, attempts) = fetcher.get("http://x/y");
        assert!(status.is_retryable());
        assert_eq!(attempts, 3);
        assert_eq!(transport.request_count(), 3);
        assert_eq!(sleeper.slept.borrow().len(), 2);
    }

    #[test]
    fn test_backoff_schedule_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
        assert_eq!(RetryPolicy::immediate().delay_after(3), Duration::ZERO);
    }

    #[test]
    fn test_invalid_path_fails_before_any_request() {
        let transport = ScriptedTransport::new(vec![FetchStatus::Ok(b"x".to_vec())]);
        let fetcher = Fetcher::new(transport.clone(), RetryPolicy::immediate());
        let source = RemoteSource::new("http://x", "main");

        let outcome = fetcher.fetch_artifact(&source, "../secrets.md");
        assert!(matches!(outcome.status, FetchStatus::PermanentError(_)));
        assert_eq!(outcome.attempts, 0);
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_fetch_artifact_builds_revision_url() {
        let transport = ScriptedTransport::new(vec![FetchStatus::Ok(b"x".to_vec())]);
        let fetcher = Fetcher::new(transport.clone(), RetryPolicy::immediate());
        let source = RemoteSource::new("http://x/raw", "v4.2.0");

        let outcome = fetcher.fetch_artifact(&source, "agents/cco-agent-apply.md");
        assert_eq!(outcome.bytes(), Some(&b"x"[..]));
        assert_eq!(
            transport.requests.borrow()[0],
            "http://x/raw/v4.2.0/agents/cco-agent-apply.md"
        );
    }
}
