//! Bounded retries of transport attempts.
//!
//! Only timeouts are retried, immediately and up to a fixed number of
//! attempts. Any other transport failure ends the call on the spot.

use crate::transport::{Transport, TransportError};
use crate::{Error, Result};
use http::StatusCode;
use std::time::Duration;

/// The default number of attempts per call.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// The default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// How transport attempts are bounded and retried.
///
/// # Examples
///
/// ```
/// use vkapi::retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 3);
/// assert_eq!(policy.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first. Values below 1 act as 1.
    pub max_attempts: usize,
    /// Timeout of every single attempt.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    /// Returns `true` if a failed attempt should be followed by another one.
    ///
    /// # Arguments
    ///
    /// * `error` - The failure of the attempt
    /// * `attempt` - The attempt that failed (1-indexed)
    pub fn should_retry(&self, error: &TransportError, attempt: usize) -> bool {
        error.is_timeout() && attempt < self.max_attempts
    }
}

/// Performs a GET, retrying timeouts, and collects the body into `buffer`.
///
/// `buffer` is cleared before every attempt so a partial body from a failed
/// attempt never mixes with the next one. On failure it is left empty.
pub fn fetch(
    transport: &mut dyn Transport,
    url: &str,
    policy: &RetryPolicy,
    buffer: &mut Vec<u8>,
) -> Result<StatusCode> {
    let mut attempt = 0;

    loop {
        attempt += 1;
        buffer.clear();

        let result = transport.get(url, policy.timeout, &mut |chunk: &[u8]| {
            buffer.extend_from_slice(chunk)
        });

        match result {
            Ok(status) => {
                tracing::debug!(
                    status = status.as_u16(),
                    attempt = attempt,
                    bytes = buffer.len(),
                    "Received HTTP response"
                );
                return Ok(status);
            }
            Err(e) if policy.should_retry(&e, attempt) => {
                tracing::warn!(
                    error = %e,
                    attempt = attempt,
                    max_attempts = policy.max_attempts,
                    "Request timed out - retrying"
                );
            }
            Err(e) => {
                buffer.clear();
                tracing::error!(error = %e, attempt = attempt, "Transport failed");
                return Err(Error::Transport {
                    source: e,
                    attempts: attempt,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportErrorKind;
    use std::collections::VecDeque;

    /// Replays scripted outcomes and records how often it was called.
    struct Scripted {
        outcomes: VecDeque<std::result::Result<Vec<&'static str>, TransportErrorKind>>,
        calls: usize,
    }

    impl Scripted {
        fn new(
            outcomes: Vec<std::result::Result<Vec<&'static str>, TransportErrorKind>>,
        ) -> Self {
            Self {
                outcomes: outcomes.into(),
                calls: 0,
            }
        }
    }

    impl Transport for Scripted {
        fn get(
            &mut self,
            _url: &str,
            _timeout: Duration,
            sink: &mut dyn FnMut(&[u8]),
        ) -> std::result::Result<StatusCode, TransportError> {
            self.calls += 1;
            match self.outcomes.pop_front() {
                Some(Ok(chunks)) => {
                    for chunk in chunks {
                        sink(chunk.as_bytes());
                    }
                    Ok(StatusCode::OK)
                }
                Some(Err(kind)) => {
                    // A partial body before the failure must not survive
                    sink(b"garbage");
                    Err(TransportError::new(kind, "scripted failure"))
                }
                None => Err(TransportError::new(TransportErrorKind::Other, "script exhausted")),
            }
        }
    }

    #[test]
    fn test_chunks_are_appended() {
        let mut transport = Scripted::new(vec![Ok(vec!["{\"resp", "onse\":", "1}"])]);
        let mut buffer = Vec::new();

        fetch(&mut transport, "http://x/", &RetryPolicy::default(), &mut buffer).unwrap();

        assert_eq!(buffer, b"{\"response\":1}");
        assert_eq!(transport.calls, 1);
    }

    #[test]
    fn test_timeouts_are_retried_until_exhausted() {
        let mut transport = Scripted::new(vec![
            Err(TransportErrorKind::Timeout),
            Err(TransportErrorKind::Timeout),
            Err(TransportErrorKind::Timeout),
            Ok(vec!["{}"]),
        ]);
        let mut buffer = Vec::new();

        let err = fetch(&mut transport, "http://x/", &RetryPolicy::default(), &mut buffer)
            .unwrap_err();

        assert_eq!(transport.calls, 3);
        assert!(err.is_timeout());
        assert!(matches!(err, Error::Transport { attempts: 3, .. }));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_timeout_then_success() {
        let mut transport = Scripted::new(vec![Err(TransportErrorKind::Timeout), Ok(vec!["{}"])]);
        let mut buffer = Vec::new();

        fetch(&mut transport, "http://x/", &RetryPolicy::default(), &mut buffer).unwrap();

        assert_eq!(transport.calls, 2);
        assert_eq!(buffer, b"{}");
    }

    #[test]
    fn test_other_errors_are_not_retried() {
        let mut transport = Scripted::new(vec![Err(TransportErrorKind::Connect), Ok(vec!["{}"])]);
        let mut buffer = Vec::new();

        let err = fetch(&mut transport, "http://x/", &RetryPolicy::default(), &mut buffer)
            .unwrap_err();

        assert_eq!(transport.calls, 1);
        match err {
            Error::Transport { source, attempts } => {
                assert_eq!(attempts, 1);
                assert_eq!(source.kind(), TransportErrorKind::Connect);
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_single_attempt_policy() {
        let policy = RetryPolicy {
            max_attempts: 1,
            timeout: Duration::from_millis(10),
        };
        let mut transport = Scripted::new(vec![Err(TransportErrorKind::Timeout)]);
        let mut buffer = Vec::new();

        assert!(fetch(&mut transport, "http://x/", &policy, &mut buffer).is_err());
        assert_eq!(transport.calls, 1);
    }
}
