//! Backoff policy for transient Dropbox API failures (429 and 5xx).

use std::time::Duration;

use crate::config::DropboxSettings;

/// Upper bound for a server-provided `Retry-After`.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &DropboxSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.retry_base_delay_ms),
            ..Self::default()
        }
    }

    /// A policy that surfaces the first failure.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based): exponential, capped, plus 10-30% jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let capped = self.base_delay.saturating_mul(factor).min(self.max_delay);
        let jitter = capped.mul_f64(0.1 + rand::random::<f64>() * 0.2);
        capped + jitter
    }

    /// How long to wait before retrying `response`, or `None` if it should not be retried.
    pub fn delay_for(&self, response: &reqwest::Response, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries || !is_retryable_status(response.status().as_u16()) {
            return None;
        }
        Some(parse_retry_after(response.headers()).unwrap_or_else(|| self.backoff(attempt)))
    }
}

pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Numeric `Retry-After` seconds; Dropbox does not send the HTTP-date form.
pub fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    let secs = headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()?;
    Some(Duration::from_secs(secs).min(MAX_RETRY_AFTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    #[test]
    fn retryable_statuses() {
        for status in [429, 500, 502, 503, 504] {
            assert!(is_retryable_status(status), "{status}");
        }
        for status in [200, 400, 401, 403, 404, 409] {
            assert!(!is_retryable_status(status), "{status}");
        }
    }

    #[test]
    fn backoff_grows_and_is_capped() {
        let policy = RetryPolicy {
            max_retries: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
        };
        let first = policy.backoff(0);
        assert!(first >= Duration::from_millis(110) && first <= Duration::from_millis(130));
        let third = policy.backoff(2);
        assert!(third >= Duration::from_millis(440) && third <= Duration::from_millis(520));
        for attempt in 0..40 {
            assert!(policy.backoff(attempt) <= Duration::from_millis(1300));
        }
    }

    #[test]
    fn retry_after_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));
    }

    #[test]
    fn retry_after_is_capped() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("86400"));
        assert_eq!(parse_retry_after(&headers), Some(MAX_RETRY_AFTER));
    }

    #[test]
    fn retry_after_ignores_dates_and_absence() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn policy_from_settings() {
        let settings = DropboxSettings {
            max_retries: 4,
            retry_base_delay_ms: 20,
            ..DropboxSettings::default()
        };
        let policy = RetryPolicy::from_settings(&settings);
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.base_delay, Duration::from_millis(20));
        assert_eq!(RetryPolicy::none().max_retries, 0);
    }
}
