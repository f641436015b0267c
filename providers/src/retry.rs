//! HTTP retry policy with exponential backoff.
//!
//! - Max retries: configurable, default 2 (3 total attempts)
//! - Backoff: 500ms doubling per attempt, capped at 8s
//! - Jitter: down-jitter up to 25% (multiplier in [0.75, 1.0])
//! - Retryable: HTTP 408, 409, 429, 5xx and connection/timeout errors
//! - `x-should-retry: true|false` overrides the status rule
//! - `Retry-After` / `Retry-After-Ms` replace the computed delay when in (0, 60s)

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, header::HeaderMap};

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Down-jitter factor (0.25 = up to 25% shorter).
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter_factor: 0.25,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Read `Retry-After-Ms` (float ms) or `Retry-After` (integer seconds).
///
/// Only values strictly between zero and sixty seconds are honoured.
#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
    let in_range = |d: Duration| d > Duration::ZERO && d < Duration::from_secs(60);

    if let Some(ms) = header("retry-after-ms").and_then(|s| s.trim().parse::<f64>().ok())
        && ms.is_finite()
        && ms > 0.0
    {
        let delay = Duration::from_secs_f64(ms / 1000.0);
        if in_range(delay) {
            return Some(delay);
        }
    }

    header("retry-after")
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .filter(|d| in_range(*d))
}

#[must_use]
pub fn should_retry(status: StatusCode, headers: &HeaderMap) -> bool {
    if let Some(value) = headers.get("x-should-retry").and_then(|v| v.to_str().ok()) {
        if value.eq_ignore_ascii_case("true") {
            return true;
        }
        if value.eq_ignore_ascii_case("false") {
            return false;
        }
    }
    matches!(status.as_u16(), 408 | 409 | 429 | 500..=599)
}

/// Delay before retry number `backoff_step + 1`.
#[must_use]
pub fn calculate_retry_delay(
    backoff_step: u32,
    config: &RetryConfig,
    headers: Option<&HeaderMap>,
) -> Duration {
    if let Some(delay) = headers.and_then(parse_retry_after) {
        return delay;
    }

    let exponent = backoff_step.min(16) as i32;
    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(exponent);
    let capped = base.min(config.max_delay.as_secs_f64());
    let jitter = 1.0 - rand::random::<f64>() * config.jitter_factor;
    Duration::from_secs_f64(capped * jitter)
}

/// Result of a retried request.
#[derive(Debug)]
pub enum RetryOutcome {
    /// 2xx response.
    Success(Response),
    /// Non-2xx response that was not retried, or the last one after retries ran out.
    HttpError(Response),
    /// Transport failure. `attempts` counts every request sent.
    ConnectionError {
        attempts: u32,
        source: reqwest::Error,
    },
}

/// Send a request, rebuilding it for each attempt.
pub async fn send_with_retry<F>(build_request: F, config: &RetryConfig) -> RetryOutcome
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0u32;
    loop {
        let can_retry = attempt < config.max_retries;
        let result = build_request()
            .header("x-retry-count", attempt.to_string())
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                return RetryOutcome::Success(response);
            }
            Ok(response) => {
                let status = response.status();
                if !can_retry || !should_retry(status, response.headers()) {
                    return RetryOutcome::HttpError(response);
                }
                let delay = calculate_retry_delay(attempt, config, Some(response.headers()));
                tracing::debug!(
                    %status,
                    retry = attempt + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying request after error status"
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => {
                if !can_retry || !is_retryable_error(&error) {
                    return RetryOutcome::ConnectionError {
                        attempts: attempt + 1,
                        source: error,
                    };
                }
                let delay = calculate_retry_delay(attempt, config, None);
                tracing::debug!(
                    %error,
                    retry = attempt + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying request after connection error"
                );
                tokio::time::sleep(delay).await;
            }
        }
        attempt += 1;
    }
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout() || error.is_request()
}

#[cfg(test)]
mod tests {
    use super::{RetryConfig, calculate_retry_delay, parse_retry_after, should_retry};
    use reqwest::StatusCode;
    use reqwest::header::{HeaderMap, HeaderValue};
    use std::time::Duration;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn retry_after_ms_wins_over_seconds() {
        let map = headers(&[("retry-after-ms", "1500"), ("retry-after", "9")]);
        assert_eq!(parse_retry_after(&map), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn retry_after_seconds_in_range() {
        assert_eq!(
            parse_retry_after(&headers(&[("retry-after", "5")])),
            Some(Duration::from_secs(5))
        );
        assert_eq!(parse_retry_after(&headers(&[("retry-after", "120")])), None);
        assert_eq!(parse_retry_after(&headers(&[("retry-after", "0")])), None);
        assert_eq!(parse_retry_after(&headers(&[("retry-after", "soon")])), None);
    }

    #[test]
    fn retryable_statuses() {
        let none = HeaderMap::new();
        for code in [408, 409, 429, 500, 502, 503, 504, 529] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(should_retry(status, &none), "{code} should retry");
        }
        for code in [400, 401, 403, 404, 422] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(!should_retry(status, &none), "{code} should not retry");
        }
    }

    #[test]
    fn should_retry_header_overrides_status() {
        assert!(should_retry(
            StatusCode::BAD_REQUEST,
            &headers(&[("x-should-retry", "true")])
        ));
        assert!(!should_retry(
            StatusCode::SERVICE_UNAVAILABLE,
            &headers(&[("x-should-retry", "FALSE")])
        ));
    }

    #[test]
    fn backoff_doubles_with_down_jitter_and_cap() {
        let config = RetryConfig::default();
        for step in 0..3u32 {
            let delay = calculate_retry_delay(step, &config, None);
            let full = Duration::from_millis(500 * 2u64.pow(step));
            assert!(delay <= full, "step {step}: {delay:?}");
            assert!(delay >= full.mul_f64(0.75), "step {step}: {delay:?}");
        }
        let capped = calculate_retry_delay(10, &config, None);
        assert!(capped <= Duration::from_secs(8));
        assert!(capped >= Duration::from_secs(6));
    }

    #[test]
    fn header_delay_replaces_backoff() {
        let map = headers(&[("retry-after", "2")]);
        let delay = calculate_retry_delay(0, &RetryConfig::default(), Some(&map));
        assert_eq!(delay, Duration::from_secs(2));
    }

    #[test]
    fn max_retries_builder() {
        let config = RetryConfig::default().with_max_retries(0);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.initial_delay, Duration::from_millis(500));
    }
}
