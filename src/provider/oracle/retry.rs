//! # Retry Policy
//!
//! Retry policy handed to the vault capability clients.
//!
//! The provider never retries on its own; it only translates the store's
//! `retrySettings` into a policy value the clients apply to every call.

use crate::crd::RetrySettings;
use crate::error::ProviderError;
use crate::provider::oracle::client::VaultClientError;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

/// Attempts allowed by the default policy (first call included)
pub const DEFAULT_MAXIMUM_ATTEMPTS: u32 = 8;

/// Upper bound of the default exponential backoff
pub const DEFAULT_MAXIMUM_BACKOFF: Duration = Duration::from_secs(30);

/// Decides whether a failed operation may be retried
pub type ShouldRetryOperation = fn(&VaultClientError) -> bool;

/// Delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// 2^attempt seconds, capped at `max`
    Exponential { max: Duration },
    /// Same delay before every retry
    Fixed(Duration),
}

/// Retry policy applied by the capability clients
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts, first call included
    pub maximum_attempts: u32,
    pub backoff: Backoff,
    pub should_retry_operation: ShouldRetryOperation,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            maximum_attempts: DEFAULT_MAXIMUM_ATTEMPTS,
            backoff: Backoff::Exponential {
                max: DEFAULT_MAXIMUM_BACKOFF,
            },
            should_retry_operation: default_should_retry_operation,
        }
    }
}

impl RetryPolicy {
    /// Build a policy from store retry settings
    ///
    /// Starts from the default policy; `maxRetries` caps the attempts and
    /// `retryInterval` switches to a fixed backoff.
    pub fn from_settings(settings: &RetrySettings) -> Result<Self, ProviderError> {
        let mut policy = Self::default();

        if let Some(max_retries) = settings.max_retries {
            policy.maximum_attempts = max_retries;
        }

        if let Some(interval) = &settings.retry_interval {
            policy.backoff = Backoff::Fixed(parse_go_duration(interval)?);
        }

        Ok(policy)
    }

    /// Whether another attempt should follow a failed one
    ///
    /// `attempt` is the 1-based number of the attempt that just failed.
    pub fn should_retry(&self, attempt: u32, error: &VaultClientError) -> bool {
        attempt < self.maximum_attempts && (self.should_retry_operation)(error)
    }

    /// Delay before the attempt following `attempt`
    pub fn next_delay(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { max } => {
                let secs = 2u64.saturating_pow(attempt.saturating_sub(1));
                Duration::from_secs(secs).min(max)
            }
        }
    }
}

/// Default classification of retryable failures
///
/// Retries throttling (429), server errors (5xx except 501), resources in a
/// transitional state (409 IncorrectState) and failures that never reached the
/// service. Client errors and configuration errors are final.
pub fn default_should_retry_operation(error: &VaultClientError) -> bool {
    match error {
        VaultClientError::Service(service_error) => match service_error.status_code {
            429 => true,
            409 => service_error.code == crate::constants::ERROR_CODE_INCORRECT_STATE,
            501 => false,
            status => status >= 500,
        },
        VaultClientError::Transport(_) => true,
        VaultClientError::Configuration(_) => false,
    }
}

static DURATION_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<number>\d+(?:\.\d*)?|\.\d+)(?P<unit>ns|us|µs|μs|ms|s|m|h)")
        .expect("duration segment regex is valid")
});

static DURATION_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|μs|ms|s|m|h))+$")
        .expect("duration format regex is valid")
});

/// Parse a Go duration string into std::time::Duration
/// Supports formats: "300ms", "10s", "1.5m", "1h30m", "0"
pub fn parse_go_duration(value: &str) -> Result<Duration, ProviderError> {
    let trimmed = value.trim();
    let invalid = |reason: &str| ProviderError::InvalidRetryInterval {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("duration cannot be empty"));
    }

    if trimmed == "0" {
        return Ok(Duration::ZERO);
    }

    if !DURATION_FORMAT.is_match(trimmed) {
        return Err(invalid(
            "expected <number><unit> segments with units ns, us, ms, s, m, h (e.g., '500ms', '1m30s')",
        ));
    }

    let mut total_nanos = 0f64;
    for captures in DURATION_SEGMENT.captures_iter(trimmed) {
        let number = captures["number"]
            .parse::<f64>()
            .map_err(|e| invalid(&format!("invalid number: {e}")))?;
        let unit_nanos = match &captures["unit"] {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return Err(invalid("unknown unit")),
        };
        total_nanos += number * unit_nanos;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(invalid("duration out of range"));
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Range checked above and all segments are non-negative"
    )]
    let nanos = total_nanos.round() as u64;
    Ok(Duration::from_nanos(nanos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::oracle::client::ServiceError;

    fn service_error(status: u16, code: &str) -> VaultClientError {
        VaultClientError::Service(ServiceError::new("Secrets", status, code, "boom"))
    }

    #[test]
    fn test_parse_go_duration_formats() {
        let test_cases = vec![
            ("500ms", Duration::from_millis(500)),
            ("10s", Duration::from_secs(10)),
            ("1m30s", Duration::from_secs(90)),
            ("1.5h", Duration::from_secs(5400)),
            ("2h45m", Duration::from_secs(9900)),
            ("250us", Duration::from_micros(250)),
            ("0", Duration::ZERO),
        ];

        for (input, expected) in test_cases {
            assert_eq!(
                parse_go_duration(input).expect("valid duration"),
                expected,
                "Duration '{input}' should parse to {expected:?}"
            );
        }
    }

    #[test]
    fn test_parse_go_duration_rejects_invalid() {
        for input in ["", "10", "5d", "-1s", "1s garbage", "ms"] {
            assert!(
                matches!(
                    parse_go_duration(input),
                    Err(ProviderError::InvalidRetryInterval { .. })
                ),
                "Duration '{input}' should be rejected"
            );
        }
    }

    #[test]
    fn test_from_settings_applies_overrides() {
        let policy = RetryPolicy::from_settings(&RetrySettings {
            max_retries: Some(3),
            retry_interval: Some("2s".to_string()),
        })
        .expect("valid settings");

        assert_eq!(policy.maximum_attempts, 3);
        assert_eq!(policy.backoff, Backoff::Fixed(Duration::from_secs(2)));
        assert_eq!(policy.next_delay(1), Duration::from_secs(2));
        assert_eq!(policy.next_delay(7), Duration::from_secs(2));
    }

    #[test]
    fn test_from_settings_keeps_defaults() {
        let policy = RetryPolicy::from_settings(&RetrySettings::default()).expect("defaults");

        assert_eq!(policy.maximum_attempts, DEFAULT_MAXIMUM_ATTEMPTS);
        assert_eq!(policy.next_delay(1), Duration::from_secs(1));
        assert_eq!(policy.next_delay(3), Duration::from_secs(4));
        assert_eq!(policy.next_delay(20), DEFAULT_MAXIMUM_BACKOFF);
    }

    #[test]
    fn test_from_settings_rejects_bad_interval() {
        let result = RetryPolicy::from_settings(&RetrySettings {
            max_retries: None,
            retry_interval: Some("soon".to_string()),
        });

        assert!(matches!(
            result,
            Err(ProviderError::InvalidRetryInterval { .. })
        ));
    }

    #[test]
    fn test_default_should_retry_operation() {
        assert!(default_should_retry_operation(&service_error(429, "TooManyRequests")));
        assert!(default_should_retry_operation(&service_error(500, "InternalServerError")));
        assert!(default_should_retry_operation(&service_error(409, "IncorrectState")));
        assert!(default_should_retry_operation(&VaultClientError::Transport(
            "timeout".to_string()
        )));

        assert!(!default_should_retry_operation(&service_error(501, "MethodNotImplemented")));
        assert!(!default_should_retry_operation(&service_error(409, "Conflict")));
        assert!(!default_should_retry_operation(&service_error(401, "NotAuthenticated")));
        assert!(!default_should_retry_operation(&service_error(
            404,
            "NotAuthorizedOrNotFound"
        )));
    }

    #[test]
    fn test_should_retry_respects_attempt_cap() {
        let policy = RetryPolicy {
            maximum_attempts: 2,
            ..RetryPolicy::default()
        };
        let err = service_error(503, "ServiceUnavailable");

        assert!(policy.should_retry(1, &err));
        assert!(!policy.should_retry(2, &err));
    }
}
