//! # Provider Settings
//!
//! Provider-level settings loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Provider-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Base URL of the OCI instance metadata service
    /// Used by instance principal discovery
    pub imds_endpoint: String,
    /// Instance metadata request timeout (milliseconds)
    pub imds_timeout_ms: u64,
    /// Path of the Kubernetes service account token
    /// Used by workload identity discovery
    pub service_account_token_path: PathBuf,
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    /// Only used when RUST_LOG is unset
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            imds_endpoint: DEFAULT_IMDS_ENDPOINT.to_string(),
            imds_timeout_ms: DEFAULT_IMDS_TIMEOUT_MS,
            service_account_token_path: PathBuf::from(DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH),
            log_level: "INFO".to_string(),
            log_format: "json".to_string(),
            enable_metrics: true,
        }
    }
}

impl ProviderSettings {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        use crate::constants::*;
        Self {
            imds_endpoint: env_var_or_default_str("OCI_IMDS_ENDPOINT", DEFAULT_IMDS_ENDPOINT),
            imds_timeout_ms: env_var_or_default("OCI_IMDS_TIMEOUT_MS", DEFAULT_IMDS_TIMEOUT_MS),
            service_account_token_path: PathBuf::from(env_var_or_default_str(
                "OCI_SERVICE_ACCOUNT_TOKEN_PATH",
                DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH,
            )),
            log_level: env_var_or_default_str("LOG_LEVEL", "INFO"),
            log_format: env_var_or_default_str("LOG_FORMAT", "json"),
            enable_metrics: env_var_or_default_bool("ENABLE_METRICS", true),
        }
    }

    /// Get instance metadata request timeout
    pub fn imds_timeout(&self) -> Duration {
        Duration::from_millis(self.imds_timeout_ms)
    }

    /// Whether logs should be emitted as JSON
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as boolean or return default
fn env_var_or_default_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| {
            let v_lower = v.to_lowercase();
            v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
        })
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
