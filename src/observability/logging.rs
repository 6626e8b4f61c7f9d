//! # Logging
//!
//! Tracing subscriber setup for processes embedding the provider.
//!
//! Frameworks usually install their own subscriber first; in that case
//! initialisation is a no-op and the provider's events flow into theirs.

use crate::config::ProviderSettings;
use crate::constants::DEFAULT_LOG_FILTER;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber
///
/// `RUST_LOG` takes precedence; otherwise the filter is built from
/// `settings.log_level` for this crate.
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing(settings: &ProviderSettings) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(settings));

    let result = if settings.json_logs() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            debug!("Tracing subscriber already initialized: {}", e);
            false
        }
    }
}

fn default_filter(settings: &ProviderSettings) -> EnvFilter {
    let level = settings.log_level.to_lowercase();
    match level.as_str() {
        "error" | "warn" | "info" | "debug" | "trace" => {
            EnvFilter::new(format!("oracle_vault_provider={level}"))
        }
        _ => EnvFilter::new(DEFAULT_LOG_FILTER),
    }
}
