//! # Observability
//!
//! Observability modules for logging and metrics.
//!
//! - `logging`: tracing subscriber initialisation
//! - `metrics`: Prometheus metrics collection

pub mod logging;
pub mod metrics;

use crate::config::ProviderSettings;
use anyhow::Result;

// Re-export for convenience
pub use logging::init_tracing;
pub use metrics::register_metrics;

/// Initialise logging and, when enabled, register metrics
///
/// Intended for processes that embed the provider and have not set up
/// observability themselves.
///
/// # Errors
///
/// Returns an error if metric registration fails.
pub fn init(settings: &ProviderSettings) -> Result<()> {
    init_tracing(settings);

    if settings.enable_metrics {
        register_metrics()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_without_metrics() {
        let settings = ProviderSettings {
            enable_metrics: false,
            log_format: "text".to_string(),
            ..ProviderSettings::default()
        };

        assert!(init(&settings).is_ok());
        assert!(init(&settings).is_ok(), "repeated init is harmless");
    }
}
