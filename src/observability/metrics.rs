//! # Metrics
//!
//! Prometheus metrics for monitoring the provider.
//!
//! ## Metrics Exposed
//!
//! - `oracle_vault_operations_total` - Vault operations by operation name
//! - `oracle_vault_operation_errors_total` - Failed vault operations by operation name
//! - `oracle_vault_operation_duration_seconds` - Duration of vault operations
//! - `oracle_vault_credential_resolutions_total` - Credential resolutions by principal
//! - `oracle_vault_validations_total` - Store validations by outcome
//!
//! Metrics are recorded unconditionally; they only become visible once
//! `register_metrics` has added them to `REGISTRY`.

use anyhow::Result;
use prometheus::{Encoder, HistogramVec, IntCounterVec, Registry, TextEncoder};
use std::sync::LazyLock;

// Metrics
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static VAULT_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "oracle_vault_operations_total",
            "Total number of OCI Vault operations by operation",
        ),
        &["operation"],
    )
    .expect("Failed to create VAULT_OPERATIONS_TOTAL metric - this should never happen")
});

static VAULT_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "oracle_vault_operation_errors_total",
            "Total number of failed OCI Vault operations by operation",
        ),
        &["operation"],
    )
    .expect("Failed to create VAULT_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static VAULT_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "oracle_vault_operation_duration_seconds",
            "Duration of OCI Vault operations in seconds by operation",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["operation"],
    )
    .expect("Failed to create VAULT_OPERATION_DURATION metric - this should never happen")
});

static CREDENTIAL_RESOLUTIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "oracle_vault_credential_resolutions_total",
            "Total number of credential resolutions by principal and result",
        ),
        &["principal", "result"],
    )
    .expect("Failed to create CREDENTIAL_RESOLUTIONS_TOTAL metric - this should never happen")
});

static VALIDATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "oracle_vault_validations_total",
            "Total number of store validations by outcome",
        ),
        &["outcome"],
    )
    .expect("Failed to create VALIDATIONS_TOTAL metric - this should never happen")
});

/// Register all provider metrics with `REGISTRY`
///
/// # Errors
///
/// Returns an error if a metric is already registered.
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(VAULT_OPERATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(VAULT_OPERATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(VAULT_OPERATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(CREDENTIAL_RESOLUTIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(VALIDATIONS_TOTAL.clone()))?;
    Ok(())
}

/// Render `REGISTRY` in the Prometheus text exposition format
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_metrics() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn record_vault_operation(operation: &str, duration: f64) {
    VAULT_OPERATIONS_TOTAL.with_label_values(&[operation]).inc();
    VAULT_OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(duration);
}

pub fn increment_vault_operation_errors(operation: &str) {
    VAULT_OPERATION_ERRORS_TOTAL
        .with_label_values(&[operation])
        .inc();
}

pub fn increment_credential_resolutions(principal: &str, success: bool) {
    let result = if success { "success" } else { "failure" };
    CREDENTIAL_RESOLUTIONS_TOTAL
        .with_label_values(&[principal, result])
        .inc();
}

pub fn increment_validations(outcome: &str) {
    VALIDATIONS_TOTAL.with_label_values(&[outcome]).inc();
}
