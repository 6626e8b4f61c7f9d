//! # Store Validation
//!
//! Admission-time checks of store manifests, classification of vault
//! reachability failures and sanitizing of vault error messages.

use crate::constants::{ERROR_CODE_NOT_AUTHENTICATED, ERROR_CODE_NOT_AUTHORIZED_OR_NOT_FOUND};
use crate::crd::{SecretKeySelector, SecretStore};
use crate::error::ProviderError;
use crate::provider::oracle::client::VaultClientError;
use crate::provider::ValidationResult;
use regex::Regex;
use std::sync::LazyLock;

static REQUEST_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:opc[- ])?request[- ]id:\s*\S+")
        .expect("request id regex is valid")
});

/// Validate a store manifest without contacting any service
///
/// # Errors
///
/// Returns `ProviderError::InvalidStore` naming the first offending field.
pub fn validate_store(store: &SecretStore) -> Result<(), ProviderError> {
    let invalid = |message: &str| Err(ProviderError::InvalidStore(message.to_string()));

    let Some(oracle) = store.oracle() else {
        return invalid("missing oracle provider configuration");
    };

    if oracle.vault.is_empty() {
        return invalid("vault cannot be empty");
    }

    if oracle.region.is_empty() {
        return invalid("region cannot be empty");
    }

    let Some(auth) = &oracle.auth else {
        return Ok(());
    };

    if auth.user.is_empty() {
        return invalid("user cannot be empty");
    }

    if auth.tenancy.is_empty() {
        return invalid("tenant cannot be empty");
    }

    let private_key = &auth.secret_ref.privatekey;
    if private_key.name.is_empty() {
        return invalid("privateKey.name cannot be empty");
    }
    if private_key.key.is_empty() {
        return invalid("privateKey.key cannot be empty");
    }
    validate_secret_selector(store, private_key)?;

    let fingerprint = &auth.secret_ref.fingerprint;
    if fingerprint.name.is_empty() {
        return invalid("fingerprint.name cannot be empty");
    }
    if fingerprint.key.is_empty() {
        return invalid("fingerprint.key cannot be empty");
    }
    validate_secret_selector(store, fingerprint)
}

/// Check a selector's namespace against the store's scope
///
/// Cluster stores must name the namespace; namespaced stores may only repeat
/// their own.
pub fn validate_secret_selector(
    store: &SecretStore,
    selector: &SecretKeySelector,
) -> Result<(), ProviderError> {
    match (&selector.namespace, store.kind.is_cluster_scoped()) {
        (None, true) => Err(ProviderError::InvalidStore(
            "cluster scope requires namespace".to_string(),
        )),
        (Some(namespace), false) if store.namespace.as_ref() != Some(namespace) => {
            Err(ProviderError::InvalidStore(
                "namespace should either be empty or match the namespace of the SecretStore for a namespaced SecretStore"
                    .to_string(),
            ))
        }
        _ => Ok(()),
    }
}

/// Classify a failed vault metadata read
///
/// A rejected identity is an error. `NotAuthorizedOrNotFound` means the
/// identity works but may lack `read vaults`, which secret reads do not need,
/// so readiness is unknown. Anything else is an error.
pub fn classify_vault_error(error: &VaultClientError) -> ValidationResult {
    match error.as_service_error() {
        Some(service_error) if service_error.code == ERROR_CODE_NOT_AUTHENTICATED => {
            ValidationResult::Error
        }
        Some(service_error) if service_error.code == ERROR_CODE_NOT_AUTHORIZED_OR_NOT_FOUND => {
            ValidationResult::Unknown
        }
        _ => ValidationResult::Error,
    }
}

/// Remove OCI request ids from an error message
pub fn sanitize_error_message(message: &str) -> String {
    REQUEST_ID.replace_all(message, "").into_owned()
}

/// Convert a vault client error into a provider error with a stable message
pub fn sanitize_vault_error(error: &VaultClientError) -> ProviderError {
    ProviderError::VaultService {
        code: error.as_service_error().map(|e| e.code.clone()),
        message: sanitize_error_message(&error.to_string()),
    }
}
