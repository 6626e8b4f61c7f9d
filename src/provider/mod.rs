//! # Provider Modules
//!
//! Contract between the secret-synchronization framework and its store
//! providers.
//!
//! Each provider implements:
//! - `Provider` to validate store manifests and build clients from them
//! - `SecretsClient` for the per-store client serving secret reads

use crate::crd::{PushRemoteRef, RemoteRef, SecretFind, SecretStore};
use crate::error::ProviderError;
use crate::provider::oracle::secret_ref::KubeSecretReader;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Which directions of synchronization a provider supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStoreCapabilities {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

/// Result of a store readiness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    /// Store is reachable with the configured identity
    Ready,
    /// Readiness could not be determined; retry later
    Unknown,
    /// Store is misconfigured or the identity is broken
    Error,
}

impl ValidationResult {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationResult::Ready => "ready",
            ValidationResult::Unknown => "unknown",
            ValidationResult::Error => "error",
        }
    }
}

/// Classified validation result together with its cause
#[derive(Debug)]
pub struct ValidationOutcome {
    pub result: ValidationResult,
    pub cause: Option<ProviderError>,
}

impl ValidationOutcome {
    pub fn ready() -> Self {
        Self {
            result: ValidationResult::Ready,
            cause: None,
        }
    }

    pub fn with_cause(result: ValidationResult, cause: ProviderError) -> Self {
        Self {
            result,
            cause: Some(cause),
        }
    }
}

/// Store-level provider registered with the framework
#[async_trait]
pub trait Provider: Send + Sync {
    /// Build a client for the given store
    ///
    /// # Arguments
    /// * `store` - Store manifest carrying the provider configuration
    /// * `kube` - Reader for Kubernetes secrets referenced by the store
    /// * `namespace` - Namespace of the resource requesting the client
    async fn new_client(
        &self,
        store: &SecretStore,
        kube: Arc<dyn KubeSecretReader>,
        namespace: &str,
    ) -> Result<Box<dyn SecretsClient>, ProviderError>;

    /// Validate a store manifest without contacting any service
    fn validate_store(&self, store: &SecretStore) -> Result<(), ProviderError>;

    /// Supported synchronization directions
    fn capabilities(&self) -> SecretStoreCapabilities;
}

/// Per-store client serving secret operations
#[async_trait]
pub trait SecretsClient: Send + Sync + fmt::Debug {
    /// Get a single secret (or one property of it)
    async fn get_secret(&self, remote_ref: &RemoteRef) -> Result<Vec<u8>, ProviderError>;

    /// Get a secret whose payload is a flat JSON object, as a key/value map
    async fn get_secret_map(
        &self,
        remote_ref: &RemoteRef,
    ) -> Result<BTreeMap<String, Vec<u8>>, ProviderError>;

    /// Get all secrets matching the search criteria
    async fn get_all_secrets(
        &self,
        find: &SecretFind,
    ) -> Result<BTreeMap<String, Vec<u8>>, ProviderError>;

    /// Write a secret value
    async fn push_secret(&self, value: &[u8], remote_ref: &PushRemoteRef)
        -> Result<(), ProviderError>;

    /// Delete a previously pushed secret
    async fn delete_secret(&self, remote_ref: &PushRemoteRef) -> Result<(), ProviderError>;

    /// Check the store is usable; never fails, the cause is part of the outcome
    async fn validate(&self) -> ValidationOutcome;

    /// Release resources held by the client
    async fn close(&self) -> Result<(), ProviderError>;
}

// Provider implementations
pub mod oracle;
