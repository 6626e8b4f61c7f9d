//! # Secret Store
//!
//! Store resource as seen by a provider: its kind, namespace and spec.

use crate::crd::OracleProvider;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of the store resource a provider is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema)]
pub enum StoreKind {
    /// Namespaced store; secret references resolve in the store's namespace
    #[default]
    SecretStore,
    /// Cluster-scoped store; secret references must name their namespace
    ClusterSecretStore,
}

impl StoreKind {
    /// Whether secret references must carry an explicit namespace
    pub fn is_cluster_scoped(self) -> bool {
        matches!(self, StoreKind::ClusterSecretStore)
    }
}

/// SecretStore / ClusterSecretStore resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretStore {
    /// Resource kind
    #[serde(default)]
    pub kind: StoreKind,
    /// Namespace of a namespaced store (None for cluster stores)
    #[serde(default)]
    pub namespace: Option<String>,
    /// Store specification
    pub spec: SecretStoreSpec,
}

/// Store specification
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretStoreSpec {
    /// Provider configuration
    pub provider: SecretStoreProvider,
    /// Retry settings applied to the vault clients
    #[serde(default)]
    pub retry_settings: Option<RetrySettings>,
}

/// Provider block of the store spec
///
/// Only the Oracle provider is understood by this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct SecretStoreProvider {
    /// Oracle Cloud Infrastructure Vault
    #[serde(default)]
    pub oracle: Option<OracleProvider>,
}

/// Retry settings for calls to the vault service
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetrySettings {
    /// Maximum number of attempts per operation
    #[serde(default)]
    pub max_retries: Option<u32>,
    /// Fixed delay between attempts
    /// Format: Go duration string (e.g., "500ms", "10s", "1m30s")
    #[serde(default)]
    pub retry_interval: Option<String>,
}

impl SecretStore {
    /// Build a namespaced store for the given provider
    pub fn namespaced(namespace: impl Into<String>, oracle: OracleProvider) -> Self {
        Self {
            kind: StoreKind::SecretStore,
            namespace: Some(namespace.into()),
            spec: SecretStoreSpec {
                provider: SecretStoreProvider {
                    oracle: Some(oracle),
                },
                retry_settings: None,
            },
        }
    }

    /// Build a cluster-scoped store for the given provider
    pub fn cluster(oracle: OracleProvider) -> Self {
        Self {
            kind: StoreKind::ClusterSecretStore,
            namespace: None,
            spec: SecretStoreSpec {
                provider: SecretStoreProvider {
                    oracle: Some(oracle),
                },
                retry_settings: None,
            },
        }
    }

    /// Attach retry settings
    #[must_use]
    pub fn with_retry_settings(mut self, retry_settings: RetrySettings) -> Self {
        self.spec.retry_settings = Some(retry_settings);
        self
    }

    /// Oracle provider block, if the store is configured for Oracle
    pub fn oracle(&self) -> Option<&OracleProvider> {
        self.spec.provider.oracle.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_kind_defaults_to_namespaced() {
        let store: SecretStore = serde_json::from_str(
            r#"{"spec": {"provider": {"oracle": {"vault": "v", "region": "r"}}}}"#,
        )
        .expect("store without kind");

        assert_eq!(store.kind, StoreKind::SecretStore);
        assert!(!store.kind.is_cluster_scoped());
        assert!(store.spec.retry_settings.is_none());
    }

    #[test]
    fn test_cluster_store_with_retry_settings() {
        let store: SecretStore = serde_json::from_str(
            r#"{
                "kind": "ClusterSecretStore",
                "spec": {
                    "provider": {"oracle": {"vault": "v", "region": "r"}},
                    "retrySettings": {"maxRetries": 3, "retryInterval": "10s"}
                }
            }"#,
        )
        .expect("cluster store");

        assert!(store.kind.is_cluster_scoped());
        let retry = store.spec.retry_settings.expect("retry settings");
        assert_eq!(retry.max_retries, Some(3));
        assert_eq!(retry.retry_interval.as_deref(), Some("10s"));
    }
}
