//! # Oracle Provider Configuration
//!
//! Provider block of a store manifest selecting the OCI Vault, the region and
//! how the controller authenticates against it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Oracle Cloud Infrastructure Vault provider configuration
///
/// # Example
///
/// ```yaml
/// provider:
///   oracle:
///     vault: ocid1.vault.oc1.eu-frankfurt-1.xxxx
///     region: eu-frankfurt-1
///     principalType: UserPrincipal
///     auth:
///       tenancy: ocid1.tenancy.oc1..xxxx
///       user: ocid1.user.oc1..xxxx
///       secretRef:
///         privatekey:
///           name: oracle-secret
///           key: privateKey
///         fingerprint:
///           name: oracle-secret
///           key: fingerprint
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OracleProvider {
    /// Vault OCID the secrets are read from
    #[serde(default)]
    pub vault: String,
    /// OCI region identifier (e.g., "eu-frankfurt-1")
    #[serde(default)]
    pub region: String,
    /// Principal used to authenticate against the vault service
    /// When unset, instance principal is used if `auth` is absent and the user
    /// principal otherwise
    #[serde(default)]
    pub principal_type: Option<PrincipalType>,
    /// API-key authentication for the user principal
    #[serde(default)]
    pub auth: Option<OracleAuth>,
}

/// Identity strategy used to sign vault requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum PrincipalType {
    /// API key of an IAM user, read from Kubernetes secrets
    UserPrincipal,
    /// Compute instance identity from the instance metadata service
    InstancePrincipal,
    /// OKE workload identity of the pod's service account
    Workload,
}

/// API-key authentication for an IAM user
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OracleAuth {
    /// Tenancy OCID
    #[serde(default)]
    pub tenancy: String,
    /// User OCID
    #[serde(default)]
    pub user: String,
    /// References to the Kubernetes secrets holding the key material
    #[serde(default)]
    pub secret_ref: OracleSecretRef,
}

/// Kubernetes secret references for the user principal key material
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct OracleSecretRef {
    /// PEM encoded API signing key
    #[serde(default)]
    pub privatekey: SecretKeySelector,
    /// Fingerprint of the API signing key
    #[serde(default)]
    pub fingerprint: SecretKeySelector,
}

/// Pointer to one key of a Kubernetes Secret
///
/// The selector never owns the data it names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct SecretKeySelector {
    /// Secret name
    #[serde(default)]
    pub name: String,
    /// Secret namespace; only allowed (and then required) for ClusterSecretStore
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Key within the secret's data
    #[serde(default)]
    pub key: String,
}

impl SecretKeySelector {
    /// Build a selector in the caller's namespace
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            key: key.into(),
        }
    }

    /// Set an explicit namespace
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}
