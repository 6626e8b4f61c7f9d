//! # Remote References
//!
//! Per-call references identifying the secret to read (or write).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reference to a secret in the vault
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct RemoteRef {
    /// Secret name within the vault
    pub key: String,
    /// Bundle stage to fetch (CURRENT, PENDING, LATEST, PREVIOUS, DEPRECATED)
    /// Empty lets the service pick the current bundle
    #[serde(default)]
    pub version: String,
    /// JSON property path to extract from the payload (e.g., "db.hosts[0].name")
    #[serde(default)]
    pub property: String,
}

impl RemoteRef {
    /// Reference a secret's current bundle
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Select a bundle stage
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Select a property of the JSON payload
    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }
}

/// Reference used by push/delete operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushRemoteRef {
    /// Remote secret name
    pub remote_key: String,
    /// Property within the remote secret
    #[serde(default)]
    pub property: String,
}

/// Search criteria for bulk fetches
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct SecretFind {
    /// Name regular expression
    #[serde(default)]
    pub name: Option<String>,
    /// Tags the secrets must carry
    #[serde(default)]
    pub tags: std::collections::BTreeMap<String, String>,
}
