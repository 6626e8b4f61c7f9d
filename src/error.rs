//! # Provider Errors
//!
//! Error taxonomy for the Oracle Vault provider.
//!
//! Messages match what the framework surfaces in store and secret status
//! conditions, so they are kept short and stable.

use crate::provider::oracle::client::VaultClientError;
use thiserror::Error;

/// Errors returned by the Oracle Vault provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("missing Vault")]
    MissingVault,

    #[error("missing Region")]
    MissingRegion,

    #[error("missing Tenancy ID")]
    MissingTenancy,

    #[error("missing User ID")]
    MissingUser,

    #[error("missing PrivateKey")]
    MissingPrivateKey,

    #[error("missing Fingerprint")]
    MissingFingerprint,

    #[error("invalid oracle SecretStore resource: missing oracle APIKey")]
    MissingSecretName,

    #[error("invalid ClusterStore, missing namespace")]
    MissingNamespace,

    /// Store manifest rejected by admission validation
    #[error("{0}")]
    InvalidStore(String),

    #[error("could not fetch SecretAccessKey secret: {0}")]
    SecretFetchFailed(#[source] anyhow::Error),

    #[error("unable to discover {principal} identity: {source}")]
    IdentityDiscoveryFailed {
        principal: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("unable to set OCI SDK environment variable {name}: {reason}")]
    EnvironmentSetupFailed { name: &'static str, reason: String },

    #[error("invalid retry interval '{value}': {reason}")]
    InvalidRetryInterval { value: String, reason: String },

    /// Credential resolution failed; wraps the strategy's error
    #[error("cannot setup new oracle client: {0}")]
    CredentialSetupFailed(#[source] Box<ProviderError>),

    /// Any other construction step failed; wraps the step's error
    #[error("cannot setup new oracle client: {0}")]
    ProviderSetupFailed(#[source] Box<ProviderError>),

    #[error("unexpected secret bundle content")]
    UnexpectedBundleContent,

    #[error("unable to decode secret payload: {0}")]
    PayloadDecodeFailed(#[source] base64::DecodeError),

    #[error("missing Key in secret: {0}")]
    MissingKey(String),

    #[error("unable to unmarshal secret: {0}")]
    SecretMapUnmarshalFailed(#[source] serde_json::Error),

    #[error("provider oracle is not initialized")]
    ProviderNotInitialized,

    #[error("{0} not implemented")]
    NotImplemented(&'static str),

    /// Vault service call failed; message has request ids stripped
    #[error("{message}")]
    VaultService {
        code: Option<String>,
        message: String,
    },

    /// Vault client could not be built
    #[error("{0}")]
    VaultClient(#[from] VaultClientError),
}

impl ProviderError {
    /// Innermost error behind the construction wrappers
    pub fn root_cause(&self) -> &ProviderError {
        match self {
            ProviderError::CredentialSetupFailed(inner)
            | ProviderError::ProviderSetupFailed(inner) => inner.root_cause(),
            other => other,
        }
    }

    /// Missing or empty required configuration
    ///
    /// These are detected before any network call is made.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self.root_cause(),
            ProviderError::MissingVault
                | ProviderError::MissingRegion
                | ProviderError::MissingTenancy
                | ProviderError::MissingUser
                | ProviderError::MissingPrivateKey
                | ProviderError::MissingFingerprint
                | ProviderError::MissingSecretName
                | ProviderError::MissingNamespace
                | ProviderError::InvalidStore(_)
                | ProviderError::InvalidRetryInterval { .. }
        )
    }
}
