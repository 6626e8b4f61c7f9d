//! # OCI Vault Capability Clients
//!
//! Narrow interfaces over the OCI Secrets and KMS Vault services.
//!
//! The provider only ever needs two calls from the vault SDK: read a secret
//! bundle by name, and read vault metadata to check reachability. Both clients
//! are built once per store by a `VaultClientFactory` from the resolved
//! credentials; region and retry policy are fixed at that point.

use crate::provider::oracle::auth::CredentialContext;
use crate::provider::oracle::retry::RetryPolicy;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Request for a secret bundle by secret name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    /// Vault OCID
    pub vault_id: String,
    /// Secret name within the vault
    pub secret_name: String,
    /// Bundle stage; None lets the service return the current bundle
    pub stage: Option<String>,
}

/// Secret bundle returned by the Secrets service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretBundle {
    pub secret_id: String,
    pub version_number: Option<i64>,
    pub stages: Vec<String>,
    pub content: Option<SecretBundleContent>,
}

/// Content of a secret bundle
///
/// The service tags content with a `contentType`; only base64 payloads are
/// defined today, other types are kept so callers can report them.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretBundleContent {
    /// `BASE64` content: the payload, base64 encoded
    Base64(String),
    /// Any other content type
    Other { content_type: String },
}

impl fmt::Debug for SecretBundleContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretBundleContent::Base64(_) => f.write_str("Base64(<redacted>)"),
            SecretBundleContent::Other { content_type } => f
                .debug_struct("Other")
                .field("content_type", content_type)
                .finish(),
        }
    }
}

/// Vault metadata returned by the KMS Vault service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultMetadata {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    pub management_endpoint: Option<String>,
    pub crypto_endpoint: Option<String>,
}

/// Error response returned by an OCI service
///
/// `code` is an open set of strings defined by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub service: String,
    pub status_code: u16,
    pub code: String,
    pub message: String,
    pub opc_request_id: Option<String>,
}

impl ServiceError {
    pub fn new(
        service: impl Into<String>,
        status_code: u16,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            status_code,
            code: code.into(),
            message: message.into(),
            opc_request_id: None,
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, opc_request_id: impl Into<String>) -> Self {
        self.opc_request_id = Some(opc_request_id.into());
        self
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error returned by {} Service. Http Status Code: {}. Error Code: {}.",
            self.service, self.status_code, self.code
        )?;
        if let Some(request_id) = &self.opc_request_id {
            write!(f, " Opc request id: {request_id}.")?;
        }
        write!(f, " Message: {}", self.message)
    }
}

/// Errors returned by the capability clients
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultClientError {
    /// The service answered with an error response
    #[error("{0}")]
    Service(ServiceError),
    /// The request never produced a service response (network, timeout, signing)
    #[error("transport error: {0}")]
    Transport(String),
    /// The client could not be constructed
    #[error("invalid client configuration: {0}")]
    Configuration(String),
}

impl VaultClientError {
    /// Service error response, if the failure came from the service
    pub fn as_service_error(&self) -> Option<&ServiceError> {
        match self {
            VaultClientError::Service(service_error) => Some(service_error),
            _ => None,
        }
    }
}

/// Read access to secret bundles
#[async_trait]
pub trait VaultSecretClient: Send + Sync {
    async fn get_secret_bundle_by_name(
        &self,
        request: &BundleRequest,
    ) -> Result<SecretBundle, VaultClientError>;
}

/// Read access to vault metadata
#[async_trait]
pub trait VaultAdminClient: Send + Sync {
    async fn get_vault(&self, vault_id: &str) -> Result<VaultMetadata, VaultClientError>;
}

/// Construction-time configuration shared by both clients
#[derive(Debug, Clone)]
pub struct ClientConfiguration {
    /// Region the clients are bound to
    pub region: String,
    /// Custom retry policy; None keeps the SDK default
    pub retry_policy: Option<RetryPolicy>,
}

/// Builds capability clients over the vault transport
///
/// Implementations wrap the OCI SDK (or an HTTP transport signing requests
/// with the credential context). Both clients share the same credentials for
/// their whole lifetime.
pub trait VaultClientFactory: Send + Sync {
    fn secrets_client(
        &self,
        credentials: Arc<CredentialContext>,
        config: &ClientConfiguration,
    ) -> Result<Arc<dyn VaultSecretClient>, VaultClientError>;

    fn admin_client(
        &self,
        credentials: Arc<CredentialContext>,
        config: &ClientConfiguration,
    ) -> Result<Arc<dyn VaultAdminClient>, VaultClientError>;
}
