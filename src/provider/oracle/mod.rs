//! # Oracle Cloud Infrastructure Vault Provider
//!
//! Read-only secret store backed by OCI Vault.
//!
//! ## Lifecycle
//!
//! A `VaultManagementService` starts unconstructed; it only validates store
//! manifests and builds clients. `new_client` resolves the credentials once,
//! binds a Secrets client and a KMS Vault client to the store's region and
//! retry policy and returns a constructed service serving reads until it is
//! closed.
//!
//! ## Modules
//!
//! - `auth.rs` - Credential resolution (workload, instance, user principals)
//! - `identity.rs` - Ambient identity discovery
//! - `secret_ref.rs` - Key material from Kubernetes Secrets
//! - `client.rs` - Vault capability clients and their factory
//! - `retry.rs` - Retry policy from store retry settings
//! - `codec.rs` - Bundle decoding and property extraction
//! - `validation.rs` - Store validation and error classification

pub mod auth;
pub mod client;
pub mod codec;
pub mod identity;
pub mod retry;
pub mod secret_ref;
pub mod validation;

use crate::config::ProviderSettings;
use crate::constants::PROVIDER_NAME;
use crate::crd::{PushRemoteRef, RemoteRef, SecretFind, SecretStore};
use crate::error::ProviderError;
use crate::observability::metrics;
use crate::provider::{
    Provider, SecretStoreCapabilities, SecretsClient, ValidationOutcome, ValidationResult,
};
use async_trait::async_trait;
use auth::resolve_credentials;
use client::{
    BundleRequest, ClientConfiguration, VaultAdminClient, VaultClientFactory, VaultSecretClient,
};
use identity::{AmbientIdentity, IdentityDiscovery};
use retry::RetryPolicy;
use secret_ref::KubeSecretReader;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, field, info, info_span, warn, Instrument};

/// Clients bound to one store
struct VaultClients {
    vault: String,
    secrets: Arc<dyn VaultSecretClient>,
    admin: Arc<dyn VaultAdminClient>,
}

/// OCI Vault provider and per-store client
pub struct VaultManagementService {
    factory: Arc<dyn VaultClientFactory>,
    discovery: Arc<dyn IdentityDiscovery>,
    clients: Option<VaultClients>,
    closed: AtomicBool,
}

impl VaultManagementService {
    /// Create an unconstructed provider
    pub fn new(
        factory: Arc<dyn VaultClientFactory>,
        discovery: Arc<dyn IdentityDiscovery>,
    ) -> Self {
        Self {
            factory,
            discovery,
            clients: None,
            closed: AtomicBool::new(false),
        }
    }

    /// Create an unconstructed provider discovering identities from the host
    pub fn with_ambient_identity(
        factory: Arc<dyn VaultClientFactory>,
        settings: ProviderSettings,
    ) -> Self {
        Self::new(factory, Arc::new(AmbientIdentity::new(settings)))
    }

    /// Whether the service holds clients and has not been closed
    pub fn is_initialized(&self) -> bool {
        self.clients.is_some() && !self.closed.load(Ordering::Acquire)
    }

    fn clients(&self) -> Result<&VaultClients, ProviderError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ProviderError::ProviderNotInitialized);
        }
        self.clients
            .as_ref()
            .ok_or(ProviderError::ProviderNotInitialized)
    }

    async fn construct(
        &self,
        store: &SecretStore,
        kube: Arc<dyn KubeSecretReader>,
        namespace: &str,
    ) -> Result<Self, ProviderError> {
        let oracle = store.oracle().ok_or_else(|| {
            ProviderError::InvalidStore("missing oracle provider configuration".to_string())
        })?;

        if oracle.vault.is_empty() {
            return Err(ProviderError::MissingVault);
        }

        if oracle.region.is_empty() {
            return Err(ProviderError::MissingRegion);
        }

        let credentials = Arc::new(
            resolve_credentials(
                oracle,
                store.kind,
                namespace,
                kube.as_ref(),
                self.discovery.as_ref(),
            )
            .await?,
        );

        let setup_failed = |e: ProviderError| ProviderError::ProviderSetupFailed(Box::new(e));

        let retry_policy = store
            .spec
            .retry_settings
            .as_ref()
            .map(RetryPolicy::from_settings)
            .transpose()
            .map_err(setup_failed)?;

        let config = ClientConfiguration {
            region: oracle.region.clone(),
            retry_policy,
        };

        let secrets = self
            .factory
            .secrets_client(Arc::clone(&credentials), &config)
            .map_err(|e| setup_failed(e.into()))?;
        let admin = self
            .factory
            .admin_client(Arc::clone(&credentials), &config)
            .map_err(|e| setup_failed(e.into()))?;

        info!(
            "Created {} client for vault {} in region {} using {} credentials",
            PROVIDER_NAME,
            oracle.vault,
            oracle.region,
            credentials.strategy().as_str()
        );

        Ok(Self {
            factory: Arc::clone(&self.factory),
            discovery: Arc::clone(&self.discovery),
            clients: Some(VaultClients {
                vault: oracle.vault.clone(),
                secrets,
                admin,
            }),
            closed: AtomicBool::new(false),
        })
    }
}

impl fmt::Debug for VaultManagementService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultManagementService")
            .field("vault", &self.clients.as_ref().map(|c| c.vault.as_str()))
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Provider for VaultManagementService {
    async fn new_client(
        &self,
        store: &SecretStore,
        kube: Arc<dyn KubeSecretReader>,
        namespace: &str,
    ) -> Result<Box<dyn SecretsClient>, ProviderError> {
        let service = self.construct(store, kube, namespace).await?;
        Ok(Box::new(service))
    }

    fn validate_store(&self, store: &SecretStore) -> Result<(), ProviderError> {
        validation::validate_store(store)
    }

    fn capabilities(&self) -> SecretStoreCapabilities {
        SecretStoreCapabilities::ReadOnly
    }
}

#[async_trait]
impl SecretsClient for VaultManagementService {
    async fn get_secret(&self, remote_ref: &RemoteRef) -> Result<Vec<u8>, ProviderError> {
        let clients = self.clients()?;

        let request = BundleRequest {
            vault_id: clients.vault.clone(),
            secret_name: remote_ref.key.clone(),
            stage: (!remote_ref.version.is_empty()).then(|| remote_ref.version.clone()),
        };

        let span = info_span!(
            "oracle.get_secret_bundle",
            provider = PROVIDER_NAME,
            secret.name = %remote_ref.key,
            secret.stage = request.stage.as_deref().unwrap_or("default"),
            operation.success = field::Empty
        );
        let span_clone = span.clone();
        let start = Instant::now();

        let bundle = async move {
            let result = clients.secrets.get_secret_bundle_by_name(&request).await;
            metrics::record_vault_operation("get_secret_bundle", start.elapsed().as_secs_f64());
            span_clone.record("operation.success", result.is_ok());
            result
        }
        .instrument(span)
        .await
        .map_err(|e| {
            metrics::increment_vault_operation_errors("get_secret_bundle");
            warn!("Failed to fetch secret {}: {}", remote_ref.key, e);
            validation::sanitize_vault_error(&e)
        })?;

        debug!(
            "Fetched secret {} (version {:?})",
            remote_ref.key, bundle.version_number
        );

        let payload = codec::decode_bundle(&bundle)?;
        codec::extract_property(payload, &remote_ref.key, &remote_ref.property)
    }

    async fn get_secret_map(
        &self,
        remote_ref: &RemoteRef,
    ) -> Result<BTreeMap<String, Vec<u8>>, ProviderError> {
        let data = self.get_secret(remote_ref).await?;
        codec::decode_secret_map(&data)
    }

    async fn get_all_secrets(
        &self,
        _find: &SecretFind,
    ) -> Result<BTreeMap<String, Vec<u8>>, ProviderError> {
        Err(ProviderError::NotImplemented("GetAllSecrets"))
    }

    async fn push_secret(
        &self,
        _value: &[u8],
        _remote_ref: &PushRemoteRef,
    ) -> Result<(), ProviderError> {
        Err(ProviderError::NotImplemented("PushSecret"))
    }

    async fn delete_secret(&self, _remote_ref: &PushRemoteRef) -> Result<(), ProviderError> {
        Err(ProviderError::NotImplemented("DeleteSecret"))
    }

    async fn validate(&self) -> ValidationOutcome {
        let clients = match self.clients() {
            Ok(clients) => clients,
            Err(e) => {
                metrics::increment_validations(ValidationResult::Error.as_str());
                return ValidationOutcome::with_cause(ValidationResult::Error, e);
            }
        };

        let span = info_span!(
            "oracle.get_vault",
            provider = PROVIDER_NAME,
            vault.id = %clients.vault
        );
        let start = Instant::now();
        let result = clients.admin.get_vault(&clients.vault).instrument(span).await;
        metrics::record_vault_operation("get_vault", start.elapsed().as_secs_f64());

        let outcome = match result {
            Ok(vault) => {
                debug!(
                    "Vault {} is reachable (state {})",
                    clients.vault, vault.lifecycle_state
                );
                ValidationOutcome::ready()
            }
            Err(e) => {
                metrics::increment_vault_operation_errors("get_vault");
                let result = validation::classify_vault_error(&e);
                warn!(
                    "Validation of vault {} returned {}: {}",
                    clients.vault,
                    result.as_str(),
                    e
                );
                ValidationOutcome::with_cause(result, validation::sanitize_vault_error(&e))
            }
        };

        metrics::increment_validations(outcome.result.as_str());
        outcome
    }

    async fn close(&self) -> Result<(), ProviderError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
