//! # Credential Resolution
//!
//! Turns the provider block of a store into the credentials shared by both
//! vault clients.
//!
//! ## Strategies
//!
//! - **Workload**: OKE workload identity. The OCI resource principal protocol
//!   is configured through process environment variables, so the variables are
//!   staged under a process-wide lock for the duration of discovery and removed
//!   again on every exit path.
//! - **Instance**: instance principal from the instance metadata service. Also
//!   selected when neither a principal type nor an `auth` block is given.
//! - **User**: API signing key of an IAM user, loaded from Kubernetes Secrets.

use crate::constants::{
    RESOURCE_PRINCIPAL_REGION_ENV, RESOURCE_PRINCIPAL_VERSION_2_2,
    RESOURCE_PRINCIPAL_VERSION_ENV,
};
use crate::crd::{OracleAuth, OracleProvider, PrincipalType, StoreKind};
use crate::error::ProviderError;
use crate::observability::metrics;
use crate::provider::oracle::identity::{IdentityDiscovery, InstancePrincipal, WorkloadIdentity};
use crate::provider::oracle::secret_ref::{load_secret_data, KubeSecretReader};
use std::fmt;
use std::sync::LazyLock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// Serialises every staging of the resource principal variables
static RESOURCE_PRINCIPAL_ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Strategy selected from the provider block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStrategy {
    Workload,
    Instance,
    User,
}

impl CredentialStrategy {
    pub fn select(oracle: &OracleProvider) -> Self {
        match oracle.principal_type {
            Some(PrincipalType::Workload) => CredentialStrategy::Workload,
            Some(PrincipalType::InstancePrincipal) => CredentialStrategy::Instance,
            _ if oracle.auth.is_none() => CredentialStrategy::Instance,
            _ => CredentialStrategy::User,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CredentialStrategy::Workload => "workload",
            CredentialStrategy::Instance => "instance",
            CredentialStrategy::User => "user",
        }
    }
}

/// API signing key of an IAM user
#[derive(Clone)]
pub struct UserPrincipal {
    pub tenancy: String,
    pub user: String,
    pub region: String,
    pub fingerprint: String,
    private_key: Zeroizing<String>,
}

impl UserPrincipal {
    pub fn new(
        tenancy: impl Into<String>,
        user: impl Into<String>,
        region: impl Into<String>,
        fingerprint: impl Into<String>,
        private_key: Zeroizing<String>,
    ) -> Self {
        Self {
            tenancy: tenancy.into(),
            user: user.into(),
            region: region.into(),
            fingerprint: fingerprint.into(),
            private_key,
        }
    }

    /// PEM encoded signing key
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Key id used in the request signature: `tenancy/user/fingerprint`
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy, self.user, self.fingerprint)
    }
}

impl fmt::Debug for UserPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPrincipal")
            .field("tenancy", &self.tenancy)
            .field("user", &self.user)
            .field("region", &self.region)
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

/// Credentials shared read-only by the vault clients of one store
#[derive(Debug, Clone)]
pub enum CredentialContext {
    Workload(WorkloadIdentity),
    Instance(InstancePrincipal),
    User(UserPrincipal),
}

impl CredentialContext {
    pub fn strategy(&self) -> CredentialStrategy {
        match self {
            CredentialContext::Workload(_) => CredentialStrategy::Workload,
            CredentialContext::Instance(_) => CredentialStrategy::Instance,
            CredentialContext::User(_) => CredentialStrategy::User,
        }
    }

    /// Region the identity was issued for
    pub fn region(&self) -> &str {
        match self {
            CredentialContext::Workload(identity) => &identity.region,
            CredentialContext::Instance(principal) => &principal.region,
            CredentialContext::User(principal) => &principal.region,
        }
    }
}

/// Resource principal variables staged for one discovery
///
/// Removes both variables when dropped, including on early return, error and
/// unwinding.
struct ResourcePrincipalEnv;

impl ResourcePrincipalEnv {
    fn stage(region: &str) -> Result<Self, ProviderError> {
        if region.contains('\0') {
            return Err(ProviderError::EnvironmentSetupFailed {
                name: RESOURCE_PRINCIPAL_REGION_ENV,
                reason: "value contains a NUL byte".to_string(),
            });
        }

        let guard = ResourcePrincipalEnv;
        std::env::set_var(RESOURCE_PRINCIPAL_VERSION_ENV, RESOURCE_PRINCIPAL_VERSION_2_2);
        std::env::set_var(RESOURCE_PRINCIPAL_REGION_ENV, region);
        Ok(guard)
    }
}

impl Drop for ResourcePrincipalEnv {
    fn drop(&mut self) {
        std::env::remove_var(RESOURCE_PRINCIPAL_VERSION_ENV);
        std::env::remove_var(RESOURCE_PRINCIPAL_REGION_ENV);
    }
}

/// Resolve the credentials for a store
///
/// # Arguments
/// * `oracle` - Provider block of the store
/// * `store_kind` - Kind of the store, decides where secret references resolve
/// * `namespace` - Namespace of the resource requesting the client
/// * `reader` - Kubernetes Secret reader for the user strategy
/// * `discovery` - Ambient identity discovery for workload and instance strategies
///
/// # Errors
///
/// Every failure is returned as `ProviderError::CredentialSetupFailed`.
pub async fn resolve_credentials(
    oracle: &OracleProvider,
    store_kind: StoreKind,
    namespace: &str,
    reader: &dyn KubeSecretReader,
    discovery: &dyn IdentityDiscovery,
) -> Result<CredentialContext, ProviderError> {
    let strategy = CredentialStrategy::select(oracle);
    info!(
        "Resolving {} credentials for region {}",
        strategy.as_str(),
        oracle.region
    );

    let result = match strategy {
        CredentialStrategy::Workload => resolve_workload(&oracle.region, discovery)
            .await
            .map(CredentialContext::Workload),
        CredentialStrategy::Instance => discovery
            .instance_principal()
            .await
            .map(CredentialContext::Instance)
            .map_err(|source| ProviderError::IdentityDiscoveryFailed {
                principal: "instance",
                source,
            }),
        CredentialStrategy::User => {
            let auth = oracle.auth.clone().unwrap_or_default();
            resolve_user(&auth, &oracle.region, store_kind, namespace, reader)
                .await
                .map(CredentialContext::User)
        }
    };

    metrics::increment_credential_resolutions(strategy.as_str(), result.is_ok());

    result.map_err(|e| {
        warn!("Failed to resolve {} credentials: {}", strategy.as_str(), e);
        ProviderError::CredentialSetupFailed(Box::new(e))
    })
}

async fn resolve_workload(
    region: &str,
    discovery: &dyn IdentityDiscovery,
) -> Result<WorkloadIdentity, ProviderError> {
    // Lock before staging: the guard below must drop first
    let _lock = RESOURCE_PRINCIPAL_ENV_LOCK.lock().await;
    let _env = ResourcePrincipalEnv::stage(region)?;

    debug!("Staged resource principal environment for region {}", region);

    discovery
        .workload_identity()
        .await
        .map_err(|source| ProviderError::IdentityDiscoveryFailed {
            principal: "workload",
            source,
        })
}

async fn resolve_user(
    auth: &OracleAuth,
    region: &str,
    store_kind: StoreKind,
    namespace: &str,
    reader: &dyn KubeSecretReader,
) -> Result<UserPrincipal, ProviderError> {
    let private_key = Zeroizing::new(
        load_secret_data(reader, &auth.secret_ref.privatekey, namespace, store_kind).await?,
    );
    if private_key.is_empty() {
        return Err(ProviderError::MissingPrivateKey);
    }

    let fingerprint =
        load_secret_data(reader, &auth.secret_ref.fingerprint, namespace, store_kind).await?;
    if fingerprint.is_empty() {
        return Err(ProviderError::MissingFingerprint);
    }

    if auth.user.is_empty() {
        return Err(ProviderError::MissingUser);
    }

    if auth.tenancy.is_empty() {
        return Err(ProviderError::MissingTenancy);
    }

    Ok(UserPrincipal::new(
        auth.tenancy.clone(),
        auth.user.clone(),
        region,
        fingerprint,
        private_key,
    ))
}
