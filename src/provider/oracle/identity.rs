//! # Ambient Identity Discovery
//!
//! Discovers the identities that need no key material in the store manifest:
//! OKE workload identity and compute instance principals.
//!
//! Workload discovery follows the OCI resource principal protocol and reads
//! its parameters from the process environment. The resolver stages those
//! variables for the duration of the call (see `auth.rs`); nothing here
//! writes to the environment.

use crate::config::ProviderSettings;
use crate::constants::{
    IMDS_AUTHORIZATION, OKE_PROXYMUX_PORT, RESOURCE_PRINCIPAL_REGION_ENV,
    RESOURCE_PRINCIPAL_VERSION_2_2, RESOURCE_PRINCIPAL_VERSION_ENV,
};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

/// OKE workload identity of the pod's service account
///
/// The service account token is exchanged for a resource principal session
/// token at the proxymux endpoint by the vault transport.
#[derive(Clone)]
pub struct WorkloadIdentity {
    pub region: String,
    pub proxymux_endpoint: String,
    service_account_token: Zeroizing<String>,
}

impl WorkloadIdentity {
    pub fn new(
        region: impl Into<String>,
        proxymux_endpoint: impl Into<String>,
        service_account_token: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            proxymux_endpoint: proxymux_endpoint.into(),
            service_account_token: Zeroizing::new(service_account_token.into()),
        }
    }

    pub fn service_account_token(&self) -> &str {
        &self.service_account_token
    }
}

impl fmt::Debug for WorkloadIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkloadIdentity")
            .field("region", &self.region)
            .field("proxymux_endpoint", &self.proxymux_endpoint)
            .finish_non_exhaustive()
    }
}

/// Compute instance principal
///
/// Certificates and key are issued to the instance and served by the
/// instance metadata service; the vault transport federates them into a
/// security token.
#[derive(Clone)]
pub struct InstancePrincipal {
    pub region: String,
    pub leaf_certificate: String,
    pub intermediate_certificate: String,
    leaf_private_key: Zeroizing<String>,
}

impl InstancePrincipal {
    pub fn new(
        region: impl Into<String>,
        leaf_certificate: impl Into<String>,
        leaf_private_key: impl Into<String>,
        intermediate_certificate: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            leaf_certificate: leaf_certificate.into(),
            intermediate_certificate: intermediate_certificate.into(),
            leaf_private_key: Zeroizing::new(leaf_private_key.into()),
        }
    }

    pub fn leaf_private_key(&self) -> &str {
        &self.leaf_private_key
    }
}

impl fmt::Debug for InstancePrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstancePrincipal")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// Discovery of ambient identities
#[async_trait]
pub trait IdentityDiscovery: Send + Sync {
    /// Discover the workload identity
    ///
    /// Reads `OCI_RESOURCE_PRINCIPAL_VERSION` and `OCI_RESOURCE_PRINCIPAL_REGION`
    /// from the process environment.
    async fn workload_identity(&self) -> Result<WorkloadIdentity>;

    /// Discover the instance principal of the host
    async fn instance_principal(&self) -> Result<InstancePrincipal>;
}

/// Identity discovery against the real pod and host environment
#[derive(Debug, Clone, Default)]
pub struct AmbientIdentity {
    settings: ProviderSettings,
}

impl AmbientIdentity {
    pub fn new(settings: ProviderSettings) -> Self {
        Self { settings }
    }

    async fn imds_get(&self, client: &reqwest::Client, path: &str) -> Result<String> {
        let url = format!("{}/{path}", self.settings.imds_endpoint.trim_end_matches('/'));
        let response = client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, IMDS_AUTHORIZATION)
            .send()
            .await
            .with_context(|| format!("instance metadata request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("instance metadata request to {url} returned {status}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read instance metadata response from {url}"))?;
        Ok(body.trim().to_string())
    }
}

#[async_trait]
impl IdentityDiscovery for AmbientIdentity {
    async fn workload_identity(&self) -> Result<WorkloadIdentity> {
        let version = std::env::var(RESOURCE_PRINCIPAL_VERSION_ENV)
            .with_context(|| format!("{RESOURCE_PRINCIPAL_VERSION_ENV} is not set"))?;
        if version != RESOURCE_PRINCIPAL_VERSION_2_2 {
            bail!("unsupported resource principal version '{version}'");
        }

        let region = std::env::var(RESOURCE_PRINCIPAL_REGION_ENV)
            .with_context(|| format!("{RESOURCE_PRINCIPAL_REGION_ENV} is not set"))?;
        if region.is_empty() {
            bail!("{RESOURCE_PRINCIPAL_REGION_ENV} is empty");
        }

        let host = std::env::var("KUBERNETES_SERVICE_HOST")
            .context("KUBERNETES_SERVICE_HOST is not set; workload identity requires an OKE pod")?;
        let host = if host.contains(':') {
            format!("[{host}]")
        } else {
            host
        };

        let token_path = &self.settings.service_account_token_path;
        let token = tokio::fs::read_to_string(token_path)
            .await
            .with_context(|| {
                format!(
                    "failed to read service account token from {}",
                    token_path.display()
                )
            })?;
        let token = token.trim();
        if token.is_empty() {
            bail!("service account token at {} is empty", token_path.display());
        }

        debug!("Discovered workload identity in region {}", region);

        Ok(WorkloadIdentity::new(
            region,
            format!("https://{host}:{OKE_PROXYMUX_PORT}/resourcePrincipalSessionTokens"),
            token,
        ))
    }

    async fn instance_principal(&self) -> Result<InstancePrincipal> {
        let client = reqwest::Client::builder()
            .timeout(self.settings.imds_timeout())
            .build()
            .context("failed to build instance metadata client")?;

        let region = self
            .imds_get(&client, "instance/canonicalRegionName")
            .await?;
        let leaf_certificate = self.imds_get(&client, "identity/cert.pem").await?;
        let leaf_private_key = Zeroizing::new(self.imds_get(&client, "identity/key.pem").await?);
        let intermediate_certificate = self.imds_get(&client, "identity/intermediate.pem").await?;

        if !leaf_certificate.starts_with("-----BEGIN CERTIFICATE-----") {
            bail!("instance metadata returned a malformed leaf certificate");
        }

        debug!("Discovered instance principal in region {}", region);

        Ok(InstancePrincipal::new(
            region,
            leaf_certificate,
            leaf_private_key.as_str(),
            intermediate_certificate,
        ))
    }
}
