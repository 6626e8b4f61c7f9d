//! # Secret References
//!
//! Loads key material referenced by the store manifest from Kubernetes
//! Secrets.

use crate::crd::{SecretKeySelector, StoreKind};
use crate::error::ProviderError;
use anyhow::Context;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::Api;
use std::collections::BTreeMap;
use tracing::debug;

/// Read access to Kubernetes Secrets
#[async_trait]
pub trait KubeSecretReader: Send + Sync {
    /// Data of the named secret, keyed by data key
    async fn get_secret_data(
        &self,
        namespace: &str,
        name: &str,
    ) -> anyhow::Result<BTreeMap<String, Vec<u8>>>;
}

#[async_trait]
impl KubeSecretReader for kube::Client {
    async fn get_secret_data(
        &self,
        namespace: &str,
        name: &str,
    ) -> anyhow::Result<BTreeMap<String, Vec<u8>>> {
        let secrets: Api<Secret> = Api::namespaced(self.clone(), namespace);
        let secret = secrets
            .get(name)
            .await
            .with_context(|| format!("failed to get secret {namespace}/{name}"))?;

        let mut data: BTreeMap<String, Vec<u8>> = secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, value.0))
            .collect();

        // stringData is write-only on the API server but can show up on
        // objects served from caches
        if let Some(string_data) = secret.string_data {
            for (key, value) in string_data {
                data.entry(key).or_insert_with(|| value.into_bytes());
            }
        }

        Ok(data)
    }
}

/// Load the value a selector points at
///
/// Cluster-scoped stores must name the secret's namespace; namespaced stores
/// always read from the caller's namespace. A key missing from the secret
/// yields an empty string so the caller can report which value is missing.
pub async fn load_secret_data(
    reader: &dyn KubeSecretReader,
    selector: &SecretKeySelector,
    namespace: &str,
    store_kind: StoreKind,
) -> Result<String, ProviderError> {
    if selector.name.is_empty() {
        return Err(ProviderError::MissingSecretName);
    }

    let namespace = if store_kind.is_cluster_scoped() {
        selector
            .namespace
            .as_deref()
            .ok_or(ProviderError::MissingNamespace)?
    } else {
        namespace
    };

    let data = reader
        .get_secret_data(namespace, &selector.name)
        .await
        .map_err(ProviderError::SecretFetchFailed)?;

    debug!(
        "Loaded key '{}' from secret {}/{}",
        selector.key, namespace, selector.name
    );

    Ok(data
        .get(&selector.key)
        .map(|value| String::from_utf8_lossy(value).into_owned())
        .unwrap_or_default())
}
