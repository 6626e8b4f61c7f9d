//! Oracle Vault Provider Library
//!
//! Secret store provider for Oracle Cloud Infrastructure Vault, used by a
//! secret-synchronization framework to read secrets from OCI Vault.
//! Tests are included in the module files and under `tests/`.

pub mod config;
pub mod constants;
pub mod crd;
pub mod error;
pub mod observability;
pub mod provider;

pub use error::ProviderError;
pub use provider::oracle::VaultManagementService;
pub use provider::{
    Provider, SecretStoreCapabilities, SecretsClient, ValidationOutcome, ValidationResult,
};
