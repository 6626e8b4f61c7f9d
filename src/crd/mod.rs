//! # Store Resource Types
//!
//! The subset of the secret-synchronization framework's resources that the
//! Oracle provider reads.
//!
//! The framework owns these custom resources; this crate only deserializes the
//! fields it needs, so unknown fields are ignored.
//!
//! ## Module Structure
//!
//! - `store.rs` - SecretStore / ClusterSecretStore spec and retry settings
//! - `provider.rs` - Oracle provider block (vault, region, principal, auth)
//! - `remote_ref.rs` - Per-secret references passed on fetch/push calls

mod provider;
mod remote_ref;
mod store;

// Re-export all public types
pub use provider::{
    OracleAuth, OracleProvider, OracleSecretRef, PrincipalType, SecretKeySelector,
};
pub use remote_ref::{PushRemoteRef, RemoteRef, SecretFind};
pub use store::{RetrySettings, SecretStore, SecretStoreProvider, SecretStoreSpec, StoreKind};
