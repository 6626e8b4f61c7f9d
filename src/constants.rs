//! # Constants
//!
//! Shared constants used throughout the provider.
//!
//! These values represent reasonable defaults and can be overridden via
//! environment variables where applicable (see `config::ProviderSettings`).

/// Name under which the provider registers with the framework
pub const PROVIDER_NAME: &str = "oracle";

/// Environment variable read by OCI resource principal discovery for the protocol version
pub const RESOURCE_PRINCIPAL_VERSION_ENV: &str = "OCI_RESOURCE_PRINCIPAL_VERSION";

/// Environment variable read by OCI resource principal discovery for the region
pub const RESOURCE_PRINCIPAL_REGION_ENV: &str = "OCI_RESOURCE_PRINCIPAL_REGION";

/// Resource principal protocol version used by OKE workload identity
pub const RESOURCE_PRINCIPAL_VERSION_2_2: &str = "2.2";

/// Port of the OKE proxymux endpoint that exchanges service account tokens
pub const OKE_PROXYMUX_PORT: u16 = 12250;

/// Default path of the projected Kubernetes service account token
pub const DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH: &str =
    "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Default base URL of the OCI instance metadata service (v2)
pub const DEFAULT_IMDS_ENDPOINT: &str = "http://169.254.169.254/opc/v2";

/// Authorization header value required by the OCI instance metadata service
pub const IMDS_AUTHORIZATION: &str = "Bearer Oracle";

/// Default timeout for instance metadata requests (milliseconds)
pub const DEFAULT_IMDS_TIMEOUT_MS: u64 = 2_000;

/// Service error code for requests whose signature or principal was rejected
pub const ERROR_CODE_NOT_AUTHENTICATED: &str = "NotAuthenticated";

/// Service error code for missing resources or missing IAM permissions
pub const ERROR_CODE_NOT_AUTHORIZED_OR_NOT_FOUND: &str = "NotAuthorizedOrNotFound";

/// Service error code returned while a resource is transitioning
pub const ERROR_CODE_INCORRECT_STATE: &str = "IncorrectState";

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "oracle_vault_provider=info";
