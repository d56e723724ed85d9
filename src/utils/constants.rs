//! Shared constants and invariants

/// Identity endpoint of the instance metadata service.
/// Only reachable from inside the cloud environment.
pub const METADATA_IDENTITY_URL: &str =
    "http://metadata/computeMetadata/v1/instance/service-accounts/default/identity";

pub const METADATA_FLAVOR_HEADER: &str = "Metadata-Flavor";
pub const METADATA_FLAVOR_VALUE: &str = "Google";

/// Upper bound for a single identity token request, send and body read included.
pub const DEFAULT_TOKEN_TIMEOUT_MS: u64 = 150;

// Environment variables
pub const ENV_API_ADDRESS: &str = "API_ADDRESS";
pub const ENV_BACKEND_AUDIENCE: &str = "BACKEND_AUDIENCE";

// Backend API paths
pub const QUESTIONS_PATH: &str = "/questions";
pub const HEALTH_PATH: &str = "/health";
