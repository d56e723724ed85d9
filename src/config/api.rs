use std::env;

use tracing::debug;

use crate::utils::constants::{ENV_API_ADDRESS, ENV_BACKEND_AUDIENCE, METADATA_IDENTITY_URL};

/// ================================
/// Backend API configuration
/// ================================
///
/// Resolved once at process start and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base address of the backend, request paths are appended verbatim.
    pub api_address: String,
    /// Audience for identity tokens, empty disables token acquisition.
    pub audience: String,
    pub metadata_url: String,
}

impl ApiConfig {
    /// Build from explicit values.
    ///
    /// The audience is the api address when it is non-empty,
    /// otherwise the backend audience, otherwise empty.
    pub fn new(api_address: impl Into<String>, backend_audience: Option<String>) -> Self {
        let api_address = api_address.into();
        let audience = resolve_audience(&api_address, backend_audience);
        Self {
            api_address,
            audience,
            metadata_url: METADATA_IDENTITY_URL.to_owned(),
        }
    }

    /// Read `API_ADDRESS` and `BACKEND_AUDIENCE`.
    ///
    /// A missing `API_ADDRESS` is a deployment error. It is not reported here,
    /// requests built from the empty base address fail when they are sent.
    pub fn from_env() -> Self {
        let api_address = env::var(ENV_API_ADDRESS).unwrap_or_default();
        let backend_audience = env::var(ENV_BACKEND_AUDIENCE).ok();
        let config = Self::new(api_address, backend_audience);
        debug!(
            "api config resolved: api_address '{}', audience set: {}",
            config.api_address,
            !config.audience.is_empty()
        );
        config
    }

    pub fn with_metadata_url(mut self, metadata_url: impl Into<String>) -> Self {
        self.metadata_url = metadata_url.into();
        self
    }
}

fn resolve_audience(api_address: &str, backend_audience: Option<String>) -> String {
    if !api_address.is_empty() {
        return api_address.to_owned();
    }
    backend_audience.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn audience_prefers_api_address() {
        let config = ApiConfig::new("https://api.example.run.app", Some("other".into()));
        assert_eq!(config.audience, "https://api.example.run.app");
        assert_eq!(config.metadata_url, METADATA_IDENTITY_URL);
    }

    #[test]
    fn audience_falls_back_to_backend_audience() {
        let config = ApiConfig::new("", Some("https://backend.example".into()));
        assert_eq!(config.api_address, "");
        assert_eq!(config.audience, "https://backend.example");
    }

    #[test]
    fn audience_is_empty_without_any_source() {
        let config = ApiConfig::new("", None);
        assert_eq!(config.audience, "");
    }

    #[test]
    fn metadata_url_can_be_overridden() {
        let config = ApiConfig::new("http://api", None).with_metadata_url("http://127.0.0.1:1/identity");
        assert_eq!(config.metadata_url, "http://127.0.0.1:1/identity");
        assert_eq!(config.audience, "http://api");
    }

    #[test]
    #[serial]
    fn from_env_reads_both_variables() {
        std::env::set_var(ENV_API_ADDRESS, "");
        std::env::set_var(ENV_BACKEND_AUDIENCE, "aud-from-env");
        let config = ApiConfig::from_env();
        assert_eq!(config.api_address, "");
        assert_eq!(config.audience, "aud-from-env");

        std::env::set_var(ENV_API_ADDRESS, "http://backend:8080");
        let config = ApiConfig::from_env();
        assert_eq!(config.api_address, "http://backend:8080");
        assert_eq!(config.audience, "http://backend:8080");

        std::env::remove_var(ENV_API_ADDRESS);
        std::env::remove_var(ENV_BACKEND_AUDIENCE);
        let config = ApiConfig::from_env();
        assert_eq!(config, ApiConfig::new("", None));
    }
}
