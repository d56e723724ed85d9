use std::sync::Arc;
use std::time::Duration;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::api::ApiConfig;
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::sources::metadata::MetadataSource;
use crate::sources::token::TokenOutcome;
use crate::sources::AcquireToken;

/// Caller side of an outbound request: everything except the url.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl FetchOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the body and set `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(self
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body))
    }
}

/// Sends requests to the backend with a best-effort identity token.
///
/// Only the token request is bounded by a deadline. The backend request itself
/// gets no timeout and no retry from this type; set a timeout on the injected
/// `reqwest::Client` if one is needed.
#[derive(Debug, Clone)]
pub struct AuthedClient<S = MetadataSource> {
    client: Client,
    config: Arc<ApiConfig>,
    source: S,
}

impl AuthedClient<MetadataSource> {
    pub fn new(client: Client, config: Arc<ApiConfig>) -> Self {
        let source = MetadataSource::from_config(&config);
        Self { client, config, source }
    }

    pub fn with_token_timeout(mut self, timeout: Duration) -> Self {
        self.source = self.source.with_timeout(timeout);
        self
    }
}

impl<S: AcquireToken + Sync> AuthedClient<S> {
    pub fn with_source(client: Client, config: Arc<ApiConfig>, source: S) -> Self {
        Self { client, config, source }
    }

    /// Send `options` to `api_address + path`.
    ///
    /// The response comes back as is, non-2xx included. A transport error of
    /// the backend call is returned unchanged. Token failures never surface.
    pub async fn authed_fetch(&self, path: &str, options: FetchOptions) -> Result<Response, reqwest::Error> {
        let start = get_instant();
        let outcome = self
            .source
            .acquire_token(&self.client, &self.config.audience)
            .await;

        let FetchOptions { method, headers, body } = options;
        let headers = authorize_headers(headers, &outcome);
        let url = format!("{}{}", self.config.api_address, path);
        debug!("{} {} (identity token: {})", method, url, outcome.as_label());

        let mut request = self.client.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let result = request.send().await;

        let metrics = get_metrics().await;
        metrics
            .api_request_duration
            .with_label_values(&[method.as_str()])
            .observe(start.elapsed().as_secs_f64());
        match &result {
            Ok(response) => metrics
                .api_requests
                .with_label_values(&[method.as_str(), response.status().as_str()])
                .inc(),
            Err(err) => {
                warn!("{} {} failed: {}", method, path, err);
                metrics.api_failures.with_label_values(&[method.as_str()]).inc();
            }
        }

        result
    }
}

/// Caller headers plus `Authorization: Bearer <token>` when a token was acquired.
/// Any `Authorization` value set by the caller is replaced.
pub fn authorize_headers(mut headers: HeaderMap, outcome: &TokenOutcome) -> HeaderMap {
    if let Some(value) = outcome.token().and_then(|token| token.bearer_header()) {
        headers.insert(AUTHORIZATION, value);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::token::{IdentityToken, NoTokenReason};

    fn caller_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.append(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        headers.append(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));
        headers.insert("x-request-id", HeaderValue::from_static("req-1"));
        headers
    }

    #[test]
    fn token_replaces_every_caller_authorization_value() {
        let outcome = TokenOutcome::Token(IdentityToken::new("abc123"));
        let headers = authorize_headers(caller_headers(), &outcome);

        let values: Vec<_> = headers.get_all(AUTHORIZATION).iter().collect();
        assert_eq!(values, vec![&HeaderValue::from_static("Bearer abc123")]);
        assert_eq!(headers.get("x-request-id").unwrap(), "req-1");
    }

    #[test]
    fn no_token_leaves_headers_untouched() {
        let outcome = TokenOutcome::NoToken(NoTokenReason::Timeout);
        let headers = authorize_headers(caller_headers(), &outcome);
        assert_eq!(headers, caller_headers());
    }

    #[test]
    fn json_options_set_content_type_and_body() {
        let options = FetchOptions::new(Method::POST)
            .json(&serde_json::json!({"question": "2 + 2?"}))
            .unwrap();
        assert_eq!(options.method, Method::POST);
        assert_eq!(options.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(options.body.unwrap(), br#"{"question":"2 + 2?"}"#.to_vec());
    }

    #[test]
    fn default_options_are_a_plain_get() {
        let options = FetchOptions::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.headers.is_empty());
        assert!(options.body.is_none());
    }
}
