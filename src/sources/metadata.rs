use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use crate::config::api::ApiConfig;
use crate::observability::metrics::get_metrics;
use crate::sources::token::{IdentityToken, NoTokenReason, TokenOutcome};
use crate::sources::AcquireToken;
use crate::utils::constants::{DEFAULT_TOKEN_TIMEOUT_MS, METADATA_FLAVOR_HEADER, METADATA_FLAVOR_VALUE};

/// Identity tokens from the instance metadata service.
#[derive(Debug, Clone)]
pub struct MetadataSource {
    pub metadata_url: String,
    pub timeout: Duration,
}

impl MetadataSource {
    pub fn new(metadata_url: impl Into<String>) -> Self {
        Self {
            metadata_url: metadata_url.into(),
            timeout: Duration::from_millis(DEFAULT_TOKEN_TIMEOUT_MS),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.metadata_url.clone())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl AcquireToken for MetadataSource {
    /// Best effort: every failure becomes `NoToken`, nothing is retried.
    async fn acquire_token(&self, client: &Client, audience: &str) -> TokenOutcome {
        if audience.is_empty() {
            debug!("no audience configured, sending request without identity token");
            return TokenOutcome::NoToken(NoTokenReason::NoAudience);
        }

        let request = client
            .get(&self.metadata_url)
            .query(&[("audience", audience), ("format", "full")])
            .header(METADATA_FLAVOR_HEADER, METADATA_FLAVOR_VALUE);

        // dropping the request future on expiry aborts the call
        let outcome = match tokio::time::timeout(self.timeout, request_token(request)).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                debug!("identity token request failed: {}", err);
                TokenOutcome::NoToken(NoTokenReason::Transport)
            }
            Err(_) => {
                debug!("identity token request timed out after {:?}", self.timeout);
                TokenOutcome::NoToken(NoTokenReason::Timeout)
            }
        };

        match &outcome {
            TokenOutcome::Token(_) => debug!("identity token acquired for audience '{}'", audience),
            TokenOutcome::NoToken(reason @ (NoTokenReason::Timeout | NoTokenReason::Transport)) => {
                debug!("metadata service unavailable ({}), continuing unauthenticated", reason)
            }
            TokenOutcome::NoToken(reason) => {
                warn!("metadata service returned no usable token ({}), continuing unauthenticated", reason)
            }
        }

        get_metrics()
            .await
            .token_acquisitions
            .with_label_values(&[outcome.as_label()])
            .inc();

        outcome
    }
}

async fn request_token(request: RequestBuilder) -> Result<TokenOutcome, reqwest::Error> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Ok(TokenOutcome::NoToken(NoTokenReason::Status(status.as_u16())));
    }
    let body = response.text().await?;
    Ok(token_from_body(body))
}

/// Trailing HTTP whitespace is dropped, a CR or LF inside the token still rejects it.
fn token_from_body(body: String) -> TokenOutcome {
    let body = body.trim_end_matches([' ', '\t', '\r', '\n']);
    if body.is_empty() {
        return TokenOutcome::NoToken(NoTokenReason::EmptyBody);
    }
    let token = IdentityToken::new(body);
    if token.bearer_header().is_none() {
        return TokenOutcome::NoToken(NoTokenReason::InvalidHeaderValue);
    }
    TokenOutcome::Token(token)
}
