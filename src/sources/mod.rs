//! Identity token sources and the authenticated fetch wrapper built on them.

use reqwest::Client;

pub mod fetch;
pub mod metadata;
pub mod token;

pub use fetch::{AuthedClient, FetchOptions};
pub use metadata::MetadataSource;
pub use token::{IdentityToken, NoTokenReason, TokenOutcome};

pub trait AcquireToken {
    /// Try to get a token scoped to `audience`. Never fails, see [`TokenOutcome`].
    fn acquire_token(
        &self,
        client: &Client,
        audience: &str,
    ) -> impl std::future::Future<Output = TokenOutcome> + Send;
}
