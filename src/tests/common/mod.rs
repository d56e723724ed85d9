// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Request;
use axum::Json;
use http::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;

use crate::config::api::ApiConfig;

pub const METADATA_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/identity";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// What the echo backend saw.
#[derive(Debug, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub authorization: Vec<String>,
    pub body: String,
}

/// Backend that answers every request with an [`Echo`] of it.
pub async fn spawn_echo_backend() -> (JoinHandle<()>, SocketAddr) {
    let router = Router::new().fallback(|req: Request| async move {
        let (parts, body) = req.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
        Json(json!({
            "method": parts.method.as_str(),
            "path": parts.uri.path(),
            "authorization": parts
                .headers
                .get_all(AUTHORIZATION)
                .iter()
                .map(|v| v.to_str().unwrap_or_default().to_owned())
                .collect::<Vec<_>>(),
            "body": String::from_utf8_lossy(&body),
        }))
    });
    spawn_axum(router).await
}

pub fn api_config(api_address: String, audience: &str, metadata_url: String) -> Arc<ApiConfig> {
    Arc::new(ApiConfig {
        api_address,
        audience: audience.to_owned(),
        metadata_url,
    })
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}
