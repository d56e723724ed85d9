use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::config::settings::{MetricsConfig, SettingsConfig};
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::questions::client::QuestionsClient;
use crate::server::handlers;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub questions: Arc<QuestionsClient>,
}

impl AppState {
    pub fn new(metrics: &Metrics, questions: QuestionsClient) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            questions: Arc::new(questions),
        }
    }
}

pub fn router(state: AppState, metrics_config: &MetricsConfig) -> Router {
    Router::new()
        .route(
            "/api/questions",
            get(handlers::list_questions).post(handlers::create_question),
        )
        .route("/health", get(handlers::health))
        .merge(state.metrics_state.router(metrics_config))
        .with_state(state)
}

/// Serve the front-end until ctrl-c.
pub async fn start(settings_config: &SettingsConfig, questions: QuestionsClient) -> Result<()> {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, questions);
    let app = router(state, &settings_config.metrics);

    let bind_addr = settings_config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("listening on {}", bind_addr);

    metrics.up.set(1);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;
    metrics.up.set(0);

    info!("🧹 server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
