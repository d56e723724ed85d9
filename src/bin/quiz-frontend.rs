use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use quiz_frontend::config::api::ApiConfig;
use quiz_frontend::config::settings::{LogFormat, MetricsConfig, ServerConfig, SettingsConfig};
use quiz_frontend::questions::client::QuestionsClient;
use quiz_frontend::server;
use quiz_frontend::sources::fetch::AuthedClient;
use quiz_frontend::utils::constants::DEFAULT_TOKEN_TIMEOUT_MS;
use quiz_frontend::utils::logging::{self, LogLevel};
use reqwest::Client;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    log_format: Option<LogFormat>,
    #[arg(long, env = "METRICS_ENABLED")]
    metrics_enabled: bool,
    #[arg(long, env = "METRICS_PATH", default_value = "/metrics")]
    metrics_path: String,
    /// Deadline for the metadata identity token request
    #[arg(long, env = "TOKEN_TIMEOUT_MS", default_value_t = DEFAULT_TOKEN_TIMEOUT_MS)]
    token_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args and env
    // -------------------------------

    let args = Args::parse();
    let settings = SettingsConfig {
        server: ServerConfig { host: args.host, port: args.port },
        metrics: MetricsConfig { path: args.metrics_path, is_enabled: args.metrics_enabled },
        logging: logging::resolve(args.log_level, args.log_format),
    };
    logging::init_logging(&settings.logging);

    // -------------------------------
    // 2. Resolve backend config once
    // -------------------------------

    let api_config = Arc::new(ApiConfig::from_env());
    if api_config.api_address.is_empty() {
        tracing::warn!("API_ADDRESS is not set, backend requests will fail");
    }

    // -------------------------------
    // 3. Create request client
    // -------------------------------

    let client = Client::new();
    let api = AuthedClient::new(client, api_config)
        .with_token_timeout(Duration::from_millis(args.token_timeout_ms));
    let questions = QuestionsClient::new(api);

    // -------------------------------
    // 4. Serve
    // -------------------------------

    info!("Service starting...");
    server::server::start(&settings, questions).await
}
