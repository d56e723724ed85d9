use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Lazily initializes and returns the process-wide `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Identity token metrics
    pub token_acquisitions: IntCounterVec,

    // Backend API metrics
    pub api_requests: IntCounterVec,
    pub api_failures: IntCounterVec,
    pub api_request_duration: HistogramVec,

    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("quizfrontend".into()), None)
            .expect("metrics registry prefix is valid");

        let metrics: Arc<Metrics> = Arc::new(Self {
            token_acquisitions: IntCounterVec::new(Opts::new("token_acquisitions_total", "Identity token acquisitions by outcome"), &["outcome"]).expect("metric definition"),

            api_requests: IntCounterVec::new(Opts::new("api_requests_total", "Backend API requests by method and status"), &["method", "status"]).expect("metric definition"),
            api_failures: IntCounterVec::new(Opts::new("api_failures_total", "Backend API transport failures by method"), &["method"]).expect("metric definition"),
            api_request_duration: HistogramVec::new(HistogramOpts::new("api_request_duration_seconds", "Backend API request duration seconds, token acquisition included").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["method"]).expect("metric definition"),

            up: IntGauge::new("up", "1 if service is serving").expect("metric definition"),

            registry,
        });

        let reg = &metrics.registry;
        let _ = reg.register(Box::new(metrics.token_acquisitions.clone()));
        let _ = reg.register(Box::new(metrics.api_requests.clone()));
        let _ = reg.register(Box::new(metrics.api_failures.clone()));
        let _ = reg.register(Box::new(metrics.api_request_duration.clone()));
        let _ = reg.register(Box::new(metrics.up.clone()));

        metrics
    }
}
