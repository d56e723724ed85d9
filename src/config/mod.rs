pub mod api;
pub mod settings;

pub use api::ApiConfig;
pub use settings::{LogFormat, LoggingConfig, MetricsConfig, ServerConfig, SettingsConfig};
