//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,api_server=debug,blog_core=debug,blog_infra=debug";

/// Log output settings.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// One JSON object per line instead of pretty output.
    pub json_logs: bool,
    pub service_name: String,
}

impl TelemetryConfig {
    /// Reads `LOG_FORMAT` (`json` or anything else) and `OTEL_SERVICE_NAME`.
    pub fn from_env() -> Self {
        Self {
            json_logs: std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")),
            service_name: std::env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "blog-api".to_string()),
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_telemetry(config: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }

    tracing::info!(service = %config.service_name, json = config.json_logs, "Logging initialized");
}
