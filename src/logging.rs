//! Logging configuration for the weekly report service
//!
//! Structured logging setup: JSON output in production, compact console
//! output everywhere else. `RUST_LOG` overrides the configured level.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Initialize the application logging system
pub fn init_logging(environment: &str, log_level: &str) {
    let default_filter =
        format!("dopamina_report={log_level},tower_http=info,axum::rejection=trace");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = Registry::default().with(env_filter);

    // try_init so repeated initialization (tests) is a no-op
    if environment == "production" {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
            .ok();
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_ansi(true),
            )
            .try_init()
            .ok();
    }

    tracing::info!("Logging system initialized");
}

/// Log application startup
pub fn log_startup() {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Weekly report service starting up",
    );
}
