//! Weekly report service entry point
//!
//! Wires configuration, store, scheduler, and the HTTP trigger together. The
//! store handle is constructed once here and passed down explicitly.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use dopamina_report::api::{self, AppState};
use dopamina_report::auth::ServiceKeyVerifier;
use dopamina_report::config::Config;
use dopamina_report::database::{DatabaseManager, SqlReportStore};
use dopamina_report::logging;
use dopamina_report::services::report_service::WeeklyReportService;
use dopamina_report::services::scheduling_service::SchedulingService;
use dopamina_report::services::time_provider::SystemTimeProvider;
use dopamina_report::services::webhook::WebhookNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    logging::init_logging(&config.environment, &config.log_level);
    logging::log_startup();
    config.log_config();

    let database = DatabaseManager::new(&config.database_url).await?;
    database.migrate().await?;

    let store = Arc::new(SqlReportStore::new(database));
    let time_provider = Arc::new(SystemTimeProvider::new());
    let webhook = WebhookNotifier::new(config.webhook_url.as_deref())
        .context("invalid webhook URL")?;
    let report_service = Arc::new(WeeklyReportService::new(store, time_provider, webhook));

    let scheduling = SchedulingService::new();
    if config.schedule_enabled {
        scheduling.start().await?;
        scheduling
            .schedule_weekly_report(&config.schedule_cron, Arc::clone(&report_service))
            .await?;
    }

    let verifier = ServiceKeyVerifier::new(&config.service_key);
    tracing::info!(
        key_fingerprint = %verifier.fingerprint(),
        "trigger authentication enabled"
    );

    let state = Arc::new(AppState {
        report_service,
        verifier,
    });
    let app = api::create_router(state, &config);

    let addr = config.bind_address();
    tracing::info!(%addr, "weekly report service listening");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduling.stop().await?;
    tracing::info!("weekly report service stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to listen for shutdown signal");
    }
}
