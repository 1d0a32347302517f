//! HTTP API for the weekly report service
//!
//! One privileged trigger route plus a liveness probe, wrapped in a
//! permissive CORS layer so scheduler pre-flight probes succeed.

pub mod reports;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::ServiceKeyVerifier;
use crate::config::Config;
use crate::services::report_service::WeeklyReportService;

/// Shared state handed to every handler.
pub struct AppState {
    pub report_service: Arc<WeeklyReportService>,
    pub verifier: ServiceKeyVerifier,
}

/// Build the application router.
pub fn create_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = cors_layer(config)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    Router::new()
        .route("/api/reports/weekly", post(reports::run_weekly_report))
        .route("/api/health", get(reports::health_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    }
}
