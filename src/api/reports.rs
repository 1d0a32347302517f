//! Report trigger endpoints
//!
//! `POST /api/reports/weekly` runs one aggregation pass; the request body is
//! ignored. Callers authenticate with the privileged service key.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::Json,
};
use serde::Serialize;

use crate::error::AppError;
use crate::services::report_service::RunSummary;

use super::AppState;

/// Response body for a successful run.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub ok: bool,
    /// ISO date of the Monday anchoring the aggregated week.
    pub week_start_date: String,
    pub users_processed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_failed: Option<usize>,
}

impl From<RunSummary> for RunResponse {
    fn from(summary: RunSummary) -> Self {
        Self {
            ok: true,
            week_start_date: summary.week_start_date.format("%Y-%m-%d").to_string(),
            users_processed: summary.users_processed,
            users_failed: if summary.failures.is_empty() {
                None
            } else {
                Some(summary.failures.len())
            },
        }
    }
}

/// Trigger one weekly aggregation run.
pub async fn run_weekly_report(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RunResponse>, AppError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if !state.verifier.verify_bearer(authorization) {
        return Err(AppError::Unauthorized);
    }

    let summary = state.report_service.run().await?;
    Ok(Json(RunResponse::from(summary)))
}

/// Liveness probe.
pub async fn health_check() -> &'static str {
    "OK"
}
