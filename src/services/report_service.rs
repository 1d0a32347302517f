//! Weekly report run orchestration
//!
//! One run: derive the window, bulk-read both activity sets (fatal phase),
//! fan out per user, upsert one row per user. A failure while processing one
//! user is recorded and skipped so the remaining users still get their rows;
//! a failure during collection aborts the run before any write.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::database::ReportStore;
use crate::error::AppResult;
use crate::models::{CompletedTask, FocusSession};
use crate::services::aggregator::aggregate_user;
use crate::services::report_window::ReportWindow;
use crate::services::time_provider::TimeProvider;
use crate::services::webhook::WebhookNotifier;

/// Outcome of one aggregation run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub week_start_date: NaiveDate,
    /// Users whose report row was written this run.
    pub users_processed: usize,
    /// Users skipped because their aggregate or write failed.
    pub failures: Vec<UserFailure>,
}

/// One skipped user and the reason.
#[derive(Debug, Clone, Serialize)]
pub struct UserFailure {
    pub user_id: String,
    pub error: String,
}

/// Orchestrates the weekly aggregation over an injected store and clock.
pub struct WeeklyReportService {
    store: Arc<dyn ReportStore>,
    time_provider: Arc<dyn TimeProvider>,
    webhook: WebhookNotifier,
}

impl WeeklyReportService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        time_provider: Arc<dyn TimeProvider>,
        webhook: WebhookNotifier,
    ) -> Self {
        Self {
            store,
            time_provider,
            webhook,
        }
    }

    /// Execute one aggregation run over the previous Monday–Sunday week.
    #[instrument(skip(self))]
    pub async fn run(&self) -> AppResult<RunSummary> {
        let run_id = Uuid::new_v4();
        let window = ReportWindow::preceding_week(self.time_provider.now_utc());
        info!(
            %run_id,
            week_start = %window.week_start_iso(),
            "weekly report run started"
        );

        // Fatal phase: both bulk reads must succeed before any write happens.
        let sessions = self.store.focus_sessions_in(&window).await?;
        let completed = self.store.tasks_completed_in(&window).await?;

        let mut sessions_by_user: BTreeMap<String, Vec<FocusSession>> = BTreeMap::new();
        for session in sessions {
            sessions_by_user
                .entry(session.user_id.clone())
                .or_default()
                .push(session);
        }

        let mut completed_by_user: BTreeMap<String, Vec<CompletedTask>> = BTreeMap::new();
        for task in completed {
            completed_by_user
                .entry(task.user_id.clone())
                .or_default()
                .push(task);
        }

        // Users who only completed tasks still get a report with zero focus.
        let mut user_ids: BTreeSet<String> = sessions_by_user.keys().cloned().collect();
        user_ids.extend(completed_by_user.keys().cloned());

        let mut users_processed = 0;
        let mut failures = Vec::new();
        for user_id in &user_ids {
            let sessions = sessions_by_user
                .get(user_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let completed = completed_by_user
                .get(user_id)
                .map(Vec::as_slice)
                .unwrap_or_default();

            match self.process_user(user_id, &window, sessions, completed).await {
                Ok(()) => users_processed += 1,
                Err(error) => {
                    warn!(%run_id, user_id = %user_id, error = %error, "user skipped");
                    failures.push(UserFailure {
                        user_id: user_id.clone(),
                        error: error.to_string(),
                    });
                }
            }
        }

        let summary = RunSummary {
            run_id,
            week_start_date: window.week_start_date,
            users_processed,
            failures,
        };

        info!(
            %run_id,
            users_processed = summary.users_processed,
            users_failed = summary.failures.len(),
            "weekly report run finished"
        );

        self.webhook.notify(&summary).await;

        Ok(summary)
    }

    async fn process_user(
        &self,
        user_id: &str,
        window: &ReportWindow,
        sessions: &[FocusSession],
        completed: &[CompletedTask],
    ) -> AppResult<()> {
        let report = aggregate_user(user_id, window.week_start_date, sessions, completed);
        report.validate()?;
        self.store.upsert_weekly_report(&report).await?;
        Ok(())
    }
}
