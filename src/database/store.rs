//! Report store
//!
//! The seam between the aggregation run and the relational store: two bounded
//! range reads for the collection phase and the keyed upsert for the writer.
//! `SqlReportStore` is the production implementation; tests substitute an
//! in-memory fake. The handle is constructed once at startup and passed down
//! explicitly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::models::{CompletedTask, FocusSession, WeeklyReport};
use crate::services::report_window::ReportWindow;

use super::connection::DatabaseManager;

/// Errors surfaced by the store seam.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Invalid stored row: {0}")]
    InvalidRow(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Filtered reads and the keyed report upsert the aggregation run needs.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// All focus sessions with `created_at` inside the window, across users.
    async fn focus_sessions_in(&self, window: &ReportWindow)
        -> Result<Vec<FocusSession>, StoreError>;

    /// All tasks completed inside the window, across users.
    async fn tasks_completed_in(&self, window: &ReportWindow)
        -> Result<Vec<CompletedTask>, StoreError>;

    /// Insert or fully overwrite the row keyed on `(user_id, week_start_date)`.
    async fn upsert_weekly_report(&self, report: &WeeklyReport) -> Result<(), StoreError>;
}

#[derive(Debug, sqlx::FromRow)]
struct FocusSessionRow {
    id: String,
    task_id: String,
    user_id: String,
    duration_minutes: i64,
    created_at: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CompletedTaskRow {
    id: String,
    user_id: String,
    title: String,
    completed_at: i64,
    estimated_time_minutes: Option<i64>,
}

fn timestamp_to_utc(seconds: i64, column: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| StoreError::InvalidRow(format!("{column} out of range: {seconds}")))
}

/// SQLx-backed report store.
#[derive(Debug, Clone)]
pub struct SqlReportStore {
    database: DatabaseManager,
}

impl SqlReportStore {
    pub fn new(database: DatabaseManager) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ReportStore for SqlReportStore {
    async fn focus_sessions_in(
        &self,
        window: &ReportWindow,
    ) -> Result<Vec<FocusSession>, StoreError> {
        let rows = sqlx::query_as::<_, FocusSessionRow>(
            r#"
            SELECT id, task_id, user_id, duration_minutes, created_at
            FROM focus_sessions
            WHERE created_at >= ? AND created_at < ?
            "#,
        )
        .bind(window.start.timestamp())
        .bind(window.end.timestamp())
        .fetch_all(&self.database.pool)
        .await?;

        debug!(count = rows.len(), "fetched focus sessions in window");

        rows.into_iter()
            .map(|row| {
                Ok(FocusSession {
                    created_at: timestamp_to_utc(row.created_at, "focus_sessions.created_at")?,
                    id: row.id,
                    task_id: row.task_id,
                    user_id: row.user_id,
                    duration_minutes: row.duration_minutes,
                })
            })
            .collect()
    }

    async fn tasks_completed_in(
        &self,
        window: &ReportWindow,
    ) -> Result<Vec<CompletedTask>, StoreError> {
        let rows = sqlx::query_as::<_, CompletedTaskRow>(
            r#"
            SELECT id, user_id, title, completed_at, estimated_time_minutes
            FROM tasks
            WHERE completed_at IS NOT NULL AND completed_at >= ? AND completed_at < ?
            "#,
        )
        .bind(window.start.timestamp())
        .bind(window.end.timestamp())
        .fetch_all(&self.database.pool)
        .await?;

        debug!(count = rows.len(), "fetched completed tasks in window");

        rows.into_iter()
            .map(|row| {
                Ok(CompletedTask {
                    completed_at: timestamp_to_utc(row.completed_at, "tasks.completed_at")?,
                    id: row.id,
                    user_id: row.user_id,
                    title: row.title,
                    estimated_time_minutes: row.estimated_time_minutes,
                })
            })
            .collect()
    }

    async fn upsert_weekly_report(&self, report: &WeeklyReport) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO weekly_reports (
                user_id, week_start_date, total_focus_minutes,
                longest_task_title, longest_task_minutes, estimation_precision_percent
            )
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, week_start_date) DO UPDATE SET
                total_focus_minutes = excluded.total_focus_minutes,
                longest_task_title = excluded.longest_task_title,
                longest_task_minutes = excluded.longest_task_minutes,
                estimation_precision_percent = excluded.estimation_precision_percent
            "#,
        )
        .bind(report.user_id.clone())
        .bind(report.week_start_date.format("%Y-%m-%d").to_string())
        .bind(report.total_focus_minutes)
        .bind(report.longest_task_title.clone())
        .bind(report.longest_task_minutes)
        .bind(report.estimation_precision_percent)
        .execute(&self.database.pool)
        .await?;

        debug!(user_id = %report.user_id, week = %report.week_start_date, "weekly report upserted");
        Ok(())
    }
}
