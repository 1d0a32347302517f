//! Shared fixtures for integration tests
//!
//! An in-memory `ReportStore` fake with switchable failure modes, plus
//! helpers that build window-scoped activity for the fixed test week
//! (Monday 2024-06-03 .. Monday 2024-06-10, invoked Wednesday 2024-06-12).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use dopamina_report::database::{ReportStore, StoreError};
use dopamina_report::models::{CompletedTask, FocusSession, WeeklyReport};
use dopamina_report::services::report_window::ReportWindow;

/// Wednesday after the aggregated week; the run clock in every test.
pub fn invocation_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 12, 12, 0, 0).single().unwrap()
}

/// An instant inside the aggregated week.
pub fn in_window(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).single().unwrap()
}

pub fn session(user_id: &str, task_id: &str, minutes: i64, created_at: DateTime<Utc>) -> FocusSession {
    FocusSession {
        id: format!("s-{user_id}-{task_id}-{minutes}"),
        task_id: task_id.to_string(),
        user_id: user_id.to_string(),
        duration_minutes: minutes,
        created_at,
    }
}

pub fn completed_task(
    user_id: &str,
    task_id: &str,
    title: &str,
    estimated: Option<i64>,
    completed_at: DateTime<Utc>,
) -> CompletedTask {
    CompletedTask {
        id: task_id.to_string(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        completed_at,
        estimated_time_minutes: estimated,
    }
}

/// In-memory store fake. Reads apply the window filter the way the SQL
/// implementation does; writes land in `reports` keyed like the unique index.
#[derive(Default)]
pub struct FakeStore {
    pub sessions: Mutex<Vec<FocusSession>>,
    pub tasks: Mutex<Vec<CompletedTask>>,
    pub reports: Mutex<HashMap<(String, String), WeeklyReport>>,
    pub fail_reads: AtomicBool,
    pub fail_upsert_for: Mutex<Option<String>>,
}

impl FakeStore {
    pub fn with_activity(sessions: Vec<FocusSession>, tasks: Vec<CompletedTask>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            tasks: Mutex::new(tasks),
            ..Self::default()
        }
    }

    pub fn report_for(&self, user_id: &str, week: &str) -> Option<WeeklyReport> {
        self.reports
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), week.to_string()))
            .cloned()
    }

    pub fn report_count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

#[async_trait]
impl ReportStore for FakeStore {
    async fn focus_sessions_in(
        &self,
        window: &ReportWindow,
    ) -> Result<Vec<FocusSession>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("focus_sessions read failed".to_string()));
        }
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| window.contains(s.created_at))
            .cloned()
            .collect())
    }

    async fn tasks_completed_in(
        &self,
        window: &ReportWindow,
    ) -> Result<Vec<CompletedTask>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("tasks read failed".to_string()));
        }
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| window.contains(t.completed_at))
            .cloned()
            .collect())
    }

    async fn upsert_weekly_report(&self, report: &WeeklyReport) -> Result<(), StoreError> {
        if self.fail_upsert_for.lock().unwrap().as_deref() == Some(report.user_id.as_str()) {
            return Err(StoreError::Unavailable(format!(
                "upsert rejected for {}",
                report.user_id
            )));
        }
        self.reports.lock().unwrap().insert(
            (
                report.user_id.clone(),
                report.week_start_date.format("%Y-%m-%d").to_string(),
            ),
            report.clone(),
        );
        Ok(())
    }
}
