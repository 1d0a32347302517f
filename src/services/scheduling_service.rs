//! Background scheduling for the weekly report job
//!
//! The nominal trigger is an external scheduler hitting the HTTP endpoint;
//! this service is the optional in-process alternative, firing the run on a
//! cron expression (Sunday night by default).

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{error, info};

use crate::services::report_service::WeeklyReportService;

/// Errors that can occur during scheduling operations
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("Failed to create job scheduler: {0}")]
    SchedulerCreation(#[from] JobSchedulerError),

    #[error("Invalid cron expression: {cron_expression}")]
    InvalidCronExpression { cron_expression: String },

    #[error("Scheduler not started")]
    SchedulerNotStarted,
}

/// Result type for scheduling operations
pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Service for managing the background weekly trigger
pub struct SchedulingService {
    scheduler: Mutex<Option<JobScheduler>>,
}

impl SchedulingService {
    pub fn new() -> Self {
        Self {
            scheduler: Mutex::new(None),
        }
    }

    /// Starts the scheduling service
    pub async fn start(&self) -> SchedulingResult<()> {
        let scheduler = JobScheduler::new().await?;
        scheduler.start().await?;
        *self.scheduler.lock().await = Some(scheduler);
        info!("Scheduling service started");
        Ok(())
    }

    /// Stops the scheduling service
    pub async fn stop(&self) -> SchedulingResult<()> {
        if let Some(mut scheduler) = self.scheduler.lock().await.take() {
            scheduler.shutdown().await?;
            info!("Scheduling service stopped");
        }
        Ok(())
    }

    /// Registers the weekly report job on `cron_expression`.
    pub async fn schedule_weekly_report(
        &self,
        cron_expression: &str,
        report_service: Arc<WeeklyReportService>,
    ) -> SchedulingResult<uuid::Uuid> {
        let guard = self.scheduler.lock().await;
        let scheduler = guard.as_ref().ok_or(SchedulingError::SchedulerNotStarted)?;

        let job = Job::new_async(cron_expression, move |_uuid, _l| {
            let report_service = Arc::clone(&report_service);
            Box::pin(async move {
                match report_service.run().await {
                    Ok(summary) => info!(
                        week_start = %summary.week_start_date,
                        users_processed = summary.users_processed,
                        users_failed = summary.failures.len(),
                        "scheduled weekly report run completed"
                    ),
                    Err(error) => {
                        error!(error = %error, "scheduled weekly report run failed");
                    }
                }
            })
        })
        .map_err(|_| SchedulingError::InvalidCronExpression {
            cron_expression: cron_expression.to_string(),
        })?;

        let job_id = scheduler.add(job).await?;
        info!(%job_id, cron = %cron_expression, "weekly report job scheduled");
        Ok(job_id)
    }
}

impl Default for SchedulingService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{ReportStore, StoreError};
    use crate::models::{CompletedTask, FocusSession, WeeklyReport};
    use crate::services::report_window::ReportWindow;
    use crate::services::time_provider::SystemTimeProvider;
    use crate::services::webhook::WebhookNotifier;
    use async_trait::async_trait;

    struct EmptyStore;

    #[async_trait]
    impl ReportStore for EmptyStore {
        async fn focus_sessions_in(
            &self,
            _window: &ReportWindow,
        ) -> Result<Vec<FocusSession>, StoreError> {
            Ok(vec![])
        }

        async fn tasks_completed_in(
            &self,
            _window: &ReportWindow,
        ) -> Result<Vec<CompletedTask>, StoreError> {
            Ok(vec![])
        }

        async fn upsert_weekly_report(&self, _report: &WeeklyReport) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn service() -> Arc<WeeklyReportService> {
        Arc::new(WeeklyReportService::new(
            Arc::new(EmptyStore),
            Arc::new(SystemTimeProvider::new()),
            WebhookNotifier::disabled(),
        ))
    }

    #[tokio::test]
    async fn test_schedule_requires_started_scheduler() {
        let scheduling = SchedulingService::new();
        let result = scheduling
            .schedule_weekly_report("0 0 23 * * Sun", service())
            .await;
        assert!(matches!(result, Err(SchedulingError::SchedulerNotStarted)));
    }

    #[tokio::test]
    async fn test_schedule_and_stop() {
        let scheduling = SchedulingService::new();
        scheduling.start().await.unwrap();
        scheduling
            .schedule_weekly_report("0 0 23 * * Sun", service())
            .await
            .unwrap();
        scheduling.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_cron_expression_is_rejected() {
        let scheduling = SchedulingService::new();
        scheduling.start().await.unwrap();
        let result = scheduling
            .schedule_weekly_report("definitely not cron", service())
            .await;
        assert!(matches!(
            result,
            Err(SchedulingError::InvalidCronExpression { .. })
        ));
        scheduling.stop().await.unwrap();
    }
}
