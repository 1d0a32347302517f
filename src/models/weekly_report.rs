//! Weekly report model and its validation logic
//!
//! One row per `(user_id, week_start_date)`. Rows are created or fully
//! overwritten by each aggregation run; never merged, never deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One user's aggregate for one Monday-anchored week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub user_id: String,
    /// The Monday anchoring the Monday–Sunday window; part of the row key.
    pub week_start_date: NaiveDate,
    pub total_focus_minutes: i64,
    pub longest_task_title: Option<String>,
    pub longest_task_minutes: Option<i64>,
    /// Mean estimation-precision score in `[0, 100]`, if any completed task
    /// in the window had both an estimate and positive focused minutes.
    pub estimation_precision_percent: Option<i64>,
}

/// Violations of the report row invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeeklyReportError {
    #[error("total_focus_minutes is negative: {0}")]
    NegativeTotal(i64),

    #[error("longest-task fields must be both set or both null")]
    LongestTaskMismatch,

    #[error("longest_task_minutes must be positive: {0}")]
    NonPositiveLongest(i64),

    #[error("estimation_precision_percent out of range: {0}")]
    PrecisionOutOfRange(i64),
}

impl WeeklyReport {
    /// Check the row invariants before it is written.
    pub fn validate(&self) -> Result<(), WeeklyReportError> {
        if self.total_focus_minutes < 0 {
            return Err(WeeklyReportError::NegativeTotal(self.total_focus_minutes));
        }

        match (&self.longest_task_title, self.longest_task_minutes) {
            (None, None) => {}
            (Some(_), Some(minutes)) => {
                if minutes <= 0 {
                    return Err(WeeklyReportError::NonPositiveLongest(minutes));
                }
            }
            _ => return Err(WeeklyReportError::LongestTaskMismatch),
        }

        if let Some(percent) = self.estimation_precision_percent {
            if !(0..=100).contains(&percent) {
                return Err(WeeklyReportError::PrecisionOutOfRange(percent));
            }
        }

        Ok(())
    }
}
