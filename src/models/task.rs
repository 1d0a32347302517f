//! Completed task model
//!
//! Only the fields the aggregation needs. `completed_at` is set exactly once
//! by the board feature when a task reaches "done" and is never unset here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task whose completion timestamp falls inside the aggregation window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub completed_at: DateTime<Utc>,
    /// The user's up-front estimate in minutes, if one was declared.
    pub estimated_time_minutes: Option<i64>,
}
