//! Focus session model
//!
//! A focus session is one timed interval a user spent concentrating on a
//! single task. Sessions are written by the focus-timer feature and are
//! immutable once recorded; this service only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded focus session, scoped to one task and one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: String,
    pub task_id: String,
    pub user_id: String,
    /// Duration in whole minutes, never negative.
    pub duration_minutes: i64,
    pub created_at: DateTime<Utc>,
}
