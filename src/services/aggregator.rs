//! Per-user weekly aggregation
//!
//! Pure computation over one user's in-window focus sessions and completed
//! tasks. All store access happens before this layer, so everything here is
//! deterministic and directly testable.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{CompletedTask, FocusSession, WeeklyReport};

/// Estimation precision score in `[0, 100]`.
///
/// 100 means the estimate matched the focused time exactly; 0 means the
/// relative error reached or exceeded 100%. The `max(.., 1)` denominator
/// guards the `estimated == actual == 0` case.
pub fn precision_score(estimated: i64, actual: i64) -> i64 {
    let max = estimated.max(actual).max(1) as f64;
    let error = (actual - estimated).abs() as f64 / max;
    (100.0 * (1.0 - error.min(1.0))).round() as i64
}

/// Aggregate one user's window activity into a report row.
///
/// `sessions` and `completed` must already be scoped to this user and the
/// window. The longest task is the completed task with the greatest strictly
/// positive focused minutes; ties are broken by `(completed_at, id)` order,
/// so the result is independent of retrieval order.
pub fn aggregate_user(
    user_id: &str,
    week_start_date: NaiveDate,
    sessions: &[FocusSession],
    completed: &[CompletedTask],
) -> WeeklyReport {
    let total_focus_minutes: i64 = sessions.iter().map(|s| s.duration_minutes.max(0)).sum();

    let mut minutes_by_task: HashMap<&str, i64> = HashMap::new();
    for session in sessions {
        *minutes_by_task.entry(session.task_id.as_str()).or_insert(0) +=
            session.duration_minutes.max(0);
    }

    let mut ordered: Vec<&CompletedTask> = completed.iter().collect();
    ordered.sort_by(|a, b| (a.completed_at, &a.id).cmp(&(b.completed_at, &b.id)));

    let mut longest: Option<(&CompletedTask, i64)> = None;
    for &task in &ordered {
        let minutes = minutes_by_task.get(task.id.as_str()).copied().unwrap_or(0);
        if minutes > 0 && longest.map_or(true, |(_, best)| minutes > best) {
            longest = Some((task, minutes));
        }
    }

    let scores: Vec<i64> = ordered
        .iter()
        .filter_map(|task| {
            let minutes = minutes_by_task.get(task.id.as_str()).copied().unwrap_or(0);
            match task.estimated_time_minutes {
                Some(estimated) if minutes > 0 => Some(precision_score(estimated, minutes)),
                _ => None,
            }
        })
        .collect();

    let estimation_precision_percent = if scores.is_empty() {
        None
    } else {
        Some((scores.iter().sum::<i64>() as f64 / scores.len() as f64).round() as i64)
    };

    WeeklyReport {
        user_id: user_id.to_string(),
        week_start_date,
        total_focus_minutes,
        longest_task_title: longest.map(|(task, _)| task.title.clone()),
        longest_task_minutes: longest.map(|(_, minutes)| minutes),
        estimation_precision_percent,
    }
}
