//! Reporting window calculation
//!
//! Derives the previous Monday–Sunday week as a half-open interval from the
//! invocation time. The boundary is anchored to "now minus day-of-week"
//! rather than any stored last-run marker, so a run on the Sunday/Monday
//! boundary still refers to the week being closed out, never a partial one.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// Half-open aggregation interval `[start, end)` plus the Monday that keys
/// every report row produced for this week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    /// Exclusive upper bound: midnight of the Monday after the aggregated
    /// Sunday.
    pub end: DateTime<Utc>,
    pub week_start_date: NaiveDate,
}

impl ReportWindow {
    /// Window for the week ending on the most recent Sunday at or before
    /// `now`. Pure date arithmetic, deterministic given `now`.
    pub fn preceding_week(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let days_from_sunday = i64::from(today.weekday().num_days_from_sunday());
        let last_sunday = today - Duration::days(days_from_sunday);
        let monday = last_sunday - Duration::days(6);
        let end_date = last_sunday + Duration::days(1);

        Self {
            start: Utc.from_utc_datetime(&monday.and_time(NaiveTime::MIN)),
            end: Utc.from_utc_datetime(&end_date.and_time(NaiveTime::MIN)),
            week_start_date: monday,
        }
    }

    /// True if `instant` falls inside the half-open interval.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Number of whole days the interval spans.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// ISO `YYYY-MM-DD` form of the week key.
    pub fn week_start_iso(&self) -> String {
        self.week_start_date.format("%Y-%m-%d").to_string()
    }
}
