//! Services module for the weekly report service
//!
//! Contains the business logic: window derivation, per-user aggregation, run
//! orchestration, and the supporting scheduling/webhook/time plumbing.

pub mod aggregator;
pub mod report_service;
pub mod report_window;
pub mod scheduling_service;
pub mod time_provider;
pub mod webhook;

// Re-export commonly used services
pub use report_service::{RunSummary, UserFailure, WeeklyReportService};
pub use report_window::ReportWindow;
pub use scheduling_service::{SchedulingError, SchedulingService};
pub use time_provider::{MockTimeProvider, SystemTimeProvider, TimeProvider};
pub use webhook::WebhookNotifier;
