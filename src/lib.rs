//! Weekly focus report aggregation for the Dopamina kanban app
//!
//! A single-purpose batch service: once a week it scans the previous
//! Monday–Sunday window, aggregates each user's focus sessions and completed
//! tasks, and upserts one `weekly_reports` row per `(user_id, week_start_date)`.
//! The run is triggered over HTTP (nominally by an external scheduler) or by
//! the optional built-in cron job.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
