//! Schedule occurrence search for workflows.
//!
//! This crate provides:
//!
//! - **Scheduler**: the occurrence-search interface and a cron implementation
//! - **Scheduler Manager**: building a workflow's scheduler from its
//!   `_schedule` configuration

pub mod error;
pub mod manager;
pub mod schedule;

pub use error::ScheduleError;
pub use manager::{CronSchedulerManager, SchedulerManager};
pub use schedule::{CronScheduler, ScheduleTime, Scheduler};
