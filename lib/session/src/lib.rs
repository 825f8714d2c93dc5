//! Session times for workflows.
//!
//! A session time is the canonical instant that identifies one run of a
//! workflow. This crate parses requested session times and normalizes them
//! with a [`TruncationMode`]: to the civil hour or day in the workflow's
//! timezone, or to an occurrence of the workflow's schedule.

pub mod civil;
pub mod error;
pub mod mode;
pub mod session_time;
pub mod truncate;

pub use error::TruncateError;
pub use mode::TruncationMode;
pub use session_time::RawSessionTime;
pub use truncate::truncate_session_time;
