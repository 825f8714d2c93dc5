//! almanac HTTP server.
//!
//! Serves workflow definition lookups and session time truncation over a
//! small JSON API.

pub mod config;
pub mod error;
pub mod routes;
pub mod service;
pub mod state;
pub mod types;

pub use config::ServerConfig;
pub use error::{ApiError, HttpError};
pub use routes::router;
pub use service::WorkflowService;
pub use state::AppState;
