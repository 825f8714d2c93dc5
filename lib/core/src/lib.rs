//! Core identifiers and error handling for almanac.
//!
//! This crate provides the foundational types shared by the workflow
//! catalog, the scheduler adapters, and the session-time engine.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ParseIdError, RepositoryId, RevisionId, SiteId, WorkflowDefinitionId};
