//! Workflow catalog for almanac.
//!
//! This crate provides:
//!
//! - **Catalog model**: repositories, their revision history and the
//!   workflow definitions uploaded with each revision
//! - **Store**: the [`RepositoryStore`] read interface and an in-memory
//!   implementation that can be seeded from JSON
//! - **Resolver**: site-scoped lookup of a definition by name or by id

pub mod definition;
pub mod error;
pub mod resolver;
pub mod seed;
pub mod store;

pub use definition::{
    NewWorkflowDefinition, Repository, Revision, ScheduleConfig, WorkflowDefinition,
    WorkflowDefinitionWithRepository,
};
pub use error::{Entity, ResolveError, SeedError, StoreError};
pub use resolver::DefinitionResolver;
pub use seed::{SeedDocument, SeedRepository, SeedRevision};
pub use store::{InMemoryRepositoryStore, RepositoryStore};
