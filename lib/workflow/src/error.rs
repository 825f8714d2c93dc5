//! Error types for the workflow crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `StoreError`: Failures of the repository store itself
//! - `ResolveError`: Lookup failures reported to callers (wraps store failures)
//! - `SeedError`: Failures while loading a seed file into the in-memory store

use almanac_core::{RepositoryId, RevisionId};
use std::fmt;
use std::path::PathBuf;

/// Errors from repository store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not serve the request.
    Unavailable { reason: String },
    /// An entity with the same name already exists under the same parent.
    AlreadyExists { entity: Entity, name: String },
    /// The parent repository does not exist.
    RepositoryMissing { id: RepositoryId },
    /// The parent revision does not exist.
    RevisionMissing { id: RevisionId },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "repository store unavailable: {reason}"),
            Self::AlreadyExists { entity, name } => {
                write!(f, "{entity} '{name}' already exists")
            }
            Self::RepositoryMissing { id } => write!(f, "repository {id} does not exist"),
            Self::RevisionMissing { id } => write!(f, "revision {id} does not exist"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Kind of catalog entity, used to say which lookup missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// A repository.
    Repository,
    /// A revision of a repository.
    Revision,
    /// A workflow definition.
    Workflow,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repository => write!(f, "repository"),
            Self::Revision => write!(f, "revision"),
            Self::Workflow => write!(f, "workflow"),
        }
    }
}

/// Errors from definition lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A required lookup parameter was missing or empty.
    MissingParameter { parameter: &'static str },
    /// The named or numbered entity does not exist in the caller's site.
    NotFound { entity: Entity, key: String },
    /// The store failed.
    Store(StoreError),
}

impl ResolveError {
    pub(crate) fn not_found(entity: Entity, key: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter { parameter } => write!(f, "{parameter}= is required"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::Store(err) => write!(f, "lookup failed: {err}"),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ResolveError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Errors from loading a seed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    /// The file could not be read.
    Read { path: PathBuf, reason: String },
    /// The file is not a valid seed document.
    Parse { path: PathBuf, reason: String },
    /// The seed contents conflict with each other.
    Store(StoreError),
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, reason } => {
                write!(f, "failed to read seed file {}: {reason}", path.display())
            }
            Self::Parse { path, reason } => {
                write!(f, "invalid seed file {}: {reason}", path.display())
            }
            Self::Store(err) => write!(f, "failed to apply seed: {err}"),
        }
    }
}

impl std::error::Error for SeedError {}
