//! Loading an in-memory catalog from a JSON seed document.
//!
//! Revisions are uploaded in document order, so the last revision listed
//! for a repository becomes its latest.

use crate::definition::NewWorkflowDefinition;
use crate::error::{SeedError, StoreError};
use crate::store::InMemoryRepositoryStore;
use almanac_core::SiteId;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Top-level seed document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedDocument {
    /// Repositories to create.
    #[serde(default)]
    pub repositories: Vec<SeedRepository>,
}

/// A repository with its revision history.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRepository {
    /// Owning site; site `0` when omitted.
    #[serde(default)]
    pub site_id: Option<SiteId>,
    /// Repository name.
    pub name: String,
    /// Revisions, oldest first.
    #[serde(default)]
    pub revisions: Vec<SeedRevision>,
}

/// A revision and the workflows it defines.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRevision {
    /// Revision name.
    pub name: String,
    /// Workflow definitions of this revision.
    #[serde(default)]
    pub workflows: Vec<NewWorkflowDefinition>,
}

impl SeedDocument {
    /// Applies the document to a store.
    ///
    /// # Errors
    ///
    /// Returns an error if two entries collide on a name.
    pub fn apply(self, store: &InMemoryRepositoryStore) -> Result<(), StoreError> {
        for seed_repo in self.repositories {
            let site_id = seed_repo.site_id.unwrap_or(SiteId::new(0));
            let repository = store.create_repository(site_id, seed_repo.name)?;
            for seed_rev in seed_repo.revisions {
                let revision = store.create_revision(repository.id, seed_rev.name)?;
                for workflow in seed_rev.workflows {
                    store.create_workflow_definition(revision.id, workflow)?;
                }
            }
        }
        Ok(())
    }
}

impl InMemoryRepositoryStore {
    /// Builds a store from a seed document.
    ///
    /// # Errors
    ///
    /// Returns an error if two entries collide on a name.
    pub fn from_seed(seed: SeedDocument) -> Result<Self, StoreError> {
        let store = Self::new();
        seed.apply(&store)?;
        Ok(store)
    }

    /// Reads a JSON seed file and builds a store from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its
    /// entries collide.
    pub fn load_seed_file(path: &Path) -> almanac_core::Result<Self, SeedError> {
        let contents = std::fs::read_to_string(path).map_err(|e| SeedError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let seed: SeedDocument =
            serde_json::from_str(&contents).map_err(|e| SeedError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let repositories = seed.repositories.len();
        let store = Self::from_seed(seed).map_err(SeedError::Store)?;
        info!(path = %path.display(), repositories, "loaded seed catalog");
        Ok(store)
    }
}
