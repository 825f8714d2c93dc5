//! Definition resolver.
//!
//! Resolves a workflow definition either by repository name, optional
//! revision name and workflow name, or by numeric id. Lookups are always
//! scoped to the caller's site.

use crate::definition::WorkflowDefinitionWithRepository;
use crate::error::{Entity, ResolveError};
use crate::store::RepositoryStore;
use almanac_core::{SiteId, WorkflowDefinitionId};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Resolves workflow definitions through a [`RepositoryStore`].
#[derive(Clone)]
pub struct DefinitionResolver {
    store: Arc<dyn RepositoryStore>,
}

impl DefinitionResolver {
    /// Creates a resolver over a store.
    pub fn new(store: Arc<dyn RepositoryStore>) -> Self {
        Self { store }
    }

    /// Looks up a workflow definition by name.
    ///
    /// Without a revision name the repository's latest revision is used; an
    /// empty revision name counts as absent.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MissingParameter`] if the repository or workflow name
    ///   is missing or empty.
    /// - [`ResolveError::NotFound`] naming the repository, revision or
    ///   workflow that does not exist.
    /// - [`ResolveError::Store`] if the store fails.
    #[instrument(skip(self))]
    pub async fn lookup_by_name(
        &self,
        site_id: SiteId,
        repository_name: Option<&str>,
        revision_name: Option<&str>,
        workflow_name: Option<&str>,
    ) -> Result<WorkflowDefinitionWithRepository, ResolveError> {
        let repository_name = required(repository_name, "repository")?;
        let workflow_name = required(workflow_name, "name")?;
        let revision_name = revision_name.filter(|name| !name.is_empty());

        let repository = self
            .store
            .repository_by_name(site_id, repository_name)
            .await?
            .ok_or_else(|| ResolveError::not_found(Entity::Repository, repository_name))?;

        let revision = match revision_name {
            None => self
                .store
                .latest_revision(repository.id)
                .await?
                .ok_or_else(|| {
                    ResolveError::not_found(
                        Entity::Revision,
                        format!("latest revision of {repository_name}"),
                    )
                })?,
            Some(name) => self
                .store
                .revision_by_name(repository.id, name)
                .await?
                .ok_or_else(|| ResolveError::not_found(Entity::Revision, name))?,
        };
        debug!(revision_id = %revision.id, revision = %revision.name, "resolved revision");

        let definition = self
            .store
            .workflow_definition_by_name(revision.id, workflow_name)
            .await?
            .ok_or_else(|| ResolveError::not_found(Entity::Workflow, workflow_name))?;
        debug!(workflow_id = %definition.id, "resolved workflow definition");

        Ok(WorkflowDefinitionWithRepository {
            repository,
            revision,
            definition,
        })
    }

    /// Looks up a workflow definition by id.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NotFound`] if no definition with this id is visible
    ///   to the site, including definitions owned by other sites.
    /// - [`ResolveError::Store`] if the store fails.
    #[instrument(skip(self))]
    pub async fn lookup_by_id(
        &self,
        site_id: SiteId,
        workflow_id: WorkflowDefinitionId,
    ) -> Result<WorkflowDefinitionWithRepository, ResolveError> {
        let found = self
            .store
            .workflow_definition_by_id(site_id, workflow_id)
            .await?
            .ok_or_else(|| ResolveError::not_found(Entity::Workflow, workflow_id))?;

        // Stores are trusted to scope by site, but a definition from another
        // site must never leave the resolver.
        if found.site_id() != site_id {
            return Err(ResolveError::not_found(Entity::Workflow, workflow_id));
        }
        Ok(found)
    }
}

fn required<'a>(value: Option<&'a str>, parameter: &'static str) -> Result<&'a str, ResolveError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ResolveError::MissingParameter { parameter }),
    }
}
