//! Repository store abstraction and an in-memory implementation.
//!
//! The store is the only way the catalog reaches persisted repositories,
//! revisions and workflow definitions. Every method is a point read; a miss
//! is `Ok(None)`, and `Err` is reserved for failures of the store itself.

use crate::definition::{
    NewWorkflowDefinition, Repository, Revision, WorkflowDefinition,
    WorkflowDefinitionWithRepository,
};
use crate::error::{Entity, StoreError};
use almanac_core::{RepositoryId, RevisionId, SiteId, WorkflowDefinitionId};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Read access to stored repositories, revisions and workflow definitions.
#[async_trait]
pub trait RepositoryStore: Send + Sync {
    /// Finds a repository by name within a site.
    async fn repository_by_name(
        &self,
        site_id: SiteId,
        name: &str,
    ) -> Result<Option<Repository>, StoreError>;

    /// Finds the most recently uploaded revision of a repository.
    async fn latest_revision(
        &self,
        repository_id: RepositoryId,
    ) -> Result<Option<Revision>, StoreError>;

    /// Finds a revision of a repository by name.
    async fn revision_by_name(
        &self,
        repository_id: RepositoryId,
        name: &str,
    ) -> Result<Option<Revision>, StoreError>;

    /// Finds a workflow definition by name within a revision.
    async fn workflow_definition_by_name(
        &self,
        revision_id: RevisionId,
        name: &str,
    ) -> Result<Option<WorkflowDefinition>, StoreError>;

    /// Finds a workflow definition by id, visible only to its owning site.
    async fn workflow_definition_by_id(
        &self,
        site_id: SiteId,
        id: WorkflowDefinitionId,
    ) -> Result<Option<WorkflowDefinitionWithRepository>, StoreError>;
}

#[derive(Debug, Default)]
struct Catalog {
    repositories: BTreeMap<RepositoryId, Repository>,
    revisions: BTreeMap<RevisionId, Revision>,
    definitions: BTreeMap<WorkflowDefinitionId, WorkflowDefinition>,
}

/// A repository store held entirely in memory.
///
/// Ids are assigned sequentially starting at 1, so the revision with the
/// greatest id of a repository is its latest.
#[derive(Debug, Default)]
pub struct InMemoryRepositoryStore {
    catalog: RwLock<Catalog>,
}

impl InMemoryRepositoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Catalog>, StoreError> {
        self.catalog.read().map_err(|_| StoreError::Unavailable {
            reason: "catalog lock poisoned".to_string(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Catalog>, StoreError> {
        self.catalog.write().map_err(|_| StoreError::Unavailable {
            reason: "catalog lock poisoned".to_string(),
        })
    }

    /// Creates a repository in a site.
    ///
    /// # Errors
    ///
    /// Returns an error if the site already has a repository with this name.
    pub fn create_repository(
        &self,
        site_id: SiteId,
        name: impl Into<String>,
    ) -> Result<Repository, StoreError> {
        let name = name.into();
        let mut catalog = self.write()?;

        if catalog
            .repositories
            .values()
            .any(|r| r.site_id == site_id && r.name == name)
        {
            return Err(StoreError::AlreadyExists {
                entity: Entity::Repository,
                name,
            });
        }

        let id = RepositoryId::new(next_id(catalog.repositories.keys().map(|k| k.get())));
        let repository = Repository {
            id,
            site_id,
            name,
            created_at: Utc::now(),
        };
        catalog.repositories.insert(id, repository.clone());
        debug!(repository_id = %id, %site_id, "created repository");
        Ok(repository)
    }

    /// Uploads a new revision of a repository. It becomes the latest revision.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository does not exist or already has a
    /// revision with this name.
    pub fn create_revision(
        &self,
        repository_id: RepositoryId,
        name: impl Into<String>,
    ) -> Result<Revision, StoreError> {
        let name = name.into();
        let mut catalog = self.write()?;

        if !catalog.repositories.contains_key(&repository_id) {
            return Err(StoreError::RepositoryMissing { id: repository_id });
        }
        if catalog
            .revisions
            .values()
            .any(|r| r.repository_id == repository_id && r.name == name)
        {
            return Err(StoreError::AlreadyExists {
                entity: Entity::Revision,
                name,
            });
        }

        let id = RevisionId::new(next_id(catalog.revisions.keys().map(|k| k.get())));
        let revision = Revision {
            id,
            repository_id,
            name,
            created_at: Utc::now(),
        };
        catalog.revisions.insert(id, revision.clone());
        debug!(revision_id = %id, %repository_id, "created revision");
        Ok(revision)
    }

    /// Stores a workflow definition in a revision.
    ///
    /// # Errors
    ///
    /// Returns an error if the revision does not exist or already defines a
    /// workflow with this name.
    pub fn create_workflow_definition(
        &self,
        revision_id: RevisionId,
        new: NewWorkflowDefinition,
    ) -> Result<WorkflowDefinition, StoreError> {
        let mut catalog = self.write()?;

        if !catalog.revisions.contains_key(&revision_id) {
            return Err(StoreError::RevisionMissing { id: revision_id });
        }
        if catalog
            .definitions
            .values()
            .any(|d| d.revision_id == revision_id && d.name == new.name)
        {
            return Err(StoreError::AlreadyExists {
                entity: Entity::Workflow,
                name: new.name,
            });
        }

        let id = WorkflowDefinitionId::new(next_id(catalog.definitions.keys().map(|k| k.get())));
        let definition = WorkflowDefinition {
            id,
            revision_id,
            name: new.name,
            timezone: new.timezone,
            schedule: new.schedule,
            config: new.config,
        };
        catalog.definitions.insert(id, definition.clone());
        debug!(workflow_id = %id, %revision_id, "created workflow definition");
        Ok(definition)
    }
}

fn next_id<T>(existing: impl DoubleEndedIterator<Item = T>) -> T
where
    T: std::ops::Add<Output = T> + From<u8>,
{
    // BTreeMap keys iterate in ascending order.
    match existing.rev().next() {
        Some(max) => max + T::from(1),
        None => T::from(1),
    }
}

#[async_trait]
impl RepositoryStore for InMemoryRepositoryStore {
    async fn repository_by_name(
        &self,
        site_id: SiteId,
        name: &str,
    ) -> Result<Option<Repository>, StoreError> {
        let catalog = self.read()?;
        Ok(catalog
            .repositories
            .values()
            .find(|r| r.site_id == site_id && r.name == name)
            .cloned())
    }

    async fn latest_revision(
        &self,
        repository_id: RepositoryId,
    ) -> Result<Option<Revision>, StoreError> {
        let catalog = self.read()?;
        Ok(catalog
            .revisions
            .values()
            .rev()
            .find(|r| r.repository_id == repository_id)
            .cloned())
    }

    async fn revision_by_name(
        &self,
        repository_id: RepositoryId,
        name: &str,
    ) -> Result<Option<Revision>, StoreError> {
        let catalog = self.read()?;
        Ok(catalog
            .revisions
            .values()
            .find(|r| r.repository_id == repository_id && r.name == name)
            .cloned())
    }

    async fn workflow_definition_by_name(
        &self,
        revision_id: RevisionId,
        name: &str,
    ) -> Result<Option<WorkflowDefinition>, StoreError> {
        let catalog = self.read()?;
        Ok(catalog
            .definitions
            .values()
            .find(|d| d.revision_id == revision_id && d.name == name)
            .cloned())
    }

    async fn workflow_definition_by_id(
        &self,
        site_id: SiteId,
        id: WorkflowDefinitionId,
    ) -> Result<Option<WorkflowDefinitionWithRepository>, StoreError> {
        let catalog = self.read()?;

        let Some(definition) = catalog.definitions.get(&id) else {
            return Ok(None);
        };
        let Some(revision) = catalog.revisions.get(&definition.revision_id) else {
            return Ok(None);
        };
        let Some(repository) = catalog.repositories.get(&revision.repository_id) else {
            return Ok(None);
        };
        if repository.site_id != site_id {
            return Ok(None);
        }

        Ok(Some(WorkflowDefinitionWithRepository {
            repository: repository.clone(),
            revision: revision.clone(),
            definition: definition.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Tokyo;

    #[tokio::test]
    async fn latest_revision_is_the_last_uploaded() {
        let store = InMemoryRepositoryStore::new();
        let repo = store.create_repository(SiteId::new(0), "sales").expect("repo");
        store.create_revision(repo.id, "rev1").expect("rev1");
        let rev2 = store.create_revision(repo.id, "rev2").expect("rev2");

        let latest = store
            .latest_revision(repo.id)
            .await
            .expect("read")
            .expect("has revisions");
        assert_eq!(latest.id, rev2.id);
        assert_eq!(latest.name, "rev2");
    }

    #[tokio::test]
    async fn latest_revision_ignores_other_repositories() {
        let store = InMemoryRepositoryStore::new();
        let sales = store.create_repository(SiteId::new(0), "sales").expect("repo");
        let ops = store.create_repository(SiteId::new(0), "ops").expect("repo");
        let sales_rev = store.create_revision(sales.id, "a").expect("rev");
        store.create_revision(ops.id, "b").expect("rev");

        let latest = store.latest_revision(sales.id).await.expect("read");
        assert_eq!(latest.map(|r| r.id), Some(sales_rev.id));
    }

    #[tokio::test]
    async fn repository_without_revisions_has_no_latest() {
        let store = InMemoryRepositoryStore::new();
        let repo = store.create_repository(SiteId::new(0), "empty").expect("repo");
        assert!(store.latest_revision(repo.id).await.expect("read").is_none());
    }

    #[tokio::test]
    async fn repository_names_are_scoped_to_site() {
        let store = InMemoryRepositoryStore::new();
        store.create_repository(SiteId::new(1), "sales").expect("site 1");
        store.create_repository(SiteId::new(2), "sales").expect("site 2");

        let found = store
            .repository_by_name(SiteId::new(2), "sales")
            .await
            .expect("read")
            .expect("exists");
        assert_eq!(found.site_id, SiteId::new(2));
        assert!(
            store
                .repository_by_name(SiteId::new(3), "sales")
                .await
                .expect("read")
                .is_none()
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let store = InMemoryRepositoryStore::new();
        let repo = store.create_repository(SiteId::new(0), "sales").expect("repo");
        let rev = store.create_revision(repo.id, "rev1").expect("rev");
        store
            .create_workflow_definition(rev.id, NewWorkflowDefinition::new("wf", Tokyo))
            .expect("wf");

        assert!(matches!(
            store.create_repository(SiteId::new(0), "sales"),
            Err(StoreError::AlreadyExists {
                entity: Entity::Repository,
                ..
            })
        ));
        assert!(matches!(
            store.create_revision(repo.id, "rev1"),
            Err(StoreError::AlreadyExists {
                entity: Entity::Revision,
                ..
            })
        ));
        assert!(matches!(
            store.create_workflow_definition(rev.id, NewWorkflowDefinition::new("wf", Tokyo)),
            Err(StoreError::AlreadyExists {
                entity: Entity::Workflow,
                ..
            })
        ));
    }

    #[test]
    fn missing_parents_are_rejected() {
        let store = InMemoryRepositoryStore::new();
        assert_eq!(
            store.create_revision(RepositoryId::new(7), "rev1"),
            Err(StoreError::RepositoryMissing {
                id: RepositoryId::new(7)
            })
        );
        assert_eq!(
            store.create_workflow_definition(
                RevisionId::new(7),
                NewWorkflowDefinition::new("wf", Tokyo)
            ),
            Err(StoreError::RevisionMissing {
                id: RevisionId::new(7)
            })
        );
    }

    #[tokio::test]
    async fn definition_by_id_is_site_scoped() {
        let store = InMemoryRepositoryStore::new();
        let repo = store.create_repository(SiteId::new(1), "sales").expect("repo");
        let rev = store.create_revision(repo.id, "rev1").expect("rev");
        let def = store
            .create_workflow_definition(rev.id, NewWorkflowDefinition::new("wf", Tokyo))
            .expect("wf");

        let own = store
            .workflow_definition_by_id(SiteId::new(1), def.id)
            .await
            .expect("read")
            .expect("visible to owner");
        assert_eq!(own.repository.id, repo.id);
        assert_eq!(own.revision.id, rev.id);

        let other = store
            .workflow_definition_by_id(SiteId::new(2), def.id)
            .await
            .expect("read");
        assert!(other.is_none());
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let store = InMemoryRepositoryStore::new();
        let a = store.create_repository(SiteId::new(0), "a").expect("a");
        let b = store.create_repository(SiteId::new(0), "b").expect("b");
        assert_eq!(a.id.get(), 1);
        assert_eq!(b.id.get(), 2);
    }
}
