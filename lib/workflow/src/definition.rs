//! Workflow catalog types.
//!
//! A repository holds an ordered history of revisions, and every revision
//! holds the workflow definitions that were uploaded with it. All of these
//! are immutable once stored: editing a workflow creates a new revision and
//! a new definition row.

use almanac_core::{RepositoryId, RevisionId, SiteId, WorkflowDefinitionId};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A named project container owned by one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Unique identifier.
    pub id: RepositoryId,
    /// The site (tenant) that owns this repository.
    pub site_id: SiteId,
    /// Name, unique within the site.
    pub name: String,
    /// When the repository was created.
    pub created_at: DateTime<Utc>,
}

/// An immutable snapshot of a repository's workflow definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Unique identifier. Later revisions have greater ids.
    pub id: RevisionId,
    /// The repository this revision belongs to.
    pub repository_id: RepositoryId,
    /// Name, unique within the repository (often a content hash).
    pub name: String,
    /// When the revision was uploaded.
    pub created_at: DateTime<Utc>,
}

/// Recurrence configuration of a workflow (`_schedule`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Cron expression with a leading seconds field, e.g. `0 0 9 * * *`.
    pub cron: String,
    /// Seconds between a session time and the moment the session is run.
    #[serde(default)]
    pub delay: i64,
}

impl ScheduleConfig {
    /// Creates a schedule with no run delay.
    #[must_use]
    pub fn new(cron: impl Into<String>) -> Self {
        Self {
            cron: cron.into(),
            delay: 0,
        }
    }

    /// Sets the run delay in seconds.
    #[must_use]
    pub fn with_delay(mut self, delay: i64) -> Self {
        self.delay = delay;
        self
    }
}

/// A workflow definition as stored in one revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Unique identifier.
    pub id: WorkflowDefinitionId,
    /// The revision this definition belongs to.
    pub revision_id: RevisionId,
    /// Name, unique within the revision.
    pub name: String,
    /// Timezone in which session times of this workflow are interpreted.
    pub timezone: Tz,
    /// Recurrence configuration, if the workflow is scheduled.
    pub schedule: Option<ScheduleConfig>,
    /// Remaining workflow configuration, kept verbatim.
    pub config: serde_json::Value,
}

impl WorkflowDefinition {
    /// Returns the schedule configuration, if any.
    #[must_use]
    pub fn schedule(&self) -> Option<&ScheduleConfig> {
        self.schedule.as_ref()
    }
}

/// Fields of a workflow definition that is about to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkflowDefinition {
    /// Workflow name.
    pub name: String,
    /// IANA timezone.
    pub timezone: Tz,
    /// Recurrence configuration.
    #[serde(default)]
    pub schedule: Option<ScheduleConfig>,
    /// Remaining configuration.
    #[serde(default)]
    pub config: serde_json::Value,
}

impl NewWorkflowDefinition {
    /// Creates an unscheduled definition with empty configuration.
    #[must_use]
    pub fn new(name: impl Into<String>, timezone: Tz) -> Self {
        Self {
            name: name.into(),
            timezone,
            schedule: None,
            config: serde_json::json!({}),
        }
    }

    /// Sets the schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: ScheduleConfig) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = config;
        self
    }
}

/// A workflow definition together with the repository and revision it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinitionWithRepository {
    /// Owning repository.
    pub repository: Repository,
    /// Owning revision.
    pub revision: Revision,
    /// The definition itself.
    pub definition: WorkflowDefinition,
}

impl WorkflowDefinitionWithRepository {
    /// Returns the definition id.
    #[must_use]
    pub fn id(&self) -> WorkflowDefinitionId {
        self.definition.id
    }

    /// Returns the workflow name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Returns the workflow timezone.
    #[must_use]
    pub fn time_zone(&self) -> Tz {
        self.definition.timezone
    }

    /// Returns the site that owns this definition.
    #[must_use]
    pub fn site_id(&self) -> SiteId {
        self.repository.site_id
    }
}
