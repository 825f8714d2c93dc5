//! Response views returned by the workflow API.

use almanac_core::{RepositoryId, WorkflowDefinitionId};
use almanac_workflow::{ScheduleConfig, WorkflowDefinitionWithRepository};
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;

/// The repository a workflow belongs to, shown as its project.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RestProject {
    pub id: RepositoryId,
    pub name: String,
}

/// A workflow definition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RestWorkflowDefinition {
    pub id: WorkflowDefinitionId,
    pub name: String,
    pub project: RestProject,
    pub revision: String,
    pub timezone: Tz,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleConfig>,
    pub config: serde_json::Value,
}

/// A session time computed for a workflow.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RestWorkflowSessionTime {
    pub project: RestProject,
    pub revision: String,
    /// RFC 3339 at the workflow timezone's offset.
    pub session_time: String,
    pub timezone: Tz,
}

impl From<&WorkflowDefinitionWithRepository> for RestProject {
    fn from(def: &WorkflowDefinitionWithRepository) -> Self {
        Self {
            id: def.repository.id,
            name: def.repository.name.clone(),
        }
    }
}

impl From<WorkflowDefinitionWithRepository> for RestWorkflowDefinition {
    fn from(def: WorkflowDefinitionWithRepository) -> Self {
        Self {
            project: RestProject::from(&def),
            id: def.definition.id,
            name: def.definition.name,
            revision: def.revision.name,
            timezone: def.definition.timezone,
            schedule: def.definition.schedule,
            config: def.definition.config,
        }
    }
}

impl RestWorkflowSessionTime {
    /// Builds the view of `session_time` for a workflow.
    #[must_use]
    pub fn new(def: &WorkflowDefinitionWithRepository, session_time: DateTime<Utc>) -> Self {
        let timezone = def.time_zone();
        Self {
            project: RestProject::from(def),
            revision: def.revision.name.clone(),
            session_time: session_time
                .with_timezone(&timezone)
                .to_rfc3339_opts(SecondsFormat::AutoSi, false),
            timezone,
        }
    }
}
