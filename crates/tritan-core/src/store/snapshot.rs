use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Edge, Node, new_workflow_id, null_as_default};

pub const DEFAULT_WORKFLOW_NAME: &str = "New Workflow";

fn default_name() -> String {
    DEFAULT_WORKFLOW_NAME.to_string()
}

/// Workflow metadata. `id` only changes on clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowMeta {
    #[serde(default = "new_workflow_id")]
    pub id: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Stamped by each explicit save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkflowMeta {
    pub fn new() -> Self {
        Self {
            id: new_workflow_id(),
            name: default_name(),
            description: String::new(),
            updated_at: None,
        }
    }
}

impl Default for WorkflowMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// Full workflow document: metadata plus graph content. Used for save, load, import and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    #[serde(default = "new_workflow_id")]
    pub id: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkflowSnapshot {
    pub fn meta(&self) -> WorkflowMeta {
        WorkflowMeta {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// What the persistence adapter keeps between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default, deserialize_with = "null_as_default")]
    pub workflow: WorkflowMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<Edge>,
}
