//! Execution results as reported by the remote engine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed,
}

/// Outcome of one executed node. `status` is engine-defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    pub node_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// One entry per executed node; may be partial when the run failed.
    #[serde(default)]
    pub node_results: Vec<NodeResult>,
}

impl ExecutionResult {
    /// Record for a call that never produced an engine result.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Failed,
            total_duration_ms: None,
            error: Some(message.into()),
            node_results: Vec::new(),
        }
    }

    pub fn node(&self, node_id: &str) -> Option<&NodeResult> {
        self.node_results.iter().find(|r| r.node_id == node_id)
    }
}

/// Where the current execution attempt stands: `Idle -> Running -> Completed | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPhase {
    Idle,
    Running,
    Completed,
    Failed,
}

impl ExecutionPhase {
    pub(crate) fn derive(in_flight: bool, result: Option<&ExecutionResult>) -> Self {
        if in_flight {
            return ExecutionPhase::Running;
        }
        match result.map(|r| r.status) {
            None => ExecutionPhase::Idle,
            Some(ExecutionStatus::Running) => ExecutionPhase::Running,
            Some(ExecutionStatus::Completed) => ExecutionPhase::Completed,
            Some(ExecutionStatus::Failed) => ExecutionPhase::Failed,
        }
    }
}
