//! Guardian: structural validation of a workflow.
//!
//! Validation is a two-step pipeline: ask the remote engine, and if that call fails for any reason
//! produce a local result instead. The remote call is never retried.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::{WorkflowEngine, WorkflowPayload};
use crate::model::NodeKind;

pub const NO_TRIGGER_MESSAGE: &str = "Workflow must have at least one trigger node";
pub const NO_NODES_MESSAGE: &str = "Workflow has no nodes";

/// An error or warning, optionally with a fix hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub message: String,
}

/// Same shape whether the engine or the local check produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<Issue>,
    #[serde(default)]
    pub warnings: Vec<Issue>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

/// Where a validation result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSource {
    Remote,
    Local,
}

impl ValidationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationSource::Remote => "remote",
            ValidationSource::Local => "local",
        }
    }
}

/// Offline rules: at least one trigger, at least one node. Both may fire together.
/// Never produces warnings or suggestions.
pub fn local_check(payload: &WorkflowPayload) -> ValidationResult {
    let mut errors = Vec::new();
    if !payload.nodes.iter().any(|n| n.kind == NodeKind::Trigger) {
        errors.push(Issue::new(NO_TRIGGER_MESSAGE));
    }
    if payload.nodes.is_empty() {
        errors.push(Issue::new(NO_NODES_MESSAGE));
    }
    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings: Vec::new(),
        suggestions: Vec::new(),
    }
}

/// Run the remote-then-local pipeline. Never fails.
pub async fn validate_with(
    engine: &dyn WorkflowEngine,
    payload: &WorkflowPayload,
) -> (ValidationResult, ValidationSource) {
    match engine.validate(payload).await {
        Ok(result) => {
            debug!(
                event = "validation.remote_completed",
                domain = "validation",
                workflow_id = %payload.id,
                valid = result.valid,
                errors = result.errors.len() as u64,
                warnings = result.warnings.len() as u64
            );
            (result, ValidationSource::Remote)
        }
        Err(err) => {
            let result = local_check(payload);
            warn!(
                event = "validation.fallback",
                domain = "validation",
                workflow_id = %payload.id,
                engine = %engine.name(),
                provider_status = ?err.status_code(),
                error = %err,
                valid = result.valid
            );
            (result, ValidationSource::Local)
        }
    }
}
