//! Contract with the remote validation/execution engine.
//!
//! The HTTP implementation lives in `tritan-engine-http`; tests and embedders can plug in their own.

mod payload;

use crate::errors::EngineError;
use crate::execution::ExecutionResult;
use crate::validation::ValidationResult;

pub use payload::{PayloadData, PayloadNode, WorkflowPayload};

/// Remote engine adapter. One instance is shared by every request of an editor session.
#[async_trait::async_trait]
pub trait WorkflowEngine: Send + Sync {
    /// Short name used in logs (for example the base URL).
    fn name(&self) -> String;

    /// Structural check of a workflow. Any error makes the caller fall back to the local check.
    async fn validate(&self, payload: &WorkflowPayload) -> Result<ValidationResult, EngineError>;

    /// Run a workflow to completion and return its structured result.
    async fn execute(&self, payload: &WorkflowPayload) -> Result<ExecutionResult, EngineError>;

    /// Liveness probe; returns whatever the engine reports.
    async fn health(&self) -> Result<serde_json::Value, EngineError>;
}

/// Engine that is never reachable. Every call fails with a transport error, so validation always
/// uses the local check and execution always fails. Used when no engine is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineEngine;

#[async_trait::async_trait]
impl WorkflowEngine for OfflineEngine {
    fn name(&self) -> String {
        "offline".to_string()
    }

    async fn validate(&self, _payload: &WorkflowPayload) -> Result<ValidationResult, EngineError> {
        Err(EngineError::transport("no engine configured"))
    }

    async fn execute(&self, _payload: &WorkflowPayload) -> Result<ExecutionResult, EngineError> {
        Err(EngineError::transport("no engine configured"))
    }

    async fn health(&self) -> Result<serde_json::Value, EngineError> {
        Err(EngineError::transport("no engine configured"))
    }
}
