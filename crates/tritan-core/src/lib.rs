//! Core of the Tritan workflow editor: the node/edge model, the graph store, Guardian validation
//! with local fallback, execution orchestration, persistence and import/export.

pub mod editor;
pub mod engine;
pub mod errors;
pub mod execution;
pub mod model;
pub mod observability;
pub mod persistence;
pub mod store;
pub mod validation;

pub use editor::{Editor, ExportDocument, RunOutcome, export_file_name};
pub use engine::{OfflineEngine, WorkflowEngine, WorkflowPayload};
pub use errors::{EngineError, ExportError, ImportError, PersistError};
pub use execution::{ExecutionPhase, ExecutionResult, ExecutionStatus, NodeResult};
pub use model::{Edge, EdgeId, LlmProvider, Node, NodeData, NodeId, NodeKind, NodePatch, Position};
pub use observability::{LogSettings, LogSink, init_observability, init_with};
pub use persistence::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use store::{
    ChangeSummary, EdgeChange, NodeChange, Outcome, PersistedState, WorkflowMeta, WorkflowSnapshot,
    WorkflowStore,
};
pub use validation::{Issue, Suggestion, ValidationResult, ValidationSource};
