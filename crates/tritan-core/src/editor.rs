//! Editor session: owns the graph store, the Guardian and execution state, and the collaborators
//! (remote engine, persistence). Construct one per session and hand clones to whoever needs it.
//!
//! The state lock is never held across an engine call. A request serializes the graph under the
//! lock, releases it for the network round trip, then takes it again to record the result, so the
//! graph stays editable while a request is pending.
//!
//! Every `validate`/`execute` call takes a fresh epoch. Only the latest call of each kind records
//! its result; an older call still returns its own result to its caller. `load` and `clear` also
//! advance both epochs, so results for a replaced workflow are never recorded.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::engine::{WorkflowEngine, WorkflowPayload};
use crate::errors::{EngineError, ExportError, ImportError, PersistError};
use crate::execution::{ExecutionPhase, ExecutionResult};
use crate::model::{Edge, EdgeId, Node, NodeId, NodeKind, NodePatch, Position};
use crate::persistence::SnapshotStore;
use crate::store::{
    ChangeSummary, EdgeChange, NodeChange, Outcome, WorkflowMeta, WorkflowSnapshot, WorkflowStore,
};
use crate::validation::{ValidationResult, validate_with};

/// Result of [`Editor::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Guardian found errors; nothing was executed.
    Rejected(ValidationResult),
    Executed(ExecutionResult),
}

/// A workflow serialized for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub contents: String,
}

/// `<name>.json`, with every whitespace run in the name replaced by `_`.
pub fn export_file_name(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(ch);
            in_space = false;
        }
    }
    if stem.is_empty() {
        stem.push_str("workflow");
    }
    format!("{stem}.json")
}

#[derive(Default)]
struct EditorState {
    store: WorkflowStore,
    validation: Option<ValidationResult>,
    validation_epoch: u64,
    is_executing: bool,
    execution: Option<ExecutionResult>,
    execution_epoch: u64,
}

struct EditorInner {
    engine: Arc<dyn WorkflowEngine>,
    persistence: Option<Arc<dyn SnapshotStore>>,
    state: Mutex<EditorState>,
}

/// Cheaply clonable handle to one editing session.
#[derive(Clone)]
pub struct Editor {
    inner: Arc<EditorInner>,
}

impl Editor {
    /// Session on a fresh empty workflow, without persistence.
    pub fn new(engine: Arc<dyn WorkflowEngine>) -> Self {
        Self::with_parts(engine, None, WorkflowStore::new())
    }

    /// Session backed by `persistence`: restores the stored workflow if there is one and writes
    /// every later mutation through.
    pub fn open(
        engine: Arc<dyn WorkflowEngine>,
        persistence: Arc<dyn SnapshotStore>,
    ) -> Result<Self, PersistError> {
        let store = match persistence.load()? {
            Some(state) => WorkflowStore::from_state(state),
            None => WorkflowStore::new(),
        };
        info!(
            event = "editor.opened",
            domain = "editor",
            workflow_id = %store.workflow().id,
            node_count = store.nodes().len() as u64,
            engine = %engine.name()
        );
        Ok(Self::with_parts(engine, Some(persistence), store))
    }

    fn with_parts(
        engine: Arc<dyn WorkflowEngine>,
        persistence: Option<Arc<dyn SnapshotStore>>,
        store: WorkflowStore,
    ) -> Self {
        Self {
            inner: Arc::new(EditorInner {
                engine,
                persistence,
                state: Mutex::new(EditorState {
                    store,
                    ..EditorState::default()
                }),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EditorState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, store: &WorkflowStore) {
        let Some(persistence) = self.inner.persistence.as_ref() else {
            return;
        };
        if let Err(err) = persistence.save(&store.persisted_state()) {
            warn!(
                event = "persistence.save_failed",
                domain = "persistence",
                workflow_id = %store.workflow().id,
                error = %err
            );
        }
    }

    /// Run a store mutation under the lock and write the result through.
    fn mutate<R>(&self, f: impl FnOnce(&mut WorkflowStore) -> R) -> R {
        let mut state = self.lock();
        let out = f(&mut state.store);
        self.persist(&state.store);
        out
    }

    /// Read access to the live store.
    pub fn with_store<R>(&self, f: impl FnOnce(&WorkflowStore) -> R) -> R {
        f(&self.lock().store)
    }

    pub fn workflow(&self) -> WorkflowMeta {
        self.with_store(|s| s.workflow().clone())
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.with_store(|s| s.nodes().to_vec())
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.with_store(|s| s.edges().to_vec())
    }

    pub fn node(&self, id: &str) -> Option<Node> {
        self.with_store(|s| s.node(id).cloned())
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.with_store(|s| s.selected_node().map(ToOwned::to_owned))
    }

    pub fn validation_result(&self) -> Option<ValidationResult> {
        self.lock().validation.clone()
    }

    pub fn execution_result(&self) -> Option<ExecutionResult> {
        self.lock().execution.clone()
    }

    pub fn is_executing(&self) -> bool {
        self.lock().is_executing
    }

    pub fn execution_phase(&self) -> ExecutionPhase {
        let state = self.lock();
        ExecutionPhase::derive(state.is_executing, state.execution.as_ref())
    }

    pub fn add_node(&self, kind: NodeKind, position: Position) -> NodeId {
        self.mutate(|s| s.add_node(kind, position))
    }

    pub fn update_node_data(&self, id: &str, patch: NodePatch) -> Outcome {
        self.mutate(|s| s.update_node_data(id, patch))
    }

    pub fn connect(
        &self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        source_handle: Option<String>,
        target_handle: Option<String>,
    ) -> EdgeId {
        self.mutate(|s| s.connect(source, target, source_handle, target_handle))
    }

    pub fn apply_node_changes(&self, changes: impl IntoIterator<Item = NodeChange>) -> ChangeSummary {
        self.mutate(|s| s.apply_node_changes(changes))
    }

    pub fn apply_edge_changes(&self, changes: impl IntoIterator<Item = EdgeChange>) -> ChangeSummary {
        self.mutate(|s| s.apply_edge_changes(changes))
    }

    /// UI focus only; not persisted.
    pub fn select_node(&self, id: Option<&str>) -> Outcome {
        self.lock().store.select_node(id)
    }

    pub fn set_workflow_name(&self, name: impl Into<String>) {
        self.mutate(|s| s.set_workflow_name(name))
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.mutate(|s| s.set_description(description))
    }

    pub fn save(&self) -> WorkflowSnapshot {
        self.mutate(WorkflowStore::save)
    }

    pub fn load(&self, snapshot: WorkflowSnapshot) {
        let mut state = self.lock();
        state.store.load(snapshot);
        Self::supersede_requests(&mut state);
        self.persist(&state.store);
    }

    /// Fresh empty workflow under a new id. Drops the execution result.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.store.clear();
        state.execution = None;
        Self::supersede_requests(&mut state);
        self.persist(&state.store);
    }

    fn supersede_requests(state: &mut EditorState) {
        state.validation_epoch += 1;
        state.execution_epoch += 1;
        state.is_executing = false;
    }

    /// Ask the Guardian about the current graph. Falls back to the local check when the engine
    /// cannot be reached; never fails.
    pub async fn validate(&self) -> ValidationResult {
        let (epoch, payload) = {
            let mut state = self.lock();
            state.validation_epoch += 1;
            (
                state.validation_epoch,
                WorkflowPayload::for_validation(&state.store),
            )
        };

        let (result, source) = validate_with(self.inner.engine.as_ref(), &payload).await;

        let mut state = self.lock();
        if state.validation_epoch == epoch {
            state.validation = Some(result.clone());
        } else {
            debug!(
                event = "validation.superseded",
                domain = "validation",
                workflow_id = %payload.id,
                epoch = epoch
            );
        }
        info!(
            event = "validation.completed",
            domain = "validation",
            workflow_id = %payload.id,
            source = source.as_str(),
            valid = result.valid,
            errors = result.errors.len() as u64
        );
        result
    }

    /// Submit the current graph for execution.
    ///
    /// The previous result is cleared and the in-flight flag set before the call. On failure a
    /// `failed` record is stored and the error is still returned to the caller.
    pub async fn execute(&self) -> Result<ExecutionResult, EngineError> {
        let (epoch, payload) = {
            let mut state = self.lock();
            state.execution_epoch += 1;
            state.is_executing = true;
            state.execution = None;
            (
                state.execution_epoch,
                WorkflowPayload::for_execution(&state.store),
            )
        };
        info!(
            event = "execution.started",
            domain = "execution",
            workflow_id = %payload.id,
            node_count = payload.nodes.len() as u64,
            edge_count = payload.edges.len() as u64,
            epoch = epoch
        );

        let outcome = self.inner.engine.execute(&payload).await;

        let mut state = self.lock();
        let current = state.execution_epoch == epoch;
        if current {
            state.is_executing = false;
            state.execution = Some(match &outcome {
                Ok(result) => result.clone(),
                Err(err) => ExecutionResult::failed(err.to_string()),
            });
        } else {
            debug!(
                event = "execution.superseded",
                domain = "execution",
                workflow_id = %payload.id,
                epoch = epoch
            );
        }
        match &outcome {
            Ok(result) => info!(
                event = "execution.completed",
                domain = "execution",
                workflow_id = %payload.id,
                status = ?result.status,
                total_duration_ms = ?result.total_duration_ms,
                node_results = result.node_results.len() as u64
            ),
            Err(err) => error!(
                event = "execution.failed",
                domain = "execution",
                workflow_id = %payload.id,
                provider_status = ?err.status_code(),
                error = %err
            ),
        }
        outcome
    }

    /// Validate, then execute only if the Guardian reports no errors.
    pub async fn run(&self) -> Result<RunOutcome, EngineError> {
        let validation = self.validate().await;
        if !validation.valid {
            info!(
                event = "run.rejected",
                domain = "execution",
                errors = validation.errors.len() as u64
            );
            return Ok(RunOutcome::Rejected(validation));
        }
        self.execute().await.map(RunOutcome::Executed)
    }

    pub async fn health(&self) -> Result<serde_json::Value, EngineError> {
        self.inner.engine.health().await
    }

    /// Current workflow document without saving it.
    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.with_store(WorkflowStore::snapshot)
    }

    /// Save and serialize the workflow for download.
    pub fn export(&self) -> Result<ExportDocument, ExportError> {
        let snapshot = self.save();
        Ok(ExportDocument {
            file_name: export_file_name(&snapshot.name),
            contents: serde_json::to_string_pretty(&snapshot)?,
        })
    }

    /// Export into `dir`; returns the written path.
    pub fn export_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let document = self.export()?;
        let path = dir.as_ref().join(&document.file_name);
        std::fs::write(&path, document.contents).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(event = "workflow.exported", domain = "workflow", path = %path.display());
        Ok(path)
    }

    /// Replace the workflow with a JSON document. Malformed input leaves the session untouched.
    pub fn import_json(&self, text: &str) -> Result<(), ImportError> {
        let snapshot: WorkflowSnapshot = serde_json::from_str(text).map_err(|err| {
            warn!(event = "workflow.import_rejected", domain = "workflow", error = %err);
            ImportError::Malformed(err)
        })?;
        self.load(snapshot);
        Ok(())
    }

    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<(), ImportError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.import_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use super::*;
    use crate::engine::OfflineEngine;
    use crate::execution::{ExecutionStatus, NodeResult};
    use crate::persistence::MemorySnapshotStore;
    use crate::validation::{Issue, NO_NODES_MESSAGE, NO_TRIGGER_MESSAGE};

    fn completed(node_ids: &[&str]) -> ExecutionResult {
        ExecutionResult {
            status: ExecutionStatus::Completed,
            total_duration_ms: Some(5.0),
            error: None,
            node_results: node_ids
                .iter()
                .map(|id| NodeResult {
                    node_id: id.to_string(),
                    status: "success".into(),
                    duration_ms: Some(1.0),
                    output: None,
                    error: None,
                })
                .collect(),
        }
    }

    /// Engine with fixed answers that records the payloads it receives.
    #[derive(Default)]
    struct ScriptedEngine {
        validation: Option<ValidationResult>,
        execution: Option<ExecutionResult>,
        executed: Mutex<Vec<WorkflowPayload>>,
    }

    #[async_trait::async_trait]
    impl WorkflowEngine for ScriptedEngine {
        fn name(&self) -> String {
            "scripted".into()
        }

        async fn validate(&self, _p: &WorkflowPayload) -> Result<ValidationResult, EngineError> {
            self.validation
                .clone()
                .ok_or_else(|| EngineError::status(503, "Service Unavailable"))
        }

        async fn execute(&self, p: &WorkflowPayload) -> Result<ExecutionResult, EngineError> {
            self.executed.lock().unwrap().push(p.clone());
            self.execution
                .clone()
                .ok_or_else(|| EngineError::status(500, "Internal Server Error"))
        }

        async fn health(&self) -> Result<serde_json::Value, EngineError> {
            Ok(serde_json::json!({"status": "ok"}))
        }
    }

    /// Holds the first execute call and the first validate call until released; later calls
    /// answer immediately.
    #[derive(Default)]
    struct GatedEngine {
        entered: Notify,
        release: Notify,
        calls: AtomicUsize,
        validate_calls: AtomicUsize,
        seen_nodes: Mutex<Vec<usize>>,
    }

    #[async_trait::async_trait]
    impl WorkflowEngine for GatedEngine {
        fn name(&self) -> String {
            "gated".into()
        }

        async fn validate(&self, _p: &WorkflowPayload) -> Result<ValidationResult, EngineError> {
            let call = self.validate_calls.fetch_add(1, Ordering::SeqCst);
            let tag = if call == 0 {
                self.entered.notify_one();
                self.release.notified().await;
                "first"
            } else {
                "second"
            };
            Ok(ValidationResult {
                valid: true,
                errors: vec![],
                warnings: vec![Issue::new(tag)],
                suggestions: vec![],
            })
        }

        async fn execute(&self, p: &WorkflowPayload) -> Result<ExecutionResult, EngineError> {
            self.seen_nodes.lock().unwrap().push(p.nodes.len());
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                self.entered.notify_one();
                self.release.notified().await;
                return Ok(completed(&["first"]));
            }
            Ok(completed(&["second"]))
        }

        async fn health(&self) -> Result<serde_json::Value, EngineError> {
            Err(EngineError::transport("unused"))
        }
    }

    fn offline_editor() -> Editor {
        Editor::new(Arc::new(OfflineEngine))
    }

    #[tokio::test]
    async fn offline_validation_uses_local_rules() {
        let editor = offline_editor();
        let result = editor.validate().await;
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![Issue::new(NO_TRIGGER_MESSAGE), Issue::new(NO_NODES_MESSAGE)]
        );
        assert_eq!(editor.validation_result(), Some(result));

        editor.add_node(NodeKind::Trigger, Position::default());
        let result = editor.validate().await;
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn remote_validation_result_is_stored() {
        let remote = ValidationResult {
            valid: true,
            errors: vec![],
            warnings: vec![Issue::new("LLM prompt is empty")],
            suggestions: vec![],
        };
        let engine = ScriptedEngine {
            validation: Some(remote.clone()),
            ..Default::default()
        };
        let editor = Editor::new(Arc::new(engine));
        assert_eq!(editor.validate().await, remote);
        assert_eq!(editor.validation_result(), Some(remote));
    }

    #[tokio::test]
    async fn execution_failure_is_recorded_and_returned() {
        let editor = offline_editor();
        editor.add_node(NodeKind::Trigger, Position::default());

        let err = editor.execute().await.unwrap_err();
        assert!(matches!(err, EngineError::Transport { .. }));

        let stored = editor.execution_result().unwrap();
        assert_eq!(stored.status, ExecutionStatus::Failed);
        assert!(!stored.error.unwrap_or_default().is_empty());
        assert!(!editor.is_executing());
        assert_eq!(editor.execution_phase(), ExecutionPhase::Failed);
    }

    #[tokio::test]
    async fn non_success_status_is_a_hard_failure() {
        let engine = Arc::new(ScriptedEngine::default());
        let editor = Editor::new(engine.clone());
        let err = editor.execute().await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        let stored = editor.execution_result().unwrap();
        assert!(stored.error.unwrap().contains("500"));
        assert_eq!(engine.executed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn successful_execution_is_stored_verbatim() {
        let engine = Arc::new(ScriptedEngine {
            execution: Some(completed(&["node-a"])),
            ..Default::default()
        });
        let editor = Editor::new(engine.clone());
        let llm = editor.add_node(NodeKind::Llm, Position::default());

        let result = editor.execute().await.unwrap();
        assert_eq!(result, completed(&["node-a"]));
        assert_eq!(editor.execution_result(), Some(result));
        assert_eq!(editor.execution_phase(), ExecutionPhase::Completed);

        let sent = engine.executed.lock().unwrap();
        assert_eq!(sent[0].nodes[0].id, llm);
        assert_eq!(sent[0].nodes[0].data.temperature, Some(Some(0.7)));
    }

    #[tokio::test]
    async fn graph_stays_editable_while_execution_is_in_flight() {
        let engine = Arc::new(GatedEngine::default());
        let editor = Editor::new(engine.clone());
        editor.add_node(NodeKind::Trigger, Position::default());

        let running = editor.clone();
        let handle = tokio::spawn(async move { running.execute().await });
        engine.entered.notified().await;

        assert!(editor.is_executing());
        assert_eq!(editor.execution_phase(), ExecutionPhase::Running);
        assert!(editor.execution_result().is_none());
        editor.add_node(NodeKind::Action, Position::new(100.0, 0.0));
        assert_eq!(editor.nodes().len(), 2);

        engine.release.notify_one();
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.node_results[0].node_id, "first");
        assert!(!editor.is_executing());
        assert_eq!(*engine.seen_nodes.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn superseded_execution_does_not_overwrite_newer_result() {
        let engine = Arc::new(GatedEngine::default());
        let editor = Editor::new(engine.clone());

        let first = editor.clone();
        let handle = tokio::spawn(async move { first.execute().await });
        engine.entered.notified().await;

        let second = editor.execute().await.unwrap();
        assert_eq!(second.node_results[0].node_id, "second");
        assert!(!editor.is_executing());

        engine.release.notify_one();
        let first_result = handle.await.unwrap().unwrap();
        assert_eq!(first_result.node_results[0].node_id, "first");
        let stored = editor.execution_result().unwrap();
        assert_eq!(stored.node_results[0].node_id, "second");
    }

    #[tokio::test]
    async fn superseded_validation_does_not_overwrite_newer_result() {
        let engine = Arc::new(GatedEngine::default());
        let editor = Editor::new(engine.clone());

        let first = editor.clone();
        let handle = tokio::spawn(async move { first.validate().await });
        engine.entered.notified().await;

        let second = editor.validate().await;
        assert_eq!(second.warnings, vec![Issue::new("second")]);

        engine.release.notify_one();
        let first_result = handle.await.unwrap();
        assert_eq!(first_result.warnings, vec![Issue::new("first")]);
        assert_eq!(editor.validation_result(), Some(second));
    }

    #[tokio::test]
    async fn clear_during_execution_drops_the_late_result() {
        let engine = Arc::new(GatedEngine::default());
        let editor = Editor::new(engine.clone());
        editor.add_node(NodeKind::Trigger, Position::default());

        let running = editor.clone();
        let handle = tokio::spawn(async move { running.execute().await });
        engine.entered.notified().await;
        assert!(editor.is_executing());

        editor.clear();
        assert!(!editor.is_executing());
        assert_eq!(editor.execution_phase(), ExecutionPhase::Idle);

        engine.release.notify_one();
        let returned = handle.await.unwrap().unwrap();
        assert_eq!(returned.node_results[0].node_id, "first");
        assert!(editor.execution_result().is_none());
        assert!(!editor.is_executing());
    }

    #[tokio::test]
    async fn load_during_execution_drops_the_late_result() {
        let engine = Arc::new(GatedEngine::default());
        let editor = Editor::new(engine.clone());

        let running = editor.clone();
        let handle = tokio::spawn(async move { running.execute().await });
        engine.entered.notified().await;

        let replacement = offline_editor();
        replacement.set_workflow_name("Replacement");
        replacement.add_node(NodeKind::Trigger, Position::default());
        editor.load(replacement.save());
        assert!(!editor.is_executing());

        engine.release.notify_one();
        assert!(handle.await.unwrap().is_ok());
        assert!(editor.execution_result().is_none());
        assert_eq!(editor.workflow().name, "Replacement");
        assert_eq!(editor.execution_phase(), ExecutionPhase::Idle);
    }

    #[tokio::test]
    async fn run_skips_execution_when_invalid() {
        let engine = Arc::new(ScriptedEngine {
            execution: Some(completed(&[])),
            ..Default::default()
        });
        let editor = Editor::new(engine.clone());
        editor.add_node(NodeKind::Action, Position::default());

        let outcome = editor.run().await.unwrap();
        assert!(matches!(outcome, RunOutcome::Rejected(ref v) if !v.valid));
        assert!(engine.executed.lock().unwrap().is_empty());
        assert!(editor.execution_result().is_none());

        editor.add_node(NodeKind::Trigger, Position::default());
        let outcome = editor.run().await.unwrap();
        assert!(matches!(outcome, RunOutcome::Executed(_)));
        assert_eq!(engine.executed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn health_passes_engine_answer_through() {
        let editor = Editor::new(Arc::new(ScriptedEngine::default()));
        assert_eq!(editor.health().await.unwrap()["status"], "ok");
        assert!(offline_editor().health().await.is_err());
    }

    #[tokio::test]
    async fn clear_resets_workflow_and_execution() {
        let editor = Editor::new(Arc::new(ScriptedEngine {
            execution: Some(completed(&[])),
            ..Default::default()
        }));
        let a = editor.add_node(NodeKind::Trigger, Position::default());
        let b = editor.add_node(NodeKind::Action, Position::default());
        editor.connect(&*a, &*b, None, None);
        editor.select_node(Some(a.as_str()));
        editor.execute().await.unwrap();
        let before = editor.workflow().id;

        editor.clear();
        let snapshot = editor.save();
        assert_ne!(snapshot.id, before);
        assert!(snapshot.nodes.is_empty());
        assert!(snapshot.edges.is_empty());
        assert!(editor.selected_node().is_none());
        assert!(editor.execution_result().is_none());
        assert_eq!(editor.execution_phase(), ExecutionPhase::Idle);
    }

    #[test]
    fn mutations_write_through_to_persistence() {
        let memory = Arc::new(MemorySnapshotStore::new());
        let editor = Editor::open(Arc::new(OfflineEngine), memory.clone()).unwrap();
        let id = editor.add_node(NodeKind::Http, Position::new(5.0, 5.0));
        editor.update_node_data(&id, NodePatch::default().label("Fetch feed"));
        editor.set_workflow_name("Feeds");
        assert_eq!(memory.save_count(), 3);

        let stored = memory.current().unwrap();
        assert_eq!(stored.workflow.name, "Feeds");
        assert_eq!(stored.nodes[0].data.label, "Fetch feed");

        editor.select_node(Some(id.as_str()));
        assert_eq!(memory.save_count(), 3);
    }

    #[test]
    fn open_restores_persisted_workflow() {
        let memory = Arc::new(MemorySnapshotStore::new());
        let first = Editor::open(Arc::new(OfflineEngine), memory.clone()).unwrap();
        first.add_node(NodeKind::Trigger, Position::default());
        first.set_workflow_name("Morning report");
        let id = first.workflow().id;

        let second = Editor::open(Arc::new(OfflineEngine), memory).unwrap();
        assert_eq!(second.workflow().id, id);
        assert_eq!(second.workflow().name, "Morning report");
        assert_eq!(second.nodes().len(), 1);
    }

    #[test]
    fn malformed_import_keeps_current_graph() {
        let editor = offline_editor();
        let a = editor.add_node(NodeKind::Trigger, Position::default());
        let b = editor.add_node(NodeKind::Code, Position::default());
        editor.connect(a, b, None, None);
        let nodes = editor.nodes();
        let edges = editor.edges();

        let err = editor.import_json("{\"nodes\": [").unwrap_err();
        assert!(matches!(err, ImportError::Malformed(_)));
        let err = editor.import_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ImportError::Malformed(_)));

        assert_eq!(editor.nodes(), nodes);
        assert_eq!(editor.edges(), edges);
    }

    #[test]
    fn import_with_null_graph_content_loads_empty_workflow() {
        let editor = offline_editor();
        editor.add_node(NodeKind::Trigger, Position::default());
        editor
            .import_json(r#"{"id":"workflow-9","name":"Imported","nodes":null,"edges":null}"#)
            .unwrap();
        assert_eq!(editor.workflow().id, "workflow-9");
        assert_eq!(editor.workflow().name, "Imported");
        assert!(editor.nodes().is_empty());
        assert!(editor.edges().is_empty());
    }

    #[test]
    fn export_then_import_restores_graph() {
        let source = offline_editor();
        source.set_workflow_name("Lead  scoring flow");
        let a = source.add_node(NodeKind::Trigger, Position::default());
        let b = source.add_node(NodeKind::Condition, Position::new(0.0, 120.0));
        source.connect(&*a, &*b, None, None);
        source.connect(&*b, &*a, Some("false".into()), None);

        let document = source.export().unwrap();
        assert_eq!(document.file_name, "Lead_scoring_flow.json");

        let target = offline_editor();
        target.import_json(&document.contents).unwrap();
        assert_eq!(target.nodes(), source.nodes());
        assert_eq!(target.edges(), source.edges());
        assert_eq!(target.workflow(), source.workflow());
    }

    #[test]
    fn export_to_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let editor = offline_editor();
        editor.set_workflow_name("Daily sync");
        let path = editor.export_to(dir.path()).unwrap();
        assert!(path.ends_with("Daily_sync.json"));

        let other = offline_editor();
        other.import_file(&path).unwrap();
        assert_eq!(other.workflow().name, "Daily sync");
        assert!(matches!(
            other.import_file(dir.path().join("missing.json")),
            Err(ImportError::Io { .. })
        ));
    }

    #[test]
    fn export_file_name_collapses_whitespace_runs() {
        assert_eq!(export_file_name("New Workflow"), "New_Workflow.json");
        assert_eq!(export_file_name(" a \t b "), "_a_b_.json");
        assert_eq!(export_file_name(""), "workflow.json");
    }
}
