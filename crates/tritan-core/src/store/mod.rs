//! Graph store: the single owner of the live node and edge collections and the workflow metadata.
//!
//! Mutations addressed by id never fail. A stale id (the canvas may race with removal) yields
//! [`Outcome::Missing`] and leaves the graph untouched.

mod changes;
mod snapshot;

use chrono::Utc;
use tracing::debug;

use crate::model::{
    Edge, EdgeId, Node, NodeData, NodeId, NodeKind, NodePatch, Position, new_edge_id, new_node_id,
};

pub use changes::{ChangeSummary, EdgeChange, NodeChange, Outcome};
pub use snapshot::{DEFAULT_WORKFLOW_NAME, PersistedState, WorkflowMeta, WorkflowSnapshot};

#[derive(Debug, Clone, Default)]
pub struct WorkflowStore {
    workflow: WorkflowMeta,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    selected_node: Option<NodeId>,
}

impl WorkflowStore {
    /// Empty workflow with a fresh id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted state.
    pub fn from_state(state: PersistedState) -> Self {
        Self {
            workflow: state.workflow,
            nodes: state.nodes,
            edges: state.edges,
            selected_node: None,
        }
    }

    pub fn workflow(&self) -> &WorkflowMeta {
        &self.workflow
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn selected_node(&self) -> Option<&str> {
        self.selected_node.as_deref()
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Append a node of `kind` at `position` with the kind's palette defaults.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> NodeId {
        let id = new_node_id();
        self.nodes.push(Node {
            id: id.clone(),
            position,
            data: NodeData::defaults_for(kind),
            selected: false,
        });
        debug!(
            event = "workflow.node_added",
            domain = "workflow",
            node_id = %id,
            kind = kind.as_str(),
            node_count = self.nodes.len() as u64
        );
        id
    }

    /// Shallow-merge `patch` into the node's data. Other nodes are not touched.
    pub fn update_node_data(&mut self, id: &str, patch: NodePatch) -> Outcome {
        let Some(node) = self.node_mut(id) else {
            debug!(event = "workflow.stale_node", domain = "workflow", node_id = %id, op = "update");
            return Outcome::Missing;
        };
        patch.apply_to(&mut node.data);
        Outcome::Applied
    }

    /// Append an edge. Endpoints are not checked; self-loops and parallel edges are allowed.
    pub fn connect(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        source_handle: Option<String>,
        target_handle: Option<String>,
    ) -> EdgeId {
        let id = new_edge_id();
        let edge = Edge {
            id: id.clone(),
            source: source.into(),
            target: target.into(),
            source_handle,
            target_handle,
        };
        debug!(
            event = "workflow.edge_added",
            domain = "workflow",
            edge_id = %id,
            source = %edge.source,
            target = %edge.target
        );
        self.edges.push(edge);
        id
    }

    /// Apply node changes in order. Later changes to the same node win; changes to removed or
    /// unknown nodes are counted as ignored.
    pub fn apply_node_changes(
        &mut self,
        changes: impl IntoIterator<Item = NodeChange>,
    ) -> ChangeSummary {
        let mut summary = ChangeSummary::default();
        for change in changes {
            let outcome = match change {
                NodeChange::Position {
                    id,
                    position: Some(position),
                } => match self.node_mut(&id) {
                    Some(node) => {
                        node.position = position;
                        Outcome::Applied
                    }
                    None => Outcome::Missing,
                },
                NodeChange::Position { position: None, .. } => Outcome::Missing,
                NodeChange::Remove { id } => self.remove_node(&id),
                NodeChange::Select { id, selected } => match self.node_mut(&id) {
                    Some(node) => {
                        node.selected = selected;
                        Outcome::Applied
                    }
                    None => Outcome::Missing,
                },
                NodeChange::Other => Outcome::Missing,
            };
            summary.record(outcome);
        }
        summary
    }

    fn remove_node(&mut self, id: &str) -> Outcome {
        let Some(index) = self.nodes.iter().position(|n| n.id == id) else {
            return Outcome::Missing;
        };
        self.nodes.remove(index);
        if self.selected_node.as_deref() == Some(id) {
            self.selected_node = None;
        }
        debug!(event = "workflow.node_removed", domain = "workflow", node_id = %id);
        Outcome::Applied
    }

    /// Apply edge changes in order. Only removal does anything.
    pub fn apply_edge_changes(
        &mut self,
        changes: impl IntoIterator<Item = EdgeChange>,
    ) -> ChangeSummary {
        let mut summary = ChangeSummary::default();
        for change in changes {
            let outcome = match change {
                EdgeChange::Remove { id } => {
                    let index = self.edges.iter().position(|e| e.id == id);
                    if let Some(index) = index {
                        self.edges.remove(index);
                    }
                    Outcome::found(index.is_some())
                }
                EdgeChange::Other => Outcome::Missing,
            };
            summary.record(outcome);
        }
        summary
    }

    /// Focus a node (or clear focus with `None`). Unknown ids leave the focus unchanged.
    pub fn select_node(&mut self, id: Option<&str>) -> Outcome {
        match id {
            None => {
                self.selected_node = None;
                Outcome::Applied
            }
            Some(id) if self.node(id).is_some() => {
                self.selected_node = Some(id.to_string());
                Outcome::Applied
            }
            Some(_) => Outcome::Missing,
        }
    }

    pub fn set_workflow_name(&mut self, name: impl Into<String>) {
        self.workflow.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.workflow.description = description.into();
    }

    /// Current content as a document, without touching `updated_at`.
    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            id: self.workflow.id.clone(),
            name: self.workflow.name.clone(),
            description: self.workflow.description.clone(),
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            updated_at: self.workflow.updated_at,
        }
    }

    /// Stamp `updated_at`, record it in the metadata and return the full snapshot.
    pub fn save(&mut self) -> WorkflowSnapshot {
        self.workflow.updated_at = Some(Utc::now());
        let snapshot = self.snapshot();
        debug!(
            event = "workflow.saved",
            domain = "workflow",
            workflow_id = %snapshot.id,
            node_count = snapshot.nodes.len() as u64,
            edge_count = snapshot.edges.len() as u64
        );
        snapshot
    }

    /// Replace metadata and graph content wholesale.
    pub fn load(&mut self, snapshot: WorkflowSnapshot) {
        self.workflow = snapshot.meta();
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
        self.selected_node = None;
        debug!(
            event = "workflow.loaded",
            domain = "workflow",
            workflow_id = %self.workflow.id,
            node_count = self.nodes.len() as u64,
            edge_count = self.edges.len() as u64
        );
    }

    /// Start over with an empty workflow under a new id.
    pub fn clear(&mut self) {
        self.workflow = WorkflowMeta::new();
        self.nodes.clear();
        self.edges.clear();
        self.selected_node = None;
        debug!(event = "workflow.cleared", domain = "workflow", workflow_id = %self.workflow.id);
    }

    /// Persistable view of the store. Selection flags are dropped.
    pub fn persisted_state(&self) -> PersistedState {
        let nodes = self
            .nodes
            .iter()
            .cloned()
            .map(|mut node| {
                node.selected = false;
                node
            })
            .collect();
        PersistedState {
            workflow: self.workflow.clone(),
            nodes,
            edges: self.edges.clone(),
        }
    }
}
