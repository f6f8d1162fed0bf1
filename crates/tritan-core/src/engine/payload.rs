use serde::{Deserialize, Serialize};

use crate::model::{Edge, LlmProvider, Node, NodeConfig, NodeKind, Position};
use crate::store::WorkflowStore;

/// Graph as sent to the remote engine. Built from the store at request start, so later edits
/// do not change an in-flight request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowPayload {
    pub id: String,
    pub name: String,
    pub nodes: Vec<PayloadNode>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    pub data: PayloadData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadData {
    pub label: String,
    pub config: NodeConfig,
    pub provider: Option<LlmProvider>,
    pub model: Option<String>,
    pub prompt: Option<String>,
    /// Absent from validation requests; `null` for non-LLM nodes in execution requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Option<f64>>,
}

impl WorkflowPayload {
    /// Body for `POST /api/workflows/validate`.
    pub fn for_validation(store: &WorkflowStore) -> Self {
        Self::build(store, false)
    }

    /// Body for `POST /api/execute/`.
    pub fn for_execution(store: &WorkflowStore) -> Self {
        Self::build(store, true)
    }

    fn build(store: &WorkflowStore, with_temperature: bool) -> Self {
        let workflow = store.workflow();
        Self {
            id: workflow.id.clone(),
            name: workflow.name.clone(),
            nodes: store
                .nodes()
                .iter()
                .map(|node| PayloadNode::from_node(node, with_temperature))
                .collect(),
            edges: store.edges().to_vec(),
        }
    }
}

impl PayloadNode {
    fn from_node(node: &Node, with_temperature: bool) -> Self {
        let data = &node.data;
        Self {
            id: node.id.clone(),
            kind: data.kind,
            position: node.position,
            data: PayloadData {
                label: data.label.clone(),
                config: data.config.clone(),
                provider: data.provider,
                model: data.model.clone(),
                prompt: data.prompt.clone(),
                temperature: with_temperature.then_some(data.temperature),
            },
        }
    }
}
