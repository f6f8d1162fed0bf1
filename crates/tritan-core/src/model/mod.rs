//! Node and edge records. Shape and defaults only; all mutation goes through the store.

mod catalog;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub use catalog::{
    DEFAULT_LLM_MODEL, DEFAULT_LLM_PROVIDER, DEFAULT_LLM_TEMPERATURE, KindInfo, LlmProvider,
    NodeKind, UnknownName,
};

/// Opaque node identifier, unique within a graph.
pub type NodeId = String;

/// Opaque edge identifier, unique within a graph.
pub type EdgeId = String;

/// Kind-specific options (`{method, url}` for http, `{condition}` for condition, ...).
/// Keys are advisory; nothing enforces a schema.
pub type NodeConfig = serde_json::Map<String, serde_json::Value>;

pub(crate) fn new_node_id() -> NodeId {
    format!("node-{}", Uuid::new_v4())
}

pub(crate) fn new_edge_id() -> EdgeId {
    format!("edge-{}", Uuid::new_v4())
}

/// Reads an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps an explicit `null` distinct from a missing field: `Some(None)` vs `None`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn new_workflow_id() -> String {
    format!("workflow-{}", Uuid::new_v4())
}

/// Canvas coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Mutable per-node payload. `kind` is set once by the store and never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    #[serde(rename = "nodeType")]
    pub kind: NodeKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: NodeConfig,
    #[serde(default)]
    pub provider: Option<LlmProvider>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl NodeData {
    /// Palette defaults for `kind`. LLM nodes start on the default provider and model.
    pub fn defaults_for(kind: NodeKind) -> Self {
        let info = kind.info();
        let is_llm = kind == NodeKind::Llm;
        Self {
            label: info.label.to_string(),
            kind,
            icon: info.icon.to_string(),
            color: info.color.to_string(),
            config: NodeConfig::new(),
            provider: is_llm.then_some(DEFAULT_LLM_PROVIDER),
            model: is_llm.then(|| DEFAULT_LLM_MODEL.to_string()),
            prompt: is_llm.then(String::new),
            temperature: is_llm.then_some(DEFAULT_LLM_TEMPERATURE),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A node instance on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub data: NodeData,
    /// Transient UI flag.
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.data.kind
    }
}

/// A directed connection between two node ports. Endpoints are not checked against the node set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
}

/// Partial update for [`NodeData`]. Only supplied fields are replaced; for the LLM fields
/// `Some(None)` clears the value (an explicit `null` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePatch {
    pub label: Option<String>,
    pub config: Option<NodeConfig>,
    #[serde(deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub provider: Option<Option<LlmProvider>>,
    #[serde(deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub model: Option<Option<String>>,
    #[serde(deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Option<String>>,
    #[serde(deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Option<f64>>,
}

impl NodePatch {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn config(mut self, config: NodeConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn provider(mut self, provider: LlmProvider) -> Self {
        self.provider = Some(Some(provider));
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(Some(model.into()));
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(Some(prompt.into()));
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(Some(temperature));
        self
    }

    /// Drop the LLM settings (provider, model, prompt, temperature).
    pub fn clear_llm(mut self) -> Self {
        self.provider = Some(None);
        self.model = Some(None);
        self.prompt = Some(None);
        self.temperature = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == NodePatch::default()
    }

    pub(crate) fn apply_to(self, data: &mut NodeData) {
        if let Some(label) = self.label {
            data.label = label;
        }
        if let Some(config) = self.config {
            data.config = config;
        }
        if let Some(provider) = self.provider {
            data.provider = provider;
        }
        if let Some(model) = self.model {
            data.model = model;
        }
        if let Some(prompt) = self.prompt {
            data.prompt = prompt;
        }
        if let Some(temperature) = self.temperature {
            data.temperature = temperature;
        }
    }
}
