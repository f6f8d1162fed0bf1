//! Closed catalogs: node kinds with their palette defaults, and LLM providers with their models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category of a workflow node. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Trigger,
    Action,
    Condition,
    Loop,
    Llm,
    Http,
    Code,
    Transform,
}

/// Palette defaults for a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

impl NodeKind {
    pub const ALL: [NodeKind; 8] = [
        NodeKind::Trigger,
        NodeKind::Action,
        NodeKind::Condition,
        NodeKind::Loop,
        NodeKind::Llm,
        NodeKind::Http,
        NodeKind::Code,
        NodeKind::Transform,
    ];

    /// Wire name, as carried in the `type` field of engine requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Trigger => "trigger",
            NodeKind::Action => "action",
            NodeKind::Condition => "condition",
            NodeKind::Loop => "loop",
            NodeKind::Llm => "llm",
            NodeKind::Http => "http",
            NodeKind::Code => "code",
            NodeKind::Transform => "transform",
        }
    }

    pub fn info(&self) -> KindInfo {
        match self {
            NodeKind::Trigger => KindInfo {
                label: "Trigger",
                color: "#22c55e",
                icon: "⚡",
                description: "Start your workflow",
            },
            NodeKind::Action => KindInfo {
                label: "Action",
                color: "#6366f1",
                icon: "▶️",
                description: "Perform an action",
            },
            NodeKind::Condition => KindInfo {
                label: "Condition",
                color: "#f59e0b",
                icon: "🔀",
                description: "Branch based on condition",
            },
            NodeKind::Loop => KindInfo {
                label: "Loop",
                color: "#8b5cf6",
                icon: "🔄",
                description: "Iterate over items",
            },
            NodeKind::Llm => KindInfo {
                label: "LLM",
                color: "#ec4899",
                icon: "🤖",
                description: "AI/LLM processing",
            },
            NodeKind::Http => KindInfo {
                label: "HTTP",
                color: "#3b82f6",
                icon: "🌐",
                description: "Make HTTP requests",
            },
            NodeKind::Code => KindInfo {
                label: "Code",
                color: "#14b8a6",
                icon: "💻",
                description: "Run custom code",
            },
            NodeKind::Transform => KindInfo {
                label: "Transform",
                color: "#f97316",
                icon: "🔧",
                description: "Transform data",
            },
        }
    }

    /// Named output handles. Empty means the single default port.
    pub fn output_handles(&self) -> &'static [&'static str] {
        match self {
            NodeKind::Condition => &["true", "false"],
            _ => &[],
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown kind or provider name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {value}")]
pub struct UnknownName {
    pub what: &'static str,
    pub value: String,
}

impl FromStr for NodeKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownName {
                what: "node kind",
                value: s.to_string(),
            })
    }
}

/// LLM vendor an `llm` node talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Groq,
    OpenRouter,
    Cerebras,
    Gemini,
}

pub const DEFAULT_LLM_PROVIDER: LlmProvider = LlmProvider::Groq;
pub const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_LLM_TEMPERATURE: f64 = 0.7;

impl LlmProvider {
    pub const ALL: [LlmProvider; 4] = [
        LlmProvider::Groq,
        LlmProvider::OpenRouter,
        LlmProvider::Cerebras,
        LlmProvider::Gemini,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Groq => "groq",
            LlmProvider::OpenRouter => "openrouter",
            LlmProvider::Cerebras => "cerebras",
            LlmProvider::Gemini => "gemini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LlmProvider::Groq => "Groq",
            LlmProvider::OpenRouter => "OpenRouter",
            LlmProvider::Cerebras => "Cerebras",
            LlmProvider::Gemini => "Gemini",
        }
    }

    /// Models offered for this provider, in palette order.
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            LlmProvider::Groq => &[
                "llama-3.3-70b-versatile",
                "llama-3.1-8b-instant",
                "mixtral-8x7b-32768",
            ],
            LlmProvider::OpenRouter => &[
                "anthropic/claude-3.5-sonnet",
                "openai/gpt-4o",
                "google/gemini-2.0-flash-exp:free",
            ],
            LlmProvider::Cerebras => &["llama3.1-8b", "llama3.1-70b"],
            LlmProvider::Gemini => &["gemini-2.0-flash-exp", "gemini-1.5-pro"],
        }
    }

    /// Membership check only; the store accepts any model string.
    pub fn supports(&self, model: &str) -> bool {
        self.models().contains(&model)
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LlmProvider::ALL
            .into_iter()
            .find(|provider| provider.as_str() == wanted)
            .ok_or_else(|| UnknownName {
                what: "llm provider",
                value: s.to_string(),
            })
    }
}
