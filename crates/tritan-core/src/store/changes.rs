//! Change-set records emitted by the canvas and the outcomes of applying them.

use serde::{Deserialize, Serialize};

use crate::model::{EdgeId, NodeId, Position};

/// Result of a single mutation addressed by id. Stale ids are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Missing,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub(crate) fn found(found: bool) -> Self {
        if found {
            Outcome::Applied
        } else {
            Outcome::Missing
        }
    }
}

/// Tally of a change batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub applied: usize,
    pub ignored: usize,
}

impl ChangeSummary {
    pub(crate) fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Applied => self.applied += 1,
            Outcome::Missing => self.ignored += 1,
        }
    }
}

/// One entry of a node change batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeChange {
    /// Move a node. A change without a position (end of drag) does nothing.
    Position {
        id: NodeId,
        #[serde(default)]
        position: Option<Position>,
    },
    Remove {
        id: NodeId,
    },
    Select {
        id: NodeId,
        selected: bool,
    },
    /// Any change kind the store does not handle (dimensions, replace, ...).
    #[serde(other)]
    Other,
}

impl NodeChange {
    pub fn position(id: impl Into<NodeId>, position: Position) -> Self {
        NodeChange::Position {
            id: id.into(),
            position: Some(position),
        }
    }

    pub fn remove(id: impl Into<NodeId>) -> Self {
        NodeChange::Remove { id: id.into() }
    }

    pub fn select(id: impl Into<NodeId>, selected: bool) -> Self {
        NodeChange::Select {
            id: id.into(),
            selected,
        }
    }
}

/// One entry of an edge change batch. Only removal is acted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeChange {
    Remove {
        id: EdgeId,
    },
    #[serde(other)]
    Other,
}

impl EdgeChange {
    pub fn remove(id: impl Into<EdgeId>) -> Self {
        EdgeChange::Remove { id: id.into() }
    }
}
