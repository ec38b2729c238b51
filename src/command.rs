//! Control transfer directives
//!
//! A [`Command`] is what a handoff tool hands back to the orchestrator instead
//! of a plain tool result: the node to jump to, the graph scope the jump is
//! resolved in, and the history update to apply together with the jump.

use serde::{Deserialize, Serialize};

use crate::messages::Message;

/// Graph scope a [`Command`] is resolved in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphScope {
    /// The graph that executed the tool
    #[default]
    Current,
    /// The graph enclosing the one that executed the tool
    Parent,
}

/// History update applied atomically with a jump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub messages: Vec<Message>,
}

impl StateUpdate {
    pub fn messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends the update's messages to `history` in order.
    ///
    /// Replacing messages by id is left to the host's own reducer.
    pub fn append_to(&self, history: &mut Vec<Message>) {
        history.extend(self.messages.iter().cloned());
    }
}

/// Control transfer directive returned to the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goto: Option<String>,
    pub graph: GraphScope,
    #[serde(default, skip_serializing_if = "StateUpdate::is_empty")]
    pub update: StateUpdate,
}

impl Command {
    /// Jump to `node` in the current graph with no update.
    pub fn goto(node: impl Into<String>) -> Self {
        Self {
            goto: Some(node.into()),
            ..Self::default()
        }
    }

    /// Resolve this command in the enclosing graph.
    pub fn in_parent(mut self) -> Self {
        self.graph = GraphScope::Parent;
        self
    }

    pub fn with_update(mut self, update: StateUpdate) -> Self {
        self.update = update;
        self
    }

    pub fn targets_parent(&self) -> bool {
        self.graph == GraphScope::Parent
    }

    /// Re-scope a command surfaced by a nested graph for its parent.
    ///
    /// A `Parent`-scoped command becomes `Current` in the enclosing graph. A
    /// `Current`-scoped command belongs to the graph that produced it and
    /// yields `None`.
    pub fn lift(self) -> Option<Command> {
        match self.graph {
            GraphScope::Parent => Some(Self {
                graph: GraphScope::Current,
                ..self
            }),
            GraphScope::Current => None,
        }
    }
}
