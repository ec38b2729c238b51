//! # Agent Handoffs
//!
//! Handoffs let one agent in a supervised graph pass control to another named
//! agent. Two constructors cover both directions:
//!
//! - [`create_handoff_tool`] builds a [`HandoffTool`] named
//!   `transfer_to_<agent>`. When the model calls it, the tool returns a
//!   [`Command`] that jumps to `<agent>` in the parent graph and appends a
//!   confirmation tool message to shared history.
//! - [`create_handoff_back_messages`] builds the assistant call and tool result
//!   that record control returning to a supervisor, for insertion straight into
//!   history without running a tool.
//!
//! The only parameter of a handoff tool is the id of the tool call, which the
//! host injects; the model sees an empty parameter object.
//!
//! ### Example: Routing to a billing agent
//!
//! ```rust
//! use tower_llm_handoff::{create_handoff_tool, GraphScope, Tool};
//!
//! let tool = create_handoff_tool("billing");
//! assert_eq!(tool.name(), "transfer_to_billing");
//!
//! let cmd = tool.transfer("call_abc");
//! assert_eq!(cmd.goto.as_deref(), Some("billing"));
//! assert_eq!(cmd.graph, GraphScope::Parent);
//! assert_eq!(cmd.update.messages[0].content, "Successfully transferred to billing");
//! ```

use std::task::{Context, Poll};

use futures::future::{ready, Ready};
use serde_json::{json, Value};
use tower::{BoxError, Service};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::command::{Command, StateUpdate};
use crate::config::HandoffConfig;
use crate::error::{HandoffError, Result};
use crate::messages::{Message, ToolCall};
use crate::tool::{
    inject_arguments, validate_tool_name, Injection, Tool, ToolInvocation, ToolOutput, ToolParam,
};

/// Name of the injected parameter carrying the current tool-call id.
pub const TOOL_CALL_ID_PARAM: &str = "tool_call_id";

/// `transfer_to_<agent_name>`
pub fn handoff_tool_name(agent_name: &str) -> String {
    HandoffConfig::default().tool_name_for(agent_name)
}

/// `transfer_back_to_<supervisor_name>`
pub fn handoff_back_tool_name(supervisor_name: &str) -> String {
    HandoffConfig::default().back_tool_name_for(supervisor_name)
}

/// Normalize a display name into an agent name: trimmed, lowercased, with
/// whitespace runs collapsed to `_`.
pub fn normalize_agent_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Check that `agent_name` is non-empty and that the forward tool name derived
/// from it is accepted by tool-calling providers.
pub fn validate_agent_name(agent_name: &str, config: &HandoffConfig) -> Result<()> {
    if agent_name.is_empty() {
        return Err(HandoffError::EmptyAgentName);
    }
    validate_tool_name(&config.tool_name_for(agent_name), config.max_tool_name_len)
}

/// A tool that transfers control to another agent in the parent graph.
#[derive(Debug, Clone, PartialEq)]
pub struct HandoffTool {
    target: String,
    name: String,
    description: String,
    params: Vec<ToolParam>,
}

impl HandoffTool {
    pub fn builder(agent_name: impl Into<String>) -> HandoffToolBuilder {
        HandoffToolBuilder::new(agent_name)
    }

    /// Agent node this tool jumps to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Build the directive for a call with id `tool_call_id`.
    pub fn transfer(&self, tool_call_id: &str) -> Command {
        let confirmation = Message::tool(
            format!("Successfully transferred to {}", self.target),
            tool_call_id,
        )
        .with_name(self.name.as_str());

        trace!(tool = %self.name, target = %self.target, call_id = %tool_call_id, "handoff invoked");

        Command::goto(self.target.as_str())
            .in_parent()
            .with_update(StateUpdate::messages(vec![confirmation]))
    }
}

impl Tool for HandoffTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &[ToolParam] {
        &self.params
    }

    fn invoke(&self, arguments: Value) -> Result<ToolOutput> {
        let tool_call_id = arguments
            .get(TOOL_CALL_ID_PARAM)
            .and_then(Value::as_str)
            .ok_or_else(|| HandoffError::MissingInjectedArgument {
                tool: self.name.clone(),
                param: TOOL_CALL_ID_PARAM.to_string(),
            })?;
        Ok(ToolOutput::Command(self.transfer(tool_call_id)))
    }
}

/// A single handoff tool is also a Tower service over invocations.
impl Service<ToolInvocation> for HandoffTool {
    type Response = ToolOutput;
    type Error = BoxError;
    type Future = Ready<std::result::Result<ToolOutput, BoxError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ToolInvocation) -> Self::Future {
        if req.name != self.name {
            return ready(Err(format!(
                "routed to wrong tool: expected={}, got={}",
                self.name, req.name
            )
            .into()));
        }
        let arguments = inject_arguments(&*self, &req);
        ready(self.invoke(arguments).map_err(BoxError::from))
    }
}

/// Builder for [`HandoffTool`] with a custom tool name or description.
#[derive(Debug, Clone)]
pub struct HandoffToolBuilder {
    agent_name: String,
    tool_name: Option<String>,
    description: Option<String>,
    config: HandoffConfig,
}

impl HandoffToolBuilder {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            tool_name: None,
            description: None,
            config: HandoffConfig::default(),
        }
    }

    /// Set custom tool name (default: "{tool_prefix}{agent}")
    pub fn tool_name(mut self, name: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self
    }

    /// Set custom tool description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn config(mut self, config: &HandoffConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn build(self) -> HandoffTool {
        let name = self
            .tool_name
            .unwrap_or_else(|| self.config.tool_name_for(&self.agent_name));
        let description = self.description.unwrap_or(self.config.description);

        debug!(tool = %name, target = %self.agent_name, "created handoff tool");

        HandoffTool {
            target: self.agent_name,
            name,
            description,
            params: vec![ToolParam::injected::<String>(
                TOOL_CALL_ID_PARAM,
                Injection::ToolCallId,
            )],
        }
    }
}

/// Create a tool that hands control to `agent_name`.
///
/// The name is not checked against the host graph; a target that does not
/// exist fails when the orchestrator attempts the jump.
pub fn create_handoff_tool(agent_name: impl Into<String>) -> HandoffTool {
    HandoffToolBuilder::new(agent_name).build()
}

pub fn create_handoff_tool_with(agent_name: impl Into<String>, config: &HandoffConfig) -> HandoffTool {
    HandoffToolBuilder::new(agent_name).config(config).build()
}

/// Create the (assistant call, tool result) pair recording a return to
/// `supervisor_name`. Both messages share a fresh UUID v4 tool-call id.
pub fn create_handoff_back_messages(supervisor_name: &str) -> (Message, Message) {
    create_handoff_back_messages_with(supervisor_name, &HandoffConfig::default())
}

pub fn create_handoff_back_messages_with(
    supervisor_name: &str,
    config: &HandoffConfig,
) -> (Message, Message) {
    handoff_back_pair(supervisor_name, &Uuid::new_v4().to_string(), config)
}

/// Same as [`create_handoff_back_messages`] with a caller-chosen id, for
/// replaying recorded transcripts.
pub fn create_handoff_back_messages_with_id(
    supervisor_name: &str,
    tool_call_id: &str,
) -> (Message, Message) {
    handoff_back_pair(supervisor_name, tool_call_id, &HandoffConfig::default())
}

fn handoff_back_pair(
    supervisor_name: &str,
    tool_call_id: &str,
    config: &HandoffConfig,
) -> (Message, Message) {
    let tool_name = config.back_tool_name_for(supervisor_name);
    debug!(tool = %tool_name, call_id = %tool_call_id, "created handoff-back messages");

    let call = Message::assistant_with_tool_calls(
        format!("Transferring back to {supervisor_name}"),
        vec![ToolCall::new(tool_call_id, tool_name.as_str(), json!({}))],
    );
    let result = Message::tool(
        format!("Successfully transferred back to {supervisor_name}"),
        tool_call_id,
    )
    .with_name(tool_name);
    (call, result)
}
