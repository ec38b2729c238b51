//! # Handoffs for Tower-based multi-agent supervisors
//!
//! Two constructors let agents in a supervised graph pass control around:
//!
//! - **Handoff tools** ([`create_handoff_tool`]): a tool named
//!   `transfer_to_<agent>` that, when a model calls it, returns a [`Command`]
//!   telling the orchestrator to jump to `<agent>` in the parent graph and to
//!   append a confirmation message to shared history.
//! - **Handoff-back pairs** ([`create_handoff_back_messages`]): an assistant
//!   tool call and its tool result, sharing a fresh id, that record control
//!   returning to a supervisor.
//!
//! Graph execution, history reduction and model calls stay with the host.
//! The crate only provides the values the host consumes: [`Tool`]s with a
//! host-injected tool-call id parameter, [`Message`]s convertible to
//! async-openai request messages, and [`Command`] directives.
//!
//! ## Getting Started
//!
//! ```rust
//! use tower_llm_handoff::{
//!     create_handoff_back_messages, HandoffConfig, ToolInvocation, ToolRoster,
//! };
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! // Supervisor roster: one handoff tool per worker agent
//! let roster = ToolRoster::for_agents(["billing", "research"], &HandoffConfig::default())?;
//! let specs = roster.specs(); // pass to the chat completion request
//! assert_eq!(specs[0].function.name, "transfer_to_billing");
//!
//! // The model called `transfer_to_billing`; the host dispatches it
//! let output = roster.dispatch(ToolInvocation::new("call_1", "transfer_to_billing", json!({})))?;
//! let cmd = output.into_command().expect("handoff tools return commands");
//! assert_eq!(cmd.goto.as_deref(), Some("billing"));
//!
//! // When billing is done, record the return to the supervisor
//! let (call, result) = create_handoff_back_messages("supervisor");
//! assert_eq!(call.tool_calls()[0].id, result.tool_call_id.clone().unwrap());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod handoff;
pub mod messages;
pub mod tool;

// Public re-exports for convenience
pub use command::{Command, GraphScope, StateUpdate};
pub use config::HandoffConfig;
pub use error::{HandoffError, Result};
pub use handoff::{
    create_handoff_back_messages, create_handoff_back_messages_with,
    create_handoff_back_messages_with_id, create_handoff_tool, create_handoff_tool_with,
    handoff_back_tool_name, handoff_tool_name, normalize_agent_name, validate_agent_name,
    HandoffTool, HandoffToolBuilder,
};
pub use messages::{Message, Role, ToolCall};
pub use tool::{
    inject_arguments, Injection, ParamSource, Tool, ToolInvocation, ToolOutput, ToolParam,
    ToolRoster,
};

// Re-export Tower traits that users need
pub use tower::{BoxError, Service, ServiceExt};
