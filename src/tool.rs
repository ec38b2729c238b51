//! Invocable tool interface and the host-side roster
//!
//! A [`Tool`] declares its parameters up front. Each [`ToolParam`] carries a
//! [`ParamSource`]: either the model supplies it, or the host's invocation
//! machinery injects it (for example the id of the tool call being executed).
//! Injected parameters are hidden from the schema the model sees and filled in
//! by [`inject_arguments`] right before [`Tool::invoke`].
//!
//! [`ToolRoster`] is the dispatch table a supervisor hands to its model: it
//! rejects colliding names, publishes OpenAI tool specs, and routes
//! [`ToolInvocation`]s as a Tower service.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use futures::future::{ready, Ready};
use schemars::JsonSchema;
use serde_json::{json, Map, Value};
use tower::{BoxError, Service};
use tracing::{debug, instrument, warn};

use crate::command::Command;
use crate::config::HandoffConfig;
use crate::error::{HandoffError, Result};
use crate::handoff::{create_handoff_tool_with, validate_agent_name};
use crate::messages::Message;

/// Value the host injects into a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injection {
    /// Id of the tool call currently being executed
    ToolCallId,
}

/// Who supplies a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    Model,
    Injected(Injection),
}

/// Declaration of a single tool parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolParam {
    pub name: String,
    pub description: Option<String>,
    pub schema: Value,
    pub required: bool,
    pub source: ParamSource,
}

impl ToolParam {
    /// A required, model-supplied parameter whose schema is derived from `T`.
    pub fn of<T: JsonSchema>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            schema: schema_value::<T>(),
            required: true,
            source: ParamSource::Model,
        }
    }

    /// A parameter the host fills in; the model never sees it.
    pub fn injected<T: JsonSchema>(name: impl Into<String>, injection: Injection) -> Self {
        Self {
            source: ParamSource::Injected(injection),
            ..Self::of::<T>(name)
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn is_injected(&self) -> bool {
        matches!(self.source, ParamSource::Injected(_))
    }
}

fn schema_value<T: JsonSchema>() -> Value {
    let mut gen = schemars::gen::SchemaGenerator::default();
    serde_json::to_value(gen.subschema_for::<T>()).unwrap_or_else(|_| json!({}))
}

/// Uniform tool invocation as seen by the host's dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub id: String,   // tool_call_id
    pub name: String, // function.name
    pub arguments: Value,
}

impl ToolInvocation {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// What a tool hands back to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// A plain result to append to history
    Message(Message),
    /// A control transfer for the orchestrator
    Command(Command),
}

impl ToolOutput {
    pub fn as_command(&self) -> Option<&Command> {
        match self {
            ToolOutput::Command(cmd) => Some(cmd),
            ToolOutput::Message(_) => None,
        }
    }

    pub fn into_command(self) -> Option<Command> {
        match self {
            ToolOutput::Command(cmd) => Some(cmd),
            ToolOutput::Message(_) => None,
        }
    }
}

/// Trait for tools a supervisor graph can expose to a model
pub trait Tool: Send + Sync + Debug {
    /// Get the name of the tool
    fn name(&self) -> &str;

    /// Get the description of the tool
    fn description(&self) -> &str;

    /// All declared parameters, injected ones included
    fn parameters(&self) -> &[ToolParam];

    /// Execute the tool with arguments that already carry injected values
    fn invoke(&self, arguments: Value) -> Result<ToolOutput>;

    /// JSON schema of the parameters the model supplies.
    fn model_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in self.parameters().iter().filter(|p| !p.is_injected()) {
            let mut schema = param.schema.clone();
            if let (Some(desc), Some(obj)) = (&param.description, schema.as_object_mut()) {
                obj.insert("description".to_string(), Value::String(desc.clone()));
            }
            properties.insert(param.name.clone(), schema);
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    fn injected_params(&self) -> Vec<&ToolParam> {
        self.parameters().iter().filter(|p| p.is_injected()).collect()
    }

    /// Convert this tool's signature into an OpenAI ChatCompletionTool spec.
    fn to_openai_tool(&self) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: self.name().to_string(),
                description: Some(self.description().to_string()),
                parameters: Some(self.model_schema()),
                ..Default::default()
            },
        }
    }
}

/// Fill every injected parameter of `tool` from `invocation`.
///
/// Model-supplied arguments are kept; an injected key the model also sent is
/// overwritten. Non-object arguments are replaced with an object.
pub fn inject_arguments(tool: &dyn Tool, invocation: &ToolInvocation) -> Value {
    let mut args = match &invocation.arguments {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    for param in tool.injected_params() {
        let value = match param.source {
            ParamSource::Injected(Injection::ToolCallId) => Value::String(invocation.id.clone()),
            ParamSource::Model => continue,
        };
        args.insert(param.name.clone(), value);
    }
    Value::Object(args)
}

/// Check a tool name against what tool-calling providers accept.
pub fn validate_tool_name(name: &str, max_len: usize) -> Result<()> {
    let invalid = |reason: String| HandoffError::InvalidToolName {
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("name is empty".to_string()));
    }
    if name.len() > max_len {
        return Err(invalid(format!("longer than {max_len} characters")));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(invalid(format!("unsupported character {c:?}")));
    }
    Ok(())
}

/// Name-indexed set of tools with unique names.
#[derive(Clone, Default)]
pub struct ToolRoster {
    tools: Vec<Arc<dyn Tool>>,
    name_to_index: HashMap<String, usize>,
    config: HandoffConfig,
}

impl Debug for ToolRoster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRoster")
            .field("tools", &self.names())
            .field("validate_names", &self.config.validate_names)
            .finish()
    }
}

impl ToolRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HandoffConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Roster holding one handoff tool per agent, in the given order.
    pub fn for_agents<I, S>(agents: I, config: &HandoffConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::with_config(config.clone());
        for agent in agents {
            let agent = agent.as_ref();
            if config.validate_names {
                validate_agent_name(agent, config)?;
            }
            roster.register(create_handoff_tool_with(agent, config))?;
        }
        Ok(roster)
    }

    /// Add a tool; fails if its name is already taken.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<&mut Self> {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<&mut Self> {
        let name = tool.name().to_string();
        if self.config.validate_names {
            validate_tool_name(&name, self.config.max_tool_name_len)?;
        }
        if self.name_to_index.contains_key(&name) {
            return Err(HandoffError::DuplicateTool(name));
        }
        debug!(tool = %name, "registered tool");
        self.name_to_index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.name_to_index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// OpenAI tool specs in registration order.
    pub fn specs(&self) -> Vec<ChatCompletionTool> {
        self.tools.iter().map(|t| t.to_openai_tool()).collect()
    }

    /// Route an invocation to its tool, injecting host-supplied parameters.
    #[instrument(skip(self, invocation), fields(tool = %invocation.name, call_id = %invocation.id))]
    pub fn dispatch(&self, invocation: ToolInvocation) -> Result<ToolOutput> {
        let Some(tool) = self.get(&invocation.name) else {
            warn!("invocation for unknown tool");
            return Err(HandoffError::UnknownTool(invocation.name));
        };
        let arguments = inject_arguments(tool.as_ref(), &invocation);
        tool.invoke(arguments)
    }
}

impl Service<ToolInvocation> for ToolRoster {
    type Response = ToolOutput;
    type Error = BoxError;
    type Future = Ready<std::result::Result<ToolOutput, BoxError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ToolInvocation) -> Self::Future {
        ready(self.dispatch(req).map_err(BoxError::from))
    }
}
