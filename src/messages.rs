//! Messages exchanged through the host's shared history
//!
//! [`Message`] is the host-agnostic shape handoffs produce: role, content, an
//! optional tool name, an optional tool-call id and, for assistant turns, the
//! embedded tool calls. Conversions to and from async-openai request messages
//! let the pair be spliced into an OpenAI chat transcript.

use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestAssistantMessageContent, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestSystemMessageContent,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestToolMessageContent,
    ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
    ChatCompletionToolType, FunctionCall,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool call embedded in an assistant message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_call_id: None,
            tool_calls: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    pub fn assistant_with_tool_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Self {
        Self {
            tool_calls: Some(tool_calls),
            ..Self::with_role(Role::Assistant, content)
        }
    }

    /// Tool result correlated to a call by `tool_call_id`.
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::with_role(Role::Tool, content)
        }
    }

    /// Sets the name tag (for tool results, the name of the tool that produced it).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_tool_result(&self) -> bool {
        self.role == Role::Tool
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or(&[])
    }

    /// Convert into an async-openai request message.
    ///
    /// OpenAI tool messages have no name field, so `name` is dropped for
    /// [`Role::Tool`].
    pub fn to_openai(&self) -> Result<ChatCompletionRequestMessage> {
        let message = match self.role {
            Role::System => {
                let mut args = ChatCompletionRequestSystemMessageArgs::default();
                args.content(self.content.clone());
                if let Some(name) = &self.name {
                    args.name(name.as_str());
                }
                ChatCompletionRequestMessage::System(args.build()?)
            }
            Role::User => {
                let mut args = ChatCompletionRequestUserMessageArgs::default();
                args.content(self.content.clone());
                if let Some(name) = &self.name {
                    args.name(name.as_str());
                }
                ChatCompletionRequestMessage::User(args.build()?)
            }
            Role::Assistant => {
                let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                args.content(self.content.clone());
                if let Some(name) = &self.name {
                    args.name(name.as_str());
                }
                if let Some(calls) = &self.tool_calls {
                    let calls = calls
                        .iter()
                        .map(|tc| {
                            Ok(ChatCompletionMessageToolCall {
                                id: tc.id.clone(),
                                r#type: ChatCompletionToolType::Function,
                                function: FunctionCall {
                                    name: tc.name.clone(),
                                    arguments: serde_json::to_string(&tc.arguments)?,
                                },
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;
                    args.tool_calls(calls);
                }
                ChatCompletionRequestMessage::Assistant(args.build()?)
            }
            Role::Tool => {
                let message = ChatCompletionRequestToolMessageArgs::default()
                    .content(self.content.clone())
                    .tool_call_id(self.tool_call_id.clone().unwrap_or_default())
                    .build()?;
                ChatCompletionRequestMessage::Tool(message)
            }
        };
        Ok(message)
    }

    /// Convert from an async-openai request message.
    ///
    /// Only text content is carried over. Tool-call arguments that are not
    /// valid JSON are kept as a JSON string.
    pub fn from_openai(message: &ChatCompletionRequestMessage) -> Self {
        match message {
            ChatCompletionRequestMessage::System(s) => Self {
                name: s.name.clone(),
                ..Self::system(match &s.content {
                    ChatCompletionRequestSystemMessageContent::Text(t) => t.clone(),
                    _ => String::new(),
                })
            },
            ChatCompletionRequestMessage::Developer(d) => Self {
                name: d.name.clone(),
                ..Self::system(match &d.content {
                    async_openai::types::ChatCompletionRequestDeveloperMessageContent::Text(t) => {
                        t.clone()
                    }
                    _ => String::new(),
                })
            },
            ChatCompletionRequestMessage::User(u) => Self {
                name: u.name.clone(),
                ..Self::user(match &u.content {
                    ChatCompletionRequestUserMessageContent::Text(t) => t.clone(),
                    _ => String::new(),
                })
            },
            ChatCompletionRequestMessage::Assistant(a) => {
                let content = match &a.content {
                    Some(ChatCompletionRequestAssistantMessageContent::Text(t)) => t.clone(),
                    _ => String::new(),
                };
                let tool_calls = a.tool_calls.as_ref().map(|calls| {
                    calls
                        .iter()
                        .map(|tc| {
                            let arguments = serde_json::from_str(&tc.function.arguments)
                                .unwrap_or_else(|_| Value::String(tc.function.arguments.clone()));
                            ToolCall::new(tc.id.clone(), tc.function.name.clone(), arguments)
                        })
                        .collect()
                });
                Self {
                    name: a.name.clone(),
                    tool_calls,
                    ..Self::assistant(content)
                }
            }
            ChatCompletionRequestMessage::Tool(t) => Self::tool(
                match &t.content {
                    ChatCompletionRequestToolMessageContent::Text(s) => s.clone(),
                    _ => String::new(),
                },
                t.tool_call_id.clone(),
            ),
            ChatCompletionRequestMessage::Function(f) => Self {
                name: Some(f.name.clone()),
                ..Self::with_role(Role::Tool, f.content.clone().unwrap_or_default())
            },
        }
    }
}
