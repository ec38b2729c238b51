//! Error types for handoff construction and dispatch

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, HandoffError>;

/// Main error type for handoff tools and their host bindings
#[derive(Debug, Error)]
pub enum HandoffError {
    /// Agent or supervisor name was empty
    #[error("agent name must not be empty")]
    EmptyAgentName,

    /// Derived tool name is not accepted by tool-calling providers
    #[error("invalid tool name `{name}`: {reason}")]
    InvalidToolName { name: String, reason: String },

    /// Two tools with the same name were registered in one roster
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),

    /// Invocation named a tool the roster does not know
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The host did not inject a parameter the tool declared as injected
    #[error("tool `{tool}` is missing injected argument `{param}`")]
    MissingInjectedArgument { tool: String, param: String },

    /// Error building OpenAI request types
    #[error("OpenAI type error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HandoffError::DuplicateTool("transfer_to_billing".to_string());
        assert_eq!(err.to_string(), "duplicate tool name: transfer_to_billing");

        let err = HandoffError::MissingInjectedArgument {
            tool: "transfer_to_billing".to_string(),
            param: "tool_call_id".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "tool `transfer_to_billing` is missing injected argument `tool_call_id`"
        );
    }

    #[test]
    fn test_error_from_openai() {
        let openai_err = async_openai::error::OpenAIError::InvalidArgument("test".to_string());
        let err: HandoffError = openai_err.into();
        assert!(matches!(err, HandoffError::OpenAI(_)));
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HandoffError = serde_err.into();
        assert!(matches!(err, HandoffError::Serialization(_)));
    }
}
