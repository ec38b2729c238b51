//! Configuration for handoff naming and validation
//!
//! The defaults reproduce the fixed naming scheme (`transfer_to_<agent>`,
//! `transfer_back_to_<supervisor>`) and the permissive behavior of the
//! factories. Hosts that load settings from a file can deserialize
//! [`HandoffConfig`] directly; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Prefix of forward handoff tool names.
pub const HANDOFF_TOOL_PREFIX: &str = "transfer_to_";

/// Prefix of handoff-back tool names.
pub const HANDOFF_BACK_TOOL_PREFIX: &str = "transfer_back_to_";

/// Description shown to the model for every forward handoff tool.
pub const HANDOFF_TOOL_DESCRIPTION: &str = "Ask another agent for help.";

/// Longest function name accepted by OpenAI tool calling.
pub const MAX_TOOL_NAME_LEN: usize = 64;

/// Handoff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffConfig {
    /// Prefix prepended to the target agent name for forward handoffs
    pub tool_prefix: String,

    /// Prefix prepended to the supervisor name for handoff-back pairs
    pub back_tool_prefix: String,

    /// Description of forward handoff tools
    pub description: String,

    /// Validate agent names when tools are registered in a roster
    pub validate_names: bool,

    /// Maximum length of a derived tool name when validating
    pub max_tool_name_len: usize,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            tool_prefix: HANDOFF_TOOL_PREFIX.to_string(),
            back_tool_prefix: HANDOFF_BACK_TOOL_PREFIX.to_string(),
            description: HANDOFF_TOOL_DESCRIPTION.to_string(),
            validate_names: false,
            max_tool_name_len: MAX_TOOL_NAME_LEN,
        }
    }
}

impl HandoffConfig {
    /// Parse a configuration from JSON; absent keys keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Enable or disable name validation
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_names = enabled;
        self
    }

    /// Override the forward handoff description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub(crate) fn tool_name_for(&self, agent_name: &str) -> String {
        format!("{}{}", self.tool_prefix, agent_name)
    }

    pub(crate) fn back_tool_name_for(&self, supervisor_name: &str) -> String {
        format!("{}{}", self.back_tool_prefix, supervisor_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = HandoffConfig::default();
        assert_eq!(config.tool_prefix, "transfer_to_");
        assert_eq!(config.back_tool_prefix, "transfer_back_to_");
        assert_eq!(config.description, "Ask another agent for help.");
        assert!(!config.validate_names);
        assert_eq!(config.max_tool_name_len, 64);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = HandoffConfig::from_json_str(r#"{"validate_names": true}"#).unwrap();
        assert!(config.validate_names);
        assert_eq!(config.tool_prefix, HANDOFF_TOOL_PREFIX);
        assert_eq!(config.max_tool_name_len, MAX_TOOL_NAME_LEN);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(HandoffConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_name_derivation() {
        let config = HandoffConfig::default();
        assert_eq!(config.tool_name_for("billing"), "transfer_to_billing");
        assert_eq!(
            config.back_tool_name_for("supervisor"),
            "transfer_back_to_supervisor"
        );
    }
}
