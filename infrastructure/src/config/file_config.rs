//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into the typed parameters
//! the application layer consumes.

use crate::providers::bedrock::BedrockSettings;
use notion_agent_application::AgentParams;
use notion_agent_application::config::agent_params::DEFAULT_SYSTEM_PROMPT;
use notion_agent_domain::{ConnectionParams, ModelId};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Remote tool server reached through the `mcp-remote` bridge by default.
pub const DEFAULT_TOOL_SERVER_ENDPOINT: &str = "https://mcp.notion.com/mcp";

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("model.id is not set (set BEDROCK_MODEL_ID or [model] id)")]
    MissingModelId,

    #[error("model.id cannot be empty")]
    EmptyModelId,

    #[error("agent.max_steps cannot be 0")]
    InvalidMaxSteps,

    #[error("agent.{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("model.max_tokens cannot be 0")]
    InvalidMaxTokens,

    #[error("tool_server needs a command or an endpoint")]
    MissingToolServer,
}

/// Raw HTTP server configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Raw model configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Bedrock model identifier, passed through verbatim
    pub id: Option<String>,
    /// AWS region (standard AWS chain when unset)
    pub region: Option<String>,
    /// Named AWS profile
    pub profile: Option<String>,
    /// Maximum tokens per model turn
    pub max_tokens: u32,
    /// System prompt for the agent; empty string disables it
    pub system_prompt: Option<String>,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            id: None,
            region: None,
            profile: None,
            max_tokens: BedrockSettings::default().max_tokens,
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }
}

/// Raw agent loop configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Maximum model turns per question
    pub max_steps: usize,
    /// Seconds allowed for spawning the tool server and the handshake
    pub open_timeout_secs: u64,
    /// Seconds allowed for tool discovery plus the agent run
    pub request_timeout_secs: u64,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let params = AgentParams::default();
        Self {
            max_steps: params.max_steps,
            open_timeout_secs: params.open_timeout.as_secs(),
            request_timeout_secs: params.request_timeout.as_secs(),
        }
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    pub model: FileModelConfig,
    pub agent: FileAgentConfig,
    pub tool_server: ConnectionParams,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            server: FileServerConfig::default(),
            model: FileModelConfig::default(),
            agent: FileAgentConfig::default(),
            tool_server: ConnectionParams::remote(DEFAULT_TOOL_SERVER_ENDPOINT),
        }
    }
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.model_id()?;

        if self.model.max_tokens == 0 {
            return Err(ConfigValidationError::InvalidMaxTokens);
        }
        if self.agent.max_steps == 0 {
            return Err(ConfigValidationError::InvalidMaxSteps);
        }
        if self.agent.open_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout("open_timeout_secs"));
        }
        if self.agent.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout("request_timeout_secs"));
        }
        if self.tool_server.resolve_command().is_none() {
            return Err(ConfigValidationError::MissingToolServer);
        }

        Ok(())
    }

    pub fn model_id(&self) -> Result<ModelId, ConfigValidationError> {
        let id = self
            .model
            .id
            .as_deref()
            .ok_or(ConfigValidationError::MissingModelId)?;
        ModelId::new(id).map_err(|_| ConfigValidationError::EmptyModelId)
    }

    pub fn agent_params(&self) -> AgentParams {
        let system_prompt = self
            .model
            .system_prompt
            .clone()
            .filter(|p| !p.trim().is_empty());

        AgentParams::default()
            .with_max_steps(self.agent.max_steps)
            .with_open_timeout(Duration::from_secs(self.agent.open_timeout_secs))
            .with_request_timeout(Duration::from_secs(self.agent.request_timeout_secs))
            .with_system_prompt(system_prompt)
    }

    pub fn bedrock_settings(&self) -> BedrockSettings {
        BedrockSettings {
            region: self.model.region.clone(),
            profile: self.model.profile.clone(),
            max_tokens: self.model.max_tokens,
        }
    }

    pub fn connection_params(&self) -> ConnectionParams {
        self.tool_server.clone()
    }

    /// Render as TOML (for `--show-config`).
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_model(mut config: FileConfig) -> FileConfig {
        config.model.id = Some("anthropic.claude-3-haiku-20240307-v1:0".to_string());
        config
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
host = "127.0.0.1"
port = 9000

[model]
id = "anthropic.claude-3-5-sonnet-20240620-v1:0"
region = "us-east-1"
profile = "notion"
max_tokens = 2048
system_prompt = "Be brief."

[agent]
max_steps = 4
open_timeout_secs = 20
request_timeout_secs = 120

[tool_server]
endpoint = "https://example.com/mcp"

[tool_server.env]
NODE_OPTIONS = "--max-old-space-size=512"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.model.region.as_deref(), Some("us-east-1"));
        assert_eq!(config.agent.max_steps, 4);
        assert_eq!(
            config.tool_server.env.get("NODE_OPTIONS").map(String::as_str),
            Some("--max-old-space-size=512")
        );
        assert!(config.validate().is_ok());

        let params = config.agent_params();
        assert_eq!(params.max_steps, 4);
        assert_eq!(params.open_timeout, Duration::from_secs(20));
        assert_eq!(params.request_timeout, Duration::from_secs(120));
        assert_eq!(params.system_prompt.as_deref(), Some("Be brief."));

        let settings = config.bedrock_settings();
        assert_eq!(settings.profile.as_deref(), Some("notion"));
        assert_eq!(settings.max_tokens, 2048);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[model]
id = "amazon.nova-pro-v1:0"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        // Defaults should apply
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.agent.max_steps, 10);
        assert_eq!(config.model_id().unwrap().as_str(), "amazon.nova-pro-v1:0");
    }

    #[test]
    fn test_default_tool_server_is_notion_bridge() {
        let config = FileConfig::default();
        let (program, args) = config.connection_params().resolve_command().unwrap();
        assert_eq!(program, "npx");
        assert_eq!(args, vec!["-y", "mcp-remote", DEFAULT_TOOL_SERVER_ENDPOINT]);
    }

    #[test]
    fn test_validate_missing_model() {
        assert_eq!(
            FileConfig::default().validate(),
            Err(ConfigValidationError::MissingModelId)
        );

        let mut config = FileConfig::default();
        config.model.id = Some("   ".to_string());
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyModelId));
    }

    #[test]
    fn test_validate_zero_values() {
        let mut config = with_model(FileConfig::default());
        config.agent.max_steps = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidMaxSteps));

        let mut config = with_model(FileConfig::default());
        config.agent.request_timeout_secs = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout("request_timeout_secs"))
        );
    }

    #[test]
    fn test_validate_missing_tool_server() {
        let mut config = with_model(FileConfig::default());
        config.tool_server = ConnectionParams::default();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::MissingToolServer)
        );
    }

    #[test]
    fn test_empty_system_prompt_disables_it() {
        let mut config = with_model(FileConfig::default());
        config.model.system_prompt = Some(String::new());
        assert!(config.agent_params().system_prompt.is_none());
    }

    #[test]
    fn test_toml_output_roundtrips() {
        let config = with_model(FileConfig::default());
        let rendered = config.to_toml_string().unwrap();
        let parsed: FileConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.model.id, config.model.id);
        assert_eq!(parsed.tool_server, config.tool_server);
    }
}
