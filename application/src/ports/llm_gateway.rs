//! LLM Gateway port
//!
//! Defines the interface for communicating with the hosted inference model.

use async_trait::async_trait;
use notion_agent_domain::{LlmResponse, ModelId};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// The result of one tool invocation, sent back to the model.
#[derive(Debug, Clone)]
pub struct ToolResultMessage {
    /// Id of the tool use block this result answers.
    pub tool_use_id: String,
    pub tool_name: String,
    pub output: String,
    pub is_error: bool,
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a new session with the specified model
    async fn create_session(&self, model: &ModelId) -> Result<Box<dyn LlmSession>, GatewayError>;

    /// Create a new session with a system prompt
    async fn create_session_with_system_prompt(
        &self,
        model: &ModelId,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active LLM conversation.
///
/// Sessions keep their own history; callers only send the new user turn or
/// the tool results for the previous assistant turn.
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the model used by this session
    fn model(&self) -> &ModelId;

    /// Send a user message together with the tool schemas the model may call.
    ///
    /// `tools` uses the provider-neutral format
    /// `{"name", "description", "input_schema"}`. An empty slice means the
    /// model answers from its own knowledge.
    async fn send_with_tools(
        &self,
        message: &str,
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError>;

    /// Send the results of the tool calls requested in the previous turn.
    async fn send_tool_results(
        &self,
        results: &[ToolResultMessage],
    ) -> Result<LlmResponse, GatewayError>;
}
