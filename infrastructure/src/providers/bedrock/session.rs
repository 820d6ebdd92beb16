//! Bedrock LLM session implementation
//!
//! Wraps the AWS Bedrock Converse API to implement the `LlmSession` trait.
//! Manages conversation history locally since the Converse API is stateless.

use super::types;
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::types as bedrock;
use notion_agent_application::{GatewayError, LlmSession, ToolResultMessage};
use notion_agent_domain::{LlmResponse, ModelId};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub struct BedrockSession {
    client: Arc<BedrockClient>,
    model: ModelId,
    system_prompt: Option<String>,
    max_tokens: i32,
    /// Conversation history (stateless API requires full history each call)
    messages: Mutex<Vec<bedrock::Message>>,
    /// Tool configuration (set when send_with_tools is first called)
    tool_config: Mutex<Option<bedrock::ToolConfiguration>>,
}

impl BedrockSession {
    pub fn new(
        client: Arc<BedrockClient>,
        model: ModelId,
        system_prompt: Option<String>,
        max_tokens: i32,
    ) -> Self {
        Self {
            client,
            model,
            system_prompt,
            max_tokens,
            messages: Mutex::new(Vec::new()),
            tool_config: Mutex::new(None),
        }
    }

    /// Build the system prompt as a SystemContentBlock list.
    fn system_blocks(&self) -> Vec<bedrock::SystemContentBlock> {
        match &self.system_prompt {
            Some(prompt) if !prompt.is_empty() => {
                vec![bedrock::SystemContentBlock::Text(prompt.clone())]
            }
            _ => vec![],
        }
    }

    /// Execute a Converse API call with the current message history.
    async fn converse(&self, messages: &[bedrock::Message]) -> Result<LlmResponse, GatewayError> {
        let tool_config = self.tool_config.lock().await;

        let mut request = self
            .client
            .converse()
            .model_id(self.model.as_str())
            .set_system(Some(self.system_blocks()))
            .set_messages(Some(messages.to_vec()))
            .inference_config(
                bedrock::InferenceConfiguration::builder()
                    .max_tokens(self.max_tokens)
                    .build(),
            );

        if let Some(ref tc) = *tool_config {
            request = request.tool_config(tc.clone());
        }

        debug!(
            model = %self.model,
            messages = messages.len(),
            "Calling Bedrock Converse API"
        );

        let response = request
            .send()
            .await
            .map_err(|e| types::convert_converse_error(&e))?;

        let stop_reason = response.stop_reason();
        let output = response.output().ok_or_else(|| {
            GatewayError::RequestFailed("No output in Bedrock response".to_string())
        })?;

        Ok(types::convert_converse_output(
            output,
            stop_reason,
            self.model.as_str(),
        ))
    }

    /// Append a user message and call the Converse API.
    async fn send_user_message(
        &self,
        content: Vec<bedrock::ContentBlock>,
    ) -> Result<LlmResponse, GatewayError> {
        let user_msg = bedrock::Message::builder()
            .role(bedrock::ConversationRole::User)
            .set_content(Some(content))
            .build()
            .map_err(|e| GatewayError::RequestFailed(format!("Failed to build message: {}", e)))?;

        let mut messages = self.messages.lock().await;
        messages.push(user_msg);

        let response = match self.converse(&messages).await {
            Ok(response) => response,
            Err(e) => {
                // History must alternate user/assistant; drop the unanswered turn.
                messages.pop();
                return Err(e);
            }
        };

        // Append assistant response to history
        let assistant_content = types::response_to_content_blocks(&response)?;
        if !assistant_content.is_empty() {
            let assistant_msg = bedrock::Message::builder()
                .role(bedrock::ConversationRole::Assistant)
                .set_content(Some(assistant_content))
                .build()
                .map_err(|e| {
                    GatewayError::RequestFailed(format!("Failed to build assistant message: {}", e))
                })?;
            messages.push(assistant_msg);
        }

        Ok(response)
    }
}

#[async_trait]
impl LlmSession for BedrockSession {
    fn model(&self) -> &ModelId {
        &self.model
    }

    async fn send_with_tools(
        &self,
        message: &str,
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError> {
        // Convert tool schemas to Bedrock ToolConfiguration
        let bedrock_tools: Vec<bedrock::Tool> = tools
            .iter()
            .filter_map(types::convert_tool_schema)
            .collect();

        if !bedrock_tools.is_empty() {
            let tool_config = bedrock::ToolConfiguration::builder()
                .set_tools(Some(bedrock_tools))
                .build()
                .map_err(|e| {
                    GatewayError::RequestFailed(format!("Failed to build tool config: {}", e))
                })?;
            *self.tool_config.lock().await = Some(tool_config);
        }

        let content = vec![bedrock::ContentBlock::Text(message.to_string())];
        self.send_user_message(content).await
    }

    async fn send_tool_results(
        &self,
        results: &[ToolResultMessage],
    ) -> Result<LlmResponse, GatewayError> {
        let content = results
            .iter()
            .map(types::convert_tool_result)
            .collect::<Result<Vec<_>, _>>()?;

        self.send_user_message(content).await
    }
}
