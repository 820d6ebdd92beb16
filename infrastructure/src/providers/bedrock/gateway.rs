//! Bedrock LLM gateway
//!
//! Implements [`LlmGateway`] on top of one shared Bedrock Runtime client.
//! Handles AWS credential initialization and session creation.

use super::session::BedrockSession;
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use notion_agent_application::{GatewayError, LlmGateway, LlmSession};
use notion_agent_domain::ModelId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Connection settings for the Bedrock Runtime client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BedrockSettings {
    /// AWS region; `None` falls back to the standard AWS region chain.
    pub region: Option<String>,
    /// Named AWS profile.
    pub profile: Option<String>,
    /// Maximum tokens per model turn.
    pub max_tokens: u32,
}

impl Default for BedrockSettings {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            max_tokens: 4096,
        }
    }
}

pub struct BedrockLlmGateway {
    client: Arc<BedrockClient>,
    max_tokens: i32,
}

impl BedrockLlmGateway {
    /// Create a new Bedrock gateway.
    ///
    /// Resolves AWS credentials and region through the standard provider
    /// chain and creates a Bedrock Runtime client.
    pub async fn new(settings: &BedrockSettings) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(ref region) = settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(ref profile) = settings.profile {
            loader = loader.profile_name(profile);
        }

        let aws_config = loader.load().await;
        info!(
            region = aws_config.region().map(|r| r.as_ref()).unwrap_or("<unset>"),
            "Bedrock client initialized"
        );

        Self {
            client: Arc::new(BedrockClient::new(&aws_config)),
            max_tokens: i32::try_from(settings.max_tokens).unwrap_or(i32::MAX),
        }
    }

    fn create_bedrock_session(
        &self,
        model: &ModelId,
        system_prompt: Option<String>,
    ) -> Box<dyn LlmSession> {
        Box::new(BedrockSession::new(
            self.client.clone(),
            model.clone(),
            system_prompt,
            self.max_tokens,
        ))
    }
}

#[async_trait]
impl LlmGateway for BedrockLlmGateway {
    async fn create_session(&self, model: &ModelId) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(self.create_bedrock_session(model, None))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &ModelId,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(self.create_bedrock_session(model, Some(system_prompt.to_string())))
    }
}
