//! Reasoning agent.
//!
//! Drives the model ↔ tool loop for one question:
//!
//! 1. send the question plus the tool schemas of the catalog
//! 2. if the model requests tools, dispatch them over the request's
//!    [`ToolSession`] in the order requested and send the results back
//! 3. the first turn without tool requests carries the final answer
//!
//! Tool failures are handed back to the model as error observations. Only a
//! broken session (connection or protocol failure) aborts the run early.

use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession, ToolResultMessage};
use crate::ports::tool_session::{SessionError, ToolSession};
use notion_agent_domain::util::preview;
use notion_agent_domain::{ModelId, Question, ToolCall, ToolCatalog, ToolError, ToolResult};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why an agent run failed.
#[derive(Error, Debug)]
pub enum AgentFailure {
    #[error("step limit of {0} reached without a final answer")]
    StepLimitExceeded(usize),

    #[error("model error: {0}")]
    Model(#[from] GatewayError),

    #[error("model returned an empty answer")]
    EmptyAnswer,
}

/// A failed agent run, with enough context to diagnose it.
#[derive(Error, Debug)]
#[error("Agent failed after {transcript_len} messages: {reason}")]
pub struct AgentError {
    pub question: String,
    /// Number of messages exchanged with the model before the failure.
    pub transcript_len: usize,
    pub reason: AgentFailure,
}

/// Outcome of [`ReasoningAgent::run`] when it does not produce an answer.
#[derive(Error, Debug)]
pub enum AgentRunError {
    /// The tool session broke mid-run.
    #[error(transparent)]
    Session(SessionError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Model ↔ tool loop bounded by a step count.
///
/// A step is one model turn. The loop gives up with
/// [`AgentFailure::StepLimitExceeded`] when the model still requests tools
/// on its `max_steps`-th turn.
pub struct ReasoningAgent {
    gateway: Arc<dyn LlmGateway>,
    max_steps: usize,
    system_prompt: Option<String>,
}

impl ReasoningAgent {
    pub fn new(gateway: Arc<dyn LlmGateway>, max_steps: usize) -> Self {
        Self {
            gateway,
            max_steps,
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    /// Run the loop to completion and return the final answer text.
    pub async fn run(
        &self,
        model: &ModelId,
        catalog: &ToolCatalog,
        session: &dyn ToolSession,
        question: &Question,
    ) -> Result<String, AgentRunError> {
        let mut transcript = Transcript::new(question);

        let llm = self
            .open_model_session(model)
            .await
            .map_err(|e| transcript.fail(AgentFailure::Model(e)))?;

        let tools = catalog.to_api_tools();
        debug!(
            "Agent: model {}, {} tools, max {} steps",
            model,
            tools.len(),
            self.max_steps
        );

        transcript.push();
        let mut response = llm
            .send_with_tools(question.content(), &tools)
            .await
            .map_err(|e| transcript.fail(AgentFailure::Model(e)))?;
        transcript.push();
        let mut steps = 1;

        loop {
            let calls = response.tool_calls();

            if calls.is_empty() {
                let answer = response.text_content();
                if answer.trim().is_empty() {
                    return Err(transcript.fail(AgentFailure::EmptyAnswer).into());
                }
                info!("Agent finished in {} steps", steps);
                return Ok(answer);
            }

            if steps >= self.max_steps {
                warn!(
                    "Agent exceeded max_steps ({}) with {} pending tool calls",
                    self.max_steps,
                    calls.len()
                );
                return Err(transcript
                    .fail(AgentFailure::StepLimitExceeded(self.max_steps))
                    .into());
            }

            // Sequential on purpose: the session is a single stdio channel.
            let mut results = Vec::with_capacity(calls.len());
            for (index, call) in calls.iter().enumerate() {
                let result = self
                    .invoke(session, catalog, call)
                    .await
                    .map_err(AgentRunError::Session)?;

                results.push(ToolResultMessage {
                    tool_use_id: call
                        .native_id
                        .clone()
                        .unwrap_or_else(|| format!("call-{}-{}", steps, index + 1)),
                    tool_name: call.tool_name.clone(),
                    is_error: !result.is_success(),
                    output: result.observation(),
                });
            }

            debug!(
                "Agent step {}/{}: sending {} tool results",
                steps,
                self.max_steps,
                results.len()
            );

            transcript.push();
            response = llm
                .send_tool_results(&results)
                .await
                .map_err(|e| transcript.fail(AgentFailure::Model(e)))?;
            transcript.push();
            steps += 1;
        }
    }

    async fn open_model_session(
        &self,
        model: &ModelId,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        match &self.system_prompt {
            Some(prompt) => {
                self.gateway
                    .create_session_with_system_prompt(model, prompt)
                    .await
            }
            None => self.gateway.create_session(model).await,
        }
    }

    /// Execute one requested call. Only fatal session errors are returned
    /// as `Err`; everything else becomes a (possibly failed) [`ToolResult`].
    async fn invoke(
        &self,
        session: &dyn ToolSession,
        catalog: &ToolCatalog,
        call: &ToolCall,
    ) -> Result<ToolResult, SessionError> {
        if !catalog.contains(&call.tool_name) {
            warn!("Model requested unknown tool '{}'", call.tool_name);
            return Ok(ToolResult::failure(
                &call.tool_name,
                ToolError::not_found(&call.tool_name),
            ));
        }

        debug!(
            "Calling tool {} with {}",
            call.tool_name,
            preview(&call.arguments_json().to_string(), 200)
        );

        let started = Instant::now();
        let result = match session.call_tool(call).await {
            Ok(result) => result,
            Err(SessionError::ToolInvocation { tool, message }) => {
                ToolResult::failure(tool, ToolError::execution_failed(message))
            }
            Err(fatal) => return Err(fatal),
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let result = result.with_duration(elapsed_ms);

        if result.is_success() {
            debug!(
                "Tool {} returned in {}ms: {}",
                call.tool_name,
                elapsed_ms,
                preview(&result.observation(), 200)
            );
        } else {
            warn!(
                "Tool {} failed after {}ms: {}",
                call.tool_name,
                elapsed_ms,
                preview(&result.observation(), 200)
            );
        }

        Ok(result)
    }
}

/// Message counter for error reports.
struct Transcript {
    question: String,
    len: usize,
}

impl Transcript {
    fn new(question: &Question) -> Self {
        Self {
            question: question.content().to_string(),
            len: 0,
        }
    }

    fn push(&mut self) {
        self.len += 1;
    }

    fn fail(&self, reason: AgentFailure) -> AgentError {
        AgentError {
            question: self.question.clone(),
            transcript_len: self.len,
            reason,
        }
    }
}
