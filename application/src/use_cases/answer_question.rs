//! Answer Question use case.
//!
//! One `/ask` request from start to finish:
//!
//! 1. validate the question (whitespace-only is rejected before any I/O)
//! 2. open a fresh [`ToolSession`] through the injected launcher
//! 3. list the tools once and freeze them into a [`ToolCatalog`]
//! 4. run the [`ReasoningAgent`] against that catalog and session
//! 5. close the session, then assemble the [`AnswerEnvelope`]
//!
//! Once the session is open it is closed exactly once, whatever steps 3
//! and 4 return.

use crate::config::AgentParams;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::tool_session::{SessionError, ToolSession, ToolSessionLauncher};
use crate::use_cases::reasoning_agent::{AgentError, AgentRunError, ReasoningAgent};
use notion_agent_domain::util::preview;
use notion_agent_domain::{AnswerEnvelope, ConnectionParams, ModelId, Question, ToolCatalog};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Category of an [`AskError`], used by the transport to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidQuestion,
    Connection,
    Protocol,
    Agent,
    Timeout,
}

/// Errors that can occur while answering a question.
#[derive(Error, Debug)]
pub enum AskError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Tool server connection failed: {0}")]
    Connection(String),

    #[error("Tool server protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("Timed out after {secs}s while {stage}", secs = .after.as_secs())]
    Timeout { stage: &'static str, after: Duration },
}

impl AskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AskError::InvalidQuestion(_) => ErrorKind::InvalidQuestion,
            AskError::Connection(_) => ErrorKind::Connection,
            AskError::Protocol(_) => ErrorKind::Protocol,
            AskError::Agent(_) => ErrorKind::Agent,
            AskError::Timeout { .. } => ErrorKind::Timeout,
        }
    }
}

impl From<SessionError> for AskError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Connection(msg) => AskError::Connection(msg),
            SessionError::Protocol(msg) => AskError::Protocol(msg),
            // Only reachable outside the agent loop, where no tool call is
            // in flight: the provider broke the listing contract.
            other @ SessionError::ToolInvocation { .. } => AskError::Protocol(other.to_string()),
        }
    }
}

impl From<AgentRunError> for AskError {
    fn from(err: AgentRunError) -> Self {
        match err {
            AgentRunError::Session(e) => e.into(),
            AgentRunError::Agent(e) => AskError::Agent(e),
        }
    }
}

/// Use case answering one question with a request-scoped tool session.
///
/// Holds only read-only configuration, so a single instance is shared by
/// all concurrent requests.
pub struct AnswerQuestionUseCase {
    launcher: Arc<dyn ToolSessionLauncher>,
    agent: ReasoningAgent,
    model: ModelId,
    connection: ConnectionParams,
    params: AgentParams,
}

impl AnswerQuestionUseCase {
    pub fn new(
        launcher: Arc<dyn ToolSessionLauncher>,
        gateway: Arc<dyn LlmGateway>,
        model: ModelId,
        connection: ConnectionParams,
        params: AgentParams,
    ) -> Self {
        let agent = ReasoningAgent::new(gateway, params.max_steps)
            .with_system_prompt(params.system_prompt.clone());
        Self {
            launcher,
            agent,
            model,
            connection,
            params,
        }
    }

    /// Answer `question`, echoing it back verbatim in the envelope.
    pub async fn execute(&self, question: &str) -> Result<AnswerEnvelope, AskError> {
        let question =
            Question::new(question).map_err(|e| AskError::InvalidQuestion(e.to_string()))?;

        info!("Question received: {}", preview(question.content(), 200));

        let session = self.open_session().await?;

        let outcome = timeout(
            self.params.request_timeout,
            self.answer_with(session.as_ref(), &question),
        )
        .await;

        if let Err(e) = session.close().await {
            warn!("Failed to close tool session {}: {}", session.id(), e);
        } else {
            debug!("Tool session {} closed", session.id());
        }

        let answer = match outcome {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "Request timed out after {:?}",
                    self.params.request_timeout
                );
                return Err(AskError::Timeout {
                    stage: "answering",
                    after: self.params.request_timeout,
                });
            }
        };

        info!("Answer: {}", preview(&answer, 500));

        Ok(AnswerEnvelope::new(&question, answer))
    }

    async fn open_session(&self) -> Result<Box<dyn ToolSession>, AskError> {
        debug!("Opening tool session: {}", self.connection.describe());

        match timeout(self.params.open_timeout, self.launcher.open(&self.connection)).await {
            Ok(Ok(session)) => {
                debug!("Tool session {} opened", session.id());
                Ok(session)
            }
            Ok(Err(e)) => {
                warn!("Failed to open tool session: {}", e);
                Err(e.into())
            }
            Err(_) => {
                warn!("Opening tool session timed out after {:?}", self.params.open_timeout);
                Err(AskError::Timeout {
                    stage: "connecting to the tool server",
                    after: self.params.open_timeout,
                })
            }
        }
    }

    async fn answer_with(
        &self,
        session: &dyn ToolSession,
        question: &Question,
    ) -> Result<String, AskError> {
        let catalog = ToolCatalog::new(session.list_tools().await?);
        info!(
            "Discovered {} tools: {}",
            catalog.len(),
            catalog.names().join(", ")
        );

        let answer = self
            .agent
            .run(&self.model, &catalog, session, question)
            .await?;
        Ok(answer)
    }
}
