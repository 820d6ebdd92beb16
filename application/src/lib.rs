//! Application layer for notion-agent
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::AgentParams;
pub use ports::{
    llm_gateway::{GatewayError, LlmGateway, LlmSession, ToolResultMessage},
    tool_session::{SessionError, ToolSession, ToolSessionLauncher},
};
pub use use_cases::answer_question::{AnswerQuestionUseCase, AskError, ErrorKind};
pub use use_cases::reasoning_agent::{AgentError, AgentFailure, AgentRunError, ReasoningAgent};
