//! Domain layer for notion-agent
//!
//! This crate contains the core entities and value objects shared by every
//! other layer. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! - **Question / AnswerEnvelope**: the input and output of one `/ask` request
//! - **ModelId**: opaque identifier of the hosted inference model
//! - **ToolDescriptor / ToolCatalog**: the tools a provider exposes, fetched
//!   once per request and immutable for the agent run that consumes them
//! - **ConnectionParams**: how to reach the tool provider
//! - **LlmResponse**: structured model output (text and tool use blocks)

pub mod core;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use core::{answer::AnswerEnvelope, error::DomainError, model::ModelId, question::Question};
pub use session::response::{ContentBlock, LlmResponse, StopReason};
pub use tool::{
    connection::ConnectionParams,
    entities::{ToolCall, ToolCatalog, ToolDescriptor},
    value_objects::{ToolError, ToolResult},
};
