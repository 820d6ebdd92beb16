//! Infrastructure layer for notion-agent
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod mcp;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use mcp::{McpClient, McpError, McpToolSession, StdioSessionLauncher};
pub use providers::bedrock::{BedrockLlmGateway, BedrockSettings};
