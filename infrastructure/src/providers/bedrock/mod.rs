//! AWS Bedrock Converse API provider
//!
//! Provides access to hosted models via AWS IAM authentication
//! through the Bedrock Converse API.

mod gateway;
mod session;
mod types;

pub use gateway::{BedrockLlmGateway, BedrockSettings};
