//! Presentation layer for notion-agent
//!
//! This crate contains the HTTP API (axum router, handlers, error
//! responses) and the CLI definitions.

pub mod cli;
pub mod http;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use http::{AppState, router, serve};
