//! MCP (Model Context Protocol) adapter
//!
//! Implements the tool session ports over newline-delimited JSON-RPC 2.0 on
//! a child process's stdio.

pub mod client;
pub mod error;
pub mod launcher;
pub mod protocol;
pub mod session;
pub mod transport;

pub use client::McpClient;
pub use error::McpError;
pub use launcher::StdioSessionLauncher;
pub use session::McpToolSession;
