//! Error types for the MCP adapter

use crate::mcp::protocol::RpcError;
use notion_agent_application::SessionError;
use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors that can occur when talking to an MCP tool server
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Failed to spawn tool server: {0}")]
    SpawnError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Rpc(#[from] RpcError),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Tool server did not answer {0} in time")]
    Timeout(&'static str),

    #[error("Tool server closed the connection")]
    TransportClosed,
}

impl McpError {
    /// Map a failure while opening the session (spawn + handshake).
    pub fn into_connection_error(self) -> SessionError {
        SessionError::Connection(self.to_string())
    }

    /// Map a failure of `tools/list`. Any failure, including a channel closed
    /// mid-listing, invalidates the whole listing.
    pub fn into_listing_error(self) -> SessionError {
        SessionError::Protocol(self.to_string())
    }

    /// Map a failure of `tools/call`: an error reply is scoped to the call,
    /// a broken channel is not.
    pub fn into_call_error(self, tool: &str) -> SessionError {
        match self {
            McpError::Rpc(e) => SessionError::ToolInvocation {
                tool: tool.to_string(),
                message: e.message,
            },
            e @ (McpError::Io(_) | McpError::TransportClosed | McpError::Timeout(_)) => {
                SessionError::Connection(e.to_string())
            }
            e => SessionError::Protocol(e.to_string()),
        }
    }
}
