//! Tool session port
//!
//! A [`ToolSession`] is the live, request-scoped channel to a tool provider.
//! A [`ToolSessionLauncher`] is the injected factory that opens one; tests
//! substitute a fake launcher instead of spawning real subprocesses.
//!
//! # Lifecycle
//!
//! ```text
//! launcher.open(params) ──► list_tools() (once) ──► call_tool()* ──► close() (exactly once)
//! ```

use async_trait::async_trait;
use notion_agent_domain::{ConnectionParams, ToolCall, ToolDescriptor, ToolResult};
use thiserror::Error;

/// Errors raised by a tool session.
///
/// `Connection` and `Protocol` are fatal to the request. `ToolInvocation`
/// is scoped to a single call and is turned into an observation for the
/// model by the reasoning loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Tool '{tool}' failed: {message}")]
    ToolInvocation { tool: String, message: String },
}

/// The live channel to a tool provider, owned by exactly one request.
#[async_trait]
pub trait ToolSession: Send + Sync {
    /// Identifier used in diagnostics (e.g. provider name and process id).
    fn id(&self) -> &str;

    /// Enumerate all callable tools.
    ///
    /// The full listing is materialized before returning; a malformed or
    /// interrupted listing fails with [`SessionError::Protocol`] and no
    /// partial list.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, SessionError>;

    /// Invoke one tool.
    ///
    /// A tool reporting failure yields either `Ok` with a failed
    /// [`ToolResult`] or [`SessionError::ToolInvocation`]; a broken channel
    /// yields [`SessionError::Connection`].
    async fn call_tool(&self, call: &ToolCall) -> Result<ToolResult, SessionError>;

    /// Release the channel (terminate the subprocess / close the connection).
    async fn close(&self) -> Result<(), SessionError>;
}

/// Factory for request-scoped tool sessions.
#[async_trait]
pub trait ToolSessionLauncher: Send + Sync {
    /// Open a fresh session. Failures to reach the provider are reported as
    /// [`SessionError::Connection`]; no retry happens at this layer.
    async fn open(&self, params: &ConnectionParams) -> Result<Box<dyn ToolSession>, SessionError>;
}
