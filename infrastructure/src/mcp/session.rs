//! [`ToolSession`] implementation backed by an [`McpClient`].

use crate::mcp::client::McpClient;
use crate::mcp::error::McpError;
use crate::mcp::protocol::McpToolDef;
use async_trait::async_trait;
use notion_agent_application::{SessionError, ToolSession};
use notion_agent_domain::{ToolCall, ToolDescriptor, ToolError, ToolResult};
use std::time::Duration;
use tokio::process::Child;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// How long a closed tool server may take to exit before it is killed.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A request-scoped MCP session, optionally owning the server process.
pub struct McpToolSession {
    id: String,
    client: McpClient,
    child: Mutex<Option<Child>>,
}

impl McpToolSession {
    pub fn new(id: impl Into<String>, client: McpClient, child: Option<Child>) -> Self {
        Self {
            id: id.into(),
            client,
            child: Mutex::new(child),
        }
    }
}

fn to_descriptor(def: McpToolDef) -> ToolDescriptor {
    let descriptor = ToolDescriptor::new(def.name).with_input_schema(def.input_schema);
    match def.description {
        Some(description) => descriptor.with_description(description),
        None => descriptor,
    }
}

#[async_trait]
impl ToolSession for McpToolSession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, SessionError> {
        let defs = self
            .client
            .list_tools()
            .await
            .map_err(McpError::into_listing_error)?;
        Ok(defs.into_iter().map(to_descriptor).collect())
    }

    async fn call_tool(&self, call: &ToolCall) -> Result<ToolResult, SessionError> {
        let result = self
            .client
            .call_tool(&call.tool_name, call.arguments_json())
            .await
            .map_err(|e| e.into_call_error(&call.tool_name))?;

        let output = result.flatten();
        if result.is_error {
            Ok(ToolResult::failure(
                &call.tool_name,
                ToolError::execution_failed(output),
            ))
        } else {
            Ok(ToolResult::success(&call.tool_name, output))
        }
    }

    async fn close(&self) -> Result<(), SessionError> {
        self.client.shutdown().await;

        let child = self.child.lock().await.take();
        let Some(mut child) = child else {
            return Ok(());
        };

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, child.wait()).await {
            Ok(Ok(status)) => {
                debug!("Tool server {} exited: {}", self.id, status);
                Ok(())
            }
            Ok(Err(e)) => Err(SessionError::Connection(format!(
                "failed to wait for tool server: {}",
                e
            ))),
            Err(_) => {
                warn!(
                    "Tool server {} still running after {:?}, killing",
                    self.id, SHUTDOWN_TIMEOUT
                );
                child
                    .kill()
                    .await
                    .map_err(|e| SessionError::Connection(format!("failed to kill tool server: {}", e)))
            }
        }
    }
}
