//! JSON-RPC protocol types for MCP communication.
//!
//! MCP over stdio frames one JSON-RPC 2.0 message per line.
//!
//! # Protocol Overview
//!
//! - **Requests**: client → server (`initialize`, `tools/list`, `tools/call`)
//! - **Responses**: server → client (result or error)
//! - **Notifications**: either direction (`notifications/initialized`, log messages)
//! - **Incoming requests**: server → client (e.g. `ping`), answered by the reader loop

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MCP protocol revision sent in `initialize`.
pub const MCP_PROTOCOL_VERSION: &str = "2025-06-18";

/// JSON-RPC error codes used when answering server-initiated requests.
pub mod error_codes {
    pub const METHOD_NOT_FOUND: i64 = -32601;
}

/// JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC notification (no `id`, no reply expected)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<u64>,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    /// Extract the result, or the error object if the server replied with one.
    pub fn into_result(self) -> Result<serde_json::Value, RpcError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.result.unwrap_or(serde_json::Value::Null)),
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("JSON-RPC error (code {code}): {message}")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Outgoing JSON-RPC response (answering a server-initiated request)
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponseOut {
    pub jsonrpc: &'static str,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl JsonRpcResponseOut {
    pub fn result(id: u64, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: u64, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

// ==================== MCP payloads ====================

/// Parameters for `initialize`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    pub capabilities: serde_json::Value,
    pub client_info: Implementation,
}

impl InitializeParams {
    pub fn new() -> Self {
        Self {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: serde_json::json!({}),
            client_info: Implementation {
                name: "notion-agent".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

impl Default for InitializeParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Name and version of a client or server implementation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Implementation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Result of `initialize`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: serde_json::Value,
    #[serde(default)]
    pub server_info: Implementation,
}

/// One tool entry in a `tools/list` page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpToolDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "empty_object_schema")]
    pub input_schema: serde_json::Value,
}

fn empty_object_schema() -> serde_json::Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

/// Result of `tools/list`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsListResult {
    pub tools: Vec<McpToolDef>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Result of `tools/call`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    #[serde(default)]
    pub content: Vec<serde_json::Value>,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Flatten the content blocks into one observation string.
    ///
    /// Text blocks are joined by newlines; other block types (images,
    /// resources) are summarised as `[<type> content]`.
    pub fn flatten(&self) -> String {
        self.content
            .iter()
            .map(|block| {
                let kind = block.get("type").and_then(|t| t.as_str()).unwrap_or("unknown");
                match (kind, block.get("text").and_then(|t| t.as_str())) {
                    ("text", Some(text)) => text.to_string(),
                    _ => format!("[{} content]", kind),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let req = JsonRpcRequest::new(7, "tools/list", None);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 7);
        assert_eq!(json["method"], "tools/list");
        assert!(json.get("params").is_none());
    }

    #[test]
    fn test_initialize_params_are_camel_case() {
        let json = serde_json::to_value(InitializeParams::new()).unwrap();
        assert_eq!(json["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(json["clientInfo"]["name"], "notion-agent");
    }

    #[test]
    fn test_response_into_result() {
        let ok: JsonRpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":{"tools":[]}}"#).unwrap();
        assert!(ok.into_result().is_ok());

        let err: JsonRpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":2,"error":{"code":-32602,"message":"bad params"}}"#,
        )
        .unwrap();
        let err = err.into_result().unwrap_err();
        assert_eq!(err.code, -32602);
        assert_eq!(err.to_string(), "JSON-RPC error (code -32602): bad params");
    }

    #[test]
    fn test_tools_list_defaults() {
        let page: ToolsListResult = serde_json::from_value(serde_json::json!({
            "tools": [
                { "name": "search_pages", "description": "Search", "inputSchema": { "type": "object" } },
                { "name": "get_self" }
            ],
            "nextCursor": "page-2"
        }))
        .unwrap();

        assert_eq!(page.tools.len(), 2);
        assert_eq!(page.next_cursor.as_deref(), Some("page-2"));
        assert!(page.tools[1].description.is_none());
        assert_eq!(page.tools[1].input_schema["type"], "object");
    }

    #[test]
    fn test_flatten_content() {
        let result: ToolCallResult = serde_json::from_value(serde_json::json!({
            "content": [
                { "type": "text", "text": "Roadmap" },
                { "type": "image", "data": "...", "mimeType": "image/png" },
                { "type": "text", "text": "Q1: launch" }
            ]
        }))
        .unwrap();

        assert!(!result.is_error);
        assert_eq!(result.flatten(), "Roadmap\n[image content]\nQ1: launch");
    }
}
