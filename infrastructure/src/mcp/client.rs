//! MCP client over a line-delimited JSON-RPC byte stream.
//!
//! [`McpClient`] owns the write half of the stream and a background reader
//! task that owns the read half. The reader correlates responses with
//! pending requests by id, answers server-initiated `ping`s and logs
//! notifications. When the stream ends every pending request fails with
//! [`McpError::TransportClosed`].
//!
//! The client is generic over the byte stream, so the same code drives a
//! child process's stdio in production and an in-memory duplex in tests.

use crate::mcp::error::{McpError, Result};
use crate::mcp::protocol::{
    InitializeParams, InitializeResult, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, JsonRpcResponseOut, McpToolDef, ToolCallResult, ToolsListResult, error_codes,
};
use crate::mcp::transport::{MessageKind, classify_message};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Timeout for the `initialize` handshake.
const INIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on `tools/list` pages, against servers that never stop
/// returning a cursor.
const MAX_LIST_PAGES: usize = 64;

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// State shared between the client and its reader task.
struct Shared {
    name: String,
    writer: Mutex<Option<BoxedWriter>>,
    pending: Mutex<HashMap<u64, oneshot::Sender<JsonRpcResponse>>>,
    disconnected: AtomicBool,
}

impl Shared {
    fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }

    async fn write_frame<T: Serialize>(&self, frame: &T) -> Result<()> {
        let mut line = serde_json::to_string(frame)?;
        trace!("MCP {} ← {}", self.name, line);
        line.push('\n');

        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(McpError::TransportClosed)?;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Mark the stream dead and fail every pending request.
    async fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
        self.pending.lock().await.clear();
    }
}

/// An initialized connection to one MCP server.
pub struct McpClient {
    shared: Arc<Shared>,
    next_id: AtomicU64,
    reader_task: JoinHandle<()>,
}

impl McpClient {
    /// Start the reader task and perform the `initialize` handshake,
    /// followed by `notifications/initialized`.
    pub async fn connect<R, W>(name: impl Into<String>, reader: R, writer: W) -> Result<Self>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let shared = Arc::new(Shared {
            name: name.into(),
            writer: Mutex::new(Some(Box::new(writer))),
            pending: Mutex::new(HashMap::new()),
            disconnected: AtomicBool::new(false),
        });

        let reader_task = tokio::spawn(reader_loop(shared.clone(), BufReader::new(reader)));

        let client = Self {
            shared,
            next_id: AtomicU64::new(1),
            reader_task,
        };

        let init = tokio::time::timeout(INIT_TIMEOUT, client.initialize())
            .await
            .map_err(|_| McpError::Timeout("initialize"))??;

        info!(
            "MCP {} initialized: {} {} (protocol {})",
            client.name(),
            init.server_info.name,
            init.server_info.version,
            init.protocol_version
        );

        Ok(client)
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    async fn initialize(&self) -> Result<InitializeResult> {
        let params = serde_json::to_value(InitializeParams::new())?;
        let result = self.request("initialize", Some(params)).await?;
        let init: InitializeResult = serde_json::from_value(result).map_err(|e| {
            McpError::UnexpectedResponse(format!("malformed initialize result: {}", e))
        })?;

        self.notify("notifications/initialized", None).await?;
        Ok(init)
    }

    /// Send a request and wait for its response.
    pub async fn request(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        if self.shared.is_disconnected() {
            return Err(McpError::TransportClosed);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.shared.pending.lock().await.insert(id, tx);

        // The reader may have hit EOF between the check above and the insert.
        if self.shared.is_disconnected() {
            self.shared.pending.lock().await.remove(&id);
            return Err(McpError::TransportClosed);
        }

        debug!("MCP {} request {} (id {})", self.name(), method, id);
        let request = JsonRpcRequest::new(id, method, params);
        if let Err(e) = self.shared.write_frame(&request).await {
            self.shared.pending.lock().await.remove(&id);
            return Err(e);
        }

        let response = rx.await.map_err(|_| McpError::TransportClosed)?;
        Ok(response.into_result()?)
    }

    /// Send a notification (no response expected).
    pub async fn notify(&self, method: &str, params: Option<serde_json::Value>) -> Result<()> {
        if self.shared.is_disconnected() {
            return Err(McpError::TransportClosed);
        }
        self.shared
            .write_frame(&JsonRpcNotification::new(method, params))
            .await
    }

    /// Enumerate all tools, following `nextCursor` until exhausted.
    ///
    /// Returns only after the whole listing has been received; any failure
    /// discards the pages fetched so far.
    pub async fn list_tools(&self) -> Result<Vec<McpToolDef>> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_LIST_PAGES {
            let params = cursor
                .as_ref()
                .map(|c| serde_json::json!({ "cursor": c }));
            let result = self.request("tools/list", params).await?;
            let page: ToolsListResult = serde_json::from_value(result)?;

            tools.extend(page.tools);
            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => return Ok(tools),
            }
        }

        Err(McpError::UnexpectedResponse(format!(
            "tools/list did not finish after {} pages",
            MAX_LIST_PAGES
        )))
    }

    /// Invoke a tool via `tools/call`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolCallResult> {
        let params = serde_json::json!({
            "name": name,
            "arguments": arguments,
        });
        let result = self.request("tools/call", Some(params)).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Close the write half. The server sees EOF on its input and is
    /// expected to exit; pending requests fail once the read half ends.
    pub async fn shutdown(&self) {
        let writer = self.shared.writer.lock().await.take();
        if let Some(mut writer) = writer {
            if let Err(e) = writer.shutdown().await {
                debug!("MCP {}: error closing input: {}", self.name(), e);
            }
        }
        self.shared.disconnected.store(true, Ordering::SeqCst);
    }
}

impl Drop for McpClient {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}

async fn reader_loop<R: AsyncRead + Unpin>(shared: Arc<Shared>, reader: BufReader<R>) {
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                trace!("MCP {} → {}", shared.name, trimmed);
                dispatch(&shared, trimmed).await;
            }
            Ok(None) => {
                debug!("MCP {}: server closed its output", shared.name);
                break;
            }
            Err(e) => {
                warn!("MCP {}: read error: {}", shared.name, e);
                break;
            }
        }
    }
    shared.disconnect().await;
}

async fn dispatch(shared: &Shared, line: &str) {
    let json: serde_json::Value = match serde_json::from_str(line) {
        Ok(json) => json,
        Err(e) => {
            warn!("MCP {}: ignoring non-JSON line ({}): {}", shared.name, e, line);
            return;
        }
    };

    match classify_message(&json) {
        MessageKind::Response => match serde_json::from_value::<JsonRpcResponse>(json) {
            Ok(response) => {
                let tx = match response.id {
                    Some(id) => shared.pending.lock().await.remove(&id),
                    None => None,
                };
                match tx {
                    Some(tx) => {
                        let _ = tx.send(response);
                    }
                    None => debug!(
                        "MCP {}: response for unknown request {:?}",
                        shared.name, response.id
                    ),
                }
            }
            Err(e) => warn!("MCP {}: malformed response: {}", shared.name, e),
        },
        MessageKind::IncomingRequest { id } => {
            let method = json.get("method").and_then(|m| m.as_str()).unwrap_or("");
            let reply = if method == "ping" {
                JsonRpcResponseOut::result(id, serde_json::json!({}))
            } else {
                debug!("MCP {}: rejecting server request {}", shared.name, method);
                JsonRpcResponseOut::error(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("Method not supported: {}", method),
                )
            };
            if let Err(e) = shared.write_frame(&reply).await {
                debug!("MCP {}: could not answer {}: {}", shared.name, method, e);
            }
        }
        MessageKind::Notification => {
            let method = json.get("method").and_then(|m| m.as_str()).unwrap_or("");
            match method {
                "notifications/message" => {
                    let params = json.get("params");
                    let level = params
                        .and_then(|p| p.get("level"))
                        .and_then(|l| l.as_str())
                        .unwrap_or("info");
                    let data = params
                        .and_then(|p| p.get("data"))
                        .map(|d| d.to_string())
                        .unwrap_or_default();
                    debug!("MCP {} [{}]: {}", shared.name, level, data);
                }
                other => trace!("MCP {}: notification {}", shared.name, other),
            }
        }
        MessageKind::Invalid => {
            warn!("MCP {}: ignoring frame without id or method", shared.name);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tokio::io::{AsyncBufReadExt, DuplexStream};

    /// What the fake server does with one incoming frame.
    pub(crate) enum Reply {
        Frames(Vec<Value>),
        Hangup,
    }

    pub(crate) fn ok(msg: &Value, result: Value) -> Reply {
        Reply::Frames(vec![json!({ "jsonrpc": "2.0", "id": msg["id"], "result": result })])
    }

    pub(crate) fn rpc_error(msg: &Value, code: i64, message: &str) -> Reply {
        Reply::Frames(vec![json!({
            "jsonrpc": "2.0",
            "id": msg["id"],
            "error": { "code": code, "message": message }
        })])
    }

    pub(crate) fn silent() -> Reply {
        Reply::Frames(vec![])
    }

    pub(crate) fn initialize_result() -> Value {
        json!({
            "protocolVersion": "2025-06-18",
            "capabilities": { "tools": {} },
            "serverInfo": { "name": "fake-notion", "version": "1.0.0" }
        })
    }

    /// Run a scripted server on one end of a duplex. Returns every frame it
    /// received once the client closes its side.
    pub(crate) fn spawn_fake_server<F>(io: DuplexStream, handler: F) -> JoinHandle<Vec<Value>>
    where
        F: Fn(&Value) -> Reply + Send + 'static,
    {
        tokio::spawn(async move {
            let (read, mut write) = tokio::io::split(io);
            let mut lines = BufReader::new(read).lines();
            let mut seen = Vec::new();

            while let Ok(Some(line)) = lines.next_line().await {
                let msg: Value = serde_json::from_str(&line).unwrap();
                seen.push(msg.clone());

                match handler(&msg) {
                    Reply::Frames(frames) => {
                        for frame in frames {
                            let mut out = serde_json::to_string(&frame).unwrap();
                            out.push('\n');
                            if write.write_all(out.as_bytes()).await.is_err() {
                                return seen;
                            }
                        }
                    }
                    Reply::Hangup => return seen,
                }
            }
            seen
        })
    }

    /// Connect a client to a fake server that handles `initialize` and
    /// delegates everything else to `handler`.
    pub(crate) async fn connect_fake<F>(handler: F) -> (McpClient, JoinHandle<Vec<Value>>)
    where
        F: Fn(&Value) -> Reply + Send + 'static,
    {
        let (client_io, server_io) = tokio::io::duplex(64 * 1024);
        let server = spawn_fake_server(server_io, move |msg| match msg["method"].as_str() {
            Some("initialize") => ok(msg, initialize_result()),
            Some("notifications/initialized") => silent(),
            _ => handler(msg),
        });
        let (read, write) = tokio::io::split(client_io);
        let client = McpClient::connect("fake", read, write).await.unwrap();
        (client, server)
    }

    fn tool(name: &str) -> Value {
        json!({ "name": name, "description": format!("{} tool", name), "inputSchema": { "type": "object" } })
    }

    #[tokio::test]
    async fn test_handshake() {
        let (client, server) = connect_fake(|_| silent()).await;

        assert!(!client.shared.is_disconnected());

        client.shutdown().await;
        let seen = server.await.unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0]["method"], "initialize");
        assert_eq!(seen[0]["params"]["clientInfo"]["name"], "notion-agent");
        assert_eq!(seen[1]["method"], "notifications/initialized");
        assert!(seen[1].get("id").is_none());
    }

    #[tokio::test]
    async fn test_list_tools_follows_cursor() {
        let (client, server) = connect_fake(|msg| {
            match msg["params"]["cursor"].as_str() {
                None => ok(
                    msg,
                    json!({ "tools": [tool("search_pages"), tool("fetch_page")], "nextCursor": "p2" }),
                ),
                Some("p2") => ok(msg, json!({ "tools": [tool("create_page")] })),
                Some(_) => rpc_error(msg, -32602, "bad cursor"),
            }
        })
        .await;

        let tools = client.list_tools().await.unwrap();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["search_pages", "fetch_page", "create_page"]);

        client.shutdown().await;
        let seen = server.await.unwrap();
        let list_requests = seen.iter().filter(|m| m["method"] == "tools/list").count();
        assert_eq!(list_requests, 2);
    }

    #[tokio::test]
    async fn test_list_tools_rpc_error() {
        let (client, _server) =
            connect_fake(|msg| rpc_error(msg, -32603, "upstream unavailable")).await;

        let err = client.list_tools().await.unwrap_err();
        assert!(matches!(err, McpError::Rpc(ref e) if e.message == "upstream unavailable"));
    }

    #[tokio::test]
    async fn test_list_tools_malformed() {
        let (client, _server) = connect_fake(|msg| ok(msg, json!({ "tools": "nope" }))).await;

        let err = client.list_tools().await.unwrap_err();
        assert!(matches!(err, McpError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_hangup_fails_pending_request() {
        let (client, _server) = connect_fake(|_| Reply::Hangup).await;

        let err = client.list_tools().await.unwrap_err();
        assert!(matches!(err, McpError::TransportClosed));
        assert!(client.shared.is_disconnected());
    }

    #[tokio::test]
    async fn test_call_tool() {
        let (client, server) = connect_fake(|msg| {
            assert_eq!(msg["method"], "tools/call");
            let query = msg["params"]["arguments"]["query"].as_str().unwrap_or("");
            ok(
                msg,
                json!({
                    "content": [{ "type": "text", "text": format!("results for {}", query) }],
                    "isError": false
                }),
            )
        })
        .await;

        let result = client
            .call_tool("search_pages", json!({ "query": "roadmap" }))
            .await
            .unwrap();
        assert!(!result.is_error);
        assert_eq!(result.flatten(), "results for roadmap");

        client.shutdown().await;
        let seen = server.await.unwrap();
        assert_eq!(seen[2]["params"]["name"], "search_pages");
    }

    #[tokio::test]
    async fn test_answers_server_ping() {
        let (client, server) = connect_fake(|msg| match msg["method"].as_str() {
            Some("tools/list") => {
                let mut frames = vec![json!({ "jsonrpc": "2.0", "id": 99, "method": "ping" })];
                frames.push(json!({ "jsonrpc": "2.0", "id": msg["id"], "result": { "tools": [] } }));
                Reply::Frames(frames)
            }
            _ => silent(),
        })
        .await;

        assert!(client.list_tools().await.unwrap().is_empty());

        client.shutdown().await;
        let seen = server.await.unwrap();
        let pong = seen.iter().find(|m| m["id"] == 99).unwrap();
        assert_eq!(pong["result"], json!({}));
    }

    #[tokio::test(start_paused = true)]
    async fn test_handshake_timeout() {
        let (client_io, server_io) = tokio::io::duplex(1024);
        let _server = spawn_fake_server(server_io, |_| silent());
        let (read, write) = tokio::io::split(client_io);

        let err = McpClient::connect("mute", read, write).await.err().unwrap();
        assert!(matches!(err, McpError::Timeout("initialize")));
    }

    #[tokio::test]
    async fn test_request_after_shutdown() {
        let (client, _server) = connect_fake(|_| silent()).await;
        client.shutdown().await;

        let err = client.list_tools().await.unwrap_err();
        assert!(matches!(err, McpError::TransportClosed));
    }
}
