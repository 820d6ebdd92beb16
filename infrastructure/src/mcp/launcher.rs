//! Stdio session launcher.
//!
//! Spawns the tool server command (by default the `npx -y mcp-remote <url>`
//! bridge), wires its stdin/stdout to an [`McpClient`] and forwards its
//! stderr to the log.

use crate::mcp::client::McpClient;
use crate::mcp::error::McpError;
use crate::mcp::session::McpToolSession;
use async_trait::async_trait;
use notion_agent_application::{SessionError, ToolSession, ToolSessionLauncher};
use notion_agent_domain::ConnectionParams;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tracing::{debug, info};

/// Opens one tool server process per session.
#[derive(Debug, Default)]
pub struct StdioSessionLauncher {
    sequence: AtomicU64,
}

impl StdioSessionLauncher {
    pub fn new() -> Self {
        Self::default()
    }
}

fn spawn(program: &str, args: &[String], env: &HashMap<String, String>) -> Result<Child, McpError> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .envs(env)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Linux: request kernel to send SIGTERM to child when parent dies.
    // This catches cases where Drop doesn't run (SIGKILL, OOM kill).
    #[cfg(target_os = "linux")]
    unsafe {
        cmd.pre_exec(|| {
            libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
            Ok(())
        });
    }

    cmd.spawn()
        .map_err(|e| McpError::SpawnError(format!("{}: {}", program, e)))
}

fn forward_stderr(id: String, stderr: ChildStderr) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!("[{}] {}", id, line);
        }
    });
}

#[async_trait]
impl ToolSessionLauncher for StdioSessionLauncher {
    async fn open(&self, params: &ConnectionParams) -> Result<Box<dyn ToolSession>, SessionError> {
        let (program, args) = params.resolve_command().ok_or_else(|| {
            SessionError::Connection("no tool server command or endpoint configured".to_string())
        })?;

        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Spawning tool server: {} {}", program, args.join(" "));

        let mut child = spawn(&program, &args, &params.env).map_err(McpError::into_connection_error)?;
        let id = format!("session-{} (pid {})", seq, child.id().unwrap_or_default());

        let stdin = child.stdin.take().ok_or_else(|| {
            SessionError::Connection("failed to capture tool server stdin".to_string())
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            SessionError::Connection("failed to capture tool server stdout".to_string())
        })?;
        if let Some(stderr) = child.stderr.take() {
            forward_stderr(id.clone(), stderr);
        }

        // On failure `child` is dropped here and killed.
        let client = McpClient::connect(id.clone(), stdout, stdin)
            .await
            .map_err(McpError::into_connection_error)?;

        info!("Tool session {} opened ({})", id, params.describe());
        Ok(Box::new(McpToolSession::new(id, client, Some(child))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_command_is_connection_error() {
        let launcher = StdioSessionLauncher::new();
        let params = ConnectionParams::command("/nonexistent/notion-agent-tool-server");

        let err = launcher.open(&params).await.err().unwrap();

        match err {
            SessionError::Connection(msg) => assert!(msg.contains("notion-agent-tool-server")),
            other => panic!("expected connection error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_nothing_configured() {
        let launcher = StdioSessionLauncher::new();

        let err = launcher.open(&ConnectionParams::default()).await.err().unwrap();

        assert!(matches!(err, SessionError::Connection(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_server_exiting_before_handshake() {
        let launcher = StdioSessionLauncher::new();
        let params = ConnectionParams::command("true");

        let err = launcher.open(&params).await.err().unwrap();

        assert!(matches!(err, SessionError::Connection(_)));
    }
}
