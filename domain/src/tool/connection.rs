//! Connection parameters for a tool provider

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default bridge command used to reach a remote MCP endpoint over stdio.
pub const DEFAULT_BRIDGE_COMMAND: &str = "npx";

/// How to reach the tool provider.
///
/// Treated as an opaque record by the request flow; only the launcher
/// interprets it. Either `command` (a local stdio server) or `endpoint`
/// (a remote URL reached through the `mcp-remote` bridge) must be usable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionParams {
    /// Executable to spawn
    pub command: Option<String>,
    /// Ordered argument list for `command`
    pub args: Vec<String>,
    /// Remote tool server URL
    pub endpoint: Option<String>,
    /// Extra environment variables for the spawned process
    pub env: HashMap<String, String>,
}

impl ConnectionParams {
    pub fn command(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
            ..Default::default()
        }
    }

    pub fn remote(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Default::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Resolve to the concrete `(program, args)` to spawn.
    ///
    /// An explicit `command` wins. Otherwise an `endpoint` resolves to
    /// `npx -y mcp-remote <endpoint>`. Explicit `args` are always kept; the
    /// bridge arguments are only derived when `args` is empty.
    pub fn resolve_command(&self) -> Option<(String, Vec<String>)> {
        let program = match (&self.command, &self.endpoint) {
            (Some(cmd), _) if !cmd.trim().is_empty() => cmd.clone(),
            (_, Some(_)) => DEFAULT_BRIDGE_COMMAND.to_string(),
            _ => return None,
        };

        let args = match (&self.endpoint, self.args.is_empty()) {
            (Some(endpoint), true) => vec![
                "-y".to_string(),
                "mcp-remote".to_string(),
                endpoint.clone(),
            ],
            _ => self.args.clone(),
        };

        Some((program, args))
    }

    /// Short description for diagnostics.
    pub fn describe(&self) -> String {
        match self.resolve_command() {
            Some((program, args)) if args.is_empty() => program,
            Some((program, args)) => format!("{} {}", program, args.join(" ")),
            None => "<unconfigured>".to_string(),
        }
    }
}
