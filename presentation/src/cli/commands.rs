//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for notion-agent
#[derive(Parser, Debug)]
#[command(name = "notion-agent")]
#[command(author, version, about = "HTTP agent answering questions from a Notion workspace")]
#[command(long_about = r#"
notion-agent serves an HTTP API that answers natural-language questions.

For every POST /ask request it starts a fresh tool server session (by default
`npx -y mcp-remote https://mcp.notion.com/mcp`), lists the tools it exposes,
and lets a Bedrock-hosted model call them until it can answer.

Configuration files are loaded from (in priority order):
1. --config <path>                          Explicit config file
2. ./notion-agent.toml                      Project-level config
3. ~/.config/notion-agent/config.toml       Global config

Environment variables override files: NOTION_AGENT_SERVER__PORT=9000,
NOTION_AGENT_AGENT__MAX_STEPS=5, and BEDROCK_MODEL_ID for the model.

Example:
  BEDROCK_MODEL_ID=anthropic.claude-3-5-sonnet-20240620-v1:0 notion-agent --port 8000
  curl -X POST localhost:8000/ask -H 'content-type: application/json' \
       -d '{"question": "What is on the roadmap?"}'
"#)]
pub struct Cli {
    /// Address to bind (overrides [server] host)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on (overrides [server] port)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}
