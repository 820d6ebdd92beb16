//! Configuration file loading for notion-agent
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `BEDROCK_MODEL_ID` (model id only)
//! 2. `NOTION_AGENT_*` environment variables
//! 3. `--config <path>` specified file
//! 4. Project root: `./notion-agent.toml`
//! 5. XDG config: `$XDG_CONFIG_HOME/notion-agent/config.toml`
//! 6. Default values
//!
//! A `.env` file, when present, is exported into the environment first
//! (see [`ConfigLoader::load_env_file`]).

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_TOOL_SERVER_ENDPOINT, FileAgentConfig, FileConfig,
    FileModelConfig, FileServerConfig,
};
pub use loader::{ConfigLoader, ENV_FILE, ENV_PREFIX, MODEL_ID_ENV, PROJECT_CONFIG_FILE};
