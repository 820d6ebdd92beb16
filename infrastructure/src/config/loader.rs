//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Project-level config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "notion-agent.toml";

/// Prefix for environment overrides (`NOTION_AGENT_SERVER__PORT=9000`).
pub const ENV_PREFIX: &str = "NOTION_AGENT_";

/// Model id variable understood for compatibility with existing deployments.
pub const MODEL_ID_ENV: &str = "BEDROCK_MODEL_ID";

/// Dotenv file looked up in the working directory and its parents.
pub const ENV_FILE: &str = ".env";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `BEDROCK_MODEL_ID`
    /// 2. `NOTION_AGENT_*` environment variables (`__` separates sections)
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./notion-agent.toml`
    /// 5. Global: `$XDG_CONFIG_HOME/notion-agent/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment).extract().map_err(Box::new)
    }

    /// Load defaults plus environment overrides, skipping all files (for --no-config)
    pub fn load_without_files() -> Result<FileConfig, Box<figment::Error>> {
        let figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        Self::with_env(figment).extract().map_err(Box::new)
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&[MODEL_ID_ENV])
                    .map(|_| "model.id".into()),
            )
    }

    /// Export variables from the nearest `.env` into the process environment.
    ///
    /// Variables already set in the environment are left alone. Must run
    /// before [`ConfigLoader::load`] for `BEDROCK_MODEL_ID` in `.env` to count.
    pub fn load_env_file() -> Option<PathBuf> {
        match dotenvy::dotenv() {
            Ok(path) => {
                debug!("Loaded environment from {}", path.display());
                Some(path)
            }
            Err(e) if e.not_found() => None,
            Err(e) => {
                warn!("Failed to load {}: {}", ENV_FILE, e);
                None
            }
        }
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/notion-agent/config.toml if set,
    /// otherwise falls back to ~/.config/notion-agent/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("notion-agent").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = Path::new(PROJECT_CONFIG_FILE);
        path.exists().then(|| path.to_path_buf())
    }

    /// Describe the config file locations being used (for debugging)
    pub fn describe_sources(explicit: Option<&PathBuf>) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("[{}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("[FOUND] Project:  {}", path.display())),
            None => lines.push(format!("[     ] Project:  ./{}", PROJECT_CONFIG_FILE)),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("[{}] Global:   {}", mark, path.display()));
        }

        lines.push("[     ] Default:  built-in defaults".to_string());
        lines
    }
}
