//! CLI entrypoint for notion-agent
//!
//! This is the main binary that wires together all layers using
//! dependency injection and serves the HTTP API.

use anyhow::{Context, Result};
use clap::Parser;
use notion_agent_application::AnswerQuestionUseCase;
use notion_agent_infrastructure::{BedrockLlmGateway, ConfigLoader, StdioSessionLauncher};
use notion_agent_presentation::{AppState, Cli, serve};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when no -v is given
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Variables from .env, without overriding the real environment
    ConfigLoader::load_env_file();

    // Load configuration once
    let config = if cli.no_config {
        ConfigLoader::load_without_files()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    if cli.show_config {
        println!("Configuration sources:");
        for source in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("  {}", source);
        }
        println!();
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    config.validate()?;
    let model = config.model_id()?;
    let connection = config.connection_params();
    let params = config.agent_params();

    info!("Starting notion-agent");
    info!("Model: {}", model);
    info!("Tool server: {}", connection.describe());

    // === Dependency Injection ===
    let gateway = Arc::new(BedrockLlmGateway::new(&config.bedrock_settings()).await);
    let launcher = Arc::new(StdioSessionLauncher::new());
    let answerer = AnswerQuestionUseCase::new(launcher, gateway, model, connection, params);
    let state = AppState::new(Arc::new(answerer));

    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    serve(listener, state, shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested, draining in-flight requests");
}
