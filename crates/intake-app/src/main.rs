//! Intake application binary - composition root.
//!
//! Ties together all Intake crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Initialize storage (SQLite)
//! 3. Build the chat model client and orchestrator
//! 4. Start the axum REST API server

mod cli;

use std::sync::Arc;

use clap::Parser;

use intake_api::routes;
use intake_api::state::AppState;
use intake_chat::ChatOrchestrator;
use intake_core::config::IntakeConfig;
use intake_model::OpenAiClient;
use intake_storage::{ChatRepository, Database, FormRepository};

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> std::path::PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        std::path::PathBuf::from(home).join(&data_dir[2..])
    } else {
        std::path::PathBuf::from(data_dir)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();

    // Config, with CLI/env overrides applied on top.
    let config_file = args.resolve_config_path();
    let mut config = IntakeConfig::load_or_default(&config_file);
    config.server.host = args.resolve_host(config.server.host);
    config.server.port = args.resolve_port(config.server.port);
    config.model.base_url = args.resolve_model_url(config.model.base_url);
    config.model.model = args.resolve_model_name(config.model.model);
    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }

    // Tracing. RUST_LOG wins, then --log-level, then the config value.
    let log_level = args
        .resolve_log_level()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Intake v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Storage.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = data_dir.join("intake.db");
    let db = Arc::new(Database::new(&db_path)?);
    tracing::info!(path = %db_path.display(), "SQLite database opened");

    let chats = Arc::new(ChatRepository::new(Arc::clone(&db)));
    let forms = Arc::new(FormRepository::new(Arc::clone(&db)));

    // Chat model client (OpenAI-compatible HTTP backend).
    let model = Arc::new(OpenAiClient::new(&config.model)?);
    tracing::info!(
        base_url = %config.model.base_url,
        model = %config.model.model,
        "Chat model client ready"
    );

    // Orchestrator owns the tool catalog and the two-phase model loop.
    let orchestrator = Arc::new(ChatOrchestrator::new(
        Arc::clone(&chats),
        Arc::clone(&forms),
        model,
        config.model.system_prompt.clone(),
        config.chat.clone(),
    ));

    let state = AppState::new(orchestrator, chats, forms);

    routes::start_server(&config, state).await?;

    Ok(())
}
