//! CLI argument definitions for the Intake application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Intake, a chat backend that files interest forms through model tool calls.
#[derive(Parser, Debug)]
#[command(name = "intake", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server bind address.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Data directory for the SQLite database.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Base URL of the OpenAI-compatible completion endpoint.
    #[arg(long = "model-url")]
    pub model_url: Option<String>,

    /// Model identifier sent with every completion request.
    #[arg(long = "model-name")]
    pub model_name: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > INTAKE_CONFIG env var > platform default
    /// (~/.intake/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("INTAKE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the API server bind address.
    ///
    /// Priority: --host flag > INTAKE_HOST env var > config file value.
    pub fn resolve_host(&self, config_host: String) -> String {
        if let Some(ref h) = self.host {
            return h.clone();
        }
        if let Ok(h) = std::env::var("INTAKE_HOST") {
            return h;
        }
        config_host
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > INTAKE_PORT env var > config file value > 8000.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Ok(val) = std::env::var("INTAKE_PORT") {
            if let Ok(p) = val.parse::<u16>() {
                return p;
            }
        }
        if config_port != 0 {
            return config_port;
        }
        8000
    }

    /// Resolve the data directory path.
    ///
    /// Priority: --data-dir flag > config file value.
    /// Returns `None` if not overridden (use config default).
    pub fn resolve_data_dir(&self) -> Option<String> {
        self.data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    /// Returns `None` if not overridden.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }

    /// Resolve the completion endpoint base URL.
    ///
    /// Priority: --model-url flag > INTAKE_MODEL_URL env var > config value.
    pub fn resolve_model_url(&self, config_url: String) -> String {
        if let Some(ref url) = self.model_url {
            return url.clone();
        }
        if let Ok(url) = std::env::var("INTAKE_MODEL_URL") {
            return url;
        }
        config_url
    }

    /// Resolve the model identifier.
    ///
    /// Priority: --model-name flag > INTAKE_MODEL_NAME env var > config value.
    pub fn resolve_model_name(&self, config_model: String) -> String {
        if let Some(ref name) = self.model_name {
            return name.clone();
        }
        if let Ok(name) = std::env::var("INTAKE_MODEL_NAME") {
            return name;
        }
        config_model
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".intake").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".intake").join("config.toml");
    }
    PathBuf::from("config.toml")
}
