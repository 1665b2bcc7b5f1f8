// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

use crate::logger::LogLevel;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension).
    ///
    /// Sources, lowest priority first: built-in defaults, the config file
    /// (optional), then `WELCOME_*` environment variables
    /// (e.g. `WELCOME_SERVER__PORT=8080`).
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("WELCOME")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Built-in defaults only, ignoring files and environment
    pub fn defaults() -> Result<Self, ConfigError> {
        let cfg: Self = with_defaults(config::Config::builder())?
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that deserialize fine but cannot be used at startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.workers == Some(0) {
            return Err(ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            ));
        }
        self.logging
            .level
            .parse::<LogLevel>()
            .map_err(|e| ConfigError::Message(format!("logging.level: {e}")))?;
        Ok(())
    }

    /// Configured log level; `validate` guarantees it parses
    pub fn log_level(&self) -> LogLevel {
        self.logging.level.parse().unwrap_or(LogLevel::Info)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.reuse_port", false)?
        .set_default("logging.level", "info")?
        .set_default("logging.diagnostic_line", "TEST")?
        .set_default("logging.access_log", false)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.body", "Welcome to Bun!")?
        .set_default("http.content_type", "text/plain;charset=utf-8")?
        .set_default("http.server_name", "welcome_server")
}
