// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads; unset means one per CPU core, 0 is rejected
    pub workers: Option<usize>,
    /// Set `SO_REUSEPORT` on the listening socket.
    /// Off by default so a second instance fails to bind instead of sharing the port.
    #[serde(default)]
    pub reuse_port: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// error, warn, info or debug. Filters `[CONFIG]`, `[Connection]` and
    /// `[WARN]` output; the diagnostic line and errors are always written.
    pub level: String,
    /// Line written to the info log for every request handled
    pub diagnostic_line: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PerformanceConfig {
    /// Seconds a keep-alive connection may stay open; 0 disables keep-alive
    pub keep_alive_timeout: u64,
    /// Seconds allowed to receive request headers
    pub read_timeout: u64,
    /// Lower bound, in seconds, on a connection's total lifetime
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP response configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    /// Body returned for every request
    pub body: String,
    pub content_type: String,
    pub server_name: String,
}
