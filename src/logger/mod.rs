//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - The per-request diagnostic line
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::{LogLevel, LogWriter};

use crate::config::Config;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        config.log_level(),
    )
}

/// Whether filterable messages of `level` should be written.
/// Before `init()` everything down to info passes.
fn enabled(level: LogLevel) -> bool {
    writer::get().map_or(level <= LogLevel::Info, |w| w.allows(level))
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_config(config: &Config) {
    if !enabled(LogLevel::Info) {
        return;
    }
    match config.server.workers {
        Some(workers) => write_info(&format!("[CONFIG] Using {workers} worker threads")),
        None => write_info("[CONFIG] Using default worker threads (CPU cores)"),
    }
    write_info(&format!("[CONFIG] Log level: {}", config.logging.level));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("[CONFIG] Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("[CONFIG] Error log: {path}"));
    }
    if let Some(max) = config.performance.max_connections {
        write_info(&format!("[CONFIG] Max connections: {max}"));
    }
}

pub fn log_server_start(url: &str) {
    write_info(&format!("Listening on {url}"));
}

pub fn log_server_stopped(url: &str, requests_served: u64) {
    write_info(&format!(
        "[SHUTDOWN] Stopped listening on {url} after {requests_served} request(s)"
    ));
}

/// Fixed line emitted once per handled request, never filtered by level.
///
/// `sink` overrides the global writer (used by per-server request logs).
pub fn log_diagnostic(sink: Option<&LogWriter>, line: &str) {
    match sink {
        Some(w) => w.write_info(line),
        None => write_info(line),
    }
}

pub fn log_connection_accepted(peer_addr: &std::net::SocketAddr) {
    if enabled(LogLevel::Info) {
        write_info(&format!("[Connection] Accepted from: {peer_addr}"));
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_signal(name: &str) {
    write_info(&format!("[SIGNAL] {name} received, shutting down"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    if enabled(LogLevel::Warn) {
        write_error(&format!("[WARN] {message}"));
    }
}

/// Log formatted access log entry
pub fn log_access(sink: Option<&LogWriter>, entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match sink {
        Some(w) => w.write_access(&line),
        None => write_access(&line),
    }
}
