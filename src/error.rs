//! Error types for the welcome server

use std::net::SocketAddr;
use thiserror::Error;

/// Errors raised while configuring, starting or stopping the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// `server.host` / `server.port` do not form a socket address
    #[error("{0}")]
    InvalidAddress(String),

    /// The listening socket could not be created or bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The accept loop task panicked or was cancelled
    #[error("Server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// An outbound request made by `fetch` failed
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Errors raised by the outbound HTTP client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request line or a header could not be built
    #[error("Invalid request: {0}")]
    Request(#[from] hyper::http::Error),

    /// Connecting, sending or reading the response head failed
    #[error("Request failed: {0}")]
    Send(#[from] hyper_util::client::legacy::Error),

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    Body(#[from] hyper::Error),
}
