// Application state module
// Shared, lock-free state read by every request

use hyper::body::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::types::Config;
use crate::logger::LogWriter;

/// Application state
pub struct AppState {
    pub config: Config,

    /// Prepared response body, cloned per request without copying
    pub body: Bytes,

    pub access_log: bool,

    /// Writer for the diagnostic and access lines of this server only.
    /// `None` uses the process-wide logger.
    pub request_log: Option<Arc<LogWriter>>,

    /// Number of requests handed to the handler so far
    requests_served: AtomicU64,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            body: Bytes::from(config.http.body.clone()),
            access_log: config.logging.access_log,
            request_log: None,
            requests_served: AtomicU64::new(0),
        }
    }

    /// State whose per-request lines go to `writer` instead of the global logger
    pub fn with_request_log(config: &Config, writer: Arc<LogWriter>) -> Self {
        Self {
            request_log: Some(writer),
            ..Self::new(config)
        }
    }

    /// Record one handled request
    pub fn record_request(&self) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }

    pub fn request_log(&self) -> Option<&LogWriter> {
        self.request_log.as_deref()
    }
}
