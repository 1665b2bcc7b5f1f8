// Server module entry point
// Owns the listener lifecycle: bind on start, close on stop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::config::{AppState, Config};
use crate::error::ServerError;

pub use listener::create_listener;
pub use server_loop::start_server_loop;

/// A configured server that has not been bound yet
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: &Config) -> Self {
        Self::with_state(AppState::new(config))
    }

    /// Server over prepared state, e.g. one carrying its own request log
    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Bind the listening socket and spawn the accept loop.
    ///
    /// Bind errors (port in use, permission denied) are returned here rather
    /// than from the background task. Must be called inside a Tokio runtime.
    pub fn start(self) -> Result<ServerHandle, ServerError> {
        let config = &self.state.config;
        let addr = config
            .get_socket_addr()
            .map_err(ServerError::InvalidAddress)?;

        let listener = create_listener(addr, config.server.reuse_port)
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        let shutdown = Arc::new(Notify::new());
        let active_connections = Arc::new(AtomicUsize::new(0));

        let task = tokio::spawn(start_server_loop(
            listener,
            Arc::clone(&self.state),
            Arc::clone(&active_connections),
            Arc::clone(&shutdown),
        ));

        Ok(ServerHandle {
            local_addr,
            state: self.state,
            active_connections,
            shutdown,
            task,
        })
    }
}

/// A running server. Dropping the handle leaves the server running;
/// call [`ServerHandle::stop`] to close the listener.
pub struct ServerHandle {
    local_addr: SocketAddr,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Base URL of the server, with unspecified and loopback addresses shown as `localhost`
    pub fn url(&self) -> String {
        display_url(self.local_addr)
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }

    /// Stop accepting connections and wait until the listener is closed
    pub async fn stop(self) -> Result<(), ServerError> {
        // notify_one stores a permit if the loop is not waiting yet
        self.shutdown.notify_one();
        self.task.await?;
        Ok(())
    }
}

fn display_url(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() || addr.ip().is_loopback() {
        format!("http://localhost:{}", addr.port())
    } else {
        format!("http://{addr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::capture::CapturedLog;
    use http_body_util::{BodyExt, Empty, Full};
    use hyper::body::Bytes;
    use hyper::{Method, Request, StatusCode};
    use hyper_util::client::legacy::Client;
    use hyper_util::rt::TokioExecutor;

    fn test_config() -> Config {
        let mut cfg = Config::defaults().unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 0;
        cfg
    }

    fn captured_server(name: &str) -> (ServerHandle, CapturedLog) {
        let log = CapturedLog::new(name);
        let state = AppState::with_request_log(&test_config(), log.writer());
        (Server::with_state(state).start().unwrap(), log)
    }

    async fn send(
        addr: SocketAddr,
        method: Method,
        path: &str,
        body: &'static str,
    ) -> (StatusCode, Bytes) {
        let client = Client::builder(TokioExecutor::new()).build_http::<Full<Bytes>>();
        let req = Request::builder()
            .method(method)
            .uri(format!("http://{addr}{path}"))
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap();

        let resp = client.request(req).await.unwrap();
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    #[test]
    fn test_display_url() {
        assert_eq!(
            display_url("0.0.0.0:3000".parse().unwrap()),
            "http://localhost:3000"
        );
        assert_eq!(
            display_url("127.0.0.1:3000".parse().unwrap()),
            "http://localhost:3000"
        );
        assert_eq!(
            display_url("[::]:8080".parse().unwrap()),
            "http://localhost:8080"
        );
        assert_eq!(
            display_url("10.1.2.3:3000".parse().unwrap()),
            "http://10.1.2.3:3000"
        );
    }

    #[tokio::test]
    async fn test_serves_fixed_response() {
        let (handle, log) = captured_server("fixed_response");
        let addr = handle.local_addr();

        let (status, body) = send(addr, Method::GET, "/", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"Welcome to Bun!");

        let (status, body) = send(addr, Method::POST, "/anything", r#"{"a":1}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"Welcome to Bun!");

        let (status, body) = send(addr, Method::GET, "/nonexistent/path/x/y/z", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"Welcome to Bun!");

        assert_eq!(handle.state().requests_served(), 3);
        assert_eq!(log.lines(), vec!["TEST"; 3]);
        handle.stop().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_requests() {
        let (handle, log) = captured_server("concurrent");
        let addr = handle.local_addr();

        let (a, b) = tokio::join!(
            send(addr, Method::GET, "/", ""),
            send(addr, Method::GET, "/", "")
        );

        assert_eq!(a.0, StatusCode::OK);
        assert_eq!(b.0, StatusCode::OK);
        assert_eq!(a.1, b.1);
        assert_eq!(handle.state().requests_served(), 2);
        // Exactly one diagnostic line per request, lines never interleave
        assert_eq!(log.lines(), vec!["TEST"; 2]);
        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_head_request_has_headers_only() {
        let handle = Server::new(&test_config()).start().unwrap();
        let client = Client::builder(TokioExecutor::new()).build_http::<Empty<Bytes>>();
        let req = Request::head(format!("http://{}/", handle.local_addr()))
            .body(Empty::new())
            .unwrap();

        let resp = client.request(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-length"], "15");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());

        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_port_in_use_fails_to_start() {
        let blocker = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let mut cfg = test_config();
        cfg.server.port = blocker.local_addr().unwrap().port();

        match Server::new(&cfg).start() {
            Err(ServerError::Bind { addr, source }) => {
                assert_eq!(addr.port(), cfg.server.port);
                assert_eq!(source.kind(), std::io::ErrorKind::AddrInUse);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("server started on a port that was already bound"),
        }
    }

    #[tokio::test]
    async fn test_invalid_host_is_rejected() {
        let mut cfg = test_config();
        cfg.server.host = "not an ip".to_string();

        assert!(matches!(
            Server::new(&cfg).start(),
            Err(ServerError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_stop_closes_listener() {
        let handle = Server::new(&test_config()).start().unwrap();
        let addr = handle.local_addr();

        assert!(tokio::net::TcpStream::connect(addr).await.is_ok());
        handle.stop().await.unwrap();
        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_instances_are_isolated() {
        let first = Server::new(&test_config()).start().unwrap();
        let second = Server::new(&test_config()).start().unwrap();
        assert_ne!(first.local_addr(), second.local_addr());

        send(first.local_addr(), Method::GET, "/", "").await;
        assert_eq!(first.state().requests_served(), 1);
        assert_eq!(second.state().requests_served(), 0);

        first.stop().await.unwrap();
        second.stop().await.unwrap();
    }
}
