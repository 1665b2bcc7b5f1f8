//! Welcome request handler
//!
//! Every request, whatever its method, path, headers or body, gets the same
//! 200 response. The handler emits one diagnostic line per call.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Generic over the body type: the request body is never read.
#[allow(clippy::unused_async)]
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    logger::log_diagnostic(state.request_log(), &state.config.logging.diagnostic_line);
    state.record_request();

    let http_config = &state.config.http;
    let response = http::build_text_response(
        state.body.clone(),
        &http_config.content_type,
        &http_config.server_name,
    );

    if state.access_log {
        let mut entry = AccessLogEntry::from_request(&req, peer_addr);
        entry.status = response.status().as_u16();
        entry.body_bytes = state.body.len();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(
            state.request_log(),
            &entry,
            &state.config.logging.access_log_format,
        );
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::logger::capture::CapturedLog;
    use http_body_util::{BodyExt, Empty};
    use hyper::header::CONTENT_TYPE;
    use hyper::{Method, StatusCode};

    fn captured_state(name: &str, cfg: &Config) -> (Arc<AppState>, CapturedLog) {
        let log = CapturedLog::new(name);
        let state = Arc::new(AppState::with_request_log(cfg, log.writer()));
        (state, log)
    }

    fn test_state(name: &str) -> (Arc<AppState>, CapturedLog) {
        captured_state(name, &Config::defaults().unwrap())
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_get_root() {
        let (state, log) = test_state("get_root");
        let req = Request::get("/").body(Empty::<Bytes>::new()).unwrap();

        let resp = handle_request(req, Arc::clone(&state), None).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain;charset=utf-8");
        assert_eq!(&body_of(resp).await[..], b"Welcome to Bun!");
        assert_eq!(state.requests_served(), 1);
        assert_eq!(log.lines(), vec!["TEST"]);
    }

    #[tokio::test]
    async fn test_post_with_json_body() {
        let (state, log) = test_state("post_json");
        let req = Request::post("/anything")
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from_static(br#"{"hello":"world","n":[1,2,3]}"#)))
            .unwrap();

        let resp = handle_request(req, state, None).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(&body_of(resp).await[..], b"Welcome to Bun!");
        assert_eq!(log.lines(), vec!["TEST"]);
    }

    #[tokio::test]
    async fn test_unknown_path_has_no_404() {
        let (state, _log) = test_state("unknown_path");
        let req = Request::get("/nonexistent/path/x/y/z")
            .body(Empty::<Bytes>::new())
            .unwrap();

        let resp = handle_request(req, state, None).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(&body_of(resp).await[..], b"Welcome to Bun!");
    }

    #[tokio::test]
    async fn test_response_invariant_under_request_mutation() {
        let (state, log) = test_state("invariant");
        let methods = [
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
            Method::from_bytes(b"PURGE").unwrap(),
        ];
        let uris = ["/", "/a?b=c&d", "/%2e%2e/etc/passwd", "*"];

        for method in &methods {
            for uri in uris {
                let req = Request::builder()
                    .method(method.clone())
                    .uri(uri)
                    .header("x-random", "whatever")
                    .header("cookie", "a=b")
                    .body(Full::new(Bytes::from_static(b"\x00\xffgarbage")))
                    .unwrap();

                let resp = handle_request(req, Arc::clone(&state), None).await.unwrap();
                assert_eq!(resp.status(), StatusCode::OK, "{method} {uri}");
                assert_eq!(&body_of(resp).await[..], b"Welcome to Bun!", "{method} {uri}");
            }
        }

        // One diagnostic line per invocation, nothing else
        let calls = methods.len() * uris.len();
        let lines = log.lines();
        assert_eq!(lines.len(), calls);
        assert!(lines.iter().all(|l| l == "TEST"));
        assert_eq!(state.requests_served(), u64::try_from(calls).unwrap());
    }

    #[tokio::test]
    async fn test_configured_diagnostic_line() {
        let mut cfg = Config::defaults().unwrap();
        cfg.logging.diagnostic_line = "request seen".to_string();
        let (state, log) = captured_state("custom_line", &cfg);

        for _ in 0..3 {
            let req = Request::get("/").body(Empty::<Bytes>::new()).unwrap();
            handle_request(req, Arc::clone(&state), None).await.unwrap();
        }

        assert_eq!(log.lines(), vec!["request seen"; 3]);
    }

    #[tokio::test]
    async fn test_access_log_line_follows_diagnostic() {
        let mut cfg = Config::defaults().unwrap();
        cfg.http.body = "custom body".to_string();
        cfg.logging.access_log = true;
        cfg.logging.access_log_format = "json".to_string();
        let (state, log) = captured_state("access_json", &cfg);

        let req = Request::get("/x?y=1")
            .header("user-agent", "curl/8.0")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let peer = "127.0.0.1:40000".parse().ok();
        let resp = handle_request(req, Arc::clone(&state), peer).await.unwrap();
        assert_eq!(&body_of(resp).await[..], b"custom body");

        let lines = log.lines();
        assert_eq!(lines.len(), 2, "{lines:?}");
        assert_eq!(lines[0], "TEST");

        let entry: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(entry["status"], 200);
        assert_eq!(entry["body_bytes"], "custom body".len());
        assert_eq!(entry["remote_addr"], "127.0.0.1");
        assert_eq!(entry["method"], "GET");
        assert_eq!(entry["path"], "/x");
        assert_eq!(entry["query"], "y=1");
        assert_eq!(entry["user_agent"], "curl/8.0");
        assert!(entry["request_time_us"].is_u64());
    }

    #[tokio::test]
    async fn test_access_log_off_writes_only_diagnostic() {
        let (state, log) = test_state("access_off");
        assert!(!state.access_log);

        let req = Request::get("/").body(Empty::<Bytes>::new()).unwrap();
        handle_request(req, state, None).await.unwrap();

        assert_eq!(log.lines(), vec!["TEST"]);
    }
}
