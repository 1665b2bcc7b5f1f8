//! HTTP response building module
//!
//! Builds the fixed response served for every request.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, SERVER};
use hyper::{Response, StatusCode};

/// Build the 200 OK text response
///
/// `body` is a cheap clone of the shared prepared bytes.
pub fn build_text_response(
    body: Bytes,
    content_type: &str,
    server_name: &str,
) -> Response<Full<Bytes>> {
    let content_length = body.len();

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(SERVER, server_name)
        .body(Full::new(body.clone()))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(body))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_text_response_headers() {
        let resp = build_text_response(
            Bytes::from_static(b"Welcome to Bun!"),
            "text/plain;charset=utf-8",
            "welcome_server",
        );

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain;charset=utf-8");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "15");
        assert_eq!(resp.headers()[SERVER], "welcome_server");

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Welcome to Bun!");
    }

    #[tokio::test]
    async fn test_invalid_header_value_still_returns_body() {
        // A newline is not a legal header value, so the builder fails
        let resp = build_text_response(Bytes::from_static(b"hi"), "text/plain\n", "x");

        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hi");
    }
}
