//! Outbound HTTP/1.1 client
//!
//! A small client bound to one `host:port`, used by the `fetch` command to
//! talk to a running server. Every request carries `Host` and
//! `Connection: close`; POST bodies get an explicit `Content-Length`.
//! Chunked responses are decoded before the body is returned.

mod response;

pub use response::HttpResponse;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONNECTION, CONTENT_LENGTH, HOST};
use hyper::{Method, Request};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::error::ClientError;

/// Client for a single origin
pub struct HttpClient {
    host: String,
    port: u16,
    inner: Client<HttpConnector, Full<Bytes>>,
}

impl HttpClient {
    /// No connection is made until the first request
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            inner: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    /// GET `path`, with `params` appended as a url-encoded query string
    pub async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ClientError> {
        let target = path_and_query(path, params);
        self.send(Method::GET, &target, headers, None).await
    }

    /// POST `body` to `path`. Query params are ignored for POST.
    pub async fn post(
        &self,
        path: &str,
        headers: &[(&str, &str)],
        body: impl Into<Bytes>,
    ) -> Result<HttpResponse, ClientError> {
        self.send(Method::POST, path, headers, Some(body.into()))
            .await
    }

    /// Value sent in the `Host` header; the port is omitted when it is 80
    pub fn host_header(&self) -> String {
        let host = self.uri_host();
        if self.port == 80 {
            host
        } else {
            format!("{host}:{}", self.port)
        }
    }

    // IPv6 literals need brackets inside a URI
    fn uri_host(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        }
    }

    async fn send(
        &self,
        method: Method,
        target: &str,
        headers: &[(&str, &str)],
        body: Option<Bytes>,
    ) -> Result<HttpResponse, ClientError> {
        let uri = format!("http://{}:{}{target}", self.uri_host(), self.port);
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let content_length = body.as_ref().map(Bytes::len);
        let mut req = builder.body(Full::new(body.unwrap_or_default()))?;

        let req_headers = req.headers_mut();
        let host = HeaderValue::from_str(&self.host_header()).map_err(hyper::http::Error::from)?;
        req_headers.insert(HOST, host);
        req_headers.insert(CONNECTION, HeaderValue::from_static("close"));
        if let Some(len) = content_length {
            req_headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
        }

        let resp = self.inner.request(req).await?;
        let (parts, body) = resp.into_parts();
        let body = body.collect().await?.to_bytes();

        Ok(HttpResponse::from_parts(&parts, body))
    }
}

fn path_and_query(path: &str, params: &[(&str, &str)]) -> String {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    if params.is_empty() {
        return path;
    }

    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{query}")
}
