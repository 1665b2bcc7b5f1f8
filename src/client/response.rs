// Parsed client response

use hyper::body::Bytes;
use hyper::ext::ReasonPhrase;
use hyper::http::response::Parts;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// A fully read response. Header names are lowercase; when a header
/// repeats, the last value wins.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// e.g. `HTTP/1.1`
    pub version: String,
    pub status: u16,
    /// Reason phrase as sent by the server, or the canonical one
    pub message: String,
    pub headers: BTreeMap<String, String>,
    /// Body with any transfer coding removed
    pub body: Bytes,
}

impl HttpResponse {
    pub(super) fn from_parts(parts: &Parts, body: Bytes) -> Self {
        let message = parts.extensions.get::<ReasonPhrase>().map_or_else(
            || parts.status.canonical_reason().unwrap_or_default().to_string(),
            |reason| String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        );

        let headers = parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_ascii_lowercase(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Self {
            version: format!("{:?}", parts.version),
            status: parts.status.as_u16(),
            message,
            headers,
            body,
        }
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} {}", self.version, self.status, self.message)?;
        for (name, value) in &self.headers {
            writeln!(f, "{name}: {value}")?;
        }
        write!(f, "\n{}", self.body_text())
    }
}
