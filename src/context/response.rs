use serde_json::Value;

/// Content types written by the context primitives.
///
/// Kept `'static` so the transport can emit header lines without allocating.
pub mod content_type {
    pub const JSON: &str = "application/json";
    pub const TEXT: &str = "text/plain; charset=utf-8";
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Target encoding for [`Context::write_value`](crate::Context::write_value)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Compact JSON, `application/json`
    Json,
    /// Indented JSON, `application/json`
    PrettyJson,
    /// Plain text: strings are written verbatim, other values as compact JSON
    Text,
}

/// Finalized response produced by one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code (200 when no handler set one)
    pub status: u16,
    /// Content type set by the first write primitive, if any
    pub content_type: Option<&'static str>,
    /// Response body
    pub body: Vec<u8>,
}

impl Response {
    /// Body as UTF-8 text, if it is valid UTF-8
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Body parsed as JSON
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the body is not valid JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
