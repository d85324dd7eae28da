use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage.
///
/// Names are compared case-insensitively (RFC 7230) on lookup.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Raw request handed to [`Engine::dispatch`](crate::engine::Engine::dispatch)
///
/// This is the transport-neutral view of an inbound request: the server
/// adapter fills it from `may_minihttp`, tests build it directly.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// HTTP method exactly as received (`GET`, `POST`, ...)
    pub method: String,
    /// Path without the query string
    pub path: String,
    /// Raw query string without the leading `?` (empty if none)
    pub query: String,
    /// Request headers
    pub headers: HeaderVec,
    /// Raw request body
    pub body: Vec<u8>,
}

impl Request {
    /// Build a request from a method and a request target (`/path?query`)
    #[must_use]
    pub fn new(method: impl Into<String>, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        Self {
            method: method.into(),
            path: if path.is_empty() { "/" } else { path }.to_string(),
            query: query.to_string(),
            headers: HeaderVec::new(),
            body: Vec::new(),
        }
    }

    /// Append a header
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    /// Replace the body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
