//! Per-request context and the resumable handler chain.

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

use super::handler::HandlerFunc;
use super::request::Request;
use super::response::{content_type, Encoding, Response};
use crate::ids::RequestId;
use crate::router::ParamVec;

/// Lifecycle of a handler chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// No handler has run yet
    Pending,
    /// At least one handler has started and the cursor is inside the list
    Running,
    /// The cursor walked past the last handler
    Finished,
    /// The cursor was forced to the end by [`Context::fail`] or [`Context::abort`]
    Aborted,
}

/// State for one request as it travels through its handler chain
///
/// A context is created by the engine for every inbound request, owned by
/// the task serving that request, and consumed into a [`Response`] once the
/// chain returns. It is never shared between requests.
///
/// # Chain semantics
///
/// The handler list is fixed when the context is built: the middleware of
/// every matching group followed by the route handler. [`Context::next`]
/// runs every handler that has not started yet, in order. A handler that
/// calls `next()` itself runs the rest of the chain inline and gets control
/// back afterwards:
///
/// ```rust
/// use relayrouter::{Context, Handler, HandlerFunc, Request};
/// use relayrouter::router::ParamVec;
/// use std::sync::{Arc, Mutex};
///
/// let log = Arc::new(Mutex::new(Vec::new()));
/// let (a, h) = (Arc::clone(&log), Arc::clone(&log));
/// let handlers: Vec<HandlerFunc> = vec![
///     Arc::new(move |ctx: &mut Context| {
///         a.lock().unwrap().push("a:before");
///         ctx.next();
///         a.lock().unwrap().push("a:after");
///     }),
///     Arc::new(move |ctx: &mut Context| {
///         h.lock().unwrap().push("handler");
///         ctx.write_text(200, "ok");
///     }),
/// ];
///
/// let mut ctx = Context::new(Request::new("GET", "/"), ParamVec::new(), handlers);
/// ctx.next();
/// assert_eq!(*log.lock().unwrap(), ["a:before", "handler", "a:after"]);
/// ```
pub struct Context {
    request_id: RequestId,
    request: Request,
    params: ParamVec,
    handlers: Vec<HandlerFunc>,
    /// Index of the next handler to start
    cursor: usize,
    state: ChainState,
    status: Option<u16>,
    content_type: Option<&'static str>,
    body: Vec<u8>,
}

impl Context {
    /// Build a context for `request` with its resolved parameters and chain
    #[must_use]
    pub fn new(request: Request, params: ParamVec, handlers: Vec<HandlerFunc>) -> Self {
        let request_id = RequestId::from_header_or_new(request.header("x-request-id"));
        Self {
            request_id,
            request,
            params,
            handlers,
            cursor: 0,
            state: ChainState::Pending,
            status: None,
            content_type: None,
            body: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // chain control
    // ------------------------------------------------------------------

    /// Run every handler that has not started yet
    ///
    /// Returns once the cursor reaches the end of the chain, either because
    /// all handlers ran or because one of them called [`Context::fail`] or
    /// [`Context::abort`].
    pub fn next(&mut self) {
        if self.state == ChainState::Pending {
            self.state = ChainState::Running;
        }
        while self.cursor < self.handlers.len() {
            let handler = Arc::clone(&self.handlers[self.cursor]);
            self.cursor += 1;
            handler.handle(self);
        }
        if self.state == ChainState::Running {
            self.state = ChainState::Finished;
        }
    }

    /// Stop the chain without writing a response
    ///
    /// Handlers after the current one never start. Handlers already wrapping
    /// the current one still get control back when their `next()` returns.
    pub fn abort(&mut self) {
        self.cursor = self.handlers.len();
        self.state = ChainState::Aborted;
    }

    /// Stop the chain and respond with `{"message": message}`
    ///
    /// This is the short-circuit used by authentication and validation
    /// middleware to reject a request before the route handler runs. A
    /// failure response replaces anything written to the context so far.
    pub fn fail(&mut self, status: u16, message: &str) {
        self.abort();
        self.reset_response();
        self.write_json(status, &json!({ "message": message }));
    }

    /// Current chain state
    #[must_use]
    pub fn state(&self) -> ChainState {
        self.state
    }

    /// True once [`Context::fail`] or [`Context::abort`] was called
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.state == ChainState::Aborted
    }

    // ------------------------------------------------------------------
    // request accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.request.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.request.path
    }

    /// Get a captured path parameter by name
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// All captured path parameters in path order
    #[must_use]
    pub fn params(&self) -> &ParamVec {
        &self.params
    }

    /// Get a URL-decoded query string value (first occurrence)
    #[must_use]
    pub fn query(&self, key: &str) -> Option<String> {
        url::form_urlencoded::parse(self.request.query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Get a URL-encoded form field from the request body
    ///
    /// Only bodies sent as `application/x-www-form-urlencoded` are parsed.
    #[must_use]
    pub fn post_form(&self, key: &str) -> Option<String> {
        let is_form = self
            .header("content-type")
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);
        if !is_form {
            return None;
        }
        url::form_urlencoded::parse(&self.request.body)
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Get a request header (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.header(name)
    }

    /// Raw request body
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.request.body
    }

    // ------------------------------------------------------------------
    // response primitives
    // ------------------------------------------------------------------

    /// Status committed by the first write, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// True once a status line has been committed
    #[must_use]
    pub fn written(&self) -> bool {
        self.status.is_some()
    }

    /// Commit the status line without a body
    pub fn set_status(&mut self, status: u16) {
        self.write_head(status, None);
    }

    /// Write a plain-text body
    pub fn write_text(&mut self, status: u16, text: impl AsRef<str>) {
        self.write_head(status, Some(content_type::TEXT));
        self.body.extend_from_slice(text.as_ref().as_bytes());
    }

    /// Write pre-rendered HTML
    pub fn write_html(&mut self, status: u16, markup: impl AsRef<str>) {
        self.write_head(status, Some(content_type::HTML));
        self.body.extend_from_slice(markup.as_ref().as_bytes());
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, status: u16, bytes: &[u8]) {
        self.write_head(status, Some(content_type::OCTET_STREAM));
        self.body.extend_from_slice(bytes);
    }

    /// Serialize `value` as JSON
    ///
    /// If serialization fails the response degrades to a plain-text
    /// `500 Internal Server Error`.
    pub fn write_json<T: Serialize + ?Sized>(&mut self, status: u16, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.write_head(status, Some(content_type::JSON));
                self.body.extend_from_slice(&bytes);
            }
            Err(e) => self.encoding_failed(&e),
        }
    }

    /// Write a structured value in the requested encoding
    pub fn write_value(&mut self, status: u16, value: &Value, encoding: Encoding) {
        match encoding {
            Encoding::Json => self.write_json(status, value),
            Encoding::PrettyJson => match serde_json::to_vec_pretty(value) {
                Ok(bytes) => {
                    self.write_head(status, Some(content_type::JSON));
                    self.body.extend_from_slice(&bytes);
                }
                Err(e) => self.encoding_failed(&e),
            },
            Encoding::Text => match value {
                Value::String(s) => self.write_text(status, s),
                other => self.write_text(status, other.to_string()),
            },
        }
    }

    /// Finalize into the response handed back to the transport
    #[must_use]
    pub fn into_response(self) -> Response {
        Response {
            status: self.status.unwrap_or(200),
            content_type: self.content_type,
            body: self.body,
        }
    }

    /// Commit status and content type once; later calls only log
    fn write_head(&mut self, status: u16, content_type: Option<&'static str>) {
        if let Some(committed) = self.status {
            if committed != status {
                warn!(
                    request_id = %self.request_id,
                    committed_status = committed,
                    ignored_status = status,
                    path = %self.request.path,
                    "Superfluous status write ignored"
                );
            }
            if self.content_type.is_none() {
                self.content_type = content_type;
            }
            return;
        }
        self.status = Some(status);
        self.content_type = content_type;
    }

    fn reset_response(&mut self) {
        self.status = None;
        self.content_type = None;
        self.body.clear();
    }

    fn encoding_failed(&mut self, err: &serde_json::Error) {
        error!(
            request_id = %self.request_id,
            path = %self.request.path,
            error = %err,
            "Response encoding failed"
        );
        self.reset_response();
        self.write_text(500, "Internal Server Error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Handler;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recorder(log: &Log, name: &'static str, wrap: bool) -> HandlerFunc {
        let log = Arc::clone(log);
        Arc::new(move |ctx: &mut Context| {
            log.lock().unwrap().push(format!("{name}:pre"));
            if wrap {
                ctx.next();
                log.lock().unwrap().push(format!("{name}:post"));
            }
        })
    }

    fn route(log: &Log) -> HandlerFunc {
        let log = Arc::clone(log);
        Arc::new(move |ctx: &mut Context| {
            log.lock().unwrap().push("H".to_string());
            ctx.write_text(200, "done");
        })
    }

    fn run(handlers: Vec<HandlerFunc>) -> Context {
        let mut ctx = Context::new(Request::new("GET", "/"), ParamVec::new(), handlers);
        ctx.next();
        ctx
    }

    #[test]
    fn test_wrapping_order() {
        let log: Log = Arc::default();
        let ctx = run(vec![recorder(&log, "A", true), recorder(&log, "B", true), route(&log)]);
        assert_eq!(
            *log.lock().unwrap(),
            ["A:pre", "B:pre", "H", "B:post", "A:post"]
        );
        assert_eq!(ctx.state(), ChainState::Finished);
        assert_eq!(ctx.into_response().text(), Some("done"));
    }

    #[test]
    fn test_non_wrapping_middleware_lets_chain_continue() {
        let log: Log = Arc::default();
        run(vec![recorder(&log, "A", false), route(&log)]);
        assert_eq!(*log.lock().unwrap(), ["A:pre", "H"]);
    }

    #[test]
    fn test_fail_skips_remaining_handlers() {
        let log: Log = Arc::default();
        let reject: HandlerFunc = Arc::new(|ctx: &mut Context| ctx.fail(403, "forbidden"));
        let ctx = run(vec![recorder(&log, "A", true), reject, route(&log)]);

        assert_eq!(*log.lock().unwrap(), ["A:pre", "A:post"]);
        assert!(ctx.is_aborted());
        let resp = ctx.into_response();
        assert_eq!(resp.status, 403);
        assert_eq!(resp.content_type, Some(content_type::JSON));
        assert_eq!(resp.json().unwrap(), json!({ "message": "forbidden" }));
    }

    #[test]
    fn test_fail_replaces_buffered_response() {
        let handlers: Vec<HandlerFunc> = vec![Arc::new(|ctx: &mut Context| {
            ctx.write_text(200, "partial");
            ctx.fail(500, "Internal Server Error");
        })];
        let resp = run(handlers).into_response();
        assert_eq!(resp.status, 500);
        assert_eq!(
            resp.json().unwrap(),
            json!({ "message": "Internal Server Error" })
        );
    }

    #[test]
    fn test_abort_stops_chain_without_response() {
        let log: Log = Arc::default();
        let stop: HandlerFunc = Arc::new(|ctx: &mut Context| ctx.abort());
        let ctx = run(vec![stop, route(&log)]);
        assert!(log.lock().unwrap().is_empty());
        assert!(ctx.is_aborted());
        assert!(!ctx.written());
        let resp = ctx.into_response();
        assert_eq!(resp.status, 200);
        assert!(resp.body.is_empty());
    }

    #[test]
    fn test_next_after_finish_is_noop() {
        let log: Log = Arc::default();
        let mut ctx = run(vec![route(&log)]);
        ctx.next();
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_chain_finishes() {
        let ctx = run(Vec::new());
        assert_eq!(ctx.state(), ChainState::Finished);
    }

    #[test]
    fn test_pending_before_first_next() {
        let ctx = Context::new(Request::new("GET", "/"), ParamVec::new(), Vec::new());
        assert_eq!(ctx.state(), ChainState::Pending);
        assert_eq!(ctx.status(), None);
    }

    #[test]
    fn test_status_is_written_once() {
        let handlers: Vec<HandlerFunc> = vec![Arc::new(|ctx: &mut Context| {
            ctx.write_text(201, "a");
            ctx.write_text(404, "b");
            ctx.set_status(500);
        })];
        let ctx = run(handlers);
        assert_eq!(ctx.status(), Some(201));
        let resp = ctx.into_response();
        assert_eq!(resp.content_type, Some(content_type::TEXT));
        assert_eq!(resp.text(), Some("ab"));
    }

    #[test]
    fn test_write_json_and_bytes() {
        let mut ctx = Context::new(Request::new("GET", "/"), ParamVec::new(), Vec::new());
        let mut body = BTreeMap::new();
        body.insert("id", 7);
        ctx.write_json(200, &body);
        let resp = ctx.into_response();
        assert_eq!(resp.json().unwrap(), json!({ "id": 7 }));

        let mut ctx = Context::new(Request::new("GET", "/"), ParamVec::new(), Vec::new());
        ctx.write_bytes(200, &[0xde, 0xad]);
        let resp = ctx.into_response();
        assert_eq!(resp.content_type, Some(content_type::OCTET_STREAM));
        assert_eq!(resp.body, vec![0xde, 0xad]);
    }

    #[test]
    fn test_write_value_encodings() {
        let value = json!({ "name": "rex" });

        let mut ctx = Context::new(Request::new("GET", "/"), ParamVec::new(), Vec::new());
        ctx.write_value(200, &value, Encoding::PrettyJson);
        let resp = ctx.into_response();
        assert!(resp.text().unwrap().contains('\n'));
        assert_eq!(resp.json().unwrap(), value);

        let mut ctx = Context::new(Request::new("GET", "/"), ParamVec::new(), Vec::new());
        ctx.write_value(200, &json!("plain"), Encoding::Text);
        assert_eq!(ctx.into_response().text(), Some("plain"));
    }

    #[test]
    fn test_encoding_failure_degrades_to_500_text() {
        struct Broken;
        impl Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("cannot encode"))
            }
        }

        let mut ctx = Context::new(Request::new("GET", "/"), ParamVec::new(), Vec::new());
        ctx.write_json(200, &Broken);
        let resp = ctx.into_response();
        assert_eq!(resp.status, 500);
        assert_eq!(resp.content_type, Some(content_type::TEXT));
        assert_eq!(resp.text(), Some("Internal Server Error"));
    }

    #[test]
    fn test_request_accessors() {
        let request = Request::new("POST", "/search?q=rust%20lang&page=2")
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body("name=ferris&lang=rust");
        let mut params = ParamVec::new();
        params.push((Arc::from("id"), "42".to_string()));
        let ctx = Context::new(request, params, Vec::new());

        assert_eq!(ctx.method(), "POST");
        assert_eq!(ctx.path(), "/search");
        assert_eq!(ctx.param("id"), Some("42"));
        assert_eq!(ctx.query("q").as_deref(), Some("rust lang"));
        assert_eq!(ctx.query("page").as_deref(), Some("2"));
        assert_eq!(ctx.query("missing"), None);
        assert_eq!(ctx.post_form("name").as_deref(), Some("ferris"));
    }

    #[test]
    fn test_post_form_requires_form_content_type() {
        let request = Request::new("POST", "/").with_body("name=ferris");
        let ctx = Context::new(request, ParamVec::new(), Vec::new());
        assert_eq!(ctx.post_form("name"), None);
    }

    #[test]
    fn test_request_id_taken_from_header() {
        let id = RequestId::new();
        let request = Request::new("GET", "/").with_header("X-Request-Id", id.to_string());
        let ctx = Context::new(request, ParamVec::new(), Vec::new());
        assert_eq!(ctx.request_id(), id);
    }

    #[test]
    fn test_struct_handler_in_chain() {
        struct Teapot;
        impl Handler for Teapot {
            fn handle(&self, ctx: &mut Context) {
                ctx.set_status(418);
            }
        }
        let handlers: Vec<HandlerFunc> = vec![Arc::new(Teapot)];
        let resp = run(handlers).into_response();
        assert_eq!(resp.status, 418);
        assert!(resp.body.is_empty());
    }
}
