use std::sync::Arc;
use tracing::debug;

use crate::context::{Context, HandlerFunc, Request, Response};
use crate::router::{split_segments, ParamVec, RouteTable};

/// Frozen group as seen by dispatch
pub(crate) struct GroupEntry {
    pub(crate) prefix: String,
    pub(crate) middlewares: Vec<HandlerFunc>,
}

/// Returns true when `path` lies under the group `prefix`
///
/// Both sides are compared segment by segment with empty segments dropped,
/// exactly as the route trie sees them, so `//admin/x` falls under `/admin`
/// and a prefix registered without a leading slash still matches. `/v1`
/// covers `/v1` and `/v1/users` but not `/v10`. A `:name` or `*name`
/// segment in the prefix covers any single request segment. The empty
/// prefix (root group) covers every path.
pub(crate) fn prefix_matches(prefix: &str, path: &str) -> bool {
    let mut path_segments = split_segments(path);
    split_segments(prefix).all(|expected| match path_segments.next() {
        Some(actual) => {
            expected == actual || expected.starts_with(':') || expected.starts_with('*')
        }
        None => false,
    })
}

fn default_not_found(ctx: &mut Context) {
    let message = format!("404 NOT FOUND: {}", ctx.path());
    ctx.write_text(404, message);
}

/// Read-only request dispatcher
///
/// Produced by [`EngineBuilder::build`](super::EngineBuilder::build). It
/// holds the route table and the group list and exposes no way to mutate
/// either, so one instance can serve any number of concurrent requests.
pub struct Engine {
    table: RouteTable<HandlerFunc>,
    groups: Vec<GroupEntry>,
    not_found: HandlerFunc,
}

impl Engine {
    /// Start configuring a new engine
    #[must_use]
    pub fn builder() -> super::EngineBuilder {
        super::EngineBuilder::new()
    }

    pub(crate) fn from_parts(
        table: RouteTable<HandlerFunc>,
        groups: Vec<GroupEntry>,
        not_found: Option<HandlerFunc>,
    ) -> Self {
        let not_found: HandlerFunc = match not_found {
            Some(handler) => handler,
            None => Arc::new(default_not_found),
        };
        Self {
            table,
            groups,
            not_found,
        }
    }

    /// Dispatch one request and return its finalized response
    ///
    /// The handler chain is the middleware of every group whose prefix
    /// covers the path, in group creation order, followed by the route
    /// handler (or the not-found handler when nothing matched). Middleware
    /// therefore still runs for unmatched paths under its prefix.
    #[must_use]
    pub fn dispatch(&self, request: Request) -> Response {
        let mut handlers: Vec<HandlerFunc> = self
            .groups
            .iter()
            .filter(|g| prefix_matches(&g.prefix, &request.path))
            .flat_map(|g| g.middlewares.iter().map(Arc::clone))
            .collect();

        let params = match self.table.resolve(&request.method, &request.path) {
            Some(matched) => {
                handlers.push(Arc::clone(matched.handler));
                matched.params
            }
            None => {
                debug!(
                    method = %request.method,
                    path = %request.path,
                    "No route matched, using not-found handler"
                );
                handlers.push(Arc::clone(&self.not_found));
                ParamVec::new()
            }
        };

        let mut ctx = Context::new(request, params, handlers);
        ctx.next();
        ctx.into_response()
    }

    /// Registered `(method, pattern)` pairs in registration order
    #[must_use]
    pub fn routes(&self) -> &[(String, String)] {
        self.table.routes()
    }
}
