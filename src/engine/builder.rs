use http::Method;
use std::sync::Arc;
use tracing::{debug, info};

use super::core::{Engine, GroupEntry};
use crate::context::{Handler, HandlerFunc};
use crate::error::RouteError;
use crate::middleware::{Logger, Recovery};
use crate::router::RouteTable;

/// Group data as kept during configuration
///
/// Groups live in one flat, append-only list; the index of a group is its
/// identity and registration order is list order.
struct GroupData {
    prefix: String,
    middlewares: Vec<HandlerFunc>,
}

/// Mutable configuration phase of an [`Engine`]
///
/// All routes, groups and middleware are registered here, single-threaded,
/// before serving. [`EngineBuilder::build`] is the freeze point: it consumes
/// the builder and returns an [`Engine`] that has no registration API, so
/// nothing can be registered while requests are being served.
///
/// ```rust
/// use relayrouter::{Context, EngineBuilder, Request};
///
/// # fn main() -> Result<(), relayrouter::RouteError> {
/// let mut builder = EngineBuilder::new();
/// builder.get("/ping", |ctx: &mut Context| ctx.write_text(200, "pong"))?;
/// {
///     let mut v1 = builder.group("/v1");
///     v1.get("/users/:id", |ctx: &mut Context| {
///         let id = ctx.param("id").unwrap_or_default().to_string();
///         ctx.write_text(200, id);
///     })?;
/// }
/// let engine = builder.build();
///
/// let resp = engine.dispatch(Request::new("GET", "/v1/users/7"));
/// assert_eq!(resp.text(), Some("7"));
/// # Ok(())
/// # }
/// ```
pub struct EngineBuilder {
    table: RouteTable<HandlerFunc>,
    groups: Vec<GroupData>,
    not_found: Option<HandlerFunc>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// Create a builder with an empty root group and no middleware
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: RouteTable::new(),
            groups: vec![GroupData {
                prefix: String::new(),
                middlewares: Vec::new(),
            }],
            not_found: None,
        }
    }

    /// Create a builder whose root group already uses [`Logger`] then [`Recovery`]
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        builder.use_middleware(Logger);
        builder.use_middleware(Recovery);
        builder
    }

    /// The root group (empty prefix, applies to every request)
    pub fn root(&mut self) -> RouterGroup<'_> {
        RouterGroup {
            engine: self,
            index: 0,
        }
    }

    /// Create a top-level group
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let index = self.add_group(0, prefix);
        RouterGroup {
            engine: self,
            index,
        }
    }

    /// Append middleware to the root group
    pub fn use_middleware<H: Handler>(&mut self, middleware: H) -> &mut Self {
        self.root().use_middleware(middleware);
        self
    }

    /// Replace the handler used when no route matches
    ///
    /// The default responds `404` with `404 NOT FOUND: <path>`. Group
    /// middleware still wraps it.
    pub fn not_found<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.not_found = Some(Arc::new(handler));
        self
    }

    /// Register a route on the root group
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn handle<H: Handler>(
        &mut self,
        method: &str,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError> {
        self.root().handle(method, pattern, handler)?;
        Ok(self)
    }

    /// Register a `GET` route on the root group
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.handle(Method::GET.as_str(), pattern, handler)
    }

    /// Register a `POST` route on the root group
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.handle(Method::POST.as_str(), pattern, handler)
    }

    /// Register a `PUT` route on the root group
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn put<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.handle(Method::PUT.as_str(), pattern, handler)
    }

    /// Register a `DELETE` route on the root group
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn delete<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.handle(Method::DELETE.as_str(), pattern, handler)
    }

    /// Register a `PATCH` route on the root group
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn patch<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.handle(Method::PATCH.as_str(), pattern, handler)
    }

    /// Register a `HEAD` route on the root group
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn head<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.handle(Method::HEAD.as_str(), pattern, handler)
    }

    /// Register a `OPTIONS` route on the root group
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn options<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.handle(Method::OPTIONS.as_str(), pattern, handler)
    }

    /// Freeze the configuration
    ///
    /// Consumes the builder. The returned [`Engine`] is read-only and can be
    /// shared across request tasks (typically behind an `Arc`).
    #[must_use]
    pub fn build(self) -> Engine {
        let groups: Vec<GroupEntry> = self
            .groups
            .into_iter()
            .map(|g| GroupEntry {
                prefix: g.prefix,
                middlewares: g.middlewares,
            })
            .collect();

        info!(
            routes_count = self.table.len(),
            groups_count = groups.len(),
            "Engine configuration frozen"
        );

        Engine::from_parts(self.table, groups, self.not_found)
    }

    fn add_group(&mut self, parent: usize, prefix: &str) -> usize {
        let full_prefix = format!("{}{}", self.groups[parent].prefix, prefix);
        debug!(prefix = %full_prefix, parent = parent, "Group created");
        self.groups.push(GroupData {
            prefix: full_prefix,
            middlewares: Vec::new(),
        });
        self.groups.len() - 1
    }
}

/// A prefix scope borrowed from an [`EngineBuilder`]
///
/// Routes registered through a group are stored in the builder's single
/// route table under `group prefix + pattern`. Middleware added with
/// [`RouterGroup::use_middleware`] runs for every request whose path falls
/// under the group prefix, whether or not a route matched.
pub struct RouterGroup<'e> {
    engine: &'e mut EngineBuilder,
    index: usize,
}

impl RouterGroup<'_> {
    /// Effective prefix (parent prefixes included)
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.engine.groups[self.index].prefix
    }

    /// Create a nested group whose prefix is `self.prefix() + prefix`
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let index = self.engine.add_group(self.index, prefix);
        RouterGroup {
            engine: &mut *self.engine,
            index,
        }
    }

    /// Append middleware; insertion order is execution order
    pub fn use_middleware<H: Handler>(&mut self, middleware: H) -> &mut Self {
        self.engine.groups[self.index]
            .middlewares
            .push(Arc::new(middleware));
        self
    }

    /// Register `handler` for `method` at `prefix + pattern`
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for an empty method or a malformed pattern.
    pub fn handle<H: Handler>(
        &mut self,
        method: &str,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError> {
        let full_pattern = format!("{}{}", self.prefix(), pattern);
        let handler: HandlerFunc = Arc::new(handler);
        self.engine.table.register(method, &full_pattern, handler)?;
        Ok(self)
    }

    /// Register a `GET` route
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.handle(Method::GET.as_str(), pattern, handler)
    }

    /// Register a `POST` route
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.handle(Method::POST.as_str(), pattern, handler)
    }

    /// Register a `PUT` route
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn put<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.handle(Method::PUT.as_str(), pattern, handler)
    }

    /// Register a `DELETE` route
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn delete<H: Handler>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError> {
        self.handle(Method::DELETE.as_str(), pattern, handler)
    }

    /// Register a `PATCH` route
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn patch<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.handle(Method::PATCH.as_str(), pattern, handler)
    }

    /// Register a `HEAD` route
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn head<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.handle(Method::HEAD.as_str(), pattern, handler)
    }

    /// Register an `OPTIONS` route
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a malformed pattern.
    pub fn options<H: Handler>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError> {
        self.handle(Method::OPTIONS.as_str(), pattern, handler)
    }
}
