//! Route table - one [`PathTrie`] per HTTP method.
//!
//! Registration happens during startup; resolution is the per-request hot
//! path and never allocates beyond the captured parameter values.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::trie::PathTrie;
use crate::error::RouteError;

/// Maximum number of path parameters before heap allocation.
/// Most REST APIs have ≤4 path params (e.g., /users/:id/posts/:post_id).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the dispatch path.
///
/// Param names use `Arc<str>` because they come from the trie (known at
/// startup); values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of successfully resolving a request against the table
#[derive(Debug)]
pub struct RouteMatch<'a, T> {
    /// The handler bound to the matched pattern
    pub handler: &'a T,
    /// Captured `:name` and `*name` values in path order
    pub params: ParamVec,
}

impl<T> RouteMatch<'_, T> {
    /// Get a captured parameter by name
    ///
    /// Uses "last write wins" semantics if a name repeats along the pattern.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Routing table mapping (method, path) pairs to handlers
///
/// Method strings are matched exactly and case-sensitively (`GET` and `get`
/// are different methods). A method with no registered route resolves to
/// "not found" exactly like an unknown path does.
#[derive(Clone)]
pub struct RouteTable<T> {
    tries: HashMap<String, PathTrie<T>>,
    /// (method, pattern) in first-registration order, for listing
    routes: Vec<(String, String)>,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RouteTable<T> {
    /// Create an empty routing table
    #[must_use]
    pub fn new() -> Self {
        Self {
            tries: HashMap::new(),
            routes: Vec::new(),
        }
    }

    /// Register `handler` for `method` + `pattern`
    ///
    /// The method's trie is created on first use. Registering the same method
    /// and pattern again replaces the previous handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for an empty method or a malformed pattern.
    /// Callers should treat this as fatal and abort startup.
    pub fn register(&mut self, method: &str, pattern: &str, handler: T) -> Result<(), RouteError> {
        if method.is_empty() {
            return Err(RouteError::EmptyMethod {
                pattern: pattern.to_string(),
            });
        }

        let trie = self.tries.entry(method.to_string()).or_default();
        match trie.insert(pattern, handler) {
            Ok(Some(_previous)) => {
                warn!(
                    method = %method,
                    pattern = %pattern,
                    "Replaced existing route handler"
                );
            }
            Ok(None) => {
                self.routes.push((method.to_string(), pattern.to_string()));
                info!(
                    method = %method,
                    pattern = %pattern,
                    total_routes = self.routes.len(),
                    "Route registered"
                );
            }
            Err(e) => {
                warn!(method = %method, pattern = %pattern, error = %e, "Route rejected");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Resolve a request
    ///
    /// # Returns
    ///
    /// * `Some(RouteMatch)` - the bound handler and captured parameters
    /// * `None` - unknown method or no pattern matches the path (results in 404)
    #[must_use]
    pub fn resolve(&self, method: &str, path: &str) -> Option<RouteMatch<'_, T>> {
        let Some(trie) = self.tries.get(method) else {
            debug!(method = %method, path = %path, "No routes for method");
            return None;
        };

        match trie.search(path) {
            Some((handler, params)) => {
                debug!(
                    method = %method,
                    path = %path,
                    path_params = ?params,
                    "Route matched"
                );
                Some(RouteMatch { handler, params })
            }
            None => {
                debug!(method = %method, path = %path, "No route matched");
                None
            }
        }
    }

    /// Every registered (method, pattern) pair in first-registration order
    #[must_use]
    pub fn routes(&self) -> &[(String, String)] {
        &self.routes
    }

    /// Number of distinct registered routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when nothing has been registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
