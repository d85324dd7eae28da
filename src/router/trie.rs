//! Segment trie for HTTP route matching
//!
//! One [`PathTrie`] holds the patterns registered for a single HTTP method.
//! Route lookup walks one node per path segment, so matching time is
//! proportional to the number of segments in the request path and independent
//! of how many routes are registered.
//!
//! ## Pattern syntax
//!
//! - Literal segments (`users`) match exactly
//! - Parameter segments (`:id`) match any single segment
//! - A trailing wildcard (`*filepath`) matches the rest of the path, slashes
//!   included, and must be the last segment of its pattern
//!
//! ## Precedence
//!
//! At every depth the walk prefers a literal child, then the parameter child,
//! then the wildcard child. The walk commits to the branch it picks: there is
//! no backtracking into sibling branches when a deeper segment fails to match.
//!
//! ```rust
//! use relayrouter::router::PathTrie;
//!
//! let mut trie = PathTrie::new();
//! trie.insert("/user/profile", "profile").unwrap();
//! trie.insert("/user/:id", "by_id").unwrap();
//! trie.insert("/assets/*filepath", "assets").unwrap();
//!
//! let (handler, _) = trie.search("/user/profile").unwrap();
//! assert_eq!(*handler, "profile");
//!
//! let (handler, params) = trie.search("/assets/img/a.png").unwrap();
//! assert_eq!(*handler, "assets");
//! assert_eq!(params[0].1, "img/a.png");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use super::ParamVec;
use crate::error::RouteError;

/// Split a pattern or request path into its non-empty `/`-separated segments
pub(crate) fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Named child of a node (parameter or wildcard)
#[derive(Clone)]
struct NamedChild<T> {
    /// Parameter name without the leading `:` or `*`
    ///
    /// `Arc<str>` so each match clones a pointer instead of the name.
    name: Arc<str>,
    node: Box<TrieNode<T>>,
}

/// One path segment level of the trie
#[derive(Clone)]
struct TrieNode<T> {
    /// Literal children keyed by segment text
    children: HashMap<Box<str>, TrieNode<T>>,
    /// The `:name` child, if any
    param: Option<NamedChild<T>>,
    /// The `*name` child, if any. Always terminal.
    wildcard: Option<NamedChild<T>>,
    /// Bound when a registered pattern ends at this node
    handler: Option<T>,
}

impl<T> TrieNode<T> {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            param: None,
            wildcard: None,
            handler: None,
        }
    }
}

/// Descend into a named child, creating it if absent
///
/// A node keeps at most one named child per kind; asking for a different name
/// at the same position is reported through `conflict`.
fn named_child<'a, T>(
    slot: &'a mut Option<NamedChild<T>>,
    name: &str,
    conflict: impl FnOnce(String) -> RouteError,
) -> Result<&'a mut TrieNode<T>, RouteError> {
    let child = slot.get_or_insert_with(|| NamedChild {
        name: Arc::from(name),
        node: Box::new(TrieNode::new()),
    });
    if child.name.as_ref() != name {
        return Err(conflict(child.name.to_string()));
    }
    Ok(&mut child.node)
}

/// Route trie for a single HTTP method
///
/// # Performance
///
/// - Insertion: O(k) where k is the number of pattern segments
/// - Lookup: O(k) where k is the number of request path segments
#[derive(Clone)]
pub struct PathTrie<T> {
    root: TrieNode<T>,
}

impl<T> Default for PathTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PathTrie<T> {
    /// Create an empty trie
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
        }
    }

    /// Bind `handler` to `pattern`
    ///
    /// Returns the handler previously bound to the exact same pattern, if any:
    /// re-registering a pattern replaces its handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the pattern is malformed (a segment after
    /// a wildcard, a nameless `:`/`*`) or when its parameter or wildcard name
    /// conflicts with one already registered at the same position. Nothing is
    /// bound when an error is returned, although empty intermediate nodes
    /// created along the way are kept.
    pub fn insert(&mut self, pattern: &str, handler: T) -> Result<Option<T>, RouteError> {
        let mut node = &mut self.root;
        let mut segments = split_segments(pattern);

        while let Some(segment) = segments.next() {
            if let Some(name) = segment.strip_prefix(':') {
                if name.is_empty() {
                    return Err(RouteError::EmptyName {
                        pattern: pattern.to_string(),
                    });
                }
                node = named_child(&mut node.param, name, |existing| RouteError::ParamConflict {
                    pattern: pattern.to_string(),
                    existing,
                    requested: name.to_string(),
                })?;
            } else if let Some(name) = segment.strip_prefix('*') {
                if name.is_empty() {
                    return Err(RouteError::EmptyName {
                        pattern: pattern.to_string(),
                    });
                }
                if segments.next().is_some() {
                    return Err(RouteError::SegmentAfterWildcard {
                        pattern: pattern.to_string(),
                        wildcard: name.to_string(),
                    });
                }
                node = named_child(&mut node.wildcard, name, |existing| {
                    RouteError::WildcardConflict {
                        pattern: pattern.to_string(),
                        existing,
                        requested: name.to_string(),
                    }
                })?;
            } else {
                node = node
                    .children
                    .entry(Box::from(segment))
                    .or_insert_with(TrieNode::new);
            }
        }

        Ok(node.handler.replace(handler))
    }

    /// Resolve a concrete request path
    ///
    /// # Returns
    ///
    /// * `Some((handler, params))` - the bound handler and the captured
    ///   parameters in path order
    /// * `None` - no registered pattern matches
    #[must_use]
    pub fn search(&self, path: &str) -> Option<(&T, ParamVec)> {
        let mut node = &self.root;
        let mut params = ParamVec::new();
        let mut segments = split_segments(path);

        while let Some(segment) = segments.next() {
            if let Some(child) = node.children.get(segment) {
                node = child;
            } else if let Some(param) = &node.param {
                params.push((Arc::clone(&param.name), segment.to_string()));
                node = &param.node;
            } else if let Some(wildcard) = &node.wildcard {
                let mut rest = String::with_capacity(path.len());
                rest.push_str(segment);
                for tail in segments.by_ref() {
                    rest.push('/');
                    rest.push_str(tail);
                }
                params.push((Arc::clone(&wildcard.name), rest));
                node = &wildcard.node;
                break;
            } else {
                return None;
            }
        }

        node.handler.as_ref().map(|handler| (handler, params))
    }
}
