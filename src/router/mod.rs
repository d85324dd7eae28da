//! # Router Module
//!
//! Path matching and route resolution for relayrouter.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Storing registered `(method, pattern)` routes in a per-method segment trie
//! - Matching incoming request paths to the bound handler
//! - Extracting `:name` and `*name` captures from the matched path
//!
//! ## Architecture
//!
//! - [`PathTrie`] resolves a path for one method. Literal segments win over
//!   `:name` parameters, which win over a trailing `*name` wildcard.
//! - [`RouteTable`] owns one trie per method string, created lazily on
//!   first registration.
//!
//! Both are generic over the handler type so they can be tested and
//! benchmarked without the middleware machinery.
//!
//! ## Example
//!
//! ```rust
//! use relayrouter::router::RouteTable;
//!
//! # fn main() -> Result<(), relayrouter::RouteError> {
//! let mut table = RouteTable::new();
//! table.register("GET", "/users/:id", "get_user")?;
//! table.register("GET", "/assets/*filepath", "assets")?;
//!
//! let m = table.resolve("GET", "/users/42").expect("route");
//! assert_eq!(*m.handler, "get_user");
//! assert_eq!(m.param("id"), Some("42"));
//!
//! // wrong method and wrong path look the same
//! assert!(table.resolve("POST", "/users/42").is_none());
//! assert!(table.resolve("GET", "/nope").is_none());
//! # Ok(())
//! # }
//! ```

mod table;
mod trie;

pub use table::{ParamVec, RouteMatch, RouteTable, MAX_INLINE_PARAMS};
pub use trie::PathTrie;
pub(crate) use trie::split_segments;
