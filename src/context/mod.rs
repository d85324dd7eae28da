//! # Context Module
//!
//! Per-request state and the middleware chain that drives it.
//!
//! ## Overview
//!
//! - [`Request`] - transport-neutral inbound request (method, path, query,
//!   headers, body)
//! - [`Context`] - the request plus resolved path parameters, the ordered
//!   handler list with its cursor, and the buffered response
//! - [`Handler`] - the single contract shared by middleware and route handlers
//! - [`Response`] - what a finished chain hands back to the transport
//!
//! ## Chain state machine
//!
//! ```text
//! Pending --next()--> Running --cursor reaches end--> Finished
//!                        |
//!                        +--fail() / abort()--> Aborted
//! ```
//!
//! Short-circuiting is a state change, not a panic. Panics are reserved for
//! unexpected faults and are turned into 500 responses by the
//! [`Recovery`](crate::middleware::Recovery) middleware.

mod core;
mod handler;
mod request;
mod response;

pub use core::{ChainState, Context};
pub use handler::{Handler, HandlerFunc};
pub use request::{HeaderVec, Request, MAX_INLINE_HEADERS};
pub use response::{content_type, Encoding, Response};
