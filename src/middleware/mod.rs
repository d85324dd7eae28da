//! # Middleware Module
//!
//! Ready-made chain members. Each one is an ordinary [`Handler`](crate::Handler)
//! and is installed with `use_middleware` on the engine or a group.
//!
//! - [`Logger`] - one structured log event per request, after the chain ran
//! - [`Recovery`] - turns a panicking handler into a 500 response
//! - [`TokenAuth`] - rejects requests without the expected `authorization` header
//! - [`Metrics`] - request, error and latency counters with Prometheus output
//!
//! Middleware that wants to run logic after the rest of the chain calls
//! [`Context::next`](crate::Context::next) itself; middleware that does not
//! is resumed automatically by the outer chain.

mod auth;
mod logger;
mod metrics;
mod recovery;

pub use auth::TokenAuth;
pub use logger::Logger;
pub use metrics::Metrics;
pub use recovery::Recovery;
pub(crate) use recovery::panic_message;
