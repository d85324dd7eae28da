//! # Server Module
//!
//! Adapter between `may_minihttp` and the [`Engine`](crate::Engine).
//!
//! - [`parse_request`] copies the wire request into a [`Request`](crate::Request)
//! - [`AppService`] dispatches it through the shared engine
//! - [`write_response`] writes the finalized response back
//! - [`HttpServer`] / [`ServerHandle`] start and stop the listener

mod http_server;
mod request;
mod response;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::parse_request;
pub use response::write_response;
pub use service::AppService;
