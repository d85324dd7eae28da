//! # relayrouter
//!
//! **relayrouter** is a small HTTP dispatch core: a per-method segment trie
//! for routing, prefix groups that carry middleware, and a resumable handler
//! chain in which middleware can run logic both before and after the route
//! handler. Serving is done on `may` coroutines through `may_minihttp`.
//!
//! ## Architecture
//!
//! - **[`router`]** - segment trie per method (`/users/:id`, `/assets/*filepath`)
//! - **[`context`]** - per-request state, write primitives and the handler chain
//! - **[`engine`]** - registration (builder + groups) and frozen dispatch
//! - **[`middleware`]** - logger, panic recovery, token auth, metrics
//! - **[`server`]** - `may_minihttp` service adapter and server handle
//! - **[`logging`]** / **[`runtime_config`]** - environment-driven setup
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as AppService<br/>(may_minihttp)
//!     participant Engine
//!     participant Table as RouteTable
//!     participant Chain as Context chain
//!
//!     Client->>Server: GET /v1/users/42
//!     Server->>Engine: dispatch(Request)
//!     Engine->>Engine: collect middleware of groups<br/>covering /v1/users/42
//!     Engine->>Table: resolve(GET, /v1/users/42)
//!     Table-->>Engine: handler + {id: 42}
//!     Engine->>Chain: next()
//!     Chain->>Chain: Logger pre, Recovery pre,<br/>handler, Recovery post, Logger post
//!     Chain-->>Engine: Response
//!     Engine-->>Server: Response
//!     Server-->>Client: 200 OK
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use relayrouter::{Context, EngineBuilder, Request};
//!
//! # fn main() -> Result<(), relayrouter::RouteError> {
//! let mut builder = EngineBuilder::with_defaults();
//! builder.get("/hello/:name", |ctx: &mut Context| {
//!     let name = ctx.param("name").unwrap_or_default().to_string();
//!     ctx.write_text(200, format!("hello {name}"));
//! })?;
//! let engine = builder.build();
//!
//! let resp = engine.dispatch(Request::new("GET", "/hello/ferris"));
//! assert_eq!(resp.status, 200);
//! assert_eq!(resp.text(), Some("hello ferris"));
//!
//! let resp = engine.dispatch(Request::new("GET", "/nope"));
//! assert_eq!(resp.status, 404);
//! assert_eq!(resp.text(), Some("404 NOT FOUND: /nope"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Serving
//!
//! ```rust,no_run
//! use relayrouter::server::{AppService, HttpServer};
//! use relayrouter::{Context, EngineBuilder};
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut builder = EngineBuilder::with_defaults();
//! builder.get("/ping", |ctx: &mut Context| ctx.write_text(200, "pong"))?;
//! let service = AppService::new(Arc::new(builder.build()));
//!
//! let handle = HttpServer(service).start("127.0.0.1:8080")?;
//! handle.wait_ready()?;
//! handle.join().map_err(|e| anyhow::anyhow!("{e:?}"))?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod context;
pub mod engine;
pub mod error;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use context::{ChainState, Context, Encoding, Handler, HandlerFunc, Request, Response};
pub use engine::{Engine, EngineBuilder, RouterGroup};
pub use error::RouteError;
pub use ids::RequestId;
