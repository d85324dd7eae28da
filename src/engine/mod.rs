//! # Engine Module
//!
//! Ties the route table and the middleware chain together.
//!
//! Configuration and serving are separate types:
//!
//! - [`EngineBuilder`] / [`RouterGroup`] - register routes, groups and
//!   middleware while the program is still single-threaded
//! - [`Engine`] - the frozen result; resolves each request, assembles its
//!   handler chain from the matching groups and runs it
//!
//! Groups form a flat list. A nested group is just another entry whose
//! prefix is its parent's prefix plus its own, so a request collects
//! middleware from outermost to innermost group by walking the list in
//! creation order.

mod builder;
mod core;

pub use builder::{EngineBuilder, RouterGroup};
pub use core::Engine;
