//! # CLI Module
//!
//! Command-line entry points for the `relayrouter` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Run the demo routes over HTTP until SIGINT or SIGTERM:
//!
//! ```bash
//! relayrouter serve --addr 0.0.0.0:8080 --token secret
//! ```
//!
//! Options:
//! - `--addr <ADDR>` - bind address (env `RELAY_ADDR`, default `127.0.0.1:8080`)
//! - `--token <TOKEN>` - protect `/admin` routes with a static `authorization`
//!   header (env `RELAY_ADMIN_TOKEN`)
//!
//! Runtime tuning is read from `RELAY_STACK_SIZE` and `RELAY_WORKERS`, see
//! [`runtime_config`](crate::runtime_config).
//!
//! ### `routes`
//!
//! Print the demo route table:
//!
//! ```bash
//! relayrouter routes
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{demo_engine, run_cli, Cli, Commands};
