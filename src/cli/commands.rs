use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::context::Context;
use crate::engine::{Engine, EngineBuilder};
use crate::error::RouteError;
use crate::middleware::{Logger, Metrics, Recovery, TokenAuth};
use crate::runtime_config::RuntimeConfig;
use crate::server::{AppService, HttpServer};

/// Command-line interface for the relayrouter demo service
#[derive(Parser)]
#[command(name = "relayrouter")]
#[command(about = "Trie-routed HTTP dispatch demo", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the demo routes over HTTP
    Serve {
        /// Address to bind
        #[arg(long, env = "RELAY_ADDR", default_value = "127.0.0.1:8080")]
        addr: String,

        /// Require this exact `authorization` header on `/admin` routes
        #[arg(long, env = "RELAY_ADMIN_TOKEN")]
        token: Option<String>,
    },
    /// Print every registered (method, pattern) pair and exit
    Routes,
}

/// Build the demo engine
///
/// Root middleware is `Logger`, `metrics` and `Recovery`, in that order, so
/// recovered panics are still counted. The `/admin` group additionally
/// checks `token` when one is given.
///
/// # Errors
///
/// Returns a [`RouteError`] if a demo pattern is rejected.
pub fn demo_engine(token: Option<&str>, metrics: &Metrics) -> Result<Engine, RouteError> {
    let mut builder = EngineBuilder::new();
    builder
        .use_middleware(Logger)
        .use_middleware(metrics.clone())
        .use_middleware(Recovery);

    builder.get("/", |ctx: &mut Context| {
        ctx.write_html(200, "<h1>relayrouter</h1>");
    })?;
    builder.get("/hello/:name", |ctx: &mut Context| {
        let name = ctx.param("name").unwrap_or_default().to_string();
        ctx.write_json(200, &json!({ "message": format!("hello {name}") }));
    })?;
    builder.get("/assets/*filepath", |ctx: &mut Context| {
        let filepath = ctx.param("filepath").unwrap_or_default().to_string();
        ctx.write_json(200, &json!({ "filepath": filepath }));
    })?;
    builder.post("/login", |ctx: &mut Context| {
        match ctx.post_form("username") {
            Some(username) => ctx.write_json(200, &json!({ "username": username })),
            None => ctx.fail(400, "username is required"),
        }
    })?;

    let exposed = metrics.clone();
    builder.get("/metrics", move |ctx: &mut Context| {
        ctx.write_text(200, exposed.render_prometheus());
    })?;

    let mut admin = builder.group("/admin");
    if let Some(token) = token {
        admin.use_middleware(TokenAuth::new(token));
    }
    let stats = metrics.clone();
    admin.get("/stats", move |ctx: &mut Context| {
        ctx.write_json(
            200,
            &json!({
                "requests": stats.request_count(),
                "client_errors": stats.client_errors(),
                "server_errors": stats.server_errors(),
            }),
        );
    })?;

    Ok(builder.build())
}

/// Execute a parsed command line
///
/// # Errors
///
/// Returns an error if the demo routes fail to register, the server cannot
/// bind, or signal handlers cannot be installed.
pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Routes => {
            let engine = demo_engine(None, &Metrics::new()).context("Invalid demo route")?;
            for (method, pattern) in engine.routes() {
                println!("{method:<8} {pattern}");
            }
            Ok(())
        }
        Commands::Serve { addr, token } => {
            RuntimeConfig::from_env().apply();

            let metrics = Metrics::new();
            let engine = demo_engine(token.as_deref(), &metrics).context("Invalid demo route")?;
            let service = AppService::new(Arc::new(engine));

            let handle = HttpServer(service)
                .start(addr.as_str())
                .with_context(|| format!("Failed to bind {addr}"))?;
            handle.wait_ready().context("Server did not become ready")?;
            info!(addr = %handle.addr(), "Listening");

            wait_for_shutdown(handle)
        }
    }
}

#[cfg(unix)]
fn wait_for_shutdown(handle: crate::server::ServerHandle) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("Failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal = signal, "Shutdown signal received");
    }
    handle.stop();
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: crate::server::ServerHandle) -> Result<()> {
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server coroutine panicked: {e:?}"))
}
