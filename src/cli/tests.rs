//! Unit tests for CLI commands

use crate::cli::{demo_engine, Cli, Commands};
use crate::context::Request;
use crate::middleware::Metrics;
use clap::Parser;

#[test]
fn test_serve_command_with_flags() {
    let cli = Cli::try_parse_from([
        "relayrouter",
        "serve",
        "--addr",
        "0.0.0.0:9000",
        "--token",
        "secret",
    ])
    .unwrap();

    match cli.command {
        Commands::Serve { addr, token } => {
            assert_eq!(addr, "0.0.0.0:9000");
            assert_eq!(token.as_deref(), Some("secret"));
        }
        _ => panic!("Expected Serve command"),
    }
}

#[test]
fn test_routes_command_parses() {
    let cli = Cli::try_parse_from(["relayrouter", "routes"]).unwrap();
    assert!(matches!(cli.command, Commands::Routes));
}

#[test]
fn test_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["relayrouter", "generate"]).is_err());
}

#[test]
fn test_demo_engine_routes() {
    let engine = demo_engine(None, &Metrics::new()).unwrap();
    let routes: Vec<(&str, &str)> = engine
        .routes()
        .iter()
        .map(|(m, p)| (m.as_str(), p.as_str()))
        .collect();
    assert!(routes.contains(&("GET", "/hello/:name")));
    assert!(routes.contains(&("GET", "/assets/*filepath")));
    assert!(routes.contains(&("GET", "/admin/stats")));
}

#[test]
fn test_demo_engine_dispatch() {
    let metrics = Metrics::new();
    let engine = demo_engine(Some("secret"), &metrics).unwrap();

    let resp = engine.dispatch(Request::new("GET", "/hello/ferris"));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json().unwrap()["message"], "hello ferris");

    let resp = engine.dispatch(Request::new("GET", "/admin/stats"));
    assert_eq!(resp.status, 401);

    let resp = engine.dispatch(Request::new("GET", "/admin/stats").with_header("Authorization", "secret"));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json().unwrap()["client_errors"], 1);

    assert_eq!(metrics.request_count(), 3);
}

#[test]
fn test_demo_login_form() {
    let engine = demo_engine(None, &Metrics::new()).unwrap();
    let request = Request::new("POST", "/login")
        .with_header("Content-Type", "application/x-www-form-urlencoded")
        .with_body("username=ferris");
    let resp = engine.dispatch(request);
    assert_eq!(resp.json().unwrap()["username"], "ferris");

    let resp = engine.dispatch(Request::new("POST", "/login"));
    assert_eq!(resp.status, 400);
}
