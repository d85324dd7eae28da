use relayrouter::middleware::TokenAuth;
use relayrouter::{Context, Engine, EngineBuilder};
use serde_json::json;

mod common;
use common::test_server::{parse_response, send_request, start};

fn demo_engine() -> Engine {
    let mut builder = EngineBuilder::with_defaults();
    builder
        .get("/ping", |ctx: &mut Context| ctx.write_text(200, "pong"))
        .unwrap();
    builder
        .get("/users/:id", |ctx: &mut Context| {
            let id = ctx.param("id").unwrap_or_default().to_string();
            ctx.write_json(200, &json!({ "id": id }));
        })
        .unwrap();
    builder
        .post("/echo", |ctx: &mut Context| {
            let body = ctx.body().to_vec();
            ctx.write_bytes(201, &body);
        })
        .unwrap();
    builder
        .get("/boom", |_: &mut Context| panic!("server side fault"))
        .unwrap();
    {
        let mut admin = builder.group("/admin");
        admin.use_middleware(TokenAuth::new("letmein"));
        admin
            .get("/stats", |ctx: &mut Context| ctx.write_text(200, "stats"))
            .unwrap();
    }
    builder.build()
}

#[test]
fn test_text_route_over_tcp() {
    let (handle, addr) = start(demo_engine());
    let resp = send_request(&addr, "GET /ping HTTP/1.1\r\nHost: localhost\r\n\r\n");
    handle.stop();

    let (status, head, body) = parse_response(&resp);
    assert_eq!(status, 200);
    assert!(head.contains("Content-Type: text/plain; charset=utf-8"));
    assert_eq!(body, "pong");
}

#[test]
fn test_params_and_json_over_tcp() {
    let (handle, addr) = start(demo_engine());
    let resp = send_request(
        &addr,
        "GET /users/42?verbose=1 HTTP/1.1\r\nHost: localhost\r\n\r\n",
    );
    handle.stop();

    let (status, head, body) = parse_response(&resp);
    assert_eq!(status, 200);
    assert!(head.contains("Content-Type: application/json"));
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({ "id": "42" }));
}

#[test]
fn test_not_found_over_tcp() {
    let (handle, addr) = start(demo_engine());
    let resp = send_request(&addr, "GET /nope HTTP/1.1\r\nHost: localhost\r\n\r\n");
    handle.stop();

    let (status, _, body) = parse_response(&resp);
    assert_eq!(status, 404);
    assert_eq!(body, "404 NOT FOUND: /nope");
}

#[test]
fn test_post_body_over_tcp() {
    let (handle, addr) = start(demo_engine());
    let resp = send_request(
        &addr,
        "POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello",
    );
    handle.stop();

    let (status, head, body) = parse_response(&resp);
    assert_eq!(status, 201);
    assert!(head.contains("Content-Type: application/octet-stream"));
    assert_eq!(body, "hello");
}

#[test]
fn test_recovered_panic_over_tcp() {
    let (handle, addr) = start(demo_engine());
    let boom = send_request(&addr, "GET /boom HTTP/1.1\r\nHost: localhost\r\n\r\n");
    let ping = send_request(&addr, "GET /ping HTTP/1.1\r\nHost: localhost\r\n\r\n");
    handle.stop();

    let (status, _, body) = parse_response(&boom);
    assert_eq!(status, 500);
    assert!(body.contains("Internal Server Error"));
    assert_eq!(parse_response(&ping).0, 200);
}

#[test]
fn test_unrecovered_panic_still_answers_500() {
    let mut builder = EngineBuilder::new();
    builder
        .get("/boom", |_: &mut Context| panic!("no recovery installed"))
        .unwrap();
    let (handle, addr) = start(builder.build());
    let resp = send_request(&addr, "GET /boom HTTP/1.1\r\nHost: localhost\r\n\r\n");
    handle.stop();

    let (status, _, body) = parse_response(&resp);
    assert_eq!(status, 500);
    assert_eq!(body, "Internal Server Error");
}

#[test]
fn test_token_auth_over_tcp() {
    let (handle, addr) = start(demo_engine());
    let denied = send_request(&addr, "GET /admin/stats HTTP/1.1\r\nHost: localhost\r\n\r\n");
    let allowed = send_request(
        &addr,
        "GET /admin/stats HTTP/1.1\r\nHost: localhost\r\nAuthorization: letmein\r\n\r\n",
    );
    handle.stop();

    let (status, _, body) = parse_response(&denied);
    assert_eq!(status, 401);
    assert_eq!(body, r#"{"message":"Unauthorized"}"#);

    let (status, _, body) = parse_response(&allowed);
    assert_eq!(status, 200);
    assert_eq!(body, "stats");
}
