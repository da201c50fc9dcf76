//! Tests for the router → dispatcher → handler coroutine path
//!
//! Requests go through `AppService::handle`, which is everything the HTTP
//! service does apart from socket I/O.

use http::Method;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use typed_route::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse, HeaderVec};
use typed_route::middleware::{Middleware, TracingMiddleware};
use typed_route::router::{RouteEntry, Router};
use typed_route::server::{parse_query_params, AppService, ParsedRequest};

fn parsed(method: &str, target: &str, headers: &[(&str, &str)]) -> ParsedRequest {
    let (path, raw_query) = typed_route::server::split_target(target);
    ParsedRequest {
        method: method.to_string(),
        path: path.to_string(),
        raw_query: raw_query.to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (Arc::from(*k), v.to_string()))
            .collect::<HeaderVec>(),
        cookies: HeaderVec::new(),
        query_params: parse_query_params(raw_query),
        body: None,
        body_error: None,
    }
}

fn service(entries: &[(Method, &str)], dispatcher: Dispatcher) -> AppService {
    let routes = entries
        .iter()
        .map(|(m, p)| RouteEntry::new(m.clone(), p))
        .collect();
    AppService::new(Router::new(routes).unwrap(), dispatcher)
}

fn echo_dispatcher() -> Dispatcher {
    may::config().set_stack_size(0x8000);
    let mut dispatcher = Dispatcher::new();
    unsafe {
        dispatcher
            .register_handler("GET /items/{id}", |req: HandlerRequest| {
                let body = json!({
                    "id": req.get_path_param("id"),
                    "debug": req.get_query_param("debug"),
                    "request_id": req.request_id.to_string(),
                });
                req.reply_tx.send(HandlerResponse::json(200, body)).unwrap();
            })
            .unwrap();
    }
    dispatcher
}

#[test]
fn test_dispatch_passes_params_to_handler() {
    let svc = service(&[(Method::GET, "/items/{id}")], echo_dispatcher());
    let resp = svc.handle(parsed("GET", "/items/42?debug=true", &[]));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["id"], "42");
    assert_eq!(resp.body["debug"], "true");
}

#[test]
fn test_request_id_header_is_honoured() {
    let svc = service(&[(Method::GET, "/items/{id}")], echo_dispatcher());
    let id = "01ARZ3NDEKTSV4RRFFQ69G5FAV";
    let resp = svc.handle(parsed("GET", "/items/1", &[("x-request-id", id)]));
    assert_eq!(resp.body["request_id"], id);
}

#[test]
fn test_unknown_route_and_bad_method() {
    let svc = service(&[(Method::GET, "/items/{id}")], echo_dispatcher());

    let resp = svc.handle(parsed("GET", "/nothing", &[]));
    assert_eq!(resp.status, 404);
    assert_eq!(resp.body, json!({"error": "Not Found", "method": "GET", "path": "/nothing"}));

    let resp = svc.handle(parsed("GE T", "/items/1", &[]));
    assert_eq!(resp.status, 400);
}

#[test]
fn test_builtin_health_when_unrouted() {
    let svc = service(&[], Dispatcher::new());
    let resp = svc.handle(parsed("GET", "/health", &[]));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["status"], "ok");

    assert_eq!(svc.handle(parsed("POST", "/health", &[])).status, 404);
}

#[test]
fn test_application_health_route_wins() {
    may::config().set_stack_size(0x8000);
    let mut dispatcher = Dispatcher::new();
    unsafe {
        dispatcher
            .register_handler("GET /health", |req: HandlerRequest| {
                let body = json!({ "status": "degraded", "db": "down" });
                req.reply_tx.send(HandlerResponse::json(503, body)).unwrap();
            })
            .unwrap();
    }
    let svc = service(&[(Method::GET, "/health")], dispatcher);
    let resp = svc.handle(parsed("GET", "/health", &[]));
    assert_eq!(resp.status, 503);
    assert_eq!(resp.body["db"], "down");
}

#[test]
fn test_route_without_handler_is_500() {
    let svc = service(&[(Method::GET, "/orphan")], Dispatcher::new());
    let resp = svc.handle(parsed("GET", "/orphan", &[]));
    assert_eq!(resp.status, 500);
}

#[test]
fn test_panicking_handler_returns_500_and_keeps_serving() {
    may::config().set_stack_size(0x8000);
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let mut dispatcher = Dispatcher::new();
    unsafe {
        dispatcher
            .register_handler("GET /flaky", move |req: HandlerRequest| {
                if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("first call fails");
                }
                req.reply_tx.send(HandlerResponse::json(200, json!({"ok": true}))).unwrap();
            })
            .unwrap();
    }
    let svc = service(&[(Method::GET, "/flaky")], dispatcher);

    let resp = svc.handle(parsed("GET", "/flaky", &[]));
    assert_eq!(resp.status, 500);
    assert_eq!(resp.body["error"], "Handler panicked");

    let resp = svc.handle(parsed("GET", "/flaky", &[]));
    assert_eq!(resp.status, 200);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

struct Gate;

impl Middleware for Gate {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        (req.get_header("x-block").is_some()).then(|| HandlerResponse::error(403, "blocked"))
    }

    fn after(&self, _req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
        res.set_header("x-gate", "seen".to_string());
    }
}

#[test]
fn test_middleware_short_circuits_and_decorates() {
    let mut dispatcher = echo_dispatcher();
    dispatcher.add_middleware(Arc::new(TracingMiddleware));
    dispatcher.add_middleware(Arc::new(Gate));
    let svc = service(&[(Method::GET, "/items/{id}")], dispatcher);

    let resp = svc.handle(parsed("GET", "/items/1", &[("x-block", "1")]));
    assert_eq!(resp.status, 403);
    assert_eq!(resp.body["error"], "blocked");
    assert_eq!(resp.get_header("x-gate"), Some("seen"));

    let resp = svc.handle(parsed("GET", "/items/1", &[]));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.get_header("x-gate"), Some("seen"));
}
