use super::request::{parse_request, ParsedRequest};
use super::response::write_handler_response;
use crate::dispatcher::{Dispatcher, HandlerResponse};
use crate::router::Router;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;
use tracing::warn;

/// Path of the built-in liveness probe
pub const HEALTH_PATH: &str = "/health";

/// The `HttpService` that routes parsed requests to handler coroutines
///
/// Cloned once per connection by may_minihttp; the routing table and the
/// dispatcher are shared and immutable after startup.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new(router: Router, dispatcher: Dispatcher) -> Self {
        Self {
            router: Arc::new(router),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Route and dispatch an already parsed request
    ///
    /// Split out of [`HttpService::call`] so the whole request path can be
    /// exercised without a socket.
    #[must_use]
    pub fn handle(&self, parsed: ParsedRequest) -> HandlerResponse {
        let Ok(method) = parsed.method.parse::<Method>() else {
            warn!(method = %parsed.method, "Unparseable HTTP method");
            return HandlerResponse::json(
                400,
                json!({ "error": "Bad Request", "method": parsed.method }),
            );
        };

        let Some(route_match) = self.router.route(method.clone(), &parsed.path) else {
            // Built-in liveness probe, unless the application routes it itself
            if method == Method::GET && parsed.path == HEALTH_PATH {
                return HandlerResponse::json(200, json!({ "status": "ok" }));
            }
            return HandlerResponse::json(
                404,
                json!({ "error": "Not Found", "method": parsed.method, "path": parsed.path }),
            );
        };

        let method = parsed.method.clone();
        let path = parsed.path.clone();
        match self.dispatcher.dispatch(route_match, parsed) {
            Some(hr) => hr,
            None => HandlerResponse::json(
                500,
                json!({
                    "error": "Handler failed or not registered",
                    "method": method,
                    "path": path
                }),
            ),
        }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);
        let hr = self.handle(parsed);
        write_handler_response(res, hr);
        Ok(())
    }
}
