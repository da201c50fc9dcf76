//! Dispatcher core module - hot path for request dispatch.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::middleware::Middleware;
use crate::router::{ParamVec, RouteMatch};
use crate::server::ParsedRequest;
use http::Method;
use may::coroutine;
use may::sync::mpsc;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Maximum inline headers/cookies before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header/cookie storage for the hot path
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// The raw inbound request as seen by a handler coroutine
///
/// Typed routes decode their `Input` from this and hand it, unchanged, to
/// the application handler as the "raw request".
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Name of the handler that should process this request
    pub handler_name: String,
    /// Path parameters extracted from the URL
    pub path_params: ParamVec,
    /// Query string parameters
    pub query_params: ParamVec,
    /// Raw query string (everything after `?`, still encoded)
    pub raw_query: String,
    /// HTTP headers (lowercase names)
    pub headers: HeaderVec,
    /// Cookies parsed from the Cookie header
    pub cookies: HeaderVec,
    /// Raw request body, `None` when empty or unreadable
    pub body: Option<String>,
    /// Why a body that was sent could not be read as text
    pub body_error: Option<String>,
    /// Channel for sending the response back to the dispatcher
    pub reply_tx: mpsc::Sender<HandlerResponse>,
}

impl HandlerRequest {
    /// Get a path parameter by name ("last write wins")
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name ("last write wins")
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Media type of the body without parameters, lowercased
    #[must_use]
    pub fn content_type(&self) -> Option<String> {
        self.get_header("content-type")
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty())
    }
}

/// Response data sent back from a handler coroutine
///
/// `Value::String` bodies are written verbatim, any other value is written
/// as JSON, and `Value::Null` produces an empty body.
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// HTTP response headers
    pub headers: HeaderVec,
    /// Response body
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut res = Self::new(status, HeaderVec::new(), body);
        res.set_header("content-type", "application/json".to_string());
        res
    }

    /// Create an HTML response
    #[must_use]
    pub fn html(status: u16, body: String) -> Self {
        let mut res = Self::new(status, HeaderVec::new(), Value::String(body));
        res.set_header("content-type", "text/html; charset=utf-8".to_string());
        res
    }

    /// Create a redirect with an empty body
    #[must_use]
    pub fn redirect(status: u16, location: &str) -> Self {
        let mut res = Self::new(status, HeaderVec::new(), Value::Null);
        res.set_header("location", location.to_string());
        res
    }

    /// Create an error response
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Type alias for a channel sender that dispatches requests to a handler
pub type HandlerSender = mpsc::Sender<HandlerRequest>;

/// Registry of handler coroutines keyed by handler name
#[derive(Clone, Default)]
pub struct Dispatcher {
    handlers: HashMap<String, HandlerSender>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    /// Registers a handler function that will process incoming requests with the given name.
    ///
    /// The handler runs in its own coroutine and must answer every request
    /// on `req.reply_tx`. A panic is caught and answered with a `500`.
    ///
    /// # Safety
    ///
    /// Spawning a `may` coroutine is unsafe: the handler must not hold
    /// thread-local references across blocking calls and must fit in the
    /// configured coroutine stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the coroutine cannot be spawned.
    pub unsafe fn register_handler<F>(&mut self, name: &str, handler_fn: F) -> io::Result<()>
    where
        F: Fn(HandlerRequest) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<HandlerRequest>();
        let coroutine_name = name.to_string();

        coroutine::Builder::new()
            .name(coroutine_name)
            .stack_size(may::config().get_stack_size())
            .spawn(move || {
                for req in rx.iter() {
                    let reply_tx = req.reply_tx.clone();
                    let handler_name = req.handler_name.clone();

                    if let Err(panic) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        handler_fn(req);
                    })) {
                        error!(handler_name = %handler_name, panic = ?panic, "Handler panicked");
                        let error_response = HandlerResponse::json(
                            500,
                            serde_json::json!({
                                "error": "Handler panicked",
                                "details": format!("{panic:?}")
                            }),
                        );
                        if reply_tx.send(error_response).is_err() {
                            warn!(handler_name = %handler_name, "Reply channel closed after panic");
                        }
                    }
                }
            })?;

        self.handlers.insert(name.to_string(), tx);
        Ok(())
    }

    /// Hand a matched request to its handler coroutine and wait for the reply
    ///
    /// Returns `None` when no handler is registered under the match's name or
    /// the handler coroutine is gone.
    #[must_use]
    pub fn dispatch(&self, route_match: RouteMatch, parsed: ParsedRequest) -> Option<HandlerResponse> {
        let Some(tx) = self.handlers.get(&route_match.handler_name) else {
            warn!(handler_name = %route_match.handler_name, "No handler registered");
            return None;
        };
        let (reply_tx, reply_rx) = mpsc::channel();

        let request_id = RequestId::from_header_or_new(
            parsed
                .headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(REQUEST_ID_HEADER))
                .map(|(_, v)| v.as_str()),
        );

        let request = HandlerRequest {
            request_id,
            method: route_match.route.method.clone(),
            path: parsed.path,
            handler_name: route_match.handler_name,
            path_params: route_match.path_params,
            query_params: parsed.query_params,
            raw_query: parsed.raw_query,
            headers: parsed.headers,
            cookies: parsed.cookies,
            body: parsed.body,
            body_error: parsed.body_error,
            reply_tx,
        };

        let mut early_resp: Option<HandlerResponse> = None;
        for mw in &self.middlewares {
            let resp = mw.before(&request);
            if early_resp.is_none() {
                early_resp = resp;
            }
        }

        let (mut resp, latency) = match early_resp {
            Some(r) => (r, Duration::ZERO),
            None => {
                let start = Instant::now();
                if tx.send(request.clone()).is_err() {
                    error!(handler_name = %request.handler_name, "Handler coroutine is gone");
                    return None;
                }
                let r = reply_rx.recv().ok()?;
                (r, start.elapsed())
            }
        };

        debug!(
            request_id = %request.request_id,
            handler_name = %request.handler_name,
            status = resp.status,
            latency_us = latency.as_micros() as u64,
            "Handler replied"
        );

        for mw in &self.middlewares {
            mw.after(&request, &mut resp, latency);
        }

        Some(resp)
    }
}
