//! # Dispatcher Module
//!
//! Coroutine-based handoff between the HTTP connection coroutine and the
//! handler registered for a route.
//!
//! ## Architecture
//!
//! - Each registered route owns one handler coroutine
//! - Requests are sent to it over a `may::sync::mpsc` channel
//! - The handler answers on the request's one-shot reply channel
//! - Middleware runs around the handoff (`before` may short-circuit)
//! - A panicking handler is answered with a `500` and keeps serving
//!
//! Typed routes never touch this module directly: the
//! [`RouteRegistry`](crate::registry::RouteRegistry) wraps decode, handler
//! and encode into a single closure and registers it here.
//!
//! ```rust,ignore
//! let mut dispatcher = Dispatcher::new();
//! unsafe {
//!     dispatcher.register_handler("GET /ping", |req: HandlerRequest| {
//!         let _ = req.reply_tx.send(HandlerResponse::json(200, json!({"pong": true})));
//!     })?;
//! }
//! ```

mod core;

pub use core::{Dispatcher, HandlerRequest, HandlerResponse, HandlerSender, HeaderVec, MAX_INLINE_HEADERS};
