//! Middleware that runs around the dispatcher handoff.
//!
//! Register with [`RouteRegistry::add_middleware`](crate::registry::RouteRegistry::add_middleware).

mod core;
mod tracing;

pub use core::Middleware;
pub use tracing::TracingMiddleware;
