//! HTTP surface on top of may_minihttp.
//!
//! [`AppService`] parses each request, routes it and writes the handler's
//! response. An unrouted `GET /health` gets the built-in liveness answer.
//! [`HttpServer`] starts the service and returns a [`ServerHandle`] for
//! readiness checks and shutdown.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_cookies, parse_query_params, parse_request, split_target, ParsedRequest};
pub use response::write_handler_response;
pub use service::AppService;
