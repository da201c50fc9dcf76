//! # typed-route
//!
//! **typed-route** is a thin typed-routing layer for coroutine HTTP services
//! built on `may` and `may_minihttp`.
//!
//! ## Overview
//!
//! A route is declared as a type: its HTTP method, its path, the component
//! that decodes the handler's input and the component that encodes the
//! handler's output. Handlers are plain functions from typed input to typed
//! output; decoding, validation, rendering and error responses are done by
//! the components.
//!
//! ## Architecture
//!
//! - **[`typed`]** - the `Route`, `RouteRequest` and `RouteResponse` contracts
//!   and their stock implementations (JSON, views, redirects, raw HTML)
//! - **[`registry`]** - registers typed routes and builds the service
//! - **[`router`]** - regex path matching with `{name}` and `:name` segments
//! - **[`dispatcher`]** - one handler coroutine per route, fed over channels
//! - **[`middleware`]** - hooks around the dispatch (request logging)
//! - **[`server`]** - the `may_minihttp` service, request parsing, response writing
//! - **[`validator_cache`]** - compiled JSON Schema validators
//! - **[`config`]**, **[`runtime_config`]**, **[`logging`]** - startup plumbing
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as AppService
//!     participant Router
//!     participant Dispatcher
//!     participant Handler as Handler coroutine
//!
//!     Client->>Server: HTTP request
//!     Server->>Server: parse_request
//!     Server->>Router: route(method, path)
//!     Router-->>Server: RouteMatch (path params)
//!     Server->>Dispatcher: dispatch(match, request)
//!     Dispatcher->>Handler: HandlerRequest over mpsc
//!     Handler->>Handler: decode Input, call handler, encode Output
//!     Handler-->>Dispatcher: HandlerResponse
//!     Dispatcher-->>Server: HandlerResponse
//!     Server-->>Client: HTTP response
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use typed_route::registry::RouteRegistry;
//! use typed_route::server::HttpServer;
//! use typed_route::typed::{EmptyRequest, JsonResponse, Route};
//!
//! #[derive(Default)]
//! struct Ping;
//!
//! impl Route for Ping {
//!     type Request = EmptyRequest;
//!     type Response = JsonResponse<&'static str>;
//!
//!     fn path(&self) -> &str {
//!         "/ping"
//!     }
//! }
//!
//! let mut registry = RouteRegistry::new();
//! registry.handle(Ping, |(), _req| Ok("pong"))?;
//! let handle = HttpServer(registry.into_service()?).start("127.0.0.1:8080")?;
//! handle.join().ok();
//! ```
//!
//! ## Runtime
//!
//! Handlers run on `may` coroutines. Set the coroutine stack size with
//! `TYPED_ROUTE_STACK_SIZE` (see [`runtime_config`]) before registering
//! routes.

pub mod config;
pub mod dispatcher;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod registry;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod typed;
pub mod validator_cache;

pub use config::{AppConfig, ResponseFormat};
pub use dispatcher::{HandlerRequest, HandlerResponse};
pub use registry::RouteRegistry;
pub use server::{AppService, HttpServer, ServerHandle};
pub use typed::{Route, RouteError};
