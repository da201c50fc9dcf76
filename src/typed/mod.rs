//! # Typed Module
//!
//! Declarative, type-safe routes on top of the dispatcher.
//!
//! ## Overview
//!
//! A [`Route`] names an HTTP method and path and two components:
//!
//! - a [`RouteRequest`] that decodes the handler's `Input` from path
//!   parameters, query string and body
//! - a [`RouteResponse`] that encodes the handler's `Output` into a response
//!
//! The handler itself only ever sees typed values:
//!
//! ```rust,ignore
//! registry.handle(ReadUser, move |id: Uuid, _req: &HandlerRequest| {
//!     store.get(id).map_err(RouteError::from)
//! })?;
//! ```
//!
//! ## Request components
//!
//! - [`EmptyRequest`] - nothing to decode, `Input = ()`
//! - [`ContentRequest<T>`] - the body is the input
//! - any [`HttpRequest`] - combine [`Parameters`], a typed query and a typed
//!   body, with optional JSON Schema validation
//!
//! ## Response components
//!
//! - [`JsonResponse<T>`] - `serde_json` body
//! - any [`ViewResponse`] - a minijinja template rendered through [`Views`];
//!   [`OutputView<T, O>`] renders template `T` with the output as context
//! - [`HtmlResponse<H>`] - markup built in Rust by an [`HtmlRenderer`]
//! - [`RedirectResponse<T, O>`] - fixed `Location`, status from [`RedirectKind`]
//!
//! Every failure is a [`RouteError`], which carries its own status.

mod error;
mod html;
mod parameters;
mod redirect;
mod request;
mod response;
mod route;
mod view;

pub use error::RouteError;
pub use html::{HtmlRenderer, HtmlResponse};
pub use parameters::Parameters;
pub use redirect::{RedirectKind, RedirectResponse, RedirectTarget};
pub use request::{ContentRequest, EmptyContent, EmptyQuery, EmptyRequest, HttpRequest, RouteRequest};
pub use response::{JsonResponse, ResponseContext, RouteResponse};
pub use route::{Input, Output, Route};
pub use view::{NoContext, OutputContext, OutputView, Template, ViewContext, ViewResponse, Views};
