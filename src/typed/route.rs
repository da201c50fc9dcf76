use super::request::RouteRequest;
use super::response::RouteResponse;
use http::Method;

/// A typed route descriptor: method, path and how to decode and encode
///
/// Routes carry no state. The registry asks a route for its method and path
/// once, instantiates its request and response components once, and then
/// drives every matching request through them.
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct ReadUser;
///
/// impl Route for ReadUser {
///     type Request = ReadUserRequest;
///     type Response = JsonResponse<User>;
///
///     fn path(&self) -> &str {
///         "/users/{id}"
///     }
/// }
/// ```
pub trait Route: Send + Sync + 'static {
    /// Decodes the handler's `Input`
    type Request: RouteRequest;
    /// Encodes the handler's `Output`
    type Response: RouteResponse;

    fn method(&self) -> Method {
        Method::GET
    }

    /// Path pattern; `{name}` and `:name` segments are parameters
    fn path(&self) -> &str {
        "/"
    }

    fn request(&self) -> Self::Request {
        Self::Request::default()
    }

    fn response(&self) -> Self::Response {
        Self::Response::default()
    }
}

/// Input type a route's handler receives
pub type Input<R> = <<R as Route>::Request as RouteRequest>::Input;

/// Output type a route's handler returns
pub type Output<R> = <<R as Route>::Response as RouteResponse>::Output;
