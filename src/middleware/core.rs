use std::time::Duration;

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Hooks that run around every dispatched request
///
/// `before` may answer the request itself by returning a response, in which
/// case the handler coroutine is never called. `after` sees every response,
/// including short-circuited ones.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
        None
    }
    fn after(&self, _req: &HandlerRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}
