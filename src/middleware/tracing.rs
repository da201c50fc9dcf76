use std::time::Duration;

use tracing::{info, warn};

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Logs one structured line per request and one per response
///
/// Spans are not held across the dispatcher handoff because the handler runs
/// on a different coroutine; the request ID ties the log lines together.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        info!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            handler = %req.handler_name,
            "Request received"
        );
        None
    }

    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        let latency_ms = latency.as_millis() as u64;
        if res.status >= 500 {
            warn!(
                request_id = %req.request_id,
                handler = %req.handler_name,
                status = res.status,
                latency_ms,
                "Request failed"
            );
        } else {
            info!(
                request_id = %req.request_id,
                handler = %req.handler_name,
                status = res.status,
                latency_ms,
                "Request completed"
            );
        }
    }
}
