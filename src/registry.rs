//! Typed route registration.
//!
//! [`RouteRegistry`] collects typed routes, spawns one handler coroutine per
//! route on the [`Dispatcher`] and finally freezes everything into an
//! [`AppService`] for the HTTP server.

use crate::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
use crate::middleware::Middleware;
use crate::router::{RouteEntry, Router};
use crate::server::AppService;
use crate::typed::{
    Input, Output, ResponseContext, Route, RouteError, RouteRequest, RouteResponse, Views,
};
use anyhow::{bail, Context};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Builder for the routing table and its handler coroutines
#[derive(Default)]
pub struct RouteRegistry {
    routes: Vec<RouteEntry>,
    dispatcher: Dispatcher,
    views: Arc<OnceCell<Views>>,
}

impl RouteRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose view routes render through `views`
    #[must_use]
    pub fn with_views(views: Views) -> Self {
        Self {
            views: Arc::new(OnceCell::with_value(views)),
            ..Self::default()
        }
    }

    /// Attach the template renderer; routes registered earlier see it too
    ///
    /// # Errors
    ///
    /// Returns an error if a renderer is already attached.
    pub fn set_views(&mut self, views: Views) -> anyhow::Result<()> {
        if self.views.set(views).is_err() {
            bail!("a template renderer is already attached");
        }
        Ok(())
    }

    pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.dispatcher.add_middleware(middleware);
    }

    /// Registered routes in registration order
    #[must_use]
    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    /// Register a typed route and the handler that serves it
    ///
    /// For each matching request the handler coroutine decodes `Input`
    /// through the route's request component, calls `handler`, and encodes
    /// the `Output` through the route's response component. A [`RouteError`]
    /// from any of the three stages becomes the response.
    ///
    /// # Errors
    ///
    /// Returns an error if a route with the same method and path shape is
    /// already registered or the handler coroutine cannot be spawned.
    pub fn handle<R, F>(&mut self, route: R, handler: F) -> anyhow::Result<()>
    where
        R: Route,
        F: Fn(Input<R>, &HandlerRequest) -> Result<Output<R>, RouteError> + Send + Sync + 'static,
    {
        let entry = self.check_new(&route)?;
        let decoder = route.request();
        let encoder = route.response();
        let views = Arc::clone(&self.views);

        self.spawn(entry, move |req: &HandlerRequest| {
            decoder
                .decode(req)
                .and_then(|input| handler(input, req))
                .and_then(|output| {
                    let cx = ResponseContext {
                        request: req,
                        views: views.get(),
                    };
                    encoder.encode(output, &cx)
                })
        })
    }

    /// Register a route that needs no handler and no decoding
    ///
    /// Used for static pages and fixed redirects: the response component is
    /// handed `()` directly.
    ///
    /// # Errors
    ///
    /// Same as [`RouteRegistry::handle`].
    pub fn handle_static<R>(&mut self, route: R) -> anyhow::Result<()>
    where
        R: Route,
        R::Response: RouteResponse<Output = ()>,
    {
        let entry = self.check_new(&route)?;
        let encoder = route.response();
        let views = Arc::clone(&self.views);

        self.spawn(entry, move |req: &HandlerRequest| {
            let cx = ResponseContext {
                request: req,
                views: views.get(),
            };
            encoder.encode((), &cx)
        })
    }

    /// Freeze the routing table into the service the HTTP server runs
    ///
    /// # Errors
    ///
    /// Returns an error if a path pattern does not compile.
    pub fn into_service(self) -> anyhow::Result<AppService> {
        let router = Router::new(self.routes).context("failed to compile routing table")?;
        info!(routes = router.len(), "Route registry frozen");
        Ok(AppService::new(router, self.dispatcher))
    }

    fn check_new<R: Route>(&self, route: &R) -> anyhow::Result<RouteEntry> {
        let entry = RouteEntry::new(route.method(), route.path());
        let shape = entry.shape();
        if let Some(existing) = self
            .routes
            .iter()
            .find(|e| e.method == entry.method && e.shape() == shape)
        {
            bail!(
                "route {} conflicts with already registered {}",
                entry.handler_name,
                existing.handler_name
            );
        }
        Ok(entry)
    }

    fn spawn<P>(&mut self, entry: RouteEntry, pipeline: P) -> anyhow::Result<()>
    where
        P: Fn(&HandlerRequest) -> Result<HandlerResponse, RouteError> + Send + 'static,
    {
        let name = entry.handler_name.clone();
        let handler = move |req: HandlerRequest| {
            let response = match pipeline(&req) {
                Ok(response) => response,
                Err(err) => {
                    let status = err.status();
                    if status >= 500 {
                        error!(request_id = %req.request_id, handler = %req.handler_name, status, error = %err, "Route failed");
                    } else {
                        debug!(request_id = %req.request_id, handler = %req.handler_name, status, error = %err, "Route rejected request");
                    }
                    err.into_response()
                }
            };
            if req.reply_tx.send(response).is_err() {
                warn!(handler = %req.handler_name, "Reply channel closed before response");
            }
        };

        // SAFETY: the pipeline owns all of its state and blocks only on may
        // channels, so it is safe to run on a coroutine.
        unsafe { self.dispatcher.register_handler(&name, handler) }
            .with_context(|| format!("failed to spawn handler coroutine for {name}"))?;

        info!(handler = %name, "Route registered");
        self.routes.push(entry);
        Ok(())
    }
}
