use crate::routes::{
    CreateUser, DeleteUser, Home, HtmlPresentation, IndexUsers, JsonPresentation, LegacyPeople,
    Presentation, ReadUser, UpdateUser,
};
use crate::store::UserStore;
use crate::templates_dir;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use typed_route::dispatcher::HandlerRequest;
use typed_route::middleware::TracingMiddleware;
use typed_route::typed::{RouteError, Views};
use typed_route::{AppConfig, AppService, ResponseFormat, RouteRegistry};

/// Register every users route with presentation `P`.
///
/// # Errors
///
/// Returns an error if a route conflicts or a handler cannot be spawned.
pub fn configure<P: Presentation>(app: &mut RouteRegistry, store: &UserStore) -> anyhow::Result<()> {
    app.handle_static(Home::<P>::default())?;
    app.handle_static(LegacyPeople)?;

    let users = store.clone();
    app.handle(
        IndexUsers::<P>::default(),
        move |name: Option<String>, _req: &HandlerRequest| Ok(users.list(name.as_deref())?),
    )?;

    let users = store.clone();
    app.handle(CreateUser::<P>::default(), move |new, _req: &HandlerRequest| {
        Ok(users.create(new)?)
    })?;

    let users = store.clone();
    app.handle(ReadUser::<P>::default(), move |id, _req: &HandlerRequest| {
        users.get(id).map_err(RouteError::from)
    })?;

    let users = store.clone();
    app.handle(UpdateUser::<P>::default(), move |(id, patch), _req: &HandlerRequest| {
        users.update(id, patch).map_err(RouteError::from)
    })?;

    let users = store.clone();
    app.handle(DeleteUser::<P>::default(), move |id, _req: &HandlerRequest| {
        users.delete(id).map_err(RouteError::from)
    })?;

    Ok(())
}

/// Register every users route in the given format.
///
/// # Errors
///
/// Same as [`configure`].
pub fn register(app: &mut RouteRegistry, store: &UserStore, format: ResponseFormat) -> anyhow::Result<()> {
    match format {
        ResponseFormat::Json => configure::<JsonPresentation>(app, store),
        ResponseFormat::Html => configure::<HtmlPresentation>(app, store),
    }
}

/// Build the complete service described by `config`
///
/// HTML mode loads templates from `config.templates_dir`, falling back to
/// the templates shipped with this crate.
///
/// # Errors
///
/// Returns an error if templates cannot be loaded or registration fails.
pub fn build_service(config: &AppConfig, store: &UserStore) -> anyhow::Result<AppService> {
    let mut app = match config.format {
        ResponseFormat::Json => RouteRegistry::new(),
        ResponseFormat::Html => {
            let dir = config.templates_dir.clone().unwrap_or_else(templates_dir);
            let views = Views::from_dir(&dir)
                .with_context(|| format!("failed to load templates from {}", dir.display()))?;
            RouteRegistry::with_views(views)
        }
    };
    app.add_middleware(Arc::new(TracingMiddleware));
    register(&mut app, store, config.format)?;
    info!(format = %config.format, routes = app.routes().len(), "Users routes registered");
    app.into_service()
}
