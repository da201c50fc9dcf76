use super::error::RouteError;
use super::response::{ResponseContext, RouteResponse};
use crate::dispatcher::HandlerResponse;
use anyhow::{bail, Context};
use minijinja::Environment;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, info};

/// Template renderer shared by every view route
///
/// Templates are looked up by name, e.g. `users/index.html`. Files ending in
/// `.html` are auto-escaped.
pub struct Views {
    env: Environment<'static>,
}

impl std::fmt::Debug for Views {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Views").finish_non_exhaustive()
    }
}

impl Views {
    /// Load templates lazily from a directory
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is not a directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            bail!("templates directory {} does not exist", dir.display());
        }
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir));
        info!(templates_dir = %dir.display(), "Template loader configured");
        Ok(Self { env })
    }

    /// Build from in-memory `(name, source)` pairs
    ///
    /// # Errors
    ///
    /// Returns an error if a template does not parse.
    pub fn from_templates<I, N, S>(templates: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut env = Environment::new();
        for (name, source) in templates {
            let name = name.into();
            env.add_template_owned(name.clone(), source.into())
                .with_context(|| format!("template {name} does not parse"))?;
        }
        Ok(Self { env })
    }

    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// # Errors
    ///
    /// `RouteError::Render` when the template is missing or fails to render.
    pub fn render<C: Serialize>(&self, name: &str, context: C) -> Result<String, RouteError> {
        let template = self.env.get_template(name)?;
        let html = template.render(context)?;
        debug!(template = %name, bytes = html.len(), "Template rendered");
        Ok(html)
    }
}

/// Context handed to a template, built from the handler's output
pub trait ViewContext<O>: Serialize {
    fn from_output(output: O) -> Self;
}

/// The output itself is the template context
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct OutputContext<O>(pub O);

impl<O: Serialize> ViewContext<O> for OutputContext<O> {
    fn from_output(output: O) -> Self {
        OutputContext(output)
    }
}

/// An empty context for templates that read nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContext;

impl Serialize for NoContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_map(Some(0))?.end()
    }
}

impl<O> ViewContext<O> for NoContext {
    fn from_output(_output: O) -> Self {
        NoContext
    }
}

/// Renders a named template as a `200 text/html` response
///
/// The usual context is the output itself: set
/// `type Context = OutputContext<Self::Output>`, or skip the impl entirely
/// with [`OutputView`]. Use [`NoContext`] for static pages and a custom
/// [`ViewContext`] to wrap or reshape the output.
pub trait ViewResponse: Default + Send + Sync + 'static {
    type Output: Send + 'static;
    type Context: ViewContext<Self::Output>;

    fn template_name(&self) -> &str;
}

/// A template file known by name
pub trait Template: Send + Sync + 'static {
    fn name() -> &'static str;
}

/// View of template `T` whose context is the output `O` itself
pub struct OutputView<T, O> {
    _marker: PhantomData<fn(O) -> T>,
}

impl<T, O> Default for OutputView<T, O> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T, O> ViewResponse for OutputView<T, O>
where
    T: Template,
    O: Serialize + Send + 'static,
{
    type Output = O;
    type Context = OutputContext<O>;

    fn template_name(&self) -> &str {
        T::name()
    }
}

impl<V: ViewResponse> RouteResponse for V {
    type Output = V::Output;

    fn encode(
        &self,
        output: Self::Output,
        cx: &ResponseContext<'_>,
    ) -> Result<HandlerResponse, RouteError> {
        let Some(views) = cx.views else {
            return Err(RouteError::Render(format!(
                "no template renderer configured for {}",
                self.template_name()
            )));
        };
        let context = V::Context::from_output(output);
        let html = views.render(self.template_name(), &context)?;
        Ok(HandlerResponse::html(200, html))
    }
}
