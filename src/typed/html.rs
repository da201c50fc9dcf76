use super::error::RouteError;
use super::response::{ResponseContext, RouteResponse};
use crate::dispatcher::HandlerResponse;

/// Builds an HTML document directly from a handler's output
pub trait HtmlRenderer: Default + Send + Sync + 'static {
    type Output: Send + 'static;

    /// # Errors
    ///
    /// Any [`RouteError`]; usually none for pure markup builders.
    fn html(&self, output: Self::Output) -> Result<String, RouteError>;
}

/// `200 text/html` produced by an [`HtmlRenderer`], no template engine
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlResponse<H>(H);

impl<H: HtmlRenderer> RouteResponse for HtmlResponse<H> {
    type Output = H::Output;

    fn encode(
        &self,
        output: Self::Output,
        _cx: &ResponseContext<'_>,
    ) -> Result<HandlerResponse, RouteError> {
        Ok(HandlerResponse::html(200, self.0.html(output)?))
    }
}
