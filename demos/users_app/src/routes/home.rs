use super::presentation::Presentation;
use std::marker::PhantomData;
use typed_route::typed::{EmptyRequest, HtmlRenderer, NoContext, Route, RouteError, ViewResponse};

/// `GET /`
pub struct Home<P>(PhantomData<fn() -> P>);

impl<P> Default for Home<P> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<P: Presentation> Route for Home<P> {
    type Request = EmptyRequest;
    type Response = P::Home;
}

/// Template-rendered home page
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticPage;

impl ViewResponse for StaticPage {
    type Output = ();
    type Context = NoContext;

    fn template_name(&self) -> &str {
        "static.html"
    }
}

/// Inline home page for deployments without templates
#[derive(Debug, Default, Clone, Copy)]
pub struct HomePage;

impl HtmlRenderer for HomePage {
    type Output = ();

    fn html(&self, _output: ()) -> Result<String, RouteError> {
        Ok(concat!(
            "<!doctype html>",
            "<html lang=\"en\"><head><meta charset=\"utf-8\"><title>Users</title></head>",
            "<body><h1>Welcome</h1>",
            "<p>Browse the <a href=\"/users\">user directory</a>.</p>",
            "</body></html>"
        )
        .to_string())
    }
}
