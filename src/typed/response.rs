use super::error::RouteError;
use super::view::Views;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use serde::Serialize;
use std::marker::PhantomData;

/// What an encoder can see besides the handler's output
#[derive(Clone, Copy)]
pub struct ResponseContext<'a> {
    /// The request being answered
    pub request: &'a HandlerRequest,
    /// Template renderer attached to the registry, if any
    pub views: Option<&'a Views>,
}

/// Turns a route's typed `Output` into a wire response
pub trait RouteResponse: Default + Send + Sync + 'static {
    type Output: Send + 'static;

    /// # Errors
    ///
    /// Serialization or rendering failures; written as the response.
    fn encode(
        &self,
        output: Self::Output,
        cx: &ResponseContext<'_>,
    ) -> Result<HandlerResponse, RouteError>;
}

/// `200 application/json` with the output serialized by `serde_json`
pub struct JsonResponse<T> {
    _output: PhantomData<fn(T)>,
}

impl<T> Default for JsonResponse<T> {
    fn default() -> Self {
        Self {
            _output: PhantomData,
        }
    }
}

impl<T> RouteResponse for JsonResponse<T>
where
    T: Serialize + Send + 'static,
{
    type Output = T;

    fn encode(&self, output: T, _cx: &ResponseContext<'_>) -> Result<HandlerResponse, RouteError> {
        let body = serde_json::to_value(&output)?;
        Ok(HandlerResponse::json(200, body))
    }
}
