use super::error::RouteError;
use super::parameters::Parameters;
use crate::dispatcher::HandlerRequest;
use crate::validator_cache::SCHEMA_VALIDATORS;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::any::{type_name, TypeId};
use std::marker::PhantomData;
use tracing::debug;

/// Turns an inbound request into a route's typed `Input`
///
/// Most routes implement [`HttpRequest`] instead and get this trait through
/// the blanket impl. Implement it directly for decoding that does not fit
/// the path/query/content split.
pub trait RouteRequest: Default + Send + Sync + 'static {
    type Input: Send + 'static;

    /// # Errors
    ///
    /// Any [`RouteError`]; the registry writes it as the response.
    fn decode(&self, req: &HandlerRequest) -> Result<Self::Input, RouteError>;
}

/// Query shape for routes that read no query string; never decoded
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EmptyQuery;

/// Body shape for routes that read no body; never decoded
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EmptyContent;

/// Request built from path parameters, a typed query and a typed body
///
/// The query is decoded from the raw query string with `serde_urlencoded`.
/// The body is negotiated by `Content-Type`: form-urlencoded bodies go
/// through `serde_urlencoded`, JSON (or no content type) through
/// `serde_json`, anything else is `415`. An empty body decodes from `null`,
/// so `Option<T>` content accepts it and a required struct answers `400`.
///
/// When a schema is declared, the raw JSON form of the query or body is
/// validated before it is decoded.
pub trait HttpRequest: Default + Send + Sync + 'static {
    type Input: Send + 'static;
    type Query: DeserializeOwned + 'static;
    type Content: DeserializeOwned + 'static;

    /// # Errors
    ///
    /// Usually a parameter conversion failure from [`Parameters::require`].
    fn decode_to_input(
        &self,
        parameters: &Parameters<'_>,
        query: Self::Query,
        content: Self::Content,
    ) -> Result<Self::Input, RouteError>;

    /// JSON Schema the query parameters must satisfy (values are strings)
    fn query_schema(&self) -> Option<Value> {
        None
    }

    /// JSON Schema the body must satisfy
    fn content_schema(&self) -> Option<Value> {
        None
    }
}

impl<R: HttpRequest> RouteRequest for R {
    type Input = R::Input;

    fn decode(&self, req: &HandlerRequest) -> Result<Self::Input, RouteError> {
        let query = decode_query::<R::Query>(req, self.query_schema(), type_name::<R>())?;
        let content = decode_content::<R::Content>(req, self.content_schema(), type_name::<R>())?;
        self.decode_to_input(&Parameters::new(&req.path_params), query, content)
    }
}

/// No decoding at all; the handler receives `()`
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyRequest;

impl HttpRequest for EmptyRequest {
    type Input = ();
    type Query = EmptyQuery;
    type Content = EmptyContent;

    fn decode_to_input(
        &self,
        _parameters: &Parameters<'_>,
        _query: EmptyQuery,
        _content: EmptyContent,
    ) -> Result<(), RouteError> {
        Ok(())
    }
}

/// Pass-through body decoding; the handler receives the body as `T`
pub struct ContentRequest<T> {
    _content: PhantomData<fn() -> T>,
}

impl<T> Default for ContentRequest<T> {
    fn default() -> Self {
        Self {
            _content: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ContentRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRequest")
            .field("content", &type_name::<T>())
            .finish()
    }
}

impl<T> HttpRequest for ContentRequest<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Input = T;
    type Query = EmptyQuery;
    type Content = T;

    fn decode_to_input(
        &self,
        _parameters: &Parameters<'_>,
        _query: EmptyQuery,
        content: T,
    ) -> Result<T, RouteError> {
        Ok(content)
    }
}

fn is_empty_shape<T: 'static>() -> bool {
    let id = TypeId::of::<T>();
    id == TypeId::of::<EmptyQuery>() || id == TypeId::of::<EmptyContent>()
}

fn empty_shape<T: DeserializeOwned>() -> Result<T, RouteError> {
    serde_json::from_value(Value::Null).map_err(|e| RouteError::Internal(e.to_string()))
}

fn validate(owner: &str, kind: &str, schema: Option<Value>, instance: &Value) -> Result<(), RouteError> {
    match schema {
        Some(schema) => SCHEMA_VALIDATORS.validate(&format!("{owner}:{kind}"), &schema, instance),
        None => Ok(()),
    }
}

/// Query pairs as a JSON object of strings, last value wins
fn pairs_to_json<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> Value {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), Value::String(v.to_string()));
    }
    Value::Object(map)
}

fn decode_query<Q: DeserializeOwned + 'static>(
    req: &HandlerRequest,
    schema: Option<Value>,
    owner: &str,
) -> Result<Q, RouteError> {
    if is_empty_shape::<Q>() {
        return empty_shape();
    }
    if schema.is_some() {
        let instance = pairs_to_json(req.query_params.iter().map(|(k, v)| (k.as_ref(), v.as_str())));
        validate(owner, "query", schema, &instance)?;
    }
    serde_urlencoded::from_str::<Q>(&req.raw_query).map_err(|e| {
        debug!(handler = %req.handler_name, error = %e, "Query decode failed");
        RouteError::MalformedQuery(e.to_string())
    })
}

fn is_json_media_type(ct: &str) -> bool {
    ct == "application/json" || (ct.starts_with("application/") && ct.ends_with("+json"))
}

fn decode_content<C: DeserializeOwned + 'static>(
    req: &HandlerRequest,
    schema: Option<Value>,
    owner: &str,
) -> Result<C, RouteError> {
    if is_empty_shape::<C>() {
        return empty_shape();
    }
    if let Some(reason) = &req.body_error {
        debug!(handler = %req.handler_name, error = %reason, "Request body unreadable");
        return Err(RouteError::MalformedContent(reason.clone()));
    }

    let Some(raw) = req.body.as_deref().filter(|b| !b.trim().is_empty()) else {
        validate(owner, "content", schema, &Value::Null).map_err(|_| RouteError::MissingContent)?;
        return serde_json::from_value(Value::Null).map_err(|_| RouteError::MissingContent);
    };

    match req.content_type().as_deref() {
        Some("application/x-www-form-urlencoded") => {
            if schema.is_some() {
                let pairs: Vec<(String, String)> = url::form_urlencoded::parse(raw.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect();
                let instance = pairs_to_json(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                validate(owner, "content", schema, &instance)?;
            }
            serde_urlencoded::from_str::<C>(raw)
                .map_err(|e| RouteError::MalformedContent(e.to_string()))
        }
        None => decode_json(raw, schema, owner),
        Some(ct) if is_json_media_type(ct) => decode_json(raw, schema, owner),
        Some(ct) => {
            debug!(handler = %req.handler_name, content_type = %ct, "Unsupported request media type");
            Err(RouteError::UnsupportedMediaType(ct.to_string()))
        }
    }
}

fn decode_json<C: DeserializeOwned>(raw: &str, schema: Option<Value>, owner: &str) -> Result<C, RouteError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| RouteError::MalformedContent(e.to_string()))?;
    validate(owner, "content", schema, &value)?;
    serde_json::from_value(value).map_err(|e| RouteError::MalformedContent(e.to_string()))
}
