use crate::dispatcher::HandlerResponse;
use serde_json::json;
use std::fmt;

/// Failure at any stage of a typed route: decode, handler or encode
///
/// Every variant maps to exactly one HTTP status through
/// [`RouteError::status`]; [`RouteError::into_response`] turns it into the
/// JSON error body written to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A required path segment was not captured
    MissingParameter {
        /// Parameter name from the route pattern
        name: String,
    },
    /// A path segment did not convert to the requested type
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
    /// The query string does not deserialize into the route's query type
    MalformedQuery(String),
    /// The body does not deserialize into the route's content type
    MalformedContent(String),
    /// The route needs a body and none was sent
    MissingContent,
    /// Content-Type is neither JSON nor form-urlencoded
    UnsupportedMediaType(String),
    /// The raw query or body violates the declared JSON Schema
    ValidationFailed {
        /// One message per schema violation
        details: Vec<String>,
    },
    /// The addressed resource does not exist
    NotFound(String),
    /// Handler-chosen status and reason
    Abort { status: u16, reason: String },
    /// Template lookup or rendering failed
    Render(String),
    Internal(String),
}

impl RouteError {
    /// HTTP status for this error
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            RouteError::MissingParameter { .. }
            | RouteError::InvalidParameter { .. }
            | RouteError::MalformedQuery(_)
            | RouteError::MalformedContent(_)
            | RouteError::MissingContent
            | RouteError::ValidationFailed { .. } => 400,
            RouteError::NotFound(_) => 404,
            RouteError::UnsupportedMediaType(_) => 415,
            RouteError::Abort { status, .. } => *status,
            RouteError::Render(_) | RouteError::Internal(_) => 500,
        }
    }

    /// Shorthand for a handler-chosen status
    #[must_use]
    pub fn abort(status: u16, reason: impl Into<String>) -> Self {
        RouteError::Abort {
            status,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        RouteError::NotFound(what.into())
    }

    /// JSON error response: `{"error": msg}` plus `details` for validation
    #[must_use]
    pub fn into_response(self) -> HandlerResponse {
        let status = self.status();
        let body = match &self {
            RouteError::ValidationFailed { details } => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        HandlerResponse::json(status, body)
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::MissingParameter { name } => {
                write!(f, "missing path parameter '{name}'")
            }
            RouteError::InvalidParameter { name, value, reason } => {
                write!(f, "invalid path parameter '{name}' = '{value}': {reason}")
            }
            RouteError::MalformedQuery(msg) => write!(f, "malformed query string: {msg}"),
            RouteError::MalformedContent(msg) => write!(f, "malformed request body: {msg}"),
            RouteError::MissingContent => write!(f, "request body required"),
            RouteError::UnsupportedMediaType(ct) => {
                write!(f, "unsupported media type '{ct}'")
            }
            RouteError::ValidationFailed { .. } => write!(f, "request validation failed"),
            RouteError::NotFound(what) => write!(f, "{what} not found"),
            RouteError::Abort { reason, .. } => write!(f, "{reason}"),
            RouteError::Render(msg) => write!(f, "render failed: {msg}"),
            RouteError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for RouteError {}

impl From<minijinja::Error> for RouteError {
    fn from(err: minijinja::Error) -> Self {
        RouteError::Render(err.to_string())
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(err: serde_json::Error) -> Self {
        RouteError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RouteError::MissingContent.status(), 400);
        assert_eq!(RouteError::UnsupportedMediaType("text/xml".into()).status(), 415);
        assert_eq!(RouteError::not_found("user").status(), 404);
        assert_eq!(RouteError::abort(409, "conflict").status(), 409);
        assert_eq!(RouteError::Render("boom".into()).status(), 500);
    }

    #[test]
    fn test_validation_response_carries_details() {
        let resp = RouteError::ValidationFailed {
            details: vec!["name is required".into()],
        }
        .into_response();
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body["details"][0], "name is required");
        assert_eq!(resp.get_header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_plain_error_body() {
        let resp = RouteError::not_found("user").into_response();
        assert_eq!(resp.body, json!({"error": "user not found"}));
    }
}
