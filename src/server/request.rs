use crate::dispatcher::HeaderVec;
use crate::router::ParamVec;
use may_minihttp::Request;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Parsed HTTP request data used by `AppService`.
///
/// Everything the dispatcher needs is copied out of the connection buffer so
/// the request can cross into a handler coroutine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// Raw query string, still percent-encoded
    pub raw_query: String,
    /// HTTP headers (lowercase names)
    pub headers: HeaderVec,
    /// Parsed cookies from the Cookie header
    pub cookies: HeaderVec,
    /// Decoded query string parameters
    pub query_params: ParamVec,
    /// Raw body text, `None` when the request has no body
    pub body: Option<String>,
    /// Set when a body was sent but is not UTF-8 text
    pub body_error: Option<String>,
}

/// Split a request target into its path and raw query string.
#[must_use]
pub fn split_target(target: &str) -> (&str, &str) {
    match target.split_once('?') {
        Some((path, query)) => (if path.is_empty() { "/" } else { path }, query),
        None => (if target.is_empty() { "/" } else { target }, ""),
    }
}

/// Parse the Cookie header into name/value pairs.
#[must_use]
pub fn parse_cookies(headers: &HeaderVec) -> HeaderVec {
    let mut cookies = HeaderVec::new();
    for (_, raw) in headers.iter().filter(|(k, _)| k.as_ref() == "cookie") {
        for pair in raw.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let Some(name) = parts.next().map(str::trim).filter(|n| !n.is_empty()) else {
                continue;
            };
            let value = parts.next().unwrap_or("").trim();
            cookies.push((Arc::from(name), value.to_string()));
        }
    }
    cookies
}

/// Decode a raw query string into name/value pairs
///
/// Uses `application/x-www-form-urlencoded` rules, so `+` is a space.
#[must_use]
pub fn parse_query_params(raw_query: &str) -> ParamVec {
    url::form_urlencoded::parse(raw_query.as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
        .collect()
}

/// Parse an incoming HTTP request into a ParsedRequest
///
/// Extracts method, path, headers, cookies, query params and the raw body.
/// The body is kept as text; typed routes decide how to decode it.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let (path, raw_query) = split_target(req.path());
    let path = path.to_string();
    let raw_query = raw_query.to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase().as_str()),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();
    debug!(header_count = headers.len(), "Headers extracted");

    let cookies = parse_cookies(&headers);
    let query_params = parse_query_params(&raw_query);
    debug!(
        cookie_count = cookies.len(),
        param_count = query_params.len(),
        "Cookies and query params parsed"
    );

    let mut raw_body = Vec::new();
    let mut reader = req.body();
    let (body, body_error) = match reader.read_to_end(&mut raw_body) {
        Ok(0) => (None, None),
        Ok(size) => {
            debug!(body_size_bytes = size, "Request body read");
            decode_body(raw_body)
        }
        Err(e) => {
            warn!(error = %e, "Request body could not be read");
            (None, Some(e.to_string()))
        }
    };

    info!(method = %method, path = %path, "HTTP request parsed");

    ParsedRequest {
        method,
        path,
        raw_query,
        headers,
        cookies,
        query_params,
        body,
        body_error,
    }
}

/// Body bytes as text, or the reason they are not text
fn decode_body(raw: Vec<u8>) -> (Option<String>, Option<String>) {
    match String::from_utf8(raw) {
        Ok(text) => (Some(text), None),
        Err(e) => {
            warn!(error = %e, "Request body is not valid UTF-8");
            (None, Some(format!("body is not valid UTF-8: {}", e.utf8_error())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookies() {
        let mut h = HeaderVec::new();
        h.push((Arc::from("cookie"), "a=b; c=d; flag".to_string()));
        let cookies = parse_cookies(&h);
        assert_eq!(cookies.len(), 3);
        assert_eq!(cookies[0].1, "b");
        assert_eq!(cookies[1].0.as_ref(), "c");
        assert_eq!(cookies[2].1, "");
    }

    #[test]
    fn test_parse_query_params() {
        let q = parse_query_params("x=1&name=Ada+Lovelace&e=%40");
        assert_eq!(q.len(), 3);
        assert_eq!(q[1].1, "Ada Lovelace");
        assert_eq!(q[2].1, "@");
    }

    #[test]
    fn test_decode_body_keeps_text_and_flags_invalid_utf8() {
        assert_eq!(decode_body(b"{}".to_vec()), (Some("{}".to_string()), None));
        let (body, error) = decode_body(vec![b'{', 0xff, 0xfe, b'}']);
        assert!(body.is_none());
        assert!(error.unwrap().contains("not valid UTF-8"));
    }

    #[test]
    fn test_split_target() {
        assert_eq!(split_target("/users?name=a"), ("/users", "name=a"));
        assert_eq!(split_target("/users"), ("/users", ""));
        assert_eq!(split_target("?x=1"), ("/", "x=1"));
    }
}
