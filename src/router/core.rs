//! Router core module - hot path for request routing.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum number of path/query parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names use `Arc<str>` because they come from the route table built
/// at startup; values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A registered `(method, path)` pair and the handler that serves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// HTTP method the route answers
    pub method: Method,
    /// Normalised path pattern (always starts with `/`)
    pub path_pattern: String,
    /// Dispatcher key of the handler coroutine
    pub handler_name: String,
}

impl RouteEntry {
    #[must_use]
    pub fn new(method: Method, path_pattern: &str) -> Self {
        let path_pattern = normalize_path(path_pattern);
        let handler_name = format!("{method} {path_pattern}");
        Self {
            method,
            path_pattern,
            handler_name,
        }
    }

    /// Pattern with every parameter segment replaced by `{}`
    ///
    /// Two entries with the same method and shape match the same requests,
    /// whatever their parameters are called.
    #[must_use]
    pub fn shape(&self) -> String {
        if self.path_pattern == "/" {
            return "/".to_string();
        }
        let mut out = String::with_capacity(self.path_pattern.len());
        for segment in self.path_pattern.split('/').filter(|s| !s.is_empty()) {
            out.push('/');
            out.push_str(if param_name(segment).is_some() { "{}" } else { segment });
        }
        out
    }
}

/// Result of successfully matching a request path to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route entry
    pub route: Arc<RouteEntry>,
    /// Path parameters extracted from the URL (e.g., `{id}` → `{"id": "123"}`)
    pub path_params: ParamVec,
    /// Name of the handler that should process this request
    pub handler_name: String,
}

impl RouteMatch {
    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics when a name appears twice in a pattern.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

struct CompiledRoute {
    method: Method,
    regex: Regex,
    entry: Arc<RouteEntry>,
    param_names: Vec<Arc<str>>,
}

/// Router that matches HTTP requests to registered route entries
#[derive(Clone)]
pub struct Router {
    routes: Arc<Vec<CompiledRoute>>,
}

impl Router {
    /// Compile a routing table from route entries
    ///
    /// # Errors
    ///
    /// Returns an error if a path pattern cannot be compiled into a regex.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, regex::Error> {
        let mut routes = entries
            .into_iter()
            .map(|entry| {
                let (regex, param_names) = Self::path_to_regex(&entry.path_pattern)?;
                Ok(CompiledRoute {
                    method: entry.method.clone(),
                    regex,
                    param_names: param_names.into_iter().map(Arc::from).collect(),
                    entry: Arc::new(entry),
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        // Static segments first, then the most specific pattern
        routes.sort_by(|a, b| {
            a.param_names
                .len()
                .cmp(&b.param_names.len())
                .then_with(|| b.entry.path_pattern.len().cmp(&a.entry.path_pattern.len()))
        });

        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|r| format!("{} {}", r.method, r.entry.path_pattern))
            .collect();
        info!(
            routes_count = routes.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Ok(Self {
            routes: Arc::new(routes),
        })
    }

    /// Number of registered routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Match an HTTP request to a route
    ///
    /// # Returns
    ///
    /// * `Some(RouteMatch)` - If a matching route is found
    /// * `None` - If no route matches (results in 404)
    #[must_use]
    pub fn route(&self, method: Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        for route in self.routes.iter() {
            if route.method != method {
                continue;
            }
            let Some(captures) = route.regex.captures(path) else {
                continue;
            };
            let mut params = ParamVec::new();
            for (i, name) in route.param_names.iter().enumerate() {
                if let Some(val) = captures.get(i + 1) {
                    params.push((Arc::clone(name), percent_decode(val.as_str())));
                }
            }
            debug!(
                method = %method,
                path = %path,
                handler_name = %route.entry.handler_name,
                path_params = ?params,
                "Route matched"
            );
            return Some(RouteMatch {
                route: Arc::clone(&route.entry),
                path_params: params,
                handler_name: route.entry.handler_name.clone(),
            });
        }

        warn!(method = %method, path = %path, "No route matched");
        None
    }

    /// Convert a path pattern to a regex and extract parameter names
    ///
    /// Transforms `/users/{id}` or `/users/:id` into `^/users/([^/]+)$` and
    /// returns the ordered parameter names. Static segments are escaped.
    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<String>), regex::Error> {
        let path = normalize_path(path);
        if path == "/" {
            return Ok((Regex::new(r"^/$")?, Vec::new()));
        }

        let mut pattern = String::with_capacity(path.len() + 8);
        pattern.push('^');
        let mut param_names = Vec::new();

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if let Some(name) = param_name(segment) {
                pattern.push_str("/([^/]+)");
                param_names.push(name.to_string());
            } else {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        // Tolerate a single trailing slash on requests
        pattern.push_str("/?$");
        Ok((Regex::new(&pattern)?, param_names))
    }
}

fn param_name(segment: &str) -> Option<&str> {
    if let Some(name) = segment.strip_prefix(':') {
        return (!name.is_empty()).then_some(name);
    }
    segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .filter(|name| !name.is_empty())
}

fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Normalise a route path: leading `/`, no trailing `/`, collapsed empties.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return "/".to_string();
    }
    let mut out = String::with_capacity(path.len() + 1);
    for segment in segments {
        out.push('/');
        out.push_str(segment);
    }
    out
}
