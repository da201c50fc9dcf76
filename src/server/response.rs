use crate::dispatcher::HandlerResponse;
use may_minihttp::Response;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{error, warn};

/// Upper bound on distinct interned header lines
const MAX_INTERNED_HEADER_LINES: usize = 1024;

/// Header lines handed to may_minihttp must be `&'static str`
///
/// Distinct lines are leaked once and reused afterwards. Location and
/// content-type values come from route declarations, so the set stays small.
static HEADER_LINES: Lazy<Mutex<HashMap<String, &'static str>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn status_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

fn content_type_line(ct: &str) -> Option<&'static str> {
    match ct {
        "application/json" => Some("Content-Type: application/json"),
        "text/html; charset=utf-8" => Some("Content-Type: text/html; charset=utf-8"),
        "text/plain; charset=utf-8" => Some("Content-Type: text/plain; charset=utf-8"),
        _ => None,
    }
}

fn header_line(name: &str, value: &str) -> Option<&'static str> {
    if name.eq_ignore_ascii_case("content-type") {
        if let Some(line) = content_type_line(value) {
            return Some(line);
        }
    }
    let line = format!("{}: {value}", canonical_header_name(name));
    let mut lines = match HEADER_LINES.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(existing) = lines.get(&line) {
        return Some(existing);
    }
    if lines.len() >= MAX_INTERNED_HEADER_LINES {
        warn!(header = %name, "Header line table full, dropping header");
        return None;
    }
    let leaked: &'static str = Box::leak(line.clone().into_boxed_str());
    lines.insert(line, leaked);
    Some(leaked)
}

fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Write a handler response onto the wire
///
/// String bodies are written verbatim (`text/plain` unless the handler set a
/// content type), `Null` writes an empty body, anything else is JSON.
pub fn write_handler_response(res: &mut Response, hr: HandlerResponse) {
    res.status_code(hr.status as usize, status_reason(hr.status));

    let has_content_type = hr.get_header("content-type").is_some();
    for (name, value) in &hr.headers {
        if let Some(line) = header_line(name, value) {
            res.header(line);
        }
    }

    match hr.body {
        Value::Null => {}
        Value::String(s) => {
            if !has_content_type {
                res.header("Content-Type: text/plain; charset=utf-8");
            }
            res.body_vec(s.into_bytes());
        }
        other => {
            if !has_content_type {
                res.header("Content-Type: application/json");
            }
            match serde_json::to_vec(&other) {
                Ok(bytes) => res.body_vec(bytes),
                Err(e) => error!(error = %e, "Failed to serialize response body"),
            }
        }
    }
}
