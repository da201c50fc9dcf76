//! # Schema Validator Cache
//!
//! JSON Schema validators are expensive to compile, so each schema declared
//! by a typed request component is compiled once and shared afterwards.
//!
//! ## Cache Key Structure
//!
//! Keys are `{type_name}:{kind}` where `type_name` is the Rust type of the
//! request component and `kind` is `query` or `content`. A component always
//! returns the same schema, so the type name identifies it.
//!
//! ## Configuration
//!
//! The cache can be disabled via `TYPED_ROUTE_SCHEMA_CACHE=off`; validators
//! are then compiled per request.

use crate::typed::RouteError;
use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info};

/// Environment variable that turns the cache off (`off`, `false` or `0`)
pub const SCHEMA_CACHE_ENV: &str = "TYPED_ROUTE_SCHEMA_CACHE";

/// Process-wide cache used by typed request decoding
pub static SCHEMA_VALIDATORS: Lazy<ValidatorCache> = Lazy::new(ValidatorCache::from_env);

/// Thread-safe cache for compiled JSON Schema validators
#[derive(Clone)]
pub struct ValidatorCache {
    cache: Arc<RwLock<HashMap<String, Arc<Validator>>>>,
    enabled: bool,
}

impl ValidatorCache {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        info!(enabled, "Initializing JSON Schema validator cache");
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            enabled,
        }
    }

    /// Build from `TYPED_ROUTE_SCHEMA_CACHE` (enabled unless switched off)
    #[must_use]
    pub fn from_env() -> Self {
        let enabled = std::env::var(SCHEMA_CACHE_ENV)
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "off" | "false" | "0"))
            .unwrap_or(true);
        Self::new(enabled)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of cached validators
    #[must_use]
    pub fn size(&self) -> usize {
        match self.cache.read() {
            Ok(cache) => cache.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Drop every cached validator.
    pub fn clear(&self) {
        match self.cache.write() {
            Ok(mut cache) => cache.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    /// Get a cached validator or compile and cache a new one
    ///
    /// # Errors
    ///
    /// Returns `RouteError::Internal` when the schema does not compile. That
    /// is a programming error in the route declaration, not a client error.
    pub fn get_or_compile(&self, key: &str, schema: &Value) -> Result<Arc<Validator>, RouteError> {
        if !self.enabled {
            return compile(key, schema).map(Arc::new);
        }

        if let Ok(cache) = self.cache.read() {
            if let Some(validator) = cache.get(key) {
                debug!(cache_key = %key, "Schema validator cache hit");
                return Ok(Arc::clone(validator));
            }
        }

        let validator = Arc::new(compile(key, schema)?);
        let mut cache = match self.cache.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Another coroutine may have compiled it while we waited
        let entry = cache
            .entry(key.to_string())
            .or_insert_with(|| Arc::clone(&validator));
        info!(cache_key = %key, "Schema validator compiled and cached");
        Ok(Arc::clone(entry))
    }

    /// Validate `instance` against `schema`, compiling through the cache
    ///
    /// # Errors
    ///
    /// `RouteError::ValidationFailed` with one message per violation, or
    /// `RouteError::Internal` when the schema itself is invalid.
    pub fn validate(&self, key: &str, schema: &Value, instance: &Value) -> Result<(), RouteError> {
        let validator = self.get_or_compile(key, schema)?;
        let details: Vec<String> = validator.iter_errors(instance).map(|e| e.to_string()).collect();
        if details.is_empty() {
            Ok(())
        } else {
            debug!(cache_key = %key, violations = details.len(), "Schema validation failed");
            Err(RouteError::ValidationFailed { details })
        }
    }
}

fn compile(key: &str, schema: &Value) -> Result<Validator, RouteError> {
    jsonschema::validator_for(schema).map_err(|e| {
        error!(cache_key = %key, error = %e, "Failed to compile JSON Schema");
        RouteError::Internal(format!("invalid schema for {key}: {e}"))
    })
}
