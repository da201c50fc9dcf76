use super::error::RouteError;
use crate::router::ParamVec;
use std::fmt::Display;
use std::str::FromStr;

/// Named path segments captured by the router
#[derive(Debug, Clone, Copy)]
pub struct Parameters<'a> {
    params: &'a ParamVec,
}

impl<'a> Parameters<'a> {
    #[must_use]
    pub fn new(params: &'a ParamVec) -> Self {
        Self { params }
    }

    /// Raw (percent-decoded) value of a segment
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert a segment that must be present
    ///
    /// # Errors
    ///
    /// `MissingParameter` when the segment was not captured and
    /// `InvalidParameter` when it does not parse as `T`. Both are `400`.
    pub fn require<T>(&self, name: &str) -> Result<T, RouteError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional(name)?.ok_or_else(|| RouteError::MissingParameter {
            name: name.to_string(),
        })
    }

    /// Convert a segment when present; absent is `Ok(None)`
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when the segment is present but does not parse.
    pub fn optional<T>(&self, name: &str) -> Result<Option<T>, RouteError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let Some(raw) = self.get(name) else {
            return Ok(None);
        };
        raw.parse::<T>()
            .map(Some)
            .map_err(|e| RouteError::InvalidParameter {
                name: name.to_string(),
                value: raw.to_string(),
                reason: e.to_string(),
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
