use super::error::RouteError;
use super::response::{ResponseContext, RouteResponse};
use crate::dispatcher::HandlerResponse;
use std::marker::PhantomData;

/// Redirect status family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectKind {
    /// 301 Moved Permanently
    Permanent,
    /// 303 See Other
    #[default]
    Normal,
    /// 307 Temporary Redirect
    Temporary,
}

impl RedirectKind {
    #[must_use]
    pub fn status(self) -> u16 {
        match self {
            RedirectKind::Permanent => 301,
            RedirectKind::Normal => 303,
            RedirectKind::Temporary => 307,
        }
    }
}

/// A fixed redirect destination
pub trait RedirectTarget: Send + Sync + 'static {
    fn location() -> &'static str;

    fn kind() -> RedirectKind {
        RedirectKind::Normal
    }
}

/// Empty-bodied redirect to `T::location()`; the output `O` is discarded
pub struct RedirectResponse<T, O = ()> {
    _marker: PhantomData<fn(O) -> T>,
}

impl<T, O> Default for RedirectResponse<T, O> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T, O> RouteResponse for RedirectResponse<T, O>
where
    T: RedirectTarget,
    O: Send + 'static,
{
    type Output = O;

    fn encode(&self, _output: O, _cx: &ResponseContext<'_>) -> Result<HandlerResponse, RouteError> {
        Ok(HandlerResponse::redirect(T::kind().status(), T::location()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_status() {
        assert_eq!(RedirectKind::Permanent.status(), 301);
        assert_eq!(RedirectKind::default().status(), 303);
        assert_eq!(RedirectKind::Temporary.status(), 307);
    }
}
