//! # Router Module
//!
//! Path matching for registered routes. Each `(method, path)` pair added
//! through [`crate::registry::RouteRegistry`] becomes a [`RouteEntry`]; the
//! router compiles every entry's path pattern into an anchored regex and
//! resolves incoming requests to the entry's handler name plus the extracted
//! path parameters.
//!
//! ## Path patterns
//!
//! Both the `{name}` and the `:name` parameter spellings are accepted, and a
//! missing leading `/` is added:
//!
//! | pattern | matches | params |
//! |---------|---------|--------|
//! | `/` | `/` | none |
//! | `users` | `/users` | none |
//! | `/users/{id}` | `/users/42` | `id = "42"` |
//! | `users/:userID` | `/users/42` | `userID = "42"` |
//!
//! ## Matching order
//!
//! Routes with fewer parameters are tried first, then longer patterns, so a
//! static `/users/new` wins over `/users/{id}`.

mod core;

pub use core::{normalize_path, ParamVec, RouteEntry, RouteMatch, Router, MAX_INLINE_PARAMS};
