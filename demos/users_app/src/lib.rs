//! Users CRUD service built on typed-route.
//!
//! An in-memory user directory exposed as `/users`, a home page at `/`
//! and a permanent redirect from the old `/people` address. Resources are
//! served as JSON or as rendered HTML depending on configuration.

pub mod model;
pub mod registry;
pub mod routes;
pub mod store;

use std::path::PathBuf;

pub use registry::{build_service, configure, register};
pub use store::{UserStore, SEED_USER_ID};

/// Templates shipped with this crate
#[must_use]
pub fn templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}
