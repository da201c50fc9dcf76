//! # Runtime Configuration Module
//!
//! Environment-driven settings for the `may` coroutine runtime.
//!
//! ## Environment Variables
//!
//! ### `TYPED_ROUTE_STACK_SIZE`
//!
//! Sets the stack size for handler coroutines, application actors
//! and connection coroutines. Accepts values in:
//! - Decimal: `16384` (16 KB)
//! - Hexadecimal: `0x4000` (16 KB)
//!
//! Default: `0x4000` (16 KB)
//!
//! Template rendering and JSON Schema validation run inside handler
//! coroutines, so routes with large views may need `0x8000` or more.
//!
//! ```rust
//! use typed_route::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! config.apply();
//! println!("Stack size: {} bytes", config.stack_size);
//! ```

use std::env;

/// Environment variable holding the coroutine stack size.
pub const STACK_SIZE_ENV: &str = "TYPED_ROUTE_STACK_SIZE";

const DEFAULT_STACK_SIZE: usize = 0x4000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes (default: 16 KB / 0x4000)
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let stack_size = env::var(STACK_SIZE_ENV)
            .ok()
            .and_then(|val| parse_stack_size(&val))
            .unwrap_or(DEFAULT_STACK_SIZE);
        RuntimeConfig { stack_size }
    }

    /// Push the settings into the global `may` configuration.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

fn parse_stack_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}
