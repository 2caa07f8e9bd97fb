//! Tracing subscriber setup for embedders and tests.

use tracing_subscriber::EnvFilter;

use crate::api::{Result, RuntimeError};

/// Installs a `fmt` subscriber. `RUST_LOG` wins over `default_filter` when set.
///
/// Fails instead of panicking when a global subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| RuntimeError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| RuntimeError::Logging(e.to_string()))
}
