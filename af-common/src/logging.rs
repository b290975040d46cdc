//! Logging initialization
//!
//! RUST_LOG wins when set; otherwise the configured level is used.

use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber
///
/// Fails if a subscriber is already installed or the directive is invalid.
pub fn init(default_level: &str) -> Result<()> {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env_directives.as_deref(), default_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to install tracing subscriber: {}", e)))
}

fn build_filter(env_directives: Option<&str>, default_level: &str) -> Result<EnvFilter> {
    let directives = match env_directives {
        Some(d) if !d.trim().is_empty() => d,
        _ => default_level,
    };

    EnvFilter::try_new(directives)
        .map_err(|e| Error::Config(format!("Invalid log filter '{}': {}", directives, e)))
}
