//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DIRECTIVE: &str = "docroutes=info";

/// Install the global fmt subscriber. `RUST_LOG` takes precedence over `default_directive`.
/// Fails if a subscriber is already installed.
pub fn init(default_directive: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;
    tracing_subscriber::fmt().with_env_filter(filter).try_init()
}
