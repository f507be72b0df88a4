//! Tracing subscriber installation.
//!
//! Components never hold a logger: they emit through the `tracing`
//! macros, and the process entry point decides once, at startup, where
//! those events go. Filtering follows `RUST_LOG` (default `info`).

use tracing_subscriber::EnvFilter;

use crate::config::Environment;

/// Error returned when a global subscriber is already installed.
pub type TelemetryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Installs the global subscriber: pretty text for development, one JSON
/// object per line for production.
///
/// # Errors
///
/// Returns a [`TelemetryError`] if a global subscriber was already set.
pub fn init(environment: Environment) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match environment {
        Environment::Production => builder.json().with_current_span(true).try_init(),
        Environment::Development => builder.try_init(),
    }
}
