// ============================
// rentauth-lib/src/logging.rs
// ============================
//! Tracing subscriber setup.
use crate::config::LoggingSettings;
use crate::error::AuthError;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `logging.level` when set. Fails if a subscriber is
/// already installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<(), AuthError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| AuthError::Config(format!("invalid logging.level: {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| AuthError::Config(format!("tracing already initialised: {e}")))
}
