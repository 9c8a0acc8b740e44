//! Logging setup

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence; the default level is INFO. Logs go to
/// stderr so stdout stays free for the operator prompt.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
