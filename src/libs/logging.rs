use crate::libs::messages::macros::is_debug_mode;
use tracing_subscriber::EnvFilter;

/// Installs the stderr `tracing` subscriber when debug mode is on.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `debug`.
pub fn enable_logging() {
    if !is_debug_mode() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}=debug", env!("CARGO_PKG_NAME").replace('-', "_"))));

    // Ignore the error when a subscriber is already installed (tests, embedding hosts).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
