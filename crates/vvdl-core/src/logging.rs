//! Logging init: stderr with env-filter, info-level status for this tool only.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr. Status messages from vvdl itself
/// are shown at info level; everything else (HTTP stack) only at error level.
/// Override with `RUST_LOG`.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("error,vvdl_core=info,vvdl_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
