//! Diagnostic logging for the console.
//!
//! Logs go to stderr so stdout stays clean for verdicts and JSON output.
//! The filter comes from `RUST_LOG` and defaults to `warn`.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
