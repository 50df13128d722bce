//! Diagnostic logging
//!
//! Reports go to stdout; everything logged here goes to stderr so the two never mix.
//! The filter is taken from `SITECMP_LOG`, then `RUST_LOG`, then the CLI verbosity.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SITECMP_LOG";

static INIT_ONCE: Once = Once::new();

pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "sitecmp=warn",
        1 => "sitecmp=info",
        2 => "sitecmp=debug",
        _ => "sitecmp=trace",
    }
}

/// Install the stderr subscriber. Later calls are no-ops.
pub fn init(verbosity: u8) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
