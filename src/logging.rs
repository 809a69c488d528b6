//! Logging setup through `tracing`.
//!
//! Diagnostics go to stderr so they never mix with the prompt or the rows
//! printed on stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g.
/// `VISION_LEDGER_LOG=vision_ledger=debug`.
pub const LOG_ENV: &str = "VISION_LEDGER_LOG";
const DEFAULT_FILTER: &str = "vision_ledger=warn";

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(env_filter)
        .try_init();
}
