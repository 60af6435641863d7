//! Process-wide log setup for binaries.

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Timestamp layout of log lines, e.g. `10/19/2026 14:03:59`.
pub const LOG_TIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Install a stderr subscriber at INFO (or whatever `RUST_LOG` says).
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logger() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
        .with_target(true)
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
