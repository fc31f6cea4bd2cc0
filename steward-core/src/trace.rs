//! Tracing initialization.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// The filter is read from `STEWARD_LOG` (same syntax as `RUST_LOG`),
/// falling back to `info`. Calling this more than once is a no-op.
pub fn init() {
    let filter =
        EnvFilter::try_from_env("STEWARD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
