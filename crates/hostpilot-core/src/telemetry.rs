//! Tracing initialisation for harness runs.
//!
//! Call [`init_tracing`] once before driving a harness to get per-poll
//! status lines and teardown warnings on stderr. Respects `RUST_LOG`;
//! safe to call more than once (later calls are ignored, the global
//! subscriber can only be set once per process).

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// `level` is the default verbosity when `RUST_LOG` is not set.
pub fn init_tracing(level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .ok();
}
