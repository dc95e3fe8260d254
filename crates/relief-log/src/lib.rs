//! Logging bootstrap for relief binaries.
//!
//! Library crates emit through the `log` facade; this crate installs a
//! `tracing` subscriber (with a `log`-record bridge) that renders them to
//! the console with timestamps and module paths, filterable via `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console logging.
///
/// The default filter is `info`; set `RUST_LOG` to override (for example
/// `RUST_LOG=relief_erode=debug` to watch droplet progress). Calling this
/// more than once is harmless; later calls are ignored.
pub fn init_logging() {
    // Bridge `log` records from the library crates into tracing.
    let _ = tracing_log::LogTracer::init();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}
