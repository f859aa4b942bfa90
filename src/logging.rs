//! One-shot logger setup for hosts.
//!
//! The crate itself only emits through the [`log`] facade; hosts that
//! don't bring their own backend can call [`init_logging`] early in
//! `main` to get `env_logger` output.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the global `env_logger` backend once.
///
/// Honors the `RUST_LOG` filter syntax (e.g. `"alpenglow=debug"`) and
/// defaults to info-level output when the variable is unset. Idempotent;
/// later calls are ignored, so it is safe next to a host that may have
/// installed its own logger first.
pub fn init_logging() {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        // A host logger may already be installed; losing the race is fine.
        let _ = builder.try_init();
    });
}
