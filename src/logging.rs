//! Diagnostic logging setup.
//!
//! Library code logs through the `log` facade; the binary installs
//! env_logger once at startup. `RUST_LOG` overrides the default level.

use env_logger::Env;

/// Default filter when `RUST_LOG` is unset. egui/eframe internals are
/// noisy at `info`, so they are held to warnings.
pub const DEFAULT_FILTER: &str = "info,eframe=warn,egui_glow=warn";

/// Install the global logger. Safe to call more than once; later calls are
/// ignored.
pub fn init_logging() {
    let result = env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_millis()
        .try_init();
    if result.is_ok() {
        log::debug!("Logging initialized");
    }
}
