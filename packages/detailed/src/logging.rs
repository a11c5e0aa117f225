//! Logging integration over the `log` facade
//!
//! Provides `env_logger` setup and helpers that hand rendered errors to
//! whatever logger the application installed. Rendering verbosity defaults to
//! the `DETAILED_VERBOSITY` environment variable.

use log::{info, log, warn, Level};
use std::error::Error as StdError;
use std::sync::Once;

use crate::display::{render, Verbosity};
use crate::types::Detailed;

static INIT_LOGGER: Once = Once::new();

/// Entry points for reporting errors through `log`
pub struct ErrorLogger;

impl ErrorLogger {
    /// Initialize `env_logger` (once per process)
    ///
    /// Levels come from `RUST_LOG`, e.g. `RUST_LOG=detailed=debug` surfaces
    /// degraded stack captures.
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            if env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .try_init()
                .is_ok()
            {
                info!("structured logging initialized");
            }
        });
    }

    /// Initialize logging for test environments
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log `err` at the verbosity configured in the environment
    pub fn log(level: Level, err: &(dyn StdError + 'static)) {
        Self::log_at(level, err, Verbosity::from_env());
    }

    /// Log `err` rendered at `verbosity`
    pub fn log_at(level: Level, err: &(dyn StdError + 'static), verbosity: Verbosity) {
        log!(level, "{}", render(err, verbosity));
    }

    /// Log the JSON [`Report`](crate::Report) of `err`
    pub fn log_report(level: Level, err: &Detailed) {
        match serde_json::to_string(&err.report()) {
            Ok(json) => log!(level, "{json}"),
            Err(cause) => warn!("error report not serializable: {cause}; error: {err:+}"),
        }
    }
}
