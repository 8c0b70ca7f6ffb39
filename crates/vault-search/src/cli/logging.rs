//! Stderr logger initialization for the `vault` binary.
//!
//! Grounded verbatim on `ajw998-blaze/crates/runtime/src/logging.rs`'s
//! hand-rolled `log::Log` implementation (env-configured level, timestamped
//! stderr lines, `OnceLock`-guarded single init), renamed from that crate's
//! `PROGRAM_LOG_LEVEL` to `VAULT_LOG_LEVEL`. `vault-index` logs through the
//! same `log` facade; without this, its `warn`/`debug`/`trace` records
//! would never reach a sink.

use std::sync::OnceLock;

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

const VAULT_LOG_LEVEL: &str = "VAULT_LOG_LEVEL";

struct Logger {
    /// Minimum level that reaches stderr.
    level: Level,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            eprintln!(
                "{} {} [{}] {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Reads the configured level from `VAULT_LOG_LEVEL`, defaulting to `warn`.
fn get_level_from_env() -> Level {
    std::env::var(VAULT_LOG_LEVEL)
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .and_then(|filter| filter.to_level())
        .unwrap_or(Level::Warn)
}

/// Installs the stderr logger, reading the level from `VAULT_LOG_LEVEL`
/// (default `warn`). Safe to call more than once; only the first call
/// takes effect.
pub fn init() -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    let level = get_level_from_env();
    let init_call = LOGGER.get().is_none();
    let logger = LOGGER.get_or_init(|| Logger { level });

    if init_call {
        log::set_logger(logger)?;
        log::set_max_level(level.to_level_filter());
    }

    Ok(())
}
