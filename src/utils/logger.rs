// src/utils/logger.rs

use log::{Level, LevelFilter};
use std::io::Write;

/// Installs the terminal logger.
///
/// Defaults to `Info` in debug builds and `Warn` in release builds; `RUST_LOG`
/// overrides it, e.g. `RUST_LOG=magresview=debug`.
pub fn init() -> Result<(), log::SetLoggerError> {
  let default_level = if cfg!(debug_assertions) {
    LevelFilter::Info
  } else {
    LevelFilter::Warn
  };

  env_logger::Builder::new()
    .filter_level(default_level)
    .parse_default_env()
    .format(|buf, record| {
      let icon = match record.level() {
        Level::Error => "🔴",
        Level::Warn => "🟠",
        Level::Info => "🔵",
        Level::Debug => "⚪",
        Level::Trace => "▫️",
      };
      writeln!(buf, "{}  {}", icon, record.args())
    })
    .try_init()
}
