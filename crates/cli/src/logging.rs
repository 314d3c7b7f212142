//! Logging setup for the CLI

use std::path::PathBuf;
use stylo_core::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Get the log file path
pub fn log_file_path() -> PathBuf {
  stylo_core::default_data_dir().join("stylo.log")
}

/// Parse log level from config string
fn parse_log_level(level: &str) -> tracing::Level {
  match level.to_lowercase().as_str() {
    "off" | "error" => tracing::Level::ERROR,
    "warn" => tracing::Level::WARN,
    "info" => tracing::Level::INFO,
    "debug" => tracing::Level::DEBUG,
    "trace" => tracing::Level::TRACE,
    _ => tracing::Level::INFO,
  }
}

/// Console logging on stderr, so it never mixes with prompts on stdout
fn init_console_logging(env_filter: EnvFilter) {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}

/// Initialize logging with config-driven settings.
///
/// Console mode (`--verbose` or `logging.console`): stderr with colors.
/// Otherwise: rolling file in the data directory, no ANSI.
///
/// Returns the guard that must be kept alive for the duration of the program
pub fn init_logging(config: &LoggingConfig, console: bool) -> Option<WorkerGuard> {
  let level = parse_log_level(&config.level);

  // RUST_LOG overrides the configured level
  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  if console || config.console {
    init_console_logging(env_filter);
    return None;
  }

  let log_dir = stylo_core::default_data_dir();
  if std::fs::create_dir_all(&log_dir).is_err() {
    // Fall back to console-only logging
    init_console_logging(env_filter);
    return None;
  }

  let file_appender = match config.rotation.as_str() {
    "hourly" => tracing_appender::rolling::hourly(&log_dir, "stylo.log"),
    "never" => tracing_appender::rolling::never(&log_dir, "stylo.log"),
    _ => tracing_appender::rolling::daily(&log_dir, "stylo.log"),
  };

  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(true)
    .with_ansi(false)
    .with_writer(file_writer)
    .init();

  Some(guard)
}
