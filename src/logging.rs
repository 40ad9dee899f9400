// src/logging.rs

//! Logging setup for `specwatch` using `tracing` + `tracing-subscriber`.
//!
//! Status lines share the terminal with inherited test-runner output
//! (rspec/cucumber write straight to our stdout/stderr), so the format is
//! deliberately sparse: no timestamps, no targets, just level and message.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `SPECWATCH_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise the global logging subscriber. Call once at startup; a second
/// call panics.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_max_level(resolve_level(cli_level))
        .without_time()
        .with_target(false)
        .compact()
        .init();

    Ok(())
}

fn resolve_level(cli_level: Option<LogLevel>) -> Level {
    if let Some(lvl) = cli_level {
        return match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        };
    }

    std::env::var("SPECWATCH_LOG")
        .ok()
        .and_then(|s| parse_level_str(&s))
        .unwrap_or(Level::INFO)
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
