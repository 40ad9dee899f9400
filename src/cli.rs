// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `specwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "specwatch",
    version,
    about = "Re-run cucumber/rspec files as they change, with focus markers and branch awareness.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Specwatch.toml` in the current working directory. A missing
    /// file falls back to built-in defaults (features/ + spec/ monitors run
    /// through bundler and spring).
    #[arg(long, value_name = "PATH", default_value = "Specwatch.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SPECWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the effective runner and monitors, then exit without watching.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
