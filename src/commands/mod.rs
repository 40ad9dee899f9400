// src/commands/mod.rs

//! Turning change batches into runnable test commands.
//!
//! - [`paths`] resolves monitor-relative paths to absolute ones.
//! - [`focus`] inspects file contents for focus markers.
//! - [`builder`] assembles the wrapper + runner + path argument lists and
//!   owns the single-file focus cache.

pub mod builder;
pub mod focus;
pub mod paths;

pub use builder::{CommandBuilder, RunCommand};
pub use focus::has_focus_marker;
pub use paths::resolve_total_path;
