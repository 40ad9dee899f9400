// src/config/mod.rs

//! Configuration loading and validation for specwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, with built-in defaults (`loader.rs`).
//! - Validate basic invariants like glob syntax and path uniqueness
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, load_or_default};
pub use model::{BranchSection, ConfigFile, MonitorConfig, RunnerSection, TestKind};
pub use validate::validate_config;
