// src/errors.rs

//! Crate-wide error aliases.
//!
//! specwatch uses `anyhow` throughout; this module is the single place to
//! grow structured error types if the need ever comes up (e.g. separating
//! config errors from watcher errors).

pub use anyhow::{Context, Error, Result};
