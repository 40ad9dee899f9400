// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling per-monitor inclusion glob patterns.
//! - Wiring up cross-platform filesystem watchers (`notify`) over each
//!   monitor root.
//! - Watching the version-control branch pointer file.
//!
//! It does **not** know about commands or the run lock; it only turns
//! filesystem changes into coordinator events.

pub mod branch;
pub mod patterns;
pub mod watcher;

pub use branch::{read_current_branch, spawn_branch_watcher};
pub use patterns::{MonitorProfile, build_monitor_profiles};
pub use watcher::{WatcherHandle, spawn_monitor, spawn_monitors};
