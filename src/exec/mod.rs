// src/exec/mod.rs

//! Process execution layer.
//!
//! Spawns test-run children with `tokio::process::Command`, forwards their
//! termination back to the coordinator as `RuntimeEvent`s, delivers SIGINT
//! for cancellation, and runs the background-runner stop command.

pub mod process;

pub use process::{RunningChild, interrupt, spawn_run, spawn_runner_stop, stop_runner};
