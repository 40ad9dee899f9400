// src/engine/mod.rs

//! The run coordinator.
//!
//! This module ties together:
//! - the pure run-state bookkeeping (single-flight lock, branch tracking)
//! - the main event loop that reacts to:
//!   - file-change batches
//!   - branch-pointer changes
//!   - child process exits and timers
//!   - console input and cancel requests

pub mod coordinator;
pub mod state;

pub use coordinator::{Coordinator, RuntimeEvent};
pub use state::{BranchDecision, RunState};
