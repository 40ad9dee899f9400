// src/engine/state.rs

use tracing::debug;

/// Outcome of observing a branch name reported by the branch watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchDecision {
    /// Same branch as currently tracked; nothing to do.
    Unchanged,
    /// The branch pointer moved; the lock has been force-acquired and the
    /// branch-changing flag set.
    Changed { previous: Option<String> },
}

/// Pure run-state bookkeeping for the coordinator.
///
/// Holds the single-flight lock, the branch-changing suspension flag and the
/// tracked branch name. Invariants:
///
/// - at most one run holds the lock at a time;
/// - while `branch_changing` is set the lock is held, so no file-triggered
///   run can start and exit codes of an interrupted run are not reported.
#[derive(Debug)]
pub struct RunState {
    locked: bool,
    branch_changing: bool,
    branch: Option<String>,
}

impl RunState {
    /// `branch` is the name read from repository metadata at startup, or
    /// `None` when the metadata file did not exist.
    pub fn new(branch: Option<String>) -> Self {
        Self {
            locked: false,
            branch_changing: false,
            branch,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn branch_changing(&self) -> bool {
        self.branch_changing
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Try to acquire the run lock for a file-triggered run.
    ///
    /// Returns false when a run is already in flight (or a branch change is
    /// in progress); the caller drops the change batch in that case.
    pub fn try_acquire(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    /// Release the lock after a run completed (or failed to launch).
    pub fn release(&mut self) {
        self.locked = false;
    }

    /// Record a branch name reported by the branch watcher.
    ///
    /// Equality with the tracked branch is a no-op. A different name updates
    /// the tracked branch, force-acquires the lock (pre-empting future
    /// file-triggered runs) and raises the branch-changing flag.
    pub fn observe_branch(&mut self, new_branch: &str) -> BranchDecision {
        if self.branch.as_deref() == Some(new_branch) {
            debug!(branch = %new_branch, "branch unchanged");
            return BranchDecision::Unchanged;
        }

        let previous = self.branch.replace(new_branch.to_string());
        self.locked = true;
        self.branch_changing = true;
        BranchDecision::Changed { previous }
    }

    /// End of the branch-change settle delay: release the lock and resume
    /// normal exit reporting.
    pub fn settle_branch_change(&mut self) {
        self.locked = false;
        self.branch_changing = false;
    }
}
