use specwatch::engine::{BranchDecision, RunState};

#[test]
fn lock_is_single_flight() {
    let mut state = RunState::new(None);

    assert!(state.try_acquire());
    assert!(state.is_locked());

    // A second acquisition while the first run is in flight must fail; the
    // caller drops the change batch, nothing is queued.
    assert!(!state.try_acquire());

    state.release();
    assert!(!state.is_locked());
    assert!(state.try_acquire());
}

#[test]
fn same_branch_observation_is_idempotent() {
    let mut state = RunState::new(Some("main".to_string()));

    assert_eq!(state.observe_branch("main"), BranchDecision::Unchanged);
    assert!(!state.is_locked());
    assert!(!state.branch_changing());
    assert_eq!(state.branch(), Some("main"));
}

#[test]
fn branch_change_force_acquires_the_lock() {
    let mut state = RunState::new(Some("main".to_string()));
    assert!(state.try_acquire());

    // Pre-empts the in-flight run: the lock stays held by the branch flow.
    let decision = state.observe_branch("feature-x");
    assert_eq!(
        decision,
        BranchDecision::Changed {
            previous: Some("main".to_string())
        }
    );
    assert!(state.is_locked());
    assert!(state.branch_changing());
    assert_eq!(state.branch(), Some("feature-x"));

    // File-triggered runs cannot start until the change settles.
    assert!(!state.try_acquire());

    state.settle_branch_change();
    assert!(!state.is_locked());
    assert!(!state.branch_changing());
    assert!(state.try_acquire());
}

#[test]
fn first_branch_detection_counts_as_a_change() {
    // Startup without a repository, then one appears.
    let mut state = RunState::new(None);

    let decision = state.observe_branch("main");
    assert_eq!(decision, BranchDecision::Changed { previous: None });
    assert_eq!(state.branch(), Some("main"));
}
