use retarget_core::phase::{Phase, PhaseTracker};

#[test]
fn phases_are_ordered() {
    assert!(Phase::Declared < Phase::GraphReady);
    assert!(Phase::GraphReady < Phase::Evaluated);
}

#[test]
fn phase_display_is_kebab_case() {
    assert_eq!(Phase::Declared.to_string(), "declared");
    assert_eq!(Phase::GraphReady.to_string(), "graph-ready");
    assert_eq!(Phase::Evaluated.to_string(), "evaluated");
}

#[test]
fn tracker_starts_declared() {
    assert_eq!(PhaseTracker::new().current(), Phase::Declared);
}

#[test]
fn tracker_advances_forward() {
    let mut tracker = PhaseTracker::new();
    tracker.advance(Phase::GraphReady).unwrap();
    tracker.advance(Phase::Evaluated).unwrap();
    assert_eq!(tracker.current(), Phase::Evaluated);
}

#[test]
fn tracker_may_skip_a_phase() {
    let mut tracker = PhaseTracker::new();
    tracker.advance(Phase::Evaluated).unwrap();
    assert_eq!(tracker.current(), Phase::Evaluated);
}

#[test]
fn tracker_allows_reentering_current_phase() {
    let mut tracker = PhaseTracker::new();
    tracker.advance(Phase::Evaluated).unwrap();
    tracker.advance(Phase::Evaluated).unwrap();
    assert_eq!(tracker.current(), Phase::Evaluated);
}

#[test]
fn tracker_rejects_rollback() {
    let mut tracker = PhaseTracker::new();
    tracker.advance(Phase::Evaluated).unwrap();
    let err = tracker.advance(Phase::GraphReady).unwrap_err();
    assert!(
        err.to_string().contains("cannot move from evaluated back to graph-ready"),
        "got: {err}"
    );
    assert_eq!(tracker.current(), Phase::Evaluated);
}
