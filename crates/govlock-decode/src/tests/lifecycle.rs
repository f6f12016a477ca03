use crate::{LifecycleState, StatusFlags};

#[test]
fn test_precedence_done_wins() {
    // Contradictory inputs: done must win outright.
    assert_eq!(
        LifecycleState::from_flags(true, true, true),
        LifecycleState::Done
    );
    assert_eq!(
        LifecycleState::from_flags(true, false, true),
        LifecycleState::Done
    );
}

#[test]
fn test_precedence_ready_over_pending() {
    assert_eq!(
        LifecycleState::from_flags(false, true, true),
        LifecycleState::Ready
    );
}

#[test]
fn test_pending() {
    assert_eq!(
        LifecycleState::from_flags(false, false, true),
        LifecycleState::Pending
    );
}

#[test]
fn test_all_false_is_canceled() {
    assert_eq!(
        LifecycleState::from_flags(false, false, false),
        LifecycleState::Canceled
    );
}

#[test]
fn test_openness() {
    assert!(LifecycleState::Pending.is_open());
    assert!(LifecycleState::Ready.is_open());
    assert!(!LifecycleState::Done.is_open());
    assert!(!LifecycleState::Canceled.is_open());
    assert!(LifecycleState::Ready.is_executable());
    assert!(!LifecycleState::Pending.is_executable());
}

#[test]
fn test_display() {
    assert_eq!(LifecycleState::Pending.to_string(), "pending");
    assert_eq!(LifecycleState::Ready.to_string(), "ready");
    assert_eq!(LifecycleState::Done.to_string(), "done");
    assert_eq!(LifecycleState::Canceled.to_string(), "canceled");
}

#[test]
fn test_partial_flags_do_not_resolve() {
    let mut flags = StatusFlags::new();
    assert_eq!(flags.resolve(), None);

    flags.set_done(false);
    assert_eq!(flags.resolve(), None);

    flags.set_ready(true);
    assert_eq!(flags.resolve(), None);

    flags.set_pending(true);
    assert_eq!(flags.resolve(), Some(LifecycleState::Ready));
}

#[test]
fn test_flags_resolve_with_precedence() {
    let mut flags = StatusFlags::new();
    flags.set_pending(true).set_ready(true).set_done(true);
    assert_eq!(flags.resolve(), Some(LifecycleState::Done));
}
