use bookmark_core::{update, AuditState, Msg};

#[test]
fn update_is_noop() {
    let state = AuditState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
