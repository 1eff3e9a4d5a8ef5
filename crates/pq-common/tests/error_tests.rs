use super::*;

#[test]
fn invariant_error_display_includes_every_detail_in_order() {
    let err = InvariantError::node_not_found(7);
    assert_eq!(err.to_string(), "invariant violation: node id not present in the node-id map (node_id=7)");
}

#[test]
fn unexpected_kind_carries_both_the_expected_kind_and_the_offending_id() {
    let err = InvariantError::unexpected_kind("LetExpression", 3);
    assert_eq!(err.details, vec![ErrorDetail::NodeKind("LetExpression".to_string()), ErrorDetail::NodeId(3)]);
}

#[test]
fn core_error_display_delegates_to_the_wrapped_error() {
    let invariant = CoreError::from(InvariantError::recursion_limit_exceeded(512));
    assert_eq!(invariant.to_string(), "invariant violation: recursion limit exceeded (count=512)");

    let cancelled = CoreError::from(CancellationError);
    assert_eq!(cancelled.to_string(), "inspection was cancelled");
}
