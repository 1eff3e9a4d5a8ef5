use pq_common::Interner;
use pq_scope::{dereference_identifier, DereferenceOutcome, NodeScope, ScopeItem};
use pq_syntax::fixtures::DocumentBuilder;
use pq_syntax::NodeId;

#[test]
fn an_undefined_name_reports_undefined() {
    let map = pq_syntax::NodeIdMapCollection::new();
    let mut interner = Interner::new();
    let scope = NodeScope::default();
    let outcome = dereference_identifier("missing", false, &scope, &map, &mut interner).unwrap();
    assert_eq!(outcome, DereferenceOutcome::Undefined);
}

#[test]
fn chases_a_single_reassignment_to_its_non_identifier_value() {
    let mut b = DocumentBuilder::new();
    let number_range = b.token_range(0, 4, 0, 5, 2, 3);
    let number_id = b.literal(None, None, number_range, pq_syntax::LiteralKind::Number);
    let map = b.finish();

    let mut scope = NodeScope::default();
    let mut interner = Interner::new();
    scope.insert(interner.intern("x"), ScopeItem::KeyValuePair { id: NodeId::new(999), recursive: false, value: None });
    scope.insert(interner.intern("y"), ScopeItem::KeyValuePair { id: NodeId::new(1000), recursive: false, value: Some(number_id) });

    // x = y; y = 1 -> dereferencing x resolves straight to y's item since x
    // has no value to chase.
    let outcome = dereference_identifier("x", false, &scope, &map, &mut interner).unwrap();
    assert!(matches!(outcome, DereferenceOutcome::Resolved(ScopeItem::KeyValuePair { id, .. }) if id == NodeId::new(999)));
}

#[test]
fn follows_an_identifier_chain_to_its_terminal_binding() {
    let mut b = DocumentBuilder::new();
    let y_ref_range = b.token_range(0, 0, 0, 1, 0, 1);
    let y_ref = b.identifier(None, None, y_ref_range, "y", false);
    let map = b.finish();

    let mut interner = Interner::new();
    let mut scope = NodeScope::default();
    scope.insert(interner.intern("x"), ScopeItem::KeyValuePair { id: NodeId::new(1), recursive: false, value: Some(y_ref) });
    scope.insert(interner.intern("y"), ScopeItem::KeyValuePair { id: NodeId::new(2), recursive: false, value: None });

    let outcome = dereference_identifier("x", false, &scope, &map, &mut interner).unwrap();
    assert!(matches!(outcome, DereferenceOutcome::Resolved(ScopeItem::KeyValuePair { id, .. }) if id == NodeId::new(2)));
}

#[test]
fn a_cycle_is_reported_rather_than_looped_forever() {
    let mut b = DocumentBuilder::new();
    let x_ref_range = b.token_range(0, 0, 0, 1, 0, 1);
    let x_ref = b.identifier(None, None, x_ref_range, "x", false);
    let y_ref_range = b.token_range(0, 2, 0, 3, 1, 2);
    let y_ref = b.identifier(None, None, y_ref_range, "y", false);
    let map = b.finish();

    let mut interner = Interner::new();
    let mut scope = NodeScope::default();
    scope.insert(interner.intern("x"), ScopeItem::KeyValuePair { id: NodeId::new(1), recursive: false, value: Some(y_ref) });
    scope.insert(interner.intern("y"), ScopeItem::KeyValuePair { id: NodeId::new(2), recursive: false, value: Some(x_ref) });

    let outcome = dereference_identifier("x", false, &scope, &map, &mut interner).unwrap();
    assert_eq!(outcome, DereferenceOutcome::Cycle);
}

#[test]
fn a_recursive_binding_accessed_without_the_at_prefix_does_not_chase_further() {
    let mut interner = Interner::new();
    let map = pq_syntax::NodeIdMapCollection::new();
    let mut scope = NodeScope::default();
    scope.insert(interner.intern("x"), ScopeItem::KeyValuePair { id: NodeId::new(1), recursive: true, value: None });

    let outcome = dereference_identifier("x", false, &scope, &map, &mut interner).unwrap();
    assert!(matches!(outcome, DereferenceOutcome::Resolved(ScopeItem::KeyValuePair { recursive: true, .. })));
}
