use pq_common::Interner;
use pq_scope::{resolve_ancestry_scope, ScopeById, ScopeItem};
use pq_syntax::fixtures::DocumentBuilder;
use pq_syntax::AstKind;

/// Builds `let a = 1, b = a in b` and returns (map, id of `b`'s own value
/// slot, id of the body expression).
fn build_let_with_two_bindings() -> (pq_syntax::NodeIdMapCollection, pq_syntax::NodeId, pq_syntax::NodeId) {
    let mut doc = DocumentBuilder::new();
    let whole = doc.token_range(0, 0, 0, 20, 0, 10);

    let let_expr = doc.branch(AstKind::LetExpression, None, None, whole);
    let wrapper = doc.branch(AstKind::ArrayWrapper, Some(let_expr), Some(1), whole);

    let csv_a = doc.branch(AstKind::Csv, Some(wrapper), Some(0), whole);
    let pair_a = doc.branch(AstKind::IdentifierPairedExpression, Some(csv_a), Some(0), whole);
    let key_a_range = doc.token_range(0, 4, 0, 5, 1, 2);
    doc.identifier(Some(pair_a), Some(0), key_a_range, "a", false);
    let value_a_range = doc.token_range(0, 8, 0, 9, 2, 3);
    doc.literal(Some(pair_a), Some(2), value_a_range, pq_syntax::LiteralKind::Number);

    let csv_b = doc.branch(AstKind::Csv, Some(wrapper), Some(1), whole);
    let pair_b = doc.branch(AstKind::IdentifierPairedExpression, Some(csv_b), Some(0), whole);
    let key_b_range = doc.token_range(0, 11, 0, 12, 4, 5);
    doc.identifier(Some(pair_b), Some(0), key_b_range, "b", false);
    let value_b_range = doc.token_range(0, 15, 0, 16, 5, 6);
    let value_b = doc.identifier(Some(pair_b), Some(2), value_b_range, "a", false);

    let body_range = doc.token_range(0, 19, 0, 20, 8, 9);
    let body = doc.identifier(Some(let_expr), Some(3), body_range, "b", false);

    (doc.finish(), value_b, body)
}

#[test]
fn descending_into_the_body_sees_every_binding_non_recursively() {
    let (map, _value_b, body) = build_let_with_two_bindings();
    let mut interner = Interner::new();
    let ancestry = map.ancestry(body).unwrap();

    let resolution = resolve_ancestry_scope(&ancestry, &map, &ScopeById::default(), &mut interner).unwrap();

    let a = resolution.node_scope.get(&interner.intern("a")).unwrap();
    let b = resolution.node_scope.get(&interner.intern("b")).unwrap();
    assert!(matches!(a, ScopeItem::KeyValuePair { recursive: false, .. }));
    assert!(matches!(b, ScopeItem::KeyValuePair { recursive: false, .. }));
}

#[test]
fn descending_into_a_bindings_own_value_flags_only_that_binding_recursive() {
    let (map, value_b, _body) = build_let_with_two_bindings();
    let mut interner = Interner::new();
    let ancestry = map.ancestry(value_b).unwrap();

    let resolution = resolve_ancestry_scope(&ancestry, &map, &ScopeById::default(), &mut interner).unwrap();

    let a = resolution.node_scope.get(&interner.intern("a")).unwrap();
    let b = resolution.node_scope.get(&interner.intern("b")).unwrap();
    assert!(matches!(a, ScopeItem::KeyValuePair { recursive: false, .. }));
    assert!(matches!(b, ScopeItem::KeyValuePair { recursive: true, .. }));
}

#[test]
fn a_given_cache_entry_is_reused_instead_of_recomputed() {
    let (map, _value_b, body) = build_let_with_two_bindings();
    let mut interner = Interner::new();
    let ancestry = map.ancestry(body).unwrap();

    let mut given = ScopeById::default();
    given.insert(body, pq_scope::NodeScope::default());

    let resolution = resolve_ancestry_scope(&ancestry, &map, &given, &mut interner).unwrap();
    assert!(resolution.node_scope.is_empty());
}

#[test]
fn an_empty_ancestry_resolves_to_an_empty_scope() {
    let map = pq_syntax::NodeIdMapCollection::new();
    let mut interner = Interner::new();
    let resolution = resolve_ancestry_scope(&[], &map, &ScopeById::default(), &mut interner).unwrap();
    assert!(resolution.node_scope.is_empty());
    assert!(resolution.delta.is_empty());
}
