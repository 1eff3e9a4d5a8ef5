use super::{is_after_ast, is_at_context_start, is_before_ast, is_before_position, is_on_ast, is_on_context};
use crate::ast_kind::AstKind;
use crate::fixtures::DocumentBuilder;
use crate::node::{AstPayload, ContextNode, NodeId};
use pq_common::Position;

#[test]
fn before_includes_the_exact_start_position() {
    let p = Position::new(0, 5);
    assert!(is_before_position(p, Position::new(0, 5)));
    assert!(is_before_position(p, Position::new(0, 6)));
    assert!(!is_before_position(p, Position::new(0, 4)));
}

#[test]
fn ast_ranges_classify_before_on_after() {
    let mut builder = DocumentBuilder::new();
    let range = builder.token_range(0, 2, 0, 5, 0, 1);
    let id = builder.leaf(AstKind::Identifier, None, None, range, AstPayload::None);
    let map = builder.finish();
    let node = map.get(id).unwrap().as_ast().unwrap().clone();

    assert!(is_before_ast(Position::new(0, 2), &node));
    assert!(is_on_ast(Position::new(0, 3), &node));
    assert!(is_after_ast(Position::new(0, 5), &node));
}

#[test]
fn context_node_with_no_tokens_is_on_for_every_caret() {
    let node = ContextNode {
        id: NodeId::new(0),
        kind: AstKind::IfExpression,
        attribute_index: None,
        first_token: None,
        promoted_ast: None,
    };
    let map = DocumentBuilder::new().finish();
    assert!(is_on_context(Position::new(3, 3), &node, &map));
}

#[test]
fn caret_exactly_at_context_start_is_flagged() {
    let node = ContextNode {
        id: NodeId::new(0),
        kind: AstKind::IfExpression,
        attribute_index: None,
        first_token: Some(Position::new(0, 3)),
        promoted_ast: None,
    };
    assert!(is_at_context_start(Position::new(0, 3), &node));
    assert!(!is_at_context_start(Position::new(0, 4), &node));
}
