use super::{AstNode, AstPayload, ContextNode, NodeId, TokenRange, XorNode};
use crate::ast_kind::AstKind;
use pq_common::Position;

fn range() -> TokenRange {
    TokenRange {
        start: Position::new(0, 0),
        end: Position::new(0, 1),
        start_index: 0,
        end_index: 1,
    }
}

#[test]
fn xor_node_exposes_id_and_kind_for_both_variants() {
    let ast = XorNode::from(AstNode {
        id: NodeId::new(1),
        kind: AstKind::Identifier,
        attribute_index: None,
        token_range: range(),
        is_leaf: true,
        payload: AstPayload::None,
    });
    assert_eq!(ast.id(), NodeId::new(1));
    assert_eq!(ast.kind(), AstKind::Identifier);
    assert!(ast.is_ast());

    let ctx = XorNode::from(ContextNode {
        id: NodeId::new(2),
        kind: AstKind::IfExpression,
        attribute_index: Some(0),
        first_token: None,
        promoted_ast: None,
    });
    assert_eq!(ctx.id(), NodeId::new(2));
    assert!(!ctx.is_ast());
    assert_eq!(ctx.attribute_index(), Some(0));
}
