use pq_inspect::active_node::locate_active_node;
use pq_inspect::expected_type;
use pq_syntax::fixtures::DocumentBuilder;
use pq_syntax::AstKind;
use pq_types::{Primitive, Type};

fn whole(b: &DocumentBuilder) -> pq_syntax::TokenRange {
    b.token_range(0, 0, 0, 40, 0, 20)
}

/// Caret inside `if <here>` expects a `Logical`-typed expression.
#[test]
fn caret_in_an_if_condition_expects_logical() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);
    let if_expr = b.branch(AstKind::IfExpression, None, None, w);
    let cond_range = b.token_range(0, 3, 0, 8, 1, 2);
    b.identifier(Some(if_expr), Some(1), cond_range, "cond", false);

    let map = b.finish();
    let active = locate_active_node(pq_common::Position::new(0, 5), &map).unwrap().unwrap();

    assert_eq!(expected_type(&active), Some(Type::primitive(Primitive::Logical, false)));
}

/// Caret inside a `let`'s bound value (attribute 2 of the pair) expects any
/// expression.
#[test]
fn caret_in_a_let_bound_value_expects_an_expression() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);
    let let_expr = b.branch(AstKind::LetExpression, None, None, w);
    let wrapper = b.branch(AstKind::ArrayWrapper, Some(let_expr), Some(1), w);
    let csv = b.branch(AstKind::Csv, Some(wrapper), Some(0), w);
    let pair = b.branch(AstKind::IdentifierPairedExpression, Some(csv), Some(0), w);
    let key_range = b.token_range(0, 0, 0, 1, 0, 1);
    b.identifier(Some(pair), Some(0), key_range, "x", false);
    let value_range = b.token_range(0, 8, 0, 9, 3, 4);
    b.literal(Some(pair), Some(2), value_range, pq_syntax::LiteralKind::Number);

    let map = b.finish();
    let active = locate_active_node(pq_common::Position::new(0, 9), &map).unwrap().unwrap();

    assert_eq!(expected_type(&active), Some(Type::any()));
}

/// Caret right after a binary operator (the `AfterAst` case, e.g. `1 + `)
/// resolves to the right operand's expression slot by consulting the
/// incremented attribute index.
#[test]
fn after_ast_increments_the_attribute_index_before_lookup() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);
    let expr = b.branch(AstKind::ArithmeticExpression, None, None, w);
    let left_range = b.token_range(0, 0, 0, 1, 0, 1);
    b.literal(Some(expr), Some(0), left_range, pq_syntax::LiteralKind::Number);
    let op_range = b.token_range(0, 2, 0, 3, 1, 2);
    b.operator(Some(expr), Some(1), op_range, pq_syntax::OperatorKind::Add);

    let map = b.finish();
    let active = locate_active_node(pq_common::Position::new(0, 5), &map).unwrap().unwrap();

    assert_eq!(expected_type(&active), Some(Type::any()));
}

/// An empty document has no ancestry, so no expected-type slot is established.
#[test]
fn an_empty_document_has_no_expected_type() {
    let map = DocumentBuilder::new().finish();
    assert!(locate_active_node(pq_common::Position::new(0, 0), &map).unwrap().is_none());
}
