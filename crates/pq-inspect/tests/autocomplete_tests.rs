use pq_common::Position;
use pq_inspect::active_node::locate_active_node;
use pq_inspect::autocomplete::autocomplete;
use pq_inspect::keyword::{expression_keywords, type_keywords};
use pq_syntax::fixtures::DocumentBuilder;
use pq_syntax::{AstKind, AstPayload, ConstantKind};

#[test]
fn empty_document_defaults_to_expression_position() {
    assert_eq!(autocomplete(None).allowed_keywords, expression_keywords());
    assert!(autocomplete(None).required.is_none());
}

#[test]
fn caret_right_after_an_ifs_condition_requires_then() {
    let mut b = DocumentBuilder::new();
    let root_range = b.token_range(0, 0, 0, 20, 0, 3);
    let root = b.branch(AstKind::IfExpression, None, None, root_range);
    b.constant(Some(root), Some(0), b.token_range(0, 0, 0, 2, 0, 1), ConstantKind::Logical);
    b.identifier(Some(root), Some(1), b.token_range(0, 3, 0, 4, 1, 2), "cond", false);

    let map = b.finish();
    let active = locate_active_node(Position::new(0, 10), &map).unwrap().unwrap();

    let result = autocomplete(Some(&active));
    assert_eq!(result.required.as_deref(), Some("then"));
    assert!(result.allowed_keywords.is_empty());
}

#[test]
fn caret_in_a_lets_body_allows_any_expression_keyword() {
    let mut b = DocumentBuilder::new();
    let root_range = b.token_range(0, 0, 0, 10, 0, 1);
    let root = b.branch(AstKind::LetExpression, None, None, root_range);
    let body_range = b.token_range(0, 0, 0, 3, 0, 1);
    b.identifier(Some(root), Some(3), body_range, "x", false);

    let map = b.finish();
    let active = locate_active_node(Position::new(0, 1), &map).unwrap().unwrap();

    let result = autocomplete(Some(&active));
    assert!(result.required.is_none());
    assert_eq!(result.allowed_keywords, expression_keywords());
}

#[test]
fn caret_in_an_as_types_slot_allows_only_type_keywords() {
    let mut b = DocumentBuilder::new();
    let root_range = b.token_range(0, 0, 0, 10, 0, 1);
    let root = b.branch(AstKind::AsType, None, None, root_range);
    let type_range = b.token_range(0, 0, 0, 6, 0, 1);
    b.identifier(Some(root), Some(1), type_range, "number", false);

    let map = b.finish();
    let active = locate_active_node(Position::new(0, 1), &map).unwrap().unwrap();

    let result = autocomplete(Some(&active));
    assert!(result.required.is_none());
    assert_eq!(result.allowed_keywords, type_keywords());
}

#[test]
fn comma_inside_a_calls_argument_list_suppresses_autocomplete() {
    let mut b = DocumentBuilder::new();
    let range = b.token_range(0, 0, 0, 20, 0, 4);
    let invoke = b.branch(AstKind::InvokeExpression, None, None, range);
    let wrapper = b.branch(AstKind::ArrayWrapper, Some(invoke), Some(1), range);
    let csv = b.branch(AstKind::Csv, Some(wrapper), Some(0), range);
    b.identifier(Some(csv), Some(0), b.token_range(0, 0, 0, 1, 0, 1), "a", false);
    let comma_range = b.token_range(0, 1, 0, 2, 1, 2);
    let comma = b.leaf(AstKind::Constant, Some(csv), Some(1), comma_range, AstPayload::None);

    let map = b.finish();
    let active = locate_active_node(Position::new(0, 2), &map).unwrap().unwrap();
    assert_eq!(active.ancestry[0].id(), comma);

    let result = autocomplete(Some(&active));
    assert!(result.required.is_none());
    assert!(result.allowed_keywords.is_empty());
}

#[test]
fn comma_inside_a_list_literal_is_unaffected_by_the_invoke_edge_case() {
    let mut b = DocumentBuilder::new();
    let range = b.token_range(0, 0, 0, 20, 0, 4);
    let list = b.branch(AstKind::ListExpression, None, None, range);
    let wrapper = b.branch(AstKind::ArrayWrapper, Some(list), Some(1), range);
    let csv = b.branch(AstKind::Csv, Some(wrapper), Some(0), range);
    b.identifier(Some(csv), Some(0), b.token_range(0, 0, 0, 1, 0, 1), "a", false);
    let comma_range = b.token_range(0, 1, 0, 2, 1, 2);
    b.leaf(AstKind::Constant, Some(csv), Some(1), comma_range, AstPayload::None);

    let map = b.finish();
    let active = locate_active_node(Position::new(0, 2), &map).unwrap().unwrap();

    let result = autocomplete(Some(&active));
    assert!(result.required.is_none());
    assert_eq!(result.allowed_keywords, expression_keywords());
}

/// Two context nodes opened back-to-back at the exact same still-unread
/// position (a `let`'s body starting an `each` that immediately starts an
/// `if`, none of whose tokens have been read yet): the caret's own active
/// node is the innermost one, but the autocomplete walk must not stop at
/// its immediate (also-just-started) parent — it has to keep climbing to
/// the first ancestor pair with an actual grammar slot to classify.
#[test]
fn a_context_started_exactly_at_the_caret_defers_to_the_next_outer_slot() {
    let mut b = DocumentBuilder::new();
    let root_range = b.token_range(0, 0, 0, 20, 0, 1);
    let root = b.branch(AstKind::LetExpression, None, None, root_range);
    let caret = Position::new(0, 5);
    // A leaf positioned after the caret keeps the locator off the
    // "caret is after every leaf" fallback, so the context path runs.
    b.identifier(Some(root), Some(5), b.token_range(0, 50, 0, 55, 0, 1), "future", false);
    let outer_ctx = b.context(AstKind::EachExpression, Some(root), Some(3), Some(caret));
    let inner_ctx = b.context(AstKind::IfExpression, Some(outer_ctx), Some(0), Some(caret));

    let map = b.finish();
    let active = locate_active_node(caret, &map).unwrap().unwrap();
    assert_eq!(active.ancestry[0].id(), inner_ctx);

    let result = autocomplete(Some(&active));
    assert!(result.required.is_none());
    assert_eq!(result.allowed_keywords, expression_keywords());
}

#[test]
fn unmapped_position_falls_back_to_expression_keywords() {
    let mut b = DocumentBuilder::new();
    let root_range = b.token_range(0, 0, 0, 5, 0, 1);
    let root = b.branch(AstKind::Document, None, None, root_range);
    b.identifier(Some(root), Some(99), b.token_range(0, 0, 0, 1, 0, 1), "x", false);

    let map = b.finish();
    let active = locate_active_node(Position::new(0, 1), &map).unwrap().unwrap();

    let result = autocomplete(Some(&active));
    assert!(result.required.is_none());
    assert_eq!(result.allowed_keywords, expression_keywords());
}
