//! Position utilities (C2).
//!
//! Three-way comparison (before / on / after) of a caret against a token
//! range or an `XorNode`. The canonical convention (spec §3.3, reconciled
//! with the `≤`-vs-`<` inconsistency flagged in spec §9): a caret sitting
//! exactly at a token's start position is **before** that token (it hasn't
//! typed into it yet); a caret sitting exactly at a token's end position is
//! **after** it.

use crate::node::{AstNode, ContextNode, XorNode};
use crate::node_map::NodeIdMapCollection;
use pq_common::Position;

/// `caret` is before `pos`: strictly earlier line, or same line with
/// `caret.line_code_unit <= pos.line_code_unit`.
#[must_use]
pub fn is_before_position(caret: Position, pos: Position) -> bool {
    caret.line_number < pos.line_number
        || (caret.line_number == pos.line_number && caret.line_code_unit <= pos.line_code_unit)
}

/// `caret` is after `pos`: strictly later line, or same line with
/// `caret.line_code_unit > pos.line_code_unit`.
#[must_use]
pub fn is_after_position(caret: Position, pos: Position) -> bool {
    caret.line_number > pos.line_number
        || (caret.line_number == pos.line_number && caret.line_code_unit > pos.line_code_unit)
}

#[must_use]
pub fn is_before_ast(caret: Position, node: &AstNode) -> bool {
    is_before_position(caret, node.token_range.start)
}

#[must_use]
pub fn is_after_ast(caret: Position, node: &AstNode) -> bool {
    is_after_position(caret, node.token_range.end)
}

#[must_use]
pub fn is_on_ast(caret: Position, node: &AstNode) -> bool {
    !is_before_ast(caret, node) && !is_after_ast(caret, node)
}

/// For a context node with no tokens read yet, every caret is
/// simultaneously before/on/after (spec §3.3); callers that need a single
/// answer (the active-node locator) handle that case explicitly rather
/// than relying on these three functions disagreeing.
#[must_use]
pub fn is_before_context(caret: Position, node: &ContextNode) -> bool {
    match node.first_token {
        Some(pos) => is_before_position(caret, pos),
        None => false,
    }
}

#[must_use]
pub fn is_after_context(caret: Position, node: &ContextNode, map: &NodeIdMapCollection) -> bool {
    match map.right_most_leaf(node.id) {
        Some(leaf) => is_after_ast(caret, &leaf),
        None => false,
    }
}

#[must_use]
pub fn is_on_context(caret: Position, node: &ContextNode, map: &NodeIdMapCollection) -> bool {
    !is_before_context(caret, node) && !is_after_context(caret, node, map)
}

#[must_use]
pub fn is_before(caret: Position, xor: &XorNode, map: &NodeIdMapCollection) -> bool {
    match xor {
        XorNode::Ast(node) => is_before_ast(caret, node),
        XorNode::Context(node) => is_before_context(caret, node),
    }
}

#[must_use]
pub fn is_after(caret: Position, xor: &XorNode, map: &NodeIdMapCollection) -> bool {
    match xor {
        XorNode::Ast(node) => is_after_ast(caret, node),
        XorNode::Context(node) => is_after_context(caret, node, map),
    }
}

#[must_use]
pub fn is_on(caret: Position, xor: &XorNode, map: &NodeIdMapCollection) -> bool {
    !is_before(caret, xor, map) && !is_after(caret, xor, map)
}

/// A caret exactly on a context node's starting token position. Used by C7
/// (§4.7 step 1) to defer an autocomplete decision to the next outer pair.
#[must_use]
pub fn is_at_context_start(caret: Position, node: &ContextNode) -> bool {
    matches!(node.first_token, Some(pos) if caret == pos)
}

#[cfg(test)]
#[path = "../tests/position_tests.rs"]
mod tests;
