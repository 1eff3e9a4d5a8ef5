//! The autocomplete resolver (C7, spec §4.7): what keyword the parser
//! would require or accept next at the caret.
//!
//! Two compile-time maps, built once via `std::sync::LazyLock` the same
//! way `pq-types::binop` and `crate::expected_type` build their static
//! lookup tables: a `ConstantMap` naming the single mandatory keyword a
//! `(parent_kind, attribute_index)` slot requires (the grammar's fixed
//! constants — `if`/`then`/`else`, `let`/`in`, …), and an `ExpressionMap`
//! giving the keyword *set* an expression- or type-typed slot accepts,
//! reusing `crate::expected_type`'s slot classification so the two walkers
//! never disagree about which attribute indices are expression positions.

use std::sync::LazyLock;

use pq_syntax::{AstKind, XorNode};
use rustc_hash::FxHashMap;

use crate::active_node::{ActiveNode, LeafKind};
use crate::expected_type::ExpectedSlot;
use crate::keyword::{expression_keywords, type_keywords, Keyword};

/// C7's result (spec §4.7 / §6.3's `autocomplete` field).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Autocomplete {
    pub required: Option<String>,
    pub allowed_keywords: Vec<Keyword>,
}

impl Autocomplete {
    fn required(text: &'static str) -> Self {
        Self { required: Some(text.to_string()), allowed_keywords: Vec::new() }
    }

    fn allowed(keywords: Vec<Keyword>) -> Self {
        Self { required: None, allowed_keywords: keywords }
    }

    fn suppressed() -> Self {
        Self { required: None, allowed_keywords: Vec::new() }
    }

    fn expression_position() -> Self {
        Self::allowed(expression_keywords())
    }
}

type ConstantMap = FxHashMap<(AstKind, u32), &'static str>;
type ExpressionMap = FxHashMap<(AstKind, u32), ExpectedSlot>;

static CONSTANT_MAP: LazyLock<ConstantMap> = LazyLock::new(build_constant_map);
static EXPRESSION_MAP: LazyLock<ExpressionMap> = LazyLock::new(build_expression_map);

fn build_constant_map() -> ConstantMap {
    use AstKind::{
        AsExpression, AsNullablePrimitiveType, AsType, EachExpression, ErrorHandlingExpression, ErrorRaisingExpression, IfExpression, IsExpression,
        IsNullablePrimitiveType, LetExpression, MetadataExpression, NullablePrimitiveType, NullableType, OtherwiseExpression, Section,
    };

    let mut table = ConstantMap::default();
    let mut put = |kind: AstKind, index: u32, text: &'static str| {
        table.insert((kind, index), text);
    };

    put(IfExpression, 0, "if");
    put(IfExpression, 2, "then");
    put(IfExpression, 4, "else");
    put(LetExpression, 0, "let");
    put(LetExpression, 2, "in");
    put(EachExpression, 0, "each");
    put(ErrorHandlingExpression, 0, "try");
    put(OtherwiseExpression, 0, "otherwise");
    put(ErrorRaisingExpression, 0, "error");
    put(AsExpression, 1, "as");
    put(AsType, 0, "as");
    put(IsExpression, 1, "is");
    put(NullableType, 0, "nullable");
    put(NullablePrimitiveType, 0, "nullable");
    put(AsNullablePrimitiveType, 0, "as");
    put(IsNullablePrimitiveType, 0, "is");
    put(IsNullablePrimitiveType, 1, "nullable");
    put(MetadataExpression, 1, "meta");
    put(Section, 0, "section");

    table
}

/// Reuses `crate::expected_type`'s slot table (the same `(parent_kind,
/// attribute_index)` pairs this resolver needs the keyword vocabulary
/// for) rather than duplicating it — the two walkers are grounded in the
/// identical grammar positions, just converting the hit to a different
/// result shape (spec §4.6 vs §4.7).
fn build_expression_map() -> ExpressionMap {
    crate::expected_type::slot_table().clone()
}

/// C7. `active` is `None` for an empty document, which defaults to
/// expression position (spec §4.7: "the document starts in expression
/// position").
#[must_use]
pub fn autocomplete(active: Option<&ActiveNode>) -> Autocomplete {
    let Some(active) = active else {
        return Autocomplete::expression_position();
    };
    if active.ancestry.is_empty() {
        return Autocomplete::expression_position();
    }

    for idx in 0..active.ancestry.len() {
        let child = &active.ancestry[idx];
        let Some(parent) = active.ancestry.get(idx + 1) else { continue };

        // Step 1: a context parent whose start coincides exactly with the
        // caret defers the decision to the next outer pair.
        if let Some(ctx) = parent.as_context()
            && pq_syntax::position::is_at_context_start(active.position, ctx)
        {
            continue;
        }

        // Step 2: the invoke-expression edge case takes priority.
        if let Some(result) = invoke_edge_case(child, parent, active.ancestry.get(idx + 2), active.ancestry.get(idx + 3)) {
            return result;
        }

        let Some(mut index) = child.attribute_index() else { continue };
        if active.leaf_kind == LeafKind::AfterAst && idx == 0 {
            index += 1;
        }

        if let Some(&text) = CONSTANT_MAP.get(&(parent.kind(), index)) {
            return Autocomplete::required(text);
        }
        if let Some(&slot) = EXPRESSION_MAP.get(&(parent.kind(), index))
            && slot != ExpectedSlot::NotApplicable
        {
            return Autocomplete::allowed(slot_keywords(slot));
        }
    }

    Autocomplete::expression_position()
}

/// spec §4.7 step 2: inside a *call's* argument `Csv` specifically (its
/// grandparent is an `ArrayWrapper` owned by an `InvokeExpression`),
/// autocomplete is suppressed immediately after the separating comma
/// (attribute index 1); the element slot itself (attribute index 0) falls
/// through to the ordinary `Expression` treatment already in
/// `EXPRESSION_MAP`. A `Csv` comma in a list/record/parameter list is
/// unaffected — this edge case is scoped to invocations only.
fn invoke_edge_case(child: &XorNode, parent: &XorNode, grandparent: Option<&XorNode>, great_grandparent: Option<&XorNode>) -> Option<Autocomplete> {
    if parent.kind() != AstKind::Csv || child.attribute_index() != Some(1) {
        return None;
    }
    let is_invoke_argument = grandparent.is_some_and(|n| n.kind() == AstKind::ArrayWrapper) && great_grandparent.is_some_and(|n| n.kind() == AstKind::InvokeExpression);
    if !is_invoke_argument {
        return None;
    }
    Some(Autocomplete::suppressed())
}

fn slot_keywords(slot: ExpectedSlot) -> Vec<Keyword> {
    match slot {
        ExpectedSlot::Expression | ExpectedSlot::Logical | ExpectedSlot::AnyLiteral => expression_keywords(),
        ExpectedSlot::PrimaryType | ExpectedSlot::NullablePrimitive => type_keywords(),
        ExpectedSlot::NotApplicable => Vec::new(),
    }
}

#[cfg(test)]
#[path = "../tests/autocomplete_tests.rs"]
mod tests;
