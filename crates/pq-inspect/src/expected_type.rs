//! The expected-type walker (C6, spec §4.6): what type the parser would
//! accept next at the caret, derived from a static `(parent_kind,
//! child_attribute_index) → slot` table walked root-to-leaf.
//!
//! Grounded in the same attribute-index conventions `pq-types::inspector`
//! dispatches on (§4.5) — a slot only appears here if the type inspector
//! also treats that exact `(kind, index)` pair as "this child's type flows
//! into the parent's type" or as a keyword-typed clause the grammar fixes
//! to a primitive/primary-type shape. The table is built once via
//! `std::sync::LazyLock`, the same pattern `pq-types::binop` uses for its
//! operator tables.

use std::sync::LazyLock;

use pq_syntax::{AstKind, XorNode};
use pq_types::{Primitive, Type};
use rustc_hash::FxHashMap;

use crate::active_node::{ActiveNode, LeafKind};

/// The widest typing constraint the parser places on the child occupying a
/// given `(parent_kind, attribute_index)` slot (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpectedSlot {
    /// Any expression is acceptable here.
    Expression,
    /// A `nullable`-qualifiable primitive type name.
    NullablePrimitive,
    /// A primary type (primitive, record/table/list/function type, or a
    /// type-valued expression).
    PrimaryType,
    /// A `Logical`-typed expression (an `if`'s condition).
    Logical,
    /// A bare literal constant (`true`/`false`/`null`/number/text).
    AnyLiteral,
    /// This slot does not take a type at all (a keyword constant, a
    /// separator, an identifier name being declared rather than read).
    NotApplicable,
}

pub(crate) type SlotTable = FxHashMap<(AstKind, u32), ExpectedSlot>;

static SLOT_TABLE: LazyLock<SlotTable> = LazyLock::new(build_slot_table);

/// Exposes the `(parent_kind, attribute_index) → slot` table this walker
/// builds so `crate::autocomplete` (C7) can classify the same grammar
/// positions without re-deriving them — the two walkers must never
/// disagree about which attribute indices are expression/type positions.
#[must_use]
pub fn slot_table() -> &'static SlotTable {
    &SLOT_TABLE
}

fn build_slot_table() -> SlotTable {
    use AstKind::{
        ArithmeticExpression, AsExpression, AsNullablePrimitiveType, AsType, Csv, EachExpression, EqualityExpression, ErrorHandlingExpression, FieldSpecification,
        FunctionExpression, FunctionType, GeneralizedIdentifierPairedExpression, IdentifierPairedExpression, IfExpression, IsExpression, IsNullablePrimitiveType,
        LetExpression, ListExpression, ListLiteral, ListType, LogicalExpression, MetadataExpression, NullablePrimitiveType, NullableType, OtherwiseExpression,
        ParenthesizedExpression, RecordExpression, RecordLiteral, RecordType, RelationalExpression, SectionMember, TableType, TypePrimaryType, UnaryExpression,
    };
    use ExpectedSlot::{AnyLiteral, Expression, Logical, NotApplicable, NullablePrimitive, PrimaryType};

    let mut table = SlotTable::default();
    let mut put = |kind: AstKind, index: u32, slot: ExpectedSlot| {
        table.insert((kind, index), slot);
    };

    for kind in [ArithmeticExpression, EqualityExpression, LogicalExpression, RelationalExpression] {
        put(kind, 0, Expression);
        put(kind, 2, Expression);
    }
    put(UnaryExpression, 1, Expression);

    put(IfExpression, 1, Logical);
    put(IfExpression, 3, Expression);
    put(IfExpression, 5, Expression);

    put(LetExpression, 3, Expression);
    put(EachExpression, 1, Expression);
    put(OtherwiseExpression, 1, Expression);
    put(ErrorHandlingExpression, 1, Expression);
    put(ParenthesizedExpression, 1, Expression);
    put(MetadataExpression, 0, Expression);
    put(MetadataExpression, 2, Expression);

    put(IdentifierPairedExpression, 2, Expression);
    put(GeneralizedIdentifierPairedExpression, 2, Expression);
    put(Csv, 0, Expression);

    put(RecordExpression, 1, Expression);
    put(RecordLiteral, 1, Expression);
    put(ListExpression, 1, Expression);
    put(ListLiteral, 1, Expression);

    put(FunctionExpression, 2, PrimaryType);
    put(FunctionExpression, 3, Expression);
    put(FieldSpecification, 2, PrimaryType);

    put(AsExpression, 2, PrimaryType);
    put(AsType, 1, PrimaryType);
    put(TypePrimaryType, 1, PrimaryType);
    put(IsExpression, 2, PrimaryType);

    put(AsNullablePrimitiveType, 1, NullablePrimitive);
    put(NullablePrimitiveType, 1, NullablePrimitive);
    put(NullableType, 1, PrimaryType);
    put(IsNullablePrimitiveType, 2, NullablePrimitive);

    put(FunctionType, 1, PrimaryType);
    put(RecordType, 1, PrimaryType);
    put(TableType, 1, PrimaryType);
    put(ListType, 1, PrimaryType);

    put(SectionMember, 3, Expression);

    // The keyword constants themselves (`if`, `then`, `else`, `let`, `in`,
    // `each`, separators) take no type.
    put(IfExpression, 0, NotApplicable);
    put(IfExpression, 2, NotApplicable);
    put(IfExpression, 4, NotApplicable);
    put(LetExpression, 0, NotApplicable);
    put(LetExpression, 2, NotApplicable);
    put(EachExpression, 0, NotApplicable);

    // Documented for completeness even though nothing currently queries a
    // bare-literal slot through this table; kept distinct from `Expression`
    // because a literal-only position never accepts an arbitrary expression.
    let _ = AnyLiteral;

    table
}

/// C6. Walks `active.ancestry` from the document root toward the leaf,
/// keeping the last non-`NotApplicable` slot seen and converting it to a
/// concrete `Type` at the end. `None` means the caret is in a position with
/// no established slot (e.g. a completed leaf's own interior, or at the
/// document root with no parent).
#[must_use]
pub fn expected_type(active: &ActiveNode) -> Option<Type> {
    let mut best: Option<ExpectedSlot> = None;
    // `ancestry` is leaf-to-root; walk it root-to-leaf per spec §4.6.
    for pair in active.ancestry.windows(2).rev() {
        let [child, parent]: &[XorNode; 2] = pair.try_into().expect("windows(2) yields 2-element slices");
        let Some(mut index) = child.attribute_index() else { continue };
        if active.leaf_kind == LeafKind::AfterAst && child.id() == active.ancestry[0].id() {
            index += 1;
        }
        if let Some(&slot) = SLOT_TABLE.get(&(parent.kind(), index))
            && slot != ExpectedSlot::NotApplicable
        {
            best = Some(slot);
        }
    }
    best.map(slot_to_type)
}

fn slot_to_type(slot: ExpectedSlot) -> Type {
    match slot {
        ExpectedSlot::Expression | ExpectedSlot::AnyLiteral => Type::any(),
        ExpectedSlot::NullablePrimitive => Type::primitive(Primitive::Any, true),
        ExpectedSlot::PrimaryType => Type::primitive(Primitive::Type, false),
        ExpectedSlot::Logical => Type::primitive(Primitive::Logical, false),
        ExpectedSlot::NotApplicable => Type::primitive(Primitive::Any, false),
    }
}

#[cfg(test)]
#[path = "../tests/expected_type_tests.rs"]
mod tests;
