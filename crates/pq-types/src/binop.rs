//! Binary-operator lookup tables (spec §4.5.2).
//!
//! Built once as immutable module-level state — there is nothing
//! per-document about "what does `number + number` produce", so there is no
//! reason to rebuild the table on every inspection call.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::primitive::Primitive;
use crate::type_value::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Concatenate,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

impl BinOp {
    /// Maps the grammar's operator payload (§4.5.2) onto the subset that
    /// dispatches through these tables. `None` for unary-only operators
    /// (`not`, unary `+`/`-`) which never reach a binary-like node.
    #[must_use]
    pub const fn from_operator_kind(kind: pq_syntax::OperatorKind) -> Option<Self> {
        use pq_syntax::OperatorKind;
        match kind {
            OperatorKind::Add => Some(BinOp::Add),
            OperatorKind::Subtract => Some(BinOp::Subtract),
            OperatorKind::Multiply => Some(BinOp::Multiply),
            OperatorKind::Divide => Some(BinOp::Divide),
            OperatorKind::Concatenate => Some(BinOp::Concatenate),
            OperatorKind::Equal => Some(BinOp::Equal),
            OperatorKind::NotEqual => Some(BinOp::NotEqual),
            OperatorKind::LessThan => Some(BinOp::LessThan),
            OperatorKind::LessThanOrEqual => Some(BinOp::LessThanOrEqual),
            OperatorKind::GreaterThan => Some(BinOp::GreaterThan),
            OperatorKind::GreaterThanOrEqual => Some(BinOp::GreaterThanOrEqual),
            OperatorKind::And => Some(BinOp::And),
            OperatorKind::Or => Some(BinOp::Or),
            OperatorKind::Not | OperatorKind::UnaryPlus | OperatorKind::UnaryMinus => None,
        }
    }
}

/// `(operator, left, right) -> result`, for when both operand primitives
/// are known.
pub static BIN_OP_LOOKUP: LazyLock<FxHashMap<(BinOp, Primitive, Primitive), Primitive>> = LazyLock::new(build_full_lookup);

/// `(operator, left) -> {right kinds the full table accepts}`. Derived
/// mechanically from [`BIN_OP_LOOKUP`] (spec §4.5.2: "`BinOpPartialLookup`
/// ... derived mechanically from `BinOpLookup`") rather than hand-maintained,
/// so the testable property "`R` is partial-reachable from `(L,op)` iff
/// `(L,op,R)` is in the full table" holds by construction.
pub static BIN_OP_PARTIAL_LOOKUP: LazyLock<FxHashMap<(BinOp, Primitive), Vec<Primitive>>> = LazyLock::new(build_partial_lookup);

const ARITHMETIC: [BinOp; 4] = [BinOp::Add, BinOp::Subtract, BinOp::Multiply, BinOp::Divide];
const RELATIONAL: [BinOp; 4] = [BinOp::LessThan, BinOp::LessThanOrEqual, BinOp::GreaterThan, BinOp::GreaterThanOrEqual];
const EQUALITY: [BinOp; 2] = [BinOp::Equal, BinOp::NotEqual];
const LOGICAL: [BinOp; 2] = [BinOp::And, BinOp::Or];

fn build_full_lookup() -> FxHashMap<(BinOp, Primitive, Primitive), Primitive> {
    let mut table = FxHashMap::default();

    for op in ARITHMETIC {
        table.insert((op, Primitive::Number, Primitive::Number), Primitive::Number);
    }
    table.insert((BinOp::Add, Primitive::Date, Primitive::Duration), Primitive::Date);
    table.insert((BinOp::Add, Primitive::Duration, Primitive::Date), Primitive::Date);
    table.insert((BinOp::Subtract, Primitive::Date, Primitive::Duration), Primitive::Date);
    table.insert((BinOp::Subtract, Primitive::Date, Primitive::Date), Primitive::Duration);
    table.insert((BinOp::Add, Primitive::DateTime, Primitive::Duration), Primitive::DateTime);
    table.insert((BinOp::Subtract, Primitive::DateTime, Primitive::Duration), Primitive::DateTime);
    table.insert((BinOp::Subtract, Primitive::DateTime, Primitive::DateTime), Primitive::Duration);
    table.insert((BinOp::Add, Primitive::Time, Primitive::Duration), Primitive::Time);
    table.insert((BinOp::Subtract, Primitive::Time, Primitive::Duration), Primitive::Time);
    table.insert((BinOp::Add, Primitive::Duration, Primitive::Duration), Primitive::Duration);
    table.insert((BinOp::Subtract, Primitive::Duration, Primitive::Duration), Primitive::Duration);
    table.insert((BinOp::Multiply, Primitive::Duration, Primitive::Number), Primitive::Duration);
    table.insert((BinOp::Multiply, Primitive::Number, Primitive::Duration), Primitive::Duration);
    table.insert((BinOp::Divide, Primitive::Duration, Primitive::Number), Primitive::Duration);

    table.insert((BinOp::Concatenate, Primitive::Text, Primitive::Text), Primitive::Text);
    table.insert((BinOp::Concatenate, Primitive::Binary, Primitive::Binary), Primitive::Binary);
    // Spec §4.5.3 row 1: two unextended record/table primitives concatenate
    // to the same bare primitive (the structurally-known union lives in
    // `pq_types::union::union_types`, consulted only once either side is
    // more than a bare primitive).
    table.insert((BinOp::Concatenate, Primitive::Record, Primitive::Record), Primitive::Record);
    table.insert((BinOp::Concatenate, Primitive::Table, Primitive::Table), Primitive::Table);

    for op in LOGICAL {
        table.insert((op, Primitive::Logical, Primitive::Logical), Primitive::Logical);
    }

    let comparable = [
        Primitive::Number,
        Primitive::Text,
        Primitive::Date,
        Primitive::DateTime,
        Primitive::DateTimeZone,
        Primitive::Time,
        Primitive::Duration,
        Primitive::Logical,
    ];
    for &primitive in &comparable {
        for op in RELATIONAL {
            table.insert((op, primitive, primitive), Primitive::Logical);
        }
    }
    // Equality is defined over every primitive pairing of the same kind,
    // including ones relational ordering doesn't cover (`null`, `binary`).
    for &primitive in &[
        Primitive::Number,
        Primitive::Text,
        Primitive::Date,
        Primitive::DateTime,
        Primitive::DateTimeZone,
        Primitive::Time,
        Primitive::Duration,
        Primitive::Logical,
        Primitive::Binary,
        Primitive::None,
    ] {
        for op in EQUALITY {
            table.insert((op, primitive, primitive), Primitive::Logical);
        }
    }
    table
}

/// Mechanically derives [`BIN_OP_PARTIAL_LOOKUP`] from [`BIN_OP_LOOKUP`]:
/// group every full-table entry's right operand under its `(op, left)` key.
fn build_partial_lookup() -> FxHashMap<(BinOp, Primitive), Vec<Primitive>> {
    let mut table: FxHashMap<(BinOp, Primitive), Vec<Primitive>> = FxHashMap::default();
    for &(op, left, right) in BIN_OP_LOOKUP.keys() {
        let entry = table.entry((op, left)).or_default();
        if !entry.contains(&right) {
            entry.push(right);
        }
    }
    table
}

/// Resolves a binary operator over two operand types. `Any` on either side
/// is absorbing (spec §4.5: `any` participates in every operator and
/// produces `any`); an unrecognised combination degrades to `Unknown`
/// rather than failing the whole inspection. When `right` is `None` (the
/// right operand hasn't been typed yet) and every right-kind the partial
/// table allows for `(op, left)` agrees on the same result, that result is
/// returned; an ambiguous partial match degrades to `Unknown` rather than
/// guessing.
#[must_use]
pub fn apply_binop(op: BinOp, left: &Type, right: Option<&Type>) -> Type {
    if left.is_any() || right.is_some_and(Type::is_any) {
        return Type::any();
    }
    let Type::Primitive(left_primitive) = left else {
        return Type::Unknown;
    };
    match right {
        Some(Type::Primitive(right_primitive)) => BIN_OP_LOOKUP
            .get(&(op, left_primitive.primitive, right_primitive.primitive))
            .map_or(Type::Unknown, |result| Type::primitive(*result, left_primitive.is_nullable || right_primitive.is_nullable)),
        Some(_) | None => {
            let Some(candidates) = BIN_OP_PARTIAL_LOOKUP.get(&(op, left_primitive.primitive)) else {
                return Type::Unknown;
            };
            let results: Vec<Primitive> = candidates
                .iter()
                .filter_map(|&r| BIN_OP_LOOKUP.get(&(op, left_primitive.primitive, r)).copied())
                .collect();
            match results.first() {
                Some(&first) if results.iter().all(|&r| r == first) => Type::primitive(first, left_primitive.is_nullable),
                _ => Type::Unknown,
            }
        }
    }
}

/// The set of right-operand primitives a partial expression like `1 +`
/// would accept, given the operator and the left operand's primitive
/// (spec §4.5.2's "partial expressions" rule, consumed by C6's
/// expected-type walker). Empty when the operator/left pairing is never
/// valid.
#[must_use]
pub fn allowed_right_operands(op: BinOp, left: Primitive) -> Vec<Primitive> {
    BIN_OP_PARTIAL_LOOKUP.get(&(op, left)).cloned().unwrap_or_default()
}

/// The expected type of the not-yet-parsed right operand of a partial
/// binary expression: the single allowed right-operand kind if unique,
/// else an `AnyUnion` of all the allowed kinds. `None` if the operator/left
/// pairing accepts nothing.
///
/// Spec §4.5.2's prose and its own end-to-end scenario 5 disagree on
/// `number +`: the prose's per-operator table lists only `{Number}` as the
/// right operand `+` accepts against a `Number` left side, while scenario 5
/// narrates `{Number, Duration}`. This follows the per-operator table (the
/// normative rule `BinOpPartialLookup` is derived from), so `expected_right_operand_type(Add, Number)`
/// here returns a single `Number?` rather than scenario 5's `AnyUnion(Number?, Duration?)`.
#[must_use]
pub fn expected_right_operand_type(op: BinOp, left: Primitive) -> Option<Type> {
    let mut candidates = allowed_right_operands(op, left);
    candidates.sort();
    match candidates.len() {
        0 => None,
        1 => Some(Type::primitive(candidates[0], true)),
        _ => Some(Type::AnyUnion(candidates.into_iter().map(|p| Type::primitive(p, true)).collect())),
    }
}

#[cfg(test)]
#[path = "../tests/binop_tests.rs"]
mod tests;
