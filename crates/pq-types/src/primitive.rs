//! The primitive scalar kinds (spec §3.6) and the nullable bit every
//! ordinary value carries alongside one.
//!
//! `Primitive` is deliberately a superset of [`pq_syntax::ConstantKind`]:
//! the grammar's `Constant`/`PrimitiveType` nodes never spell `none` or
//! `unknown`, but the type lattice needs both — `None` for the `null`
//! keyword *constant* (§4.5's `Constant` dispatch arm; see
//! `from_constant_kind`) and `Unknown` for a field/value the inspector
//! could not pin down.
//!
//! `Null` is the separate primitive spec §3.6 lists alongside `None`: it's
//! the type of a `null` value *literal* (`LiteralExpression` wrapping
//! `LiteralKind::Null`), always nullable, and distinct from the bottom
//! `None`/`Type::None` a statically-impossible expression degrades to.

use pq_syntax::ConstantKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Primitive {
    Action,
    Any,
    AnyNonNull,
    Binary,
    Date,
    DateTime,
    DateTimeZone,
    Duration,
    Function,
    List,
    Logical,
    /// The `null` value literal's own type (always nullable); distinct from
    /// the `None` bottom the `null` keyword *constant* maps to.
    Null,
    Number,
    Record,
    Table,
    Text,
    Time,
    Type,
    /// The `null` keyword constant's type, not the `Null` value-literal
    /// primitive above.
    None,
    Unknown,
}

impl Primitive {
    /// `ConstantKind::Null` maps to `Primitive::None`, not `Primitive::Null`
    /// — the grammar's `Constant` vocabulary names the keyword, which the
    /// type lattice treats as the statically-impossible bottom, while
    /// `Primitive::Null` is reserved for the `null` value literal (spec
    /// §4.5's two distinct dispatch arms).
    #[must_use]
    pub const fn from_constant_kind(kind: ConstantKind) -> Self {
        match kind {
            ConstantKind::Action => Primitive::Action,
            ConstantKind::Any => Primitive::Any,
            ConstantKind::AnyNonNull => Primitive::AnyNonNull,
            ConstantKind::Binary => Primitive::Binary,
            ConstantKind::Date => Primitive::Date,
            ConstantKind::DateTime => Primitive::DateTime,
            ConstantKind::DateTimeZone => Primitive::DateTimeZone,
            ConstantKind::Duration => Primitive::Duration,
            ConstantKind::Function => Primitive::Function,
            ConstantKind::List => Primitive::List,
            ConstantKind::Logical => Primitive::Logical,
            ConstantKind::Null => Primitive::None,
            ConstantKind::Number => Primitive::Number,
            ConstantKind::Record => Primitive::Record,
            ConstantKind::Table => Primitive::Table,
            ConstantKind::Text => Primitive::Text,
            ConstantKind::Time => Primitive::Time,
            ConstantKind::Type => Primitive::Type,
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Primitive::Action => "action",
            Primitive::Any => "any",
            Primitive::AnyNonNull => "anynonnull",
            Primitive::Binary => "binary",
            Primitive::Date => "date",
            Primitive::DateTime => "datetime",
            Primitive::DateTimeZone => "datetimezone",
            Primitive::Duration => "duration",
            Primitive::Function => "function",
            Primitive::List => "list",
            Primitive::Logical => "logical",
            Primitive::Number => "number",
            Primitive::Record => "record",
            Primitive::Table => "table",
            Primitive::Text => "text",
            Primitive::Time => "time",
            Primitive::Type => "type",
            Primitive::Null => "null",
            Primitive::None => "none",
            Primitive::Unknown => "unknown",
        }
    }
}

/// A primitive value type with its nullable bit (spec §3.6: "Primitive ×
/// nullable"). `none` and `any` are never meaningfully nullable; callers
/// that build one directly are responsible for that invariant, the way the
/// grammar itself never emits `nullable none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PrimitiveType {
    pub primitive: Primitive,
    pub is_nullable: bool,
}

impl PrimitiveType {
    #[must_use]
    pub const fn new(primitive: Primitive, is_nullable: bool) -> Self {
        Self { primitive, is_nullable }
    }

    #[must_use]
    pub const fn non_nullable(primitive: Primitive) -> Self {
        Self::new(primitive, false)
    }
}

#[cfg(test)]
#[path = "../tests/primitive_tests.rs"]
mod tests;
