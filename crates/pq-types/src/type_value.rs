//! The structural type lattice (spec §3.6).
//!
//! `Type` mirrors the grammar's own split between "a value of a shape" and
//! "a type literal naming that shape": a record literal typechecks to
//! `DefinedRecord`, while `type [a = number]` typechecks to `RecordType` —
//! same field-map shape, different variant, because one is assignable
//! *as a value* and the other names a type in `as`/`is` position.

use indexmap::IndexMap;
use pq_common::Atom;

use crate::primitive::{Primitive, PrimitiveType};

/// A record/table/list's known fields, in declaration order. `is_open`
/// tracks a trailing `, ...}` — an open record/table permits fields beyond
/// the ones listed (so field access against an unknown name degrades to
/// `Unknown` instead of being rejected).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMap {
    pub fields: IndexMap<Atom, Type>,
    pub is_open: bool,
}

impl FieldMap {
    #[must_use]
    pub fn new(is_open: bool) -> Self {
        Self { fields: IndexMap::new(), is_open }
    }
}

/// One parameter in a function value or function type.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParameterType {
    pub name: Atom,
    pub parameter_type: Type,
    pub is_optional: bool,
    pub is_nullable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub parameters: Vec<FunctionParameterType>,
    pub return_type: Box<Type>,
}

/// The structural type lattice C5 produces for every node (spec §3.6).
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// An ordinary scalar value, e.g. a number or text literal.
    Primitive(PrimitiveType),
    /// The join of two or more mutually incompatible branches (an
    /// `if`/`otherwise` whose arms disagree, for instance). Never contains
    /// another `AnyUnion` — [`crate::union::union_types`] flattens as it goes.
    AnyUnion(Vec<Type>),
    /// A record literal's (or dereferenced record binding's) known shape.
    DefinedRecord(FieldMap),
    /// A table literal's known column shape.
    DefinedTable(FieldMap),
    /// A list literal's element types, positional (spec leaves "is this
    /// list homogeneous" as a question for the caller, not this layer).
    DefinedList(Vec<Type>),
    /// A function value's signature.
    DefinedFunction(FunctionSignature),
    /// `type {T}` — a list *type*, naming the element type.
    ListType(Box<Type>),
    /// `type [a = number, ...]` — a record *type*.
    RecordType(FieldMap),
    /// `type table [a = number, ...]` — a table *type*.
    TableType(FieldMap),
    /// `type function (x as number) as number` — a function *type*.
    FunctionType(FunctionSignature),
    /// A bare primitive keyword used as a type value, e.g. `type number`.
    PrimaryPrimitiveType(Primitive),
    /// The type produced by a `type` primary expression wrapping another
    /// type value, e.g. `type (type number)`.
    DefinedType(Box<Type>),
    /// A table shape whose columns were inferred from a primary expression
    /// rather than declared (e.g. `#table({"a"}, {{1}})`).
    PrimaryExpressionTable(FieldMap),
    /// The inspector could not determine a type (an unresolved identifier,
    /// a malformed slot).
    Unknown,
    /// Statically impossible (spec §3.6's bottom type): the `null` literal's
    /// own type (assignable only into a nullable slot, see `is_subtype_of`),
    /// and what a genuine type mismatch (e.g. `RangeExpression` over
    /// incompatible operands) degrades to instead of `Unknown`.
    None,
}

impl Type {
    #[must_use]
    pub fn any() -> Self {
        Type::Primitive(PrimitiveType::non_nullable(Primitive::Any))
    }

    #[must_use]
    pub fn primitive(primitive: Primitive, is_nullable: bool) -> Self {
        Type::Primitive(PrimitiveType::new(primitive, is_nullable))
    }

    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveType { primitive: Primitive::Any, .. }))
    }

    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    /// Structural subtyping used by assignability checks (SPEC_FULL §10.3):
    /// `any` accepts everything, everything accepts `unknown` defensively,
    /// and two field maps are compatible when every field the narrower one
    /// declares is present and subtype-compatible in the wider one (or the
    /// wider one is open).
    #[must_use]
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        if other.is_any() || self.is_unknown() || other.is_unknown() {
            return true;
        }
        match (self, other) {
            (Type::Primitive(a), Type::Primitive(b)) => a.primitive == b.primitive && (!a.is_nullable || b.is_nullable),
            (Type::None, Type::Primitive(b)) => b.is_nullable,
            (Type::DefinedRecord(a), Type::DefinedRecord(b)) | (Type::DefinedTable(a), Type::DefinedTable(b)) => fields_are_subtype_compatible(a, b),
            (Type::RecordType(a), Type::RecordType(b)) | (Type::TableType(a), Type::TableType(b)) => fields_are_subtype_compatible(a, b),
            (Type::ListType(a), Type::ListType(b)) => a.is_subtype_of(b),
            (Type::DefinedFunction(a), Type::DefinedFunction(b)) | (Type::FunctionType(a), Type::FunctionType(b)) => {
                a.parameters.len() == b.parameters.len() && a.return_type.is_subtype_of(&b.return_type)
            }
            (Type::PrimaryPrimitiveType(a), Type::PrimaryPrimitiveType(b)) => a == b,
            _ => self == other,
        }
    }

    /// A short human-readable rendering (SPEC_FULL §10.3), used by hover/
    /// quick-info style callers; not the canonical M type syntax printer.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Type::Primitive(p) => {
                if p.is_nullable {
                    format!("nullable {}", p.primitive.display_name())
                } else {
                    p.primitive.display_name().to_string()
                }
            }
            Type::AnyUnion(branches) => branches.iter().map(Type::display_name).collect::<Vec<_>>().join(" | "),
            Type::DefinedRecord(_) => "record".to_string(),
            Type::DefinedTable(_) => "table".to_string(),
            Type::DefinedList(_) => "list".to_string(),
            Type::DefinedFunction(_) => "function".to_string(),
            Type::ListType(inner) => format!("type {{{}}}", inner.display_name()),
            Type::RecordType(_) => "type record".to_string(),
            Type::TableType(_) => "type table".to_string(),
            Type::FunctionType(_) => "type function".to_string(),
            Type::PrimaryPrimitiveType(p) => format!("type {}", p.display_name()),
            Type::DefinedType(inner) => format!("type ({})", inner.display_name()),
            Type::PrimaryExpressionTable(_) => "table".to_string(),
            Type::Unknown => "unknown".to_string(),
            Type::None => "none".to_string(),
        }
    }
}

fn fields_are_subtype_compatible(narrower: &FieldMap, wider: &FieldMap) -> bool {
    for (name, narrower_type) in &narrower.fields {
        match wider.fields.get(name) {
            Some(wider_type) => {
                if !narrower_type.is_subtype_of(wider_type) {
                    return false;
                }
            }
            None if wider.is_open => continue,
            None => return false,
        }
    }
    true
}

#[cfg(test)]
#[path = "../tests/type_value_tests.rs"]
mod tests;
