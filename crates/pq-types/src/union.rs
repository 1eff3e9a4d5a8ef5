//! Record/table union (`&`) and field access semantics (spec §4.5.1, §4.5.3).

use pq_common::Atom;

use crate::primitive::Primitive;
use crate::type_value::{FieldMap, Type};

/// `left & right` over two record (or two table) shapes: fields from
/// `right` win on name collision, exactly as a later assignment would.
/// The union is open iff either side is (an open record stays open no
/// matter what it's unioned with).
#[must_use]
pub fn union_field_maps(left: &FieldMap, right: &FieldMap) -> FieldMap {
    let mut merged = left.clone();
    merged.is_open = left.is_open || right.is_open;
    for (name, field_type) in &right.fields {
        merged.fields.insert(*name, field_type.clone());
    }
    merged
}

/// `left & right` at the `Type` level (spec §4.5.3, the special case `&`
/// falls into when either operand is a record/table/list rather than a
/// plain primitive `BinOpLookup` can resolve on its own). Record unions
/// with record, table with table, list concatenates with list (positional
/// append, the same way two list literals spliced together would read).
/// A bare `record`/`table` primitive opposite a structurally-known shape of
/// the same kind takes spec §4.5.3 row 2 ("exactly one extended ⇒ the
/// extended one with `is_open := true`"); mismatched kinds (a `DefinedRecord`
/// against a bare `table`, say) never reach here because the binary-like
/// dispatch in `pq_types::inspector` only routes here once it has already
/// confirmed both sides are record/table/list-shaped of the same family.
#[must_use]
pub fn union_types(left: &Type, right: &Type) -> Type {
    match (left, right) {
        (Type::DefinedRecord(a), Type::DefinedRecord(b)) => Type::DefinedRecord(union_field_maps(a, b)),
        (Type::DefinedTable(a), Type::DefinedTable(b)) => Type::DefinedTable(union_field_maps(a, b)),
        (Type::RecordType(a), Type::RecordType(b)) => Type::RecordType(union_field_maps(a, b)),
        (Type::TableType(a), Type::TableType(b)) => Type::TableType(union_field_maps(a, b)),
        (Type::DefinedList(a), Type::DefinedList(b)) => Type::DefinedList(a.iter().chain(b).cloned().collect()),
        (extended, bare) if is_bare_record_or_table_matching(bare, extended) => open_extended(extended),
        (bare, extended) if is_bare_record_or_table_matching(bare, extended) => open_extended(extended),
        _ if left.is_any() || right.is_any() => Type::any(),
        _ => Type::Unknown,
    }
}

/// Whether `bare` is the unextended `record`/`table` primitive matching
/// `extended`'s kind (spec §4.5.3 row 2's "exactly one extended" pairing).
fn is_bare_record_or_table_matching(bare: &Type, extended: &Type) -> bool {
    match (bare_record_or_table_kind(bare), extended_record_or_table_kind(extended)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// The bare primitive kind (`record` or `table`, unextended) `value` is, if any.
fn bare_record_or_table_kind(value: &Type) -> Option<Primitive> {
    match value {
        Type::Primitive(p) if matches!(p.primitive, Primitive::Record | Primitive::Table) => Some(p.primitive),
        _ => None,
    }
}

/// The bare primitive kind a structurally-known shape corresponds to, for
/// matching against [`bare_record_or_table_kind`]'s opposite operand.
fn extended_record_or_table_kind(value: &Type) -> Option<Primitive> {
    match value {
        Type::DefinedRecord(_) | Type::RecordType(_) => Some(Primitive::Record),
        Type::DefinedTable(_) | Type::TableType(_) => Some(Primitive::Table),
        _ => None,
    }
}

/// Forces a structurally-known record/table shape open (spec §4.5.3 row 2:
/// unioning with a bare `record`/`table` widens the known shape to admit
/// fields the bare side might carry that the extended side never declared).
fn open_extended(value: &Type) -> Type {
    match value {
        Type::DefinedRecord(fields) => Type::DefinedRecord(opened(fields)),
        Type::DefinedTable(fields) => Type::DefinedTable(opened(fields)),
        Type::RecordType(fields) => Type::RecordType(opened(fields)),
        Type::TableType(fields) => Type::TableType(opened(fields)),
        other => other.clone(),
    }
}

fn opened(fields: &FieldMap) -> FieldMap {
    let mut fields = fields.clone();
    fields.is_open = true;
    fields
}

/// Whether `value` is one of the extended shapes [`union_types`] knows how
/// to combine with `&`. The binary-like dispatch consults this before
/// routing to [`union_types`] instead of the primitive `BinOpLookup`, so a
/// record `&` a number (not one of these shapes) still degrades through
/// the ordinary primitive path to `Unknown` rather than silently matching
/// `union_types`'s catch-all.
#[must_use]
pub fn is_concatenable_extended(value: &Type) -> bool {
    matches!(
        value,
        Type::DefinedRecord(_) | Type::DefinedTable(_) | Type::RecordType(_) | Type::TableType(_) | Type::DefinedList(_)
    )
}

/// Whether `value` is a bare `record`/`table` primitive — the unextended
/// half of spec §4.5.3 row 2's "exactly one extended" pairing, and (when
/// matched against another bare `record`/`table` of the same kind) row 1's
/// "both unextended" pairing, which `pq_types::binop::BIN_OP_LOOKUP` now
/// carries directly.
#[must_use]
pub fn is_bare_record_or_table(value: &Type) -> bool {
    bare_record_or_table_kind(value).is_some()
}

/// The result of `record[field]` (a selector): the field's type if present,
/// `Unknown` for an open record/table missing that field, `None` (meaning
/// "not applicable here") for a closed shape that definitely lacks it.
#[must_use]
pub fn select_field(fields: &FieldMap, name: Atom) -> Option<Type> {
    match fields.fields.get(&name) {
        Some(field_type) => Some(field_type.clone()),
        None if fields.is_open => Some(Type::Unknown),
        None => None,
    }
}

/// `record[[field]]` (a projection): the same lookup, wrapped back into a
/// single-field record rather than unwrapped to the field's own type.
#[must_use]
pub fn project_fields(fields: &FieldMap, names: &[Atom]) -> FieldMap {
    let mut projected = FieldMap::new(fields.is_open);
    for &name in names {
        let field_type = select_field(fields, name).unwrap_or(Type::Unknown);
        projected.fields.insert(name, field_type);
    }
    projected
}

/// Field access dispatch over the types that can appear on the left of a
/// `[...]`/`[[...]]` access (spec §4.5.1): `any`/`unknown` tolerate any
/// field name and answer `unknown`; everything else delegates to the field
/// map it wraps, or has none to offer.
#[must_use]
pub fn field_map_of(value: &Type) -> Option<&FieldMap> {
    match value {
        Type::DefinedRecord(fields) | Type::DefinedTable(fields) | Type::RecordType(fields) | Type::TableType(fields) | Type::PrimaryExpressionTable(fields) => Some(fields),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/union_tests.rs"]
mod tests;
