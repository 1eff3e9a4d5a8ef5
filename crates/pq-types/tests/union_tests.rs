use pq_common::Interner;
use pq_types::{field_map_of, project_fields, select_field, union_field_maps, union_types, FieldMap, Primitive, Type};

#[test]
fn the_right_side_wins_on_a_field_name_collision() {
    let mut interner = Interner::new();
    let a = interner.intern("a");

    let mut left = FieldMap::new(false);
    left.fields.insert(a, Type::primitive(Primitive::Number, false));
    let mut right = FieldMap::new(false);
    right.fields.insert(a, Type::primitive(Primitive::Text, false));

    let merged = union_field_maps(&left, &right);
    assert_eq!(merged.fields.get(&a), Some(&Type::primitive(Primitive::Text, false)));
}

#[test]
fn unioning_with_an_open_record_stays_open() {
    let left = FieldMap::new(true);
    let right = FieldMap::new(false);
    assert!(union_field_maps(&left, &right).is_open);
    assert!(union_field_maps(&right, &left).is_open);
}

#[test]
fn selecting_a_missing_field_on_a_closed_record_yields_nothing() {
    let fields = FieldMap::new(false);
    let mut interner = Interner::new();
    assert_eq!(select_field(&fields, interner.intern("missing")), None);
}

#[test]
fn selecting_a_missing_field_on_an_open_record_yields_unknown() {
    let fields = FieldMap::new(true);
    let mut interner = Interner::new();
    assert_eq!(select_field(&fields, interner.intern("missing")), Some(Type::Unknown));
}

#[test]
fn projection_wraps_each_looked_up_field_back_into_a_record() {
    let mut interner = Interner::new();
    let a = interner.intern("a");
    let mut fields = FieldMap::new(false);
    fields.fields.insert(a, Type::primitive(Primitive::Number, false));

    let projected = project_fields(&fields, &[a]);
    assert_eq!(projected.fields.get(&a), Some(&Type::primitive(Primitive::Number, false)));
}

#[test]
fn two_bare_records_union_to_an_extended_shape_via_union_types() {
    // `union_types` itself never sees the "both bare" case routed through
    // `apply_binop`'s primitive lookup table in ordinary inspection, but it
    // should still degrade harmlessly rather than misreport a mismatched
    // extended shape if ever called directly with two bare primitives.
    let left = Type::primitive(Primitive::Record, false);
    let right = Type::primitive(Primitive::Record, false);
    assert_eq!(union_types(&left, &right), Type::Unknown);
}

#[test]
fn a_bare_record_opposite_a_known_record_shape_forces_it_open() {
    let mut interner = Interner::new();
    let a = interner.intern("a");
    let mut fields = FieldMap::new(false);
    fields.fields.insert(a, Type::primitive(Primitive::Number, false));

    let bare = Type::primitive(Primitive::Record, false);
    let known = Type::DefinedRecord(fields.clone());

    let via_right = union_types(&known, &bare);
    let Type::DefinedRecord(merged) = via_right else { panic!("expected a DefinedRecord") };
    assert!(merged.is_open);
    assert_eq!(merged.fields.get(&a), Some(&Type::primitive(Primitive::Number, false)));

    let via_left = union_types(&bare, &known);
    let Type::DefinedRecord(merged) = via_left else { panic!("expected a DefinedRecord") };
    assert!(merged.is_open);
}

#[test]
fn a_bare_table_never_matches_an_extended_record_shape() {
    let bare_table = Type::primitive(Primitive::Table, false);
    let known_record = Type::DefinedRecord(FieldMap::new(false));
    assert_eq!(union_types(&bare_table, &known_record), Type::Unknown);
}

#[test]
fn field_map_of_recognises_every_field_bearing_variant() {
    let fields = FieldMap::new(false);
    assert!(field_map_of(&Type::DefinedRecord(fields.clone())).is_some());
    assert!(field_map_of(&Type::DefinedTable(fields.clone())).is_some());
    assert!(field_map_of(&Type::RecordType(fields.clone())).is_some());
    assert!(field_map_of(&Type::TableType(fields.clone())).is_some());
    assert!(field_map_of(&Type::PrimaryExpressionTable(fields)).is_some());
    assert!(field_map_of(&Type::Unknown).is_none());
}
