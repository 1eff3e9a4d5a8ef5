use pq_common::Interner;
use pq_scope::ScopeById;
use pq_syntax::fixtures::DocumentBuilder;
use pq_syntax::{AstKind, ConstantKind, LiteralKind, OperatorKind};
use pq_types::{inspect_type, Primitive, Type, TypeById};

fn whole(b: &DocumentBuilder) -> pq_syntax::TokenRange {
    b.token_range(0, 0, 0, 40, 0, 20)
}

/// `let x = 1 in x` (spec §8 scenario 1): the body's `x` identifier types
/// as a non-nullable `number`.
#[test]
fn let_bound_identifier_resolves_to_its_value_type() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);

    let let_expr = b.branch(AstKind::LetExpression, None, None, w);
    let wrapper = b.branch(AstKind::ArrayWrapper, Some(let_expr), Some(1), w);
    let csv = b.branch(AstKind::Csv, Some(wrapper), Some(0), w);
    let pair = b.branch(AstKind::IdentifierPairedExpression, Some(csv), Some(0), w);
    b.identifier(Some(pair), Some(0), w, "x", false);
    b.literal(Some(pair), Some(2), w, LiteralKind::Number);
    let body = b.identifier(Some(let_expr), Some(3), w, "x", false);

    let map = b.finish();
    let mut interner = Interner::new();
    let resolution = inspect_type(body, &map, &ScopeById::default(), &TypeById::default(), &mut interner).unwrap();

    assert_eq!(resolution.node_type, Type::primitive(Primitive::Number, false));
}

/// `[a = 1, b = ]` (spec §8 scenario 4): a present value types normally,
/// a value slot the parser hasn't produced yet types `Unknown`.
#[test]
fn a_record_fields_missing_value_types_as_unknown() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);

    let record = b.branch(AstKind::RecordExpression, None, None, w);
    let wrapper = b.branch(AstKind::ArrayWrapper, Some(record), Some(1), w);

    let csv_a = b.branch(AstKind::Csv, Some(wrapper), Some(0), w);
    let pair_a = b.branch(AstKind::GeneralizedIdentifierPairedExpression, Some(csv_a), Some(0), w);
    b.identifier(Some(pair_a), Some(0), w, "a", false);
    b.literal(Some(pair_a), Some(2), w, LiteralKind::Number);

    let csv_b = b.branch(AstKind::Csv, Some(wrapper), Some(1), w);
    let pair_b = b.branch(AstKind::GeneralizedIdentifierPairedExpression, Some(csv_b), Some(0), w);
    b.identifier(Some(pair_b), Some(0), w, "b", false);
    // No value child for `b` — the parser hasn't produced one yet.

    let map = b.finish();
    let mut interner = Interner::new();
    let resolution = inspect_type(record, &map, &ScopeById::default(), &TypeById::default(), &mut interner).unwrap();

    let Type::DefinedRecord(fields) = resolution.node_type else {
        panic!("expected a DefinedRecord");
    };
    assert_eq!(fields.fields.get(&interner.intern("a")), Some(&Type::primitive(Primitive::Number, false)));
    assert_eq!(fields.fields.get(&interner.intern("b")), Some(&Type::Unknown));
    assert!(!fields.is_open);
}

/// `if true then 1 else "x"` unions its branches (spec §4.5's `IfExpression` rule).
#[test]
fn if_expression_unions_its_branch_types() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);

    let if_expr = b.branch(AstKind::IfExpression, None, None, w);
    b.literal(Some(if_expr), Some(1), w, LiteralKind::True);
    b.literal(Some(if_expr), Some(3), w, LiteralKind::Number);
    b.literal(Some(if_expr), Some(5), w, LiteralKind::Text);

    let map = b.finish();
    let mut interner = Interner::new();
    let resolution = inspect_type(if_expr, &map, &ScopeById::default(), &TypeById::default(), &mut interner).unwrap();

    assert_eq!(
        resolution.node_type,
        Type::AnyUnion(vec![Type::primitive(Primitive::Number, false), Type::primitive(Primitive::Text, false)])
    );
}

/// `1 + 2` types to a non-nullable `number` via the binary-op table.
#[test]
fn arithmetic_expression_types_through_the_binop_table() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);

    let expr = b.branch(AstKind::ArithmeticExpression, None, None, w);
    b.literal(Some(expr), Some(0), w, LiteralKind::Number);
    b.operator(Some(expr), Some(1), w, OperatorKind::Add);
    b.literal(Some(expr), Some(2), w, LiteralKind::Number);

    let map = b.finish();
    let mut interner = Interner::new();
    let resolution = inspect_type(expr, &map, &ScopeById::default(), &TypeById::default(), &mut interner).unwrap();

    assert_eq!(resolution.node_type, Type::primitive(Primitive::Number, false));
}

/// `record[a]` through a `RecursivePrimaryExpression`/`FieldSelector` tail
/// (spec §4.5.1) reads the named field straight off the record's shape.
#[test]
fn field_selector_reads_the_named_field_off_a_defined_record() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);

    let recursive = b.branch(AstKind::RecursivePrimaryExpression, None, None, w);

    let record = b.branch(AstKind::RecordExpression, Some(recursive), Some(0), w);
    let record_wrapper = b.branch(AstKind::ArrayWrapper, Some(record), Some(1), w);
    let csv_a = b.branch(AstKind::Csv, Some(record_wrapper), Some(0), w);
    let pair_a = b.branch(AstKind::GeneralizedIdentifierPairedExpression, Some(csv_a), Some(0), w);
    b.identifier(Some(pair_a), Some(0), w, "a", false);
    b.literal(Some(pair_a), Some(2), w, LiteralKind::Number);

    let tail_wrapper = b.branch(AstKind::ArrayWrapper, Some(recursive), Some(1), w);
    let selector = b.branch(AstKind::FieldSelector, Some(tail_wrapper), Some(0), w);
    b.identifier(Some(selector), Some(1), w, "a", false);

    let map = b.finish();
    let mut interner = Interner::new();
    let resolution = inspect_type(selector, &map, &ScopeById::default(), &TypeById::default(), &mut interner).unwrap();

    assert_eq!(resolution.node_type, Type::primitive(Primitive::Number, false));

    let whole_resolution = inspect_type(recursive, &map, &ScopeById::default(), &TypeById::default(), &mut interner).unwrap();
    assert_eq!(whole_resolution.node_type, Type::primitive(Primitive::Number, false));
}

/// `let f = (a) => 1 in f()` (spec §8 scenario 6's shape): invoking a
/// `DefinedFunction`-typed callee yields its return type.
#[test]
fn invoke_expression_yields_the_callees_return_type() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);

    let let_expr = b.branch(AstKind::LetExpression, None, None, w);
    let bindings_wrapper = b.branch(AstKind::ArrayWrapper, Some(let_expr), Some(1), w);
    let csv = b.branch(AstKind::Csv, Some(bindings_wrapper), Some(0), w);
    let pair = b.branch(AstKind::IdentifierPairedExpression, Some(csv), Some(0), w);
    b.identifier(Some(pair), Some(0), w, "f", false);

    let function = b.branch(AstKind::FunctionExpression, Some(pair), Some(2), w);
    let param_wrapper = b.branch(AstKind::ArrayWrapper, Some(function), Some(0), w);
    let param_csv = b.branch(AstKind::Csv, Some(param_wrapper), Some(0), w);
    let param = b.branch(AstKind::Parameter, Some(param_csv), Some(0), w);
    b.identifier(Some(param), Some(1), w, "a", false);
    b.literal(Some(function), Some(3), w, LiteralKind::Number);

    let recursive = b.branch(AstKind::RecursivePrimaryExpression, Some(let_expr), Some(3), w);
    b.identifier(Some(recursive), Some(0), w, "f", false);
    let tail_wrapper = b.branch(AstKind::ArrayWrapper, Some(recursive), Some(1), w);
    let invoke = b.branch(AstKind::InvokeExpression, Some(tail_wrapper), Some(0), w);

    let map = b.finish();
    let mut interner = Interner::new();
    let resolution = inspect_type(invoke, &map, &ScopeById::default(), &TypeById::default(), &mut interner).unwrap();

    assert_eq!(resolution.node_type, Type::primitive(Primitive::Number, false));
}

/// An identifier with no binding anywhere in scope types as `Unknown`, not
/// an error — it may be an external binding the inspector never sees.
#[test]
fn an_unresolved_identifier_types_as_unknown() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);
    let id = b.identifier(None, None, w, "external", false);
    let map = b.finish();
    let mut interner = Interner::new();

    let resolution = inspect_type(id, &map, &ScopeById::default(), &TypeById::default(), &mut interner).unwrap();
    assert_eq!(resolution.node_type, Type::Unknown);
}

/// `null` the `Constant` names a type-layer distinct from `Primitive::None`
/// and maps to the dedicated `Type::None` bottom (spec §4.5).
#[test]
fn the_null_constant_maps_to_the_none_bottom_type() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);
    let id = b.constant(None, None, w, ConstantKind::Null);
    let map = b.finish();
    let mut interner = Interner::new();

    let resolution = inspect_type(id, &map, &ScopeById::default(), &TypeById::default(), &mut interner).unwrap();
    assert_eq!(resolution.node_type, Type::None);
}

/// The `null` value *literal* is a perfectly valid value, not the bottom
/// type: it types as nullable `Primitive::Null` (spec §3.6/§4.5), distinct
/// from the `Constant` path above which maps to `Type::None`.
#[test]
fn the_null_literal_types_as_nullable_null_not_the_none_bottom() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);
    let id = b.literal(None, None, w, LiteralKind::Null);
    let map = b.finish();
    let mut interner = Interner::new();

    let resolution = inspect_type(id, &map, &ScopeById::default(), &TypeById::default(), &mut interner).unwrap();
    assert_eq!(resolution.node_type, Type::primitive(Primitive::Null, true));
}

/// Running inspection twice with the same `given` cache (but a fresh delta)
/// returns structurally equal results — cache monotonicity (spec §8).
#[test]
fn repeated_inspection_with_a_fresh_cache_is_idempotent() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);
    let expr = b.branch(AstKind::ArithmeticExpression, None, None, w);
    b.literal(Some(expr), Some(0), w, LiteralKind::Number);
    b.operator(Some(expr), Some(1), w, OperatorKind::Add);
    b.literal(Some(expr), Some(2), w, LiteralKind::Number);
    let map = b.finish();

    let mut interner1 = Interner::new();
    let first = inspect_type(expr, &map, &ScopeById::default(), &TypeById::default(), &mut interner1).unwrap();
    let mut interner2 = Interner::new();
    let second = inspect_type(expr, &map, &ScopeById::default(), &TypeById::default(), &mut interner2).unwrap();

    assert_eq!(first.node_type, second.node_type);
}

/// `[a = 1] & [b = "x"]` (spec §4.5.3): `&` between two record shapes takes
/// the field-wise union instead of the primitive `BinOpLookup`, which has
/// no entries for record operands at all.
#[test]
fn ampersand_unions_two_record_shapes_instead_of_falling_through_the_binop_table() {
    let mut b = DocumentBuilder::new();
    let w = whole(&b);

    let expr = b.branch(AstKind::ArithmeticExpression, None, None, w);

    let left_record = b.branch(AstKind::RecordExpression, Some(expr), Some(0), w);
    let left_wrapper = b.branch(AstKind::ArrayWrapper, Some(left_record), Some(1), w);
    let left_csv = b.branch(AstKind::Csv, Some(left_wrapper), Some(0), w);
    let left_pair = b.branch(AstKind::GeneralizedIdentifierPairedExpression, Some(left_csv), Some(0), w);
    b.identifier(Some(left_pair), Some(0), w, "a", false);
    b.literal(Some(left_pair), Some(2), w, LiteralKind::Number);

    b.operator(Some(expr), Some(1), w, OperatorKind::Concatenate);

    let right_record = b.branch(AstKind::RecordExpression, Some(expr), Some(2), w);
    let right_wrapper = b.branch(AstKind::ArrayWrapper, Some(right_record), Some(1), w);
    let right_csv = b.branch(AstKind::Csv, Some(right_wrapper), Some(0), w);
    let right_pair = b.branch(AstKind::GeneralizedIdentifierPairedExpression, Some(right_csv), Some(0), w);
    b.identifier(Some(right_pair), Some(0), w, "b", false);
    b.literal(Some(right_pair), Some(2), w, LiteralKind::Text);

    let map = b.finish();
    let mut interner = Interner::new();
    let resolution = inspect_type(expr, &map, &ScopeById::default(), &TypeById::default(), &mut interner).unwrap();

    let Type::DefinedRecord(fields) = resolution.node_type else {
        panic!("expected `&` over two records to yield a DefinedRecord, got {:?}", resolution.node_type);
    };
    assert_eq!(fields.fields.get(&interner.intern("a")), Some(&Type::primitive(Primitive::Number, false)));
    assert_eq!(fields.fields.get(&interner.intern("b")), Some(&Type::primitive(Primitive::Text, false)));
    assert!(!fields.is_open);
}
