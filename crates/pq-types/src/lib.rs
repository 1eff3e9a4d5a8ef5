//! The structural type lattice and bottom-up type inspector (C5).
//!
//! Depends on `pq-scope` for lexical scope resolution (identifier and
//! `each`/`let`/record/section dereferencing, spec §4.5.4) and on
//! `pq-syntax` for the node-id map façade. Nothing upstream of this crate
//! depends on it — `pq-inspect` is the only consumer.

pub mod binop;
pub mod inspector;
pub mod primitive;
pub mod type_value;
pub mod union;

pub use binop::{allowed_right_operands, apply_binop, expected_right_operand_type, BinOp, BIN_OP_LOOKUP, BIN_OP_PARTIAL_LOOKUP};
pub use inspector::{inspect_scope_item_type, inspect_type, TypeById, TypeInspectionStats, TypeResolution};
pub use primitive::{Primitive, PrimitiveType};
pub use type_value::{FieldMap, FunctionParameterType, FunctionSignature, Type};
pub use union::{field_map_of, project_fields, select_field, union_field_maps, union_types};
