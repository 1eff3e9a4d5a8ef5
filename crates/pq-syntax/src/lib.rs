//! Hybrid AST/context node model and node-id map façade.
//!
//! This crate owns everything spec §3 and §4.1–§4.2 describe as input
//! contract: the `XorNode` tagged union (C1's data model), the node-id map
//! façade itself (C1), and the position three-way comparison (C2). It
//! depends on nothing upstream of it in the inspection pipeline — `pq-scope`,
//! `pq-types`, and `pq-inspect` all build on top of it.

pub mod ast_kind;
pub mod fixtures;
pub mod node;
pub mod node_map;
pub mod position;

pub use ast_kind::AstKind;
pub use node::{AstNode, AstPayload, ConstantKind, ContextNode, LiteralKind, NodeId, OperatorKind, ParseError, TokenRange, XorNode};
pub use node_map::NodeIdMapCollection;
pub use pq_common::Position;
