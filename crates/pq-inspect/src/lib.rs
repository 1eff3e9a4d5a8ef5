//! Active-node location (C3), the expected-type and autocomplete walkers
//! (C6/C7), invoke-expression inspection (C8), and the orchestrator that
//! ties every inspection component together into one `Inspection` (C9).
//!
//! Builds on `pq-syntax` (the node model and C1/C2), `pq-scope` (C4 lexical
//! scope resolution), and `pq-types` (C5 type inspection) — this crate is
//! the top of the dependency stack; nothing else in the workspace depends
//! on it.

pub mod active_node;
pub mod autocomplete;
pub mod expected_type;
pub mod invoke_expression;
pub mod keyword;
pub mod orchestrator;

pub use active_node::{ActiveNode, LeafKind};
pub use autocomplete::autocomplete;
pub use expected_type::expected_type;
pub use invoke_expression::{locate_invoke_expression, InvokeExpression};
pub use keyword::Keyword;
pub use orchestrator::{inspect, Inspection};
