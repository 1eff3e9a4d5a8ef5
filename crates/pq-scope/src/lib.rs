//! Lexical scope resolution (spec §3.5, §4.4 — C4).
//!
//! Depends on `pq-syntax` for the node-id map façade and nothing else
//! upstream. `pq-types` depends on this crate to type identifiers and
//! `each`/`let`/record/section bindings (§4.5.4).

pub mod dereference;
pub mod resolver;
pub mod scope_item;

pub use dereference::{dereference_identifier, DereferenceOutcome};
pub use resolver::{resolve_ancestry_scope, ScopeResolution};
pub use scope_item::{NodeScope, ScopeById, ScopeItem};
