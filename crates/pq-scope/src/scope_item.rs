//! `ScopeItem` and the two scope maps (spec §3.5).
//!
//! A `NodeScope` is what's visible at one node id; `ScopeById` is the
//! persistent, caller-owned map the resolver reads from and writes into.
//! Keys are interned (`Atom`) rather than `String` so repeated lookups in a
//! hot ancestry walk don't keep re-hashing source text.

use pq_syntax::NodeId;
use rustc_hash::FxHashMap;

/// One binding visible inside a scope, tagged with which grammar construct
/// introduced it (spec §3.5). `recursive` means: this is the single entry,
/// among its siblings, whose own value subtree we are currently inside —
/// the only one an `@`-prefixed self-reference may legally name.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeItem {
    /// The implicit `_` parameter of an `EachExpression`. `body` is the
    /// `each`'s own body expression — C5.4 types `_` as that body's type.
    Each { id: NodeId, body: NodeId },
    /// A `let`/record/table binding. `value` is `None` only for a binding
    /// whose value slot the parser hasn't produced yet.
    KeyValuePair { id: NodeId, recursive: bool, value: Option<NodeId> },
    /// A `FunctionExpression` parameter.
    Parameter {
        id: NodeId,
        is_optional: bool,
        is_nullable: bool,
        primitive: Option<pq_syntax::ConstantKind>,
    },
    /// A section member, visible to every other member in the same section.
    SectionMember { id: NodeId, recursive: bool, value: Option<NodeId> },
    /// A name that resolves to nothing the resolver could identify — kept
    /// rather than omitted so callers can distinguish "undefined" from
    /// "never looked up".
    Undefined { id: NodeId },
}

impl ScopeItem {
    /// The node id this item is ultimately grounded on (its binding site,
    /// parameter node, or the `_` `each` itself).
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            ScopeItem::Each { id, .. }
            | ScopeItem::KeyValuePair { id, .. }
            | ScopeItem::Parameter { id, .. }
            | ScopeItem::SectionMember { id, .. }
            | ScopeItem::Undefined { id } => *id,
        }
    }

    /// `true` only for the `KeyValuePair`/`SectionMember` entry whose own
    /// value subtree the caller is currently inside (spec §4.4).
    #[must_use]
    pub const fn recursive(&self) -> bool {
        match self {
            ScopeItem::KeyValuePair { recursive, .. } | ScopeItem::SectionMember { recursive, .. } => *recursive,
            ScopeItem::Each { .. } | ScopeItem::Parameter { .. } | ScopeItem::Undefined { .. } => false,
        }
    }

    /// The node whose type is this item's type, if dereferencing further is
    /// meaningful at all (used by [`crate::dereference`] and by C5.4).
    #[must_use]
    pub const fn value(&self) -> Option<NodeId> {
        match self {
            ScopeItem::KeyValuePair { value, .. } | ScopeItem::SectionMember { value, .. } => *value,
            ScopeItem::Each { body, .. } => Some(*body),
            ScopeItem::Parameter { .. } | ScopeItem::Undefined { .. } => None,
        }
    }
}

/// The scope visible at a single node: name to most-recently-bound item.
pub type NodeScope = FxHashMap<pq_common::Atom, ScopeItem>;

/// The persistent, caller-owned cache the resolver reads `given` from and
/// writes its `delta` into (spec §4.4's two-map strategy; see SPEC_FULL §4
/// for why a thrown `InvariantError` must never touch the caller's copy).
pub type ScopeById = FxHashMap<NodeId, NodeScope>;

#[cfg(test)]
#[path = "../tests/scope_item_tests.rs"]
mod tests;
