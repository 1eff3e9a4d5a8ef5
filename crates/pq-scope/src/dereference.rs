//! Identifier dereferencing (spec §4.4, reused by C5.4 for typing).
//!
//! Follows a chain of single-step assignments (`x = y`, `y = z`, ...) as far
//! as the value is itself an identifier, stopping at the first non-identifier
//! value, an undefined name, or a cycle. A name whose binding's `recursive`
//! flag doesn't match the `@`-inclusive flag of the identifier being
//! dereferenced is resolved as-is without chasing its value any further —
//! that mismatch means the reference isn't the self-reference the binding
//! allows.

use crate::scope_item::{NodeScope, ScopeItem};
use pq_common::{Interner, InvariantError};
use pq_syntax::{AstKind, AstPayload, NodeId, NodeIdMapCollection};
use rustc_hash::FxHashSet;

/// Result of chasing a name through a [`NodeScope`].
#[derive(Debug, Clone, PartialEq)]
pub enum DereferenceOutcome {
    /// The chain terminated at this item (possibly after zero hops).
    Resolved(ScopeItem),
    /// The name isn't bound in this scope at all.
    Undefined,
    /// The chain revisited a binding it already passed through; per spec
    /// §9 this must terminate rather than loop, returning the identifier
    /// unchanged.
    Cycle,
}

pub fn dereference_identifier(
    name: &str,
    is_inclusive: bool,
    scope: &NodeScope,
    map: &NodeIdMapCollection,
    interner: &mut Interner,
) -> Result<DereferenceOutcome, InvariantError> {
    let mut current_name = interner.intern(name);
    let mut current_inclusive = is_inclusive;
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut hops = 0usize;
    loop {
        let Some(item) = scope.get(&current_name) else {
            return Ok(DereferenceOutcome::Undefined);
        };
        if item.recursive() != current_inclusive {
            return Ok(DereferenceOutcome::Resolved(item.clone()));
        }
        if !visited.insert(item.id()) {
            return Ok(DereferenceOutcome::Cycle);
        }
        hops += 1;
        if hops > pq_common::limits::MAX_DEREFERENCE_HOPS {
            return Ok(DereferenceOutcome::Resolved(item.clone()));
        }
        match next_identifier(map, item.value())? {
            Some((next_name, next_inclusive)) => {
                current_name = interner.intern(&next_name);
                current_inclusive = next_inclusive;
            }
            None => return Ok(DereferenceOutcome::Resolved(item.clone())),
        }
    }
}

/// If `value_id` names an `Identifier` (directly) or an `IdentifierExpression`
/// (one level of `@`-wrapper indirection), returns its literal and `@` flag.
fn next_identifier(map: &NodeIdMapCollection, value_id: Option<NodeId>) -> Result<Option<(String, bool)>, InvariantError> {
    let Some(value_id) = value_id else { return Ok(None) };
    let Some(xor) = map.get(value_id) else { return Ok(None) };
    let Some(ast) = xor.as_ast() else { return Ok(None) };

    let identifier_ast = match ast.kind {
        AstKind::Identifier => Some(ast.clone()),
        AstKind::IdentifierExpression => map
            .child_by_attribute_index(value_id, 1, Some(&[AstKind::Identifier]))?
            .and_then(|child| child.as_ast().cloned()),
        _ => None,
    };
    match identifier_ast.map(|node| node.payload) {
        Some(AstPayload::Identifier { literal, is_inclusive }) => Ok(Some((literal, is_inclusive))),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[path = "../tests/dereference_tests.rs"]
mod tests;
