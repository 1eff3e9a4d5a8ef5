//! Node-id map façade (C1).
//!
//! Wraps the parser's id-indexed graph (spec §6.1: `ast_by_id`,
//! `context_by_id`, `child_ids_by_id`, `parent_id_by_id`, `leaf_node_ids`)
//! and provides the handful of lookups every upstream component needs.
//! Contract violations (a missing id, a node kind the grammar forbids at a
//! slot) are programmer errors and surface as `InvariantError` — there is
//! no recovery inside this layer, matching `tsz-checker::scope_finder`'s
//! "walk until you hit the root or run out of steps" style but converting
//! the "ran out" case into a typed error instead of a silent `None` when
//! the caller asserted a shape that should be impossible.

use crate::ast_kind::AstKind;
use crate::node::{AstNode, ContextNode, NodeId, XorNode};
use pq_common::InvariantError;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// The node-id graph consumed from the parser (spec §6.1).
#[derive(Debug, Default)]
pub struct NodeIdMapCollection {
    ast_by_id: FxHashMap<NodeId, AstNode>,
    context_by_id: FxHashMap<NodeId, ContextNode>,
    /// Ordered by attribute index within each parent.
    child_ids_by_id: FxHashMap<NodeId, SmallVec<[NodeId; 4]>>,
    parent_id_by_id: FxHashMap<NodeId, NodeId>,
    leaf_node_ids: FxHashSet<NodeId>,
}

impl NodeIdMapCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_ast(&mut self, node: AstNode) {
        if node.is_leaf {
            self.leaf_node_ids.insert(node.id);
        }
        self.ast_by_id.insert(node.id, node);
    }

    pub fn insert_context(&mut self, node: ContextNode) {
        self.context_by_id.insert(node.id, node);
    }

    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) {
        self.parent_id_by_id.insert(child, parent);
        self.child_ids_by_id.entry(parent).or_default().push(child);
    }

    #[must_use]
    pub fn leaf_node_ids(&self) -> &FxHashSet<NodeId> {
        &self.leaf_node_ids
    }

    /// Every still-parsing node id. The active-node locator (C3) scans
    /// these for the innermost context subtree open at the caret; there is
    /// no parser-maintained index narrower than "all of them" to consult.
    pub fn context_node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.context_by_id.keys().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ast_by_id.is_empty() && self.context_by_id.is_empty()
    }

    /// Looks up any live node id, AST or context (the "exactly one variant
    /// per id" invariant means these two maps never both hold a key).
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<XorNode> {
        if let Some(node) = self.ast_by_id.get(&id) {
            return Some(XorNode::Ast(node.clone()));
        }
        self.context_by_id.get(&id).map(|node| XorNode::Context(node.clone()))
    }

    fn get_checked(&self, id: NodeId) -> Result<XorNode, InvariantError> {
        self.get(id).ok_or_else(|| InvariantError::node_not_found(id.raw()))
    }

    /// C1: `child_by_attribute_index`. Returns the parent's child whose
    /// attribute index equals `index`, filtered to `allowed_kinds` if given.
    /// `None` (not an error) means the parent hasn't read that slot yet —
    /// this is the normal case for a partial/incomplete trailing expression.
    pub fn child_by_attribute_index(
        &self,
        parent_id: NodeId,
        index: u32,
        allowed_kinds: Option<&[AstKind]>,
    ) -> Result<Option<XorNode>, InvariantError> {
        let Some(children) = self.child_ids_by_id.get(&parent_id) else {
            return Ok(None);
        };
        for &child_id in children {
            let child = self.get_checked(child_id)?;
            if child.attribute_index() == Some(index) {
                if let Some(kinds) = allowed_kinds
                    && !kinds.contains(&child.kind())
                {
                    return Ok(None);
                }
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    /// C1: `parent_of`.
    pub fn parent_of(&self, id: NodeId) -> Result<Option<XorNode>, InvariantError> {
        match self.parent_id_by_id.get(&id) {
            Some(&parent_id) => Ok(Some(self.get_checked(parent_id)?)),
            None => Ok(None),
        }
    }

    /// C1: `ancestry`. Inclusive of `id`'s own node, ordered child-to-root.
    pub fn ancestry(&self, id: NodeId) -> Result<Vec<XorNode>, InvariantError> {
        let mut chain = vec![self.get_checked(id)?];
        let mut current = id;
        let mut steps = 0usize;
        while let Some(&parent_id) = self.parent_id_by_id.get(&current) {
            steps += 1;
            if steps > pq_common::limits::MAX_ANCESTRY_WALK_STEPS {
                tracing::debug!(node_id = id.raw(), steps, "ancestry walk aborted; parent map is likely cyclic");
                return Err(InvariantError::new("ancestry walk exceeded the step limit; parent map is likely cyclic"));
            }
            chain.push(self.get_checked(parent_id)?);
            current = parent_id;
        }
        Ok(chain)
    }

    /// C1: `right_most_leaf`. BFS with right-preferred child ordering,
    /// pruning branches whose token-index-end is not greater than the
    /// current best; returns the AST leaf with the largest token index
    /// that is a descendant of `id`.
    #[must_use]
    pub fn right_most_leaf(&self, id: NodeId) -> Option<AstNode> {
        let mut best: Option<AstNode> = None;
        let mut queue: std::collections::VecDeque<NodeId> = std::collections::VecDeque::new();
        queue.push_back(id);
        while let Some(current) = queue.pop_front() {
            if let Some(node) = self.ast_by_id.get(&current) {
                if node.is_leaf {
                    let keep = match &best {
                        Some(existing) => node.token_range.end_index > existing.token_range.end_index,
                        None => true,
                    };
                    if keep {
                        best = Some(node.clone());
                    }
                    continue;
                }
                let best_end = best.as_ref().map_or(0, |n| n.token_range.end_index);
                if node.token_range.end_index <= best_end && best.is_some() {
                    continue;
                }
            }
            if let Some(children) = self.child_ids_by_id.get(&current) {
                for &child_id in children.iter().rev() {
                    queue.push_front(child_id);
                }
            }
        }
        best
    }

    /// C1: `wrapped_content`. For wrapping nodes (brackets/braces/parens),
    /// returns the inner payload — conventionally attribute index 1 between
    /// an opening and closing `Constant`.
    pub fn wrapped_content(&self, id: NodeId) -> Result<Option<XorNode>, InvariantError> {
        self.child_by_attribute_index(id, 1, None)
    }

    /// C1: `recursive_expression_previous_sibling`. For a positional child
    /// of a `RecursivePrimaryExpression`'s `ArrayWrapper`, returns the
    /// expression immediately to the left of `id` in source order. Fails
    /// fatally (per spec §4.1) if `id` is not in such a position.
    pub fn recursive_expression_previous_sibling(&self, id: NodeId) -> Result<XorNode, InvariantError> {
        let parent_id = self
            .parent_id_by_id
            .get(&id)
            .copied()
            .ok_or_else(|| InvariantError::new("recursive-expression sibling lookup requires a parent").with_detail(pq_common::error::ErrorDetail::NodeId(id.raw())))?;
        let parent = self.get_checked(parent_id)?;
        if parent.kind() != AstKind::ArrayWrapper {
            return Err(InvariantError::unexpected_kind("ArrayWrapper", parent_id.raw()));
        }
        let grandparent_id = self
            .parent_id_by_id
            .get(&parent_id)
            .copied()
            .ok_or_else(|| InvariantError::new("ArrayWrapper must be owned by a RecursivePrimaryExpression"))?;
        let grandparent = self.get_checked(grandparent_id)?;
        if grandparent.kind() != AstKind::RecursivePrimaryExpression {
            return Err(InvariantError::unexpected_kind("RecursivePrimaryExpression", grandparent_id.raw()));
        }

        let children = self
            .child_ids_by_id
            .get(&parent_id)
            .ok_or_else(|| InvariantError::new("ArrayWrapper has no children to search"))?;
        let own_index = children
            .iter()
            .position(|&child| child == id)
            .ok_or_else(|| InvariantError::new("id is not a child of its own parent ArrayWrapper").with_detail(pq_common::error::ErrorDetail::NodeId(id.raw())))?;

        if own_index == 0 {
            // The element immediately to the left is the recursive
            // expression's head, not another ArrayWrapper element.
            return self
                .child_by_attribute_index(grandparent_id, 0, None)?
                .ok_or_else(|| InvariantError::new("RecursivePrimaryExpression has no head at index 0"));
        }
        self.get_checked(children[own_index - 1])
    }

    pub fn assert_ast_node_kind(&self, xor: &XorNode, kind: AstKind) -> Result<(), InvariantError> {
        if xor.kind() != kind {
            return Err(InvariantError::unexpected_kind(format!("{kind:?}"), xor.id().raw()));
        }
        if !xor.is_ast() {
            return Err(InvariantError::new("expected an AST node, found a context node").with_detail(pq_common::error::ErrorDetail::NodeId(xor.id().raw())));
        }
        Ok(())
    }

    pub fn assert_any_ast_node_kind(&self, xor: &XorNode, kinds: &[AstKind]) -> Result<(), InvariantError> {
        if !kinds.contains(&xor.kind()) {
            return Err(InvariantError::unexpected_kind(format!("{kinds:?}"), xor.id().raw()));
        }
        if !xor.is_ast() {
            return Err(InvariantError::new("expected an AST node, found a context node").with_detail(pq_common::error::ErrorDetail::NodeId(xor.id().raw())));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/node_map_tests.rs"]
mod tests;
