//! The active-node locator (C3, spec §4.3): the single pass that turns a
//! caret position into the deepest syntactic location touching it, plus
//! the ancestry chain out to the document root.
//!
//! Grounded in `tsz-checker::scope_finder`'s "walk parent edges until you
//! hit the root or run out of steps" shape, but running *down* from a
//! caret to a leaf first (there is no separate lexer/parser pass here to
//! hand us a starting node id — finding one *is* this component's job).

use pq_common::{InvariantError, Position};
use pq_syntax::position::{is_at_context_start, is_on_context};
use pq_syntax::{AstNode, NodeIdMapCollection, XorNode};

/// How the active node relates to the caret (spec §3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LeafKind {
    /// The caret sits inside (or exactly on the edge of) a completed leaf.
    OnAst,
    /// The caret is strictly after every completed leaf in the document.
    AfterAst,
    /// The caret is inside a still-open context subtree.
    InContext,
    /// The document has no leaves at all.
    Missing,
}

/// The caret's deepest enclosing node, plus the ancestry chain out to the
/// document root (spec §3.4). `ancestry[0]` is the active node itself;
/// `ancestry.last()` is the document root.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveNode {
    pub ancestry: Vec<XorNode>,
    pub position: Position,
    pub leaf_kind: LeafKind,
}

impl ActiveNode {
    /// Ancestry length — how deep the caret sits in the tree (SPEC_FULL §10.4).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestry.len()
    }

    /// Whether `id` is on the path from the active node to the document root.
    #[must_use]
    pub fn contains(&self, id: pq_syntax::NodeId) -> bool {
        self.ancestry.iter().any(|node| node.id() == id)
    }
}

/// C3. Locates the active node for `position` against `map`, per the
/// five-step algorithm in spec §4.3.
pub fn locate_active_node(position: Position, map: &NodeIdMapCollection) -> Result<Option<ActiveNode>, InvariantError> {
    if map.is_empty() {
        return Ok(None);
    }

    if let Some(leaf) = find_on_leaf(position, map) {
        let ancestry = map.ancestry(leaf.id)?;
        return Ok(Some(ActiveNode { ancestry, position, leaf_kind: LeafKind::OnAst }));
    }

    if map.leaf_node_ids().is_empty() {
        return Ok(None);
    }

    if caret_is_after_every_leaf(position, map) {
        if let Some(rightmost) = global_rightmost_leaf(map) {
            let ancestry = map.ancestry(rightmost.id)?;
            return Ok(Some(ActiveNode { ancestry, position, leaf_kind: LeafKind::AfterAst }));
        }
    }

    if let Some(context_id) = innermost_open_context(position, map)? {
        let ancestry = map.ancestry(context_id)?;
        return Ok(Some(ActiveNode { ancestry, position, leaf_kind: LeafKind::InContext }));
    }

    Ok(None)
}

/// Step 1: the leaf whose token range contains `position`, tying toward
/// the leaf whose start is closest-before (the largest `start_index` among
/// candidates — later-starting leaves are "closer" to the caret than an
/// enclosing one that also happens to touch it).
fn find_on_leaf(position: Position, map: &NodeIdMapCollection) -> Option<AstNode> {
    let mut best: Option<AstNode> = None;
    for &id in map.leaf_node_ids() {
        let Some(XorNode::Ast(node)) = map.get(id) else { continue };
        if !pq_syntax::position::is_on_ast(position, &node) {
            continue;
        }
        let keep = match &best {
            Some(existing) => node.token_range.start_index > existing.token_range.start_index,
            None => true,
        };
        if keep {
            best = Some(node);
        }
    }
    best
}

/// Step 2's precondition: every leaf ends strictly before `position`.
fn caret_is_after_every_leaf(position: Position, map: &NodeIdMapCollection) -> bool {
    map.leaf_node_ids().iter().all(|&id| match map.get(id) {
        Some(XorNode::Ast(node)) => pq_syntax::position::is_after_ast(position, &node),
        _ => false,
    })
}

/// The AST leaf with the largest end token index across the whole
/// document, used by step 2 (there is no single known root id to hand
/// `NodeIdMapCollection::right_most_leaf` here — unlike C1's contract,
/// which searches a specific subtree, this needs the document-wide leaf).
fn global_rightmost_leaf(map: &NodeIdMapCollection) -> Option<AstNode> {
    let mut best: Option<AstNode> = None;
    for &id in map.leaf_node_ids() {
        let Some(XorNode::Ast(node)) = map.get(id) else { continue };
        let keep = match &best {
            Some(existing) => node.token_range.end_index > existing.token_range.end_index,
            None => true,
        };
        if keep {
            best = Some(node);
        }
    }
    best
}

/// Step 3: the deepest still-open context node covering `position`. A
/// context node with no tokens read yet claims every caret (spec §3.3);
/// ties among several such candidates are broken by ancestry depth, the
/// same "most specific wins" rule step 1 uses for completed leaves.
fn innermost_open_context(position: Position, map: &NodeIdMapCollection) -> Result<Option<pq_syntax::NodeId>, InvariantError> {
    let mut best: Option<(pq_syntax::NodeId, usize)> = None;
    for id in map.context_node_ids() {
        let Some(XorNode::Context(node)) = map.get(id) else { continue };
        let on = node.first_token.is_none() || is_on_context(position, &node, map);
        if !on && !is_at_context_start(position, &node) {
            continue;
        }
        let depth = map.ancestry(id)?.len();
        let keep = match &best {
            Some((_, best_depth)) => depth > *best_depth,
            None => true,
        };
        if keep {
            best = Some((id, depth));
        }
    }
    Ok(best.map(|(id, _)| id))
}

#[cfg(test)]
#[path = "../tests/active_node_tests.rs"]
mod tests;
