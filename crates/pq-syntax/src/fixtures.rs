//! Fixture builders for tests across every inspection crate.
//!
//! Mirrors `tsz`'s `test_fixtures::TestContext`: the real parser is out of
//! scope (spec §1), so every crate's test suite needs a small way to hand
//! roll a `NodeIdMapCollection` without re-implementing a lexer. This is
//! test tooling; it builds the hybrid-tree *shapes* the end-to-end
//! scenarios in spec §8 describe.

use crate::ast_kind::AstKind;
use crate::node::{AstNode, AstPayload, ConstantKind, ContextNode, LiteralKind, NodeId, OperatorKind, TokenRange};
use crate::node_map::NodeIdMapCollection;
use pq_common::Position;

/// Builds a `NodeIdMapCollection` node-by-node, assigning ids in insertion
/// order the way the parser assigns them in document order.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    map: NodeIdMapCollection,
    next_id: u32,
}

impl DocumentBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    #[must_use]
    pub fn token_range(&self, start_line: u32, start_col: u32, end_line: u32, end_col: u32, start_index: u32, end_index: u32) -> TokenRange {
        TokenRange {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
            start_index,
            end_index,
        }
    }

    /// Inserts a leaf AST node with the given `token_range`/payload, parents
    /// it under `parent` (if any) at `attribute_index`, and returns its id.
    pub fn leaf(
        &mut self,
        kind: AstKind,
        parent: Option<NodeId>,
        attribute_index: Option<u32>,
        token_range: TokenRange,
        payload: AstPayload,
    ) -> NodeId {
        let id = self.fresh_id();
        self.map.insert_ast(AstNode {
            id,
            kind,
            attribute_index,
            token_range,
            is_leaf: true,
            payload,
        });
        if let Some(parent_id) = parent {
            self.map.set_parent(id, parent_id);
        }
        id
    }

    /// Inserts a non-leaf AST node spanning `token_range` (the union of its
    /// children's ranges, computed by the caller — this builder does not
    /// infer spans).
    pub fn branch(&mut self, kind: AstKind, parent: Option<NodeId>, attribute_index: Option<u32>, token_range: TokenRange) -> NodeId {
        let id = self.fresh_id();
        self.map.insert_ast(AstNode {
            id,
            kind,
            attribute_index,
            token_range,
            is_leaf: false,
            payload: AstPayload::None,
        });
        if let Some(parent_id) = parent {
            self.map.set_parent(id, parent_id);
        }
        id
    }

    /// Inserts a still-parsing context node representing an incomplete
    /// trailing expression.
    pub fn context(&mut self, kind: AstKind, parent: Option<NodeId>, attribute_index: Option<u32>, first_token: Option<Position>) -> NodeId {
        let id = self.fresh_id();
        self.map.insert_context(ContextNode {
            id,
            kind,
            attribute_index,
            first_token,
            promoted_ast: None,
        });
        if let Some(parent_id) = parent {
            self.map.set_parent(id, parent_id);
        }
        id
    }

    pub fn identifier(&mut self, parent: Option<NodeId>, attribute_index: Option<u32>, token_range: TokenRange, literal: &str, is_inclusive: bool) -> NodeId {
        self.leaf(
            AstKind::Identifier,
            parent,
            attribute_index,
            token_range,
            AstPayload::Identifier {
                literal: literal.to_string(),
                is_inclusive,
            },
        )
    }

    pub fn literal(&mut self, parent: Option<NodeId>, attribute_index: Option<u32>, token_range: TokenRange, kind: LiteralKind) -> NodeId {
        self.leaf(AstKind::LiteralExpression, parent, attribute_index, token_range, AstPayload::Literal(kind))
    }

    pub fn constant(&mut self, parent: Option<NodeId>, attribute_index: Option<u32>, token_range: TokenRange, kind: ConstantKind) -> NodeId {
        self.leaf(AstKind::Constant, parent, attribute_index, token_range, AstPayload::Constant(kind))
    }

    pub fn operator(&mut self, parent: Option<NodeId>, attribute_index: Option<u32>, token_range: TokenRange, kind: OperatorKind) -> NodeId {
        self.leaf(AstKind::Constant, parent, attribute_index, token_range, AstPayload::Operator(kind))
    }

    #[must_use]
    pub fn finish(self) -> NodeIdMapCollection {
        self.map
    }
}
