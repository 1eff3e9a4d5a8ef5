//! The hybrid node model (spec §3.1): a tagged union of a completed AST
//! node and a still-parsing context node, plus the id/token-range plumbing
//! both variants share.

use crate::ast_kind::AstKind;
use pq_common::Position;

/// A node id assigned by the (out-of-scope) parser in document order.
/// Ids are monotonic; there is no reuse within one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A token's half-open range: both code-unit positions and token indices.
/// Token indices let the right-most-leaf search (§4.1) compare ranges with
/// a plain integer comparison instead of re-deriving order from positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TokenRange {
    pub start: Position,
    pub end: Position,
    pub start_index: u32,
    pub end_index: u32,
}

/// The literal keyword/type constants a `Constant` or `PrimitiveType` node
/// can name (§4.5's `Constant`/`PrimitiveType` dispatch rows; see SPEC_FULL
/// §6.5 for the closed vocabulary this is grounded on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ConstantKind {
    Action,
    Any,
    AnyNonNull,
    Binary,
    Date,
    DateTime,
    DateTimeZone,
    Duration,
    Function,
    List,
    Logical,
    Null,
    Number,
    Record,
    Table,
    Text,
    Time,
    Type,
}

/// The literal-value kinds a `LiteralExpression` node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LiteralKind {
    Null,
    True,
    False,
    Number,
    Text,
}

/// The operator an `ArithmeticExpression`/`EqualityExpression`/`LogicalExpression`/
/// `RelationalExpression`'s operator slot (or a `UnaryExpression`'s) names.
/// The grammar spells these as `Constant` tokens too, but they name an
/// operator rather than a type/value constant, so they get their own
/// payload variant instead of overloading `ConstantKind` (§4.5.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OperatorKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Concatenate,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
    /// Unary `not`.
    Not,
    /// Unary `+`, distinct from binary `Add`.
    UnaryPlus,
    /// Unary `-`, distinct from binary `Subtract`.
    UnaryMinus,
}

/// Kind-specific payload carried by leaf-ish AST nodes. Everything else
/// needs only `kind`/`id`/`token_range`/children to be inspected.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AstPayload {
    None,
    /// `Identifier`/`IdentifierExpression`. `is_inclusive` is the `@` prefix
    /// (spec GLOSSARY: "recursive identifier").
    Identifier { literal: String, is_inclusive: bool },
    Constant(ConstantKind),
    Operator(OperatorKind),
    Literal(LiteralKind),
}

/// A fully-parsed node (spec §3.1 `AstVariant`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AstNode {
    pub id: NodeId,
    pub kind: AstKind,
    pub attribute_index: Option<u32>,
    pub token_range: TokenRange,
    pub is_leaf: bool,
    pub payload: AstPayload,
}

/// A still-parsing node (spec §3.1 `ContextVariant`). `promoted_ast` is the
/// rare bridge to the AST node this context became once parsing of it
/// completed; most context nodes never acquire one.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContextNode {
    pub id: NodeId,
    pub kind: AstKind,
    pub attribute_index: Option<u32>,
    pub first_token: Option<Position>,
    pub promoted_ast: Option<Box<AstNode>>,
}

/// A parse error from the (out-of-scope) parser, surfaced verbatim
/// alongside the inspection rather than interpreted (spec §6.1/§7): the
/// core never inspects its contents, only threads it through to the
/// caller next to whatever it could still infer from the hybrid tree the
/// parser produced up to the error.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// The tagged union every tree reference in the core is expressed as.
/// Exactly one variant is live for any given node id (spec §3.1 invariant).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum XorNode {
    Ast(AstNode),
    Context(ContextNode),
}

impl XorNode {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            XorNode::Ast(node) => node.id,
            XorNode::Context(node) => node.id,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> AstKind {
        match self {
            XorNode::Ast(node) => node.kind,
            XorNode::Context(node) => node.kind,
        }
    }

    #[must_use]
    pub const fn attribute_index(&self) -> Option<u32> {
        match self {
            XorNode::Ast(node) => node.attribute_index,
            XorNode::Context(node) => node.attribute_index,
        }
    }

    #[must_use]
    pub const fn as_ast(&self) -> Option<&AstNode> {
        match self {
            XorNode::Ast(node) => Some(node),
            XorNode::Context(_) => None,
        }
    }

    #[must_use]
    pub const fn as_context(&self) -> Option<&ContextNode> {
        match self {
            XorNode::Ast(_) => None,
            XorNode::Context(node) => Some(node),
        }
    }

    #[must_use]
    pub const fn is_ast(&self) -> bool {
        matches!(self, XorNode::Ast(_))
    }
}

impl From<AstNode> for XorNode {
    fn from(node: AstNode) -> Self {
        XorNode::Ast(node)
    }
}

impl From<ContextNode> for XorNode {
    fn from(node: ContextNode) -> Self {
        XorNode::Context(node)
    }
}

#[cfg(test)]
#[path = "../tests/node_tests.rs"]
mod tests;
