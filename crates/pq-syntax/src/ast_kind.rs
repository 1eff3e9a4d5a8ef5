//! Grammar node kinds.
//!
//! `AstKind` is the closed set of node shapes the (out-of-scope) parser can
//! produce, a flat enum rather than a class hierarchy — the grammar has no
//! subtyping, so there is nothing for a trait object to buy us. Spec §6.1
//! puts the real grammar at roughly 70 variants; this is that set plus the
//! handful of structural wrapper kinds (`ArrayWrapper`, `ParameterList`,
//! `FieldSpecificationList`) the named operations in §4 need a concrete
//! child of but the prose never names directly.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum AstKind {
    // --- Binary-like (dispatch via the operator-lookup tables, §4.5.2) ---
    ArithmeticExpression,
    EqualityExpression,
    LogicalExpression,
    RelationalExpression,

    // --- Unary / range ---
    UnaryExpression,
    RangeExpression,

    // --- `as` / `is` / type-test family ---
    AsExpression,
    AsType,
    AsNullablePrimitiveType,
    IsExpression,
    IsNullablePrimitiveType,

    // --- Control / error-handling ---
    IfExpression,
    ErrorHandlingExpression,
    ErrorRaisingExpression,
    OtherwiseExpression,
    NotImplementedExpression,

    // --- Let / each / function ---
    LetExpression,
    EachExpression,
    FunctionExpression,
    Parameter,
    ParameterList,

    // --- Records / tables / lists ---
    RecordExpression,
    RecordLiteral,
    ListExpression,
    ListLiteral,
    FieldSpecification,
    FieldSpecificationList,
    FieldTypeSpecification,
    GeneralizedIdentifierPairedExpression,
    IdentifierPairedExpression,

    // --- Field access ---
    FieldSelector,
    FieldProjection,
    ItemAccessExpression,

    // --- Invocation / recursive primary ---
    InvokeExpression,
    RecursivePrimaryExpression,
    ArrayWrapper,
    Csv,

    // --- Types ---
    TypePrimaryType,
    PrimitiveType,
    FunctionType,
    RecordType,
    TableType,
    ListType,
    NullableType,
    NullablePrimitiveType,

    // --- Metadata / parenthesization ---
    MetadataExpression,
    ParenthesizedExpression,

    // --- Identifiers / literals ---
    Identifier,
    GeneralizedIdentifier,
    IdentifierExpression,
    LiteralExpression,
    Constant,

    // --- Section (top-level members) ---
    Section,
    SectionMember,

    // --- Document root ---
    Document,
}

impl AstKind {
    /// The four binary-like kinds that dispatch through `BinOpLookup`/`BinOpPartialLookup` (§4.5.2).
    #[must_use]
    pub const fn is_binary_like(self) -> bool {
        matches!(
            self,
            AstKind::ArithmeticExpression
                | AstKind::EqualityExpression
                | AstKind::LogicalExpression
                | AstKind::RelationalExpression
        )
    }
}

#[cfg(test)]
#[path = "../tests/ast_kind_tests.rs"]
mod tests;
