//! The closed keyword vocabulary (SPEC_FULL §6.5): every reserved word the
//! autocomplete resolver (C7) can offer or require. Grounded in the
//! M/Power-Query-style grammar implied by the GLOSSARY and the end-to-end
//! scenarios in spec.md §8.

/// A single reserved word in the query language's grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Keyword {
    And,
    As,
    Each,
    Else,
    Error,
    False,
    If,
    In,
    Is,
    Let,
    Meta,
    Not,
    Nullable,
    Or,
    Otherwise,
    Section,
    Shared,
    Then,
    True,
    Try,
    Type,
    /// A primitive type name usable where a type is expected
    /// (`number`, `text`, `logical`, `list`, `record`, `table`, `function`,
    /// `any`, `anynonnull`, `binary`, `date`, `datetime`, `datetimezone`,
    /// `duration`, `time`, `null`, `action`).
    PrimitiveTypeName(&'static str),
}

impl Keyword {
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Keyword::And => "and",
            Keyword::As => "as",
            Keyword::Each => "each",
            Keyword::Else => "else",
            Keyword::Error => "error",
            Keyword::False => "false",
            Keyword::If => "if",
            Keyword::In => "in",
            Keyword::Is => "is",
            Keyword::Let => "let",
            Keyword::Meta => "meta",
            Keyword::Not => "not",
            Keyword::Nullable => "nullable",
            Keyword::Or => "or",
            Keyword::Otherwise => "otherwise",
            Keyword::Section => "section",
            Keyword::Shared => "shared",
            Keyword::Then => "then",
            Keyword::True => "true",
            Keyword::Try => "try",
            Keyword::Type => "type",
            Keyword::PrimitiveTypeName(name) => name,
        }
    }
}

/// Every primitive type name the grammar accepts in type position.
pub const PRIMITIVE_TYPE_NAMES: &[&str] = &[
    "action",
    "any",
    "anynonnull",
    "binary",
    "date",
    "datetime",
    "datetimezone",
    "duration",
    "function",
    "list",
    "logical",
    "number",
    "null",
    "record",
    "table",
    "text",
    "time",
    "type",
];

/// The full closed vocabulary, used as the fallback `Expression` keyword set
/// (spec §4.7's "nearest to root ... fallthrough default"): any expression
/// position accepts an operator/control keyword, `true`/`false`/`null` as a
/// literal, or the start of a primitive-type expression (`type number`).
#[must_use]
pub fn expression_keywords() -> Vec<Keyword> {
    let mut keywords = vec![
        Keyword::Each,
        Keyword::Error,
        Keyword::False,
        Keyword::If,
        Keyword::Let,
        Keyword::Not,
        Keyword::True,
        Keyword::Try,
        Keyword::Type,
    ];
    keywords.extend(PRIMITIVE_TYPE_NAMES.iter().map(|name| Keyword::PrimitiveTypeName(name)));
    keywords
}

/// The keyword set offered inside a type position (§4.6's `PrimaryType`/
/// `NullablePrimitive` slots): a primitive type name, or `nullable` to
/// prefix one.
#[must_use]
pub fn type_keywords() -> Vec<Keyword> {
    let mut keywords = vec![Keyword::Nullable];
    keywords.extend(PRIMITIVE_TYPE_NAMES.iter().map(|name| Keyword::PrimitiveTypeName(name)));
    keywords
}

#[cfg(test)]
#[path = "../tests/keyword_tests.rs"]
mod tests;
