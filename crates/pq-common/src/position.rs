//! Caret position within a source document.
//!
//! A caret sits *between* code units, not on one. `Position` is ordered so
//! that two carets can be compared directly; the three-way before/on/after
//! relation against a token range lives in `pq_syntax::position` because it
//! needs to know about token ranges and context nodes.

/// A caret position: 0-indexed line, 0-indexed code unit within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// 0-indexed line number.
    pub line_number: u32,
    /// 0-indexed code unit offset within the line.
    pub line_code_unit: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line_number: u32, line_code_unit: u32) -> Self {
        Self {
            line_number,
            line_code_unit,
        }
    }
}

#[cfg(test)]
#[path = "../tests/position_tests.rs"]
mod tests;
