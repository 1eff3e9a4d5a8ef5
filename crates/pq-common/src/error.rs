//! The two error kinds the inspection core ever produces.
//!
//! There is no recoverable error class for "unknown type" or "unresolved
//! identifier" — those flow as `Type::Unknown`/`ScopeItem::Undefined`. An
//! `InvariantError` means a programmer/logic bug (a node id the map doesn't
//! know about, a node kind the grammar forbids at a slot, a dereference
//! cycle that should have been caught earlier). Neither error type reaches
//! for `thiserror`/`anyhow`; both implement `Display`/`Error` by hand,
//! matching every other error enum in the corpus this core is grounded on.

use std::fmt;

/// A detail attached to an `InvariantError` for diagnostics. Kept as a small
/// closed enum rather than an arbitrary JSON blob so callers can match on it
/// without a serialization round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    NodeId(u32),
    NodeKind(String),
    Name(String),
    Count(usize),
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDetail::NodeId(id) => write!(f, "node_id={id}"),
            ErrorDetail::NodeKind(kind) => write!(f, "kind={kind}"),
            ErrorDetail::Name(name) => write!(f, "name={name}"),
            ErrorDetail::Count(count) => write!(f, "count={count}"),
        }
    }
}

/// A programmer/logic bug surfaced as data instead of a panic.
#[derive(Debug, Clone, PartialEq)]
pub struct InvariantError {
    pub reason: String,
    pub details: Vec<ErrorDetail>,
}

impl InvariantError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            details: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: ErrorDetail) -> Self {
        self.details.push(detail);
        self
    }

    #[must_use]
    pub fn node_not_found(id: u32) -> Self {
        Self::new("node id not present in the node-id map").with_detail(ErrorDetail::NodeId(id))
    }

    #[must_use]
    pub fn unexpected_kind(expected: impl Into<String>, found_id: u32) -> Self {
        Self::new("node kind did not match what the grammar guarantees at this slot")
            .with_detail(ErrorDetail::NodeKind(expected.into()))
            .with_detail(ErrorDetail::NodeId(found_id))
    }

    #[must_use]
    pub fn recursion_limit_exceeded(limit: usize) -> Self {
        Self::new("recursion limit exceeded").with_detail(ErrorDetail::Count(limit))
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invariant violation: {}", self.reason)?;
        for detail in &self.details {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

impl std::error::Error for InvariantError {}

/// Raised when a caller-supplied `CancellationToken` trips mid-walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationError;

impl fmt::Display for CancellationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inspection was cancelled")
    }
}

impl std::error::Error for CancellationError {}

/// The error type every public entry point in the core returns.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    Invariant(InvariantError),
    Cancelled(CancellationError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Invariant(err) => write!(f, "{err}"),
            CoreError::Cancelled(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<InvariantError> for CoreError {
    fn from(err: InvariantError) -> Self {
        CoreError::Invariant(err)
    }
}

impl From<CancellationError> for CoreError {
    fn from(err: CancellationError) -> Self {
        CoreError::Cancelled(err)
    }
}

#[cfg(test)]
#[path = "../tests/error_tests.rs"]
mod tests;
