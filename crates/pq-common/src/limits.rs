//! Centralized recursion and iteration limits.
//!
//! Mirrors `tsz-common::limits`: a single place to tune thresholds used
//! throughout the core, so a bound isn't duplicated (with a different
//! value) at every call site.

/// Maximum recursion depth for the type inspector (C5). A `RecursivePrimaryExpression`
/// tail, nested `FieldSelector`/`FieldProjection` chains, and nested
/// `ParenthesizedExpression`s all share this bound.
pub const MAX_TYPE_RECURSION_DEPTH: usize = 512;

/// Maximum number of ancestry-walk steps (C3's parent-chain walk, C6's
/// upward walk, C8's invoke-expression search). A well-formed document
/// never approaches this; it exists to fail loudly on a cyclic parent
/// map rather than loop forever.
pub const MAX_ANCESTRY_WALK_STEPS: usize = 10_000;

/// Maximum number of hops the identifier dereferencer (§4.4) follows
/// before giving up and returning the original identifier unchanged.
/// A cycle is detected via a visited-set before this bound is reached;
/// this is a secondary backstop.
pub const MAX_DEREFERENCE_HOPS: usize = 256;
