//! Shared types for the query-inspect semantic inspection core.
//!
//! This crate provides foundational types used across every inspection
//! crate (`pq-syntax`, `pq-scope`, `pq-types`, `pq-inspect`):
//! - String interning (`Atom`, `Interner`)
//! - Source positions (`Position`, a caret between code units)
//! - The two error kinds the core ever produces (`InvariantError`, `CancellationError`)
//! - A cooperative `CancellationToken`
//! - Centralized recursion/iteration limits

pub mod cancellation;
pub mod error;
pub mod interner;
pub mod limits;
pub mod position;
pub mod settings;

pub use cancellation::CancellationToken;
pub use error::{CancellationError, CoreError, InvariantError};
pub use interner::{Atom, Interner};
pub use position::Position;
pub use settings::CommonSettings;
