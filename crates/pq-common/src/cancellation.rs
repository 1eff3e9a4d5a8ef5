//! Cooperative cancellation.
//!
//! The core has no suspension points of its own; a caller on another thread
//! flips the shared flag and the current walk notices it at its next poll.

use crate::error::CancellationError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cheaply-cloneable flag checked between ancestry-walk and type-inspect
/// steps. Cloning shares the underlying flag; flipping any clone trips all
/// of them.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Returns `Err` if cancellation has been requested since this token
    /// was created or last checked. Call between nodes in any recursive
    /// walk so cancellation is observed promptly without extra bookkeeping.
    pub fn check(&self) -> Result<(), CancellationError> {
        if self.is_cancelled() {
            Err(CancellationError)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "../tests/cancellation_tests.rs"]
mod tests;
