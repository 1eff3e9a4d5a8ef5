//! Caller-facing settings (spec §6.2).
//!
//! `CommonSettings` is the only configuration surface the core exposes.
//! There is no config file to load — the façade that would own one is out
//! of scope — so this is a plain struct, not a loader.

use crate::cancellation::CancellationToken;

/// The default locale used when a caller doesn't select one. Template
/// bodies for any locale live in the (out-of-scope) localization module;
/// this core only ever threads the selector through.
pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, Clone)]
pub struct CommonSettings {
    pub locale: String,
    pub cancellation_token: Option<CancellationToken>,
}

impl Default for CommonSettings {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            cancellation_token: None,
        }
    }
}

impl CommonSettings {
    #[must_use]
    pub fn new(locale: impl Into<String>, cancellation_token: Option<CancellationToken>) -> Self {
        Self {
            locale: locale.into(),
            cancellation_token,
        }
    }

    /// Returns `Err` if the settings carry a cancellation token that has
    /// tripped. Callers without a token never cancel.
    pub fn check_cancellation(&self) -> Result<(), crate::error::CancellationError> {
        match &self.cancellation_token {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/settings_tests.rs"]
mod tests;
