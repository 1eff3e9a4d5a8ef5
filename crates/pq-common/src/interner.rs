//! String interning for identifier and field-name deduplication.
//!
//! Scope and type maps key on identifier/field names constantly during a
//! single inspection pass; interning them once up front turns repeated
//! `Name → ScopeItem`/`Name → Type` lookups into integer comparisons instead
//! of string comparisons.

use rustc_hash::FxHashMap;
use std::fmt;

/// An interned string. Cheap to copy and compare; dereferences to the
/// original text via the `Interner` that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Atom(u32);

impl Atom {
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({})", self.0)
    }
}

/// Owns the backing storage for every `Atom` handed out. A caller inspecting
/// the same document across multiple calls keeps one `Interner` alive for
/// all of them — every cache keyed on `Atom` (`NodeScope`, `scope_type`)
/// assumes the instance that produced a given atom is the one resolving it
/// back, so a fresh `Interner` per call would silently desync those caches
/// from the names they key.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Atom>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `text`, returning the same `Atom` for equal strings.
    pub fn intern(&mut self, text: &str) -> Atom {
        if let Some(existing) = self.lookup.get(text) {
            return *existing;
        }
        let id = Atom(u32::try_from(self.strings.len()).expect("interner overflowed u32"));
        let boxed: Box<str> = text.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, id);
        id
    }

    /// Resolves an `Atom` back to its text. Panics if the atom did not come
    /// from this interner.
    #[must_use]
    pub fn resolve(&self, atom: Atom) -> &str {
        &self.strings[atom.0 as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
