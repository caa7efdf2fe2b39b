//! Symbol interning.
//!
//! Every [`crate::term::Term::Symbol`] carries a [`Sym`] rather than an owned
//! string. `Sym` is `Copy` and small, so deep equality on symbols (§3.1) reduces
//! to comparing two integers instead of comparing UTF-8 byte-by-byte, and
//! reserved/built-in names (§6.1) are looked up once at construction time
//! instead of being re-parsed out of every term that mentions them.
//!
//! The interner is single-threaded (`lasso::Rodeo`, not `ThreadedRodeo`),
//! matching the engine's single-threaded cooperative scheduling model (§5).

use lasso::Rodeo;

/// An interned symbol id. Cheap to copy, compare, and hash.
pub type Sym = lasso::Spur;

/// Owns the symbol table for one engine instance.
///
/// Two `Interner`s never share ids: a [`Sym`] minted by one interner is
/// meaningless against another. An [`crate::engine::Engine`] owns exactly one
/// `Interner` for its whole lifetime.
#[derive(Debug, Default)]
pub struct Interner {
    rodeo: Rodeo,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self { rodeo: Rodeo::new() }
    }

    /// Interns `text`, returning the existing id if `text` was seen before.
    pub fn intern(&mut self, text: &str) -> Sym {
        self.rodeo.get_or_intern(text)
    }

    /// Looks up `text` without interning it.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Sym> {
        self.rodeo.get(text)
    }

    /// Resolves an id back to its text.
    ///
    /// # Panics
    /// Panics if `sym` was not minted by this interner.
    #[must_use]
    pub fn resolve(&self, sym: Sym) -> &str {
        self.rodeo.resolve(&sym)
    }
}
