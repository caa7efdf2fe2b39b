//! The expression algebra (C1) and the splice marker (C2).
//!
//! A [`Term`] is the one data type the whole engine operates on: programs,
//! rules, patterns, templates, and rewrite results are all `Term`s. There is
//! no separate AST for patterns — `Var[Str "x"]` is simply an `Application`
//! whose head happens to be the reserved `Var` symbol (§3.1's design note:
//! "pattern variants remain ordinary applications... recognition is by
//! symbol-equality, not by a distinct type").

use crate::intern::Sym;

/// A node of the expression algebra (§3.1).
///
/// `Term` is semantically immutable: every operation that "changes" a term
/// returns a new one. [`Clone`] is a deep, independent copy (derived), which
/// is what the rewriter relies on when it needs to hand back a modified copy
/// of a subject it does not own.
///
/// `PartialEq` is derived and *is* `DeepEq` from §4.1: atoms compare equal iff
/// their variant and value match, and applications compare head-then-args.
/// `Number`'s `f64` comparison follows IEEE-754 (so `NAN != NAN`), which the
/// spec does not override.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// A finite double-precision real (§3.1).
    Number(f64),
    /// A sequence of Unicode scalar values (§3.1).
    Str(String),
    /// An interned identifier (§3.1, §3.1's interning note). Equality is by
    /// interned id, which is equality by value as long as both symbols come
    /// from the same [`crate::intern::Interner`].
    Symbol(Sym),
    /// A head (itself a term) applied to an ordered vector of arguments.
    /// Arity is not fixed by the head.
    App(Box<Term>, Vec<Term>),
}

/// A piece fed into application construction (§4.1's `MakeApp`).
///
/// Most call sites already hold a flat `Vec<Term>` and can skip this; it
/// exists for the handful of places (argument folding, substitution of a
/// `VarRest`) where a single source position can expand into zero or more
/// output terms (§3.3).
pub enum Piece {
    /// Contributes exactly one term to the argument vector.
    One(Term),
    /// Contributes zero or more terms, spliced in place.
    Many(Vec<Term>),
}

impl Term {
    /// Builds a `Number` term.
    #[must_use]
    pub fn num(v: f64) -> Self {
        Self::Number(v)
    }

    /// Builds a `Str` term.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Builds a `Symbol` term from an already-interned id.
    #[must_use]
    pub fn sym(id: Sym) -> Self {
        Self::Symbol(id)
    }

    /// Builds an application from an already-flat argument vector.
    ///
    /// Use [`Term::app_flatten`] instead when any argument position might
    /// itself expand into a [`Piece::Many`] (a Splice).
    #[must_use]
    pub fn app(head: Term, args: Vec<Term>) -> Self {
        Self::App(Box::new(head), args)
    }

    /// Builds an application, flattening any [`Piece::Many`] in place
    /// (§4.1: `MakeApp`). Flattening is one level deep, which suffices
    /// because a `Piece::Many` is only ever produced fresh at the call site
    /// that consumes it (§4.1, §9).
    #[must_use]
    pub fn app_flatten(head: Term, pieces: Vec<Piece>) -> Self {
        let mut args = Vec::with_capacity(pieces.len());
        for piece in pieces {
            match piece {
                Piece::One(t) => args.push(t),
                Piece::Many(items) => args.extend(items),
            }
        }
        Self::App(Box::new(head), args)
    }

    /// Returns `(head, args)` if this term is an application.
    #[must_use]
    pub fn as_app(&self) -> Option<(&Term, &[Term])> {
        match self {
            Self::App(head, args) => Some((head, args)),
            _ => None,
        }
    }

    /// Returns the interned symbol id if this term is a bare `Symbol`.
    #[must_use]
    pub fn as_symbol(&self) -> Option<Sym> {
        match self {
            Self::Symbol(s) => Some(*s),
            _ => None,
        }
    }

    /// Returns the string contents if this term is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the numeric value if this term is a `Number`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns `(head_sym, args)` if this term is an application whose head
    /// is exactly the symbol `sym`.
    #[must_use]
    pub fn as_app_headed_by(&self, sym: Sym) -> Option<&[Term]> {
        match self {
            Self::App(head, args) if head.as_symbol() == Some(sym) => Some(args),
            _ => None,
        }
    }

    /// `DeepEq` (§4.1), spelled out for call sites that prefer a method over
    /// the derived `==`. Identical to `self == other`.
    #[must_use]
    pub fn deep_eq(&self, other: &Term) -> bool {
        self == other
    }

    /// Sequence equality for rest-variable bindings (§4.2.1): same length,
    /// pairwise `DeepEq`.
    #[must_use]
    pub fn seq_deep_eq(a: &[Term], b: &[Term]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.deep_eq(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::Interner;

    #[test]
    fn deep_eq_is_structural() {
        let mut interner = Interner::new();
        let f = interner.intern("F");
        let a = Term::app(Term::sym(f), vec![Term::num(1.0), Term::str("x")]);
        let b = Term::app(Term::sym(f), vec![Term::num(1.0), Term::str("x")]);
        let c = Term::app(Term::sym(f), vec![Term::num(2.0), Term::str("x")]);
        assert!(a.deep_eq(&b));
        assert!(!a.deep_eq(&c));
    }

    #[test]
    fn deep_eq_false_across_variants() {
        assert!(!Term::num(1.0).deep_eq(&Term::str("1")));
    }

    #[test]
    fn app_flatten_splices_many_in_place() {
        let mut interner = Interner::new();
        let f = interner.intern("F");
        let t = Term::app_flatten(
            Term::sym(f),
            vec![
                Piece::One(Term::num(1.0)),
                Piece::Many(vec![Term::num(2.0), Term::num(3.0)]),
                Piece::One(Term::num(4.0)),
            ],
        );
        let (_, args) = t.as_app().unwrap();
        assert_eq!(args, &[Term::num(1.0), Term::num(2.0), Term::num(3.0), Term::num(4.0)]);
    }
}
