//! The canonical JSON wire scheme (§6.2): one pair of `serde`-derived types
//! shared by the `Serialize`/`Deserialize` built-ins (§4.4) and by whole
//! `Universe` ingestion/dump (`engine.rs`), so the tagged-object encoding is
//! specified exactly once.

use serde::{Deserialize, Serialize};

use crate::intern::Interner;
use crate::term::Term;

/// The tagged-object wire form of a [`Term`] (plus `Splice`, which is legal
/// only inside `Deserialize` input — a well-formed value never contains
/// one, per §3.3/§6.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "k")]
pub enum TermDto {
    Num { v: f64 },
    Str { v: String },
    Sym { v: String },
    Call { h: Box<TermDto>, a: Vec<TermDto> },
    Splice { items: Vec<TermDto> },
}

/// Converts a ground term to its wire form. Symbols are resolved to their
/// text via `interner` (the wire form never carries interned ids, only
/// names, so it round-trips across processes).
#[must_use]
pub fn to_dto(term: &Term, interner: &Interner) -> TermDto {
    match term {
        Term::Number(n) => TermDto::Num { v: *n },
        Term::Str(s) => TermDto::Str { v: s.clone() },
        Term::Symbol(sym) => TermDto::Sym { v: interner.resolve(*sym).to_string() },
        Term::App(head, args) => TermDto::Call {
            h: Box::new(to_dto(head, interner)),
            a: args.iter().map(|a| to_dto(a, interner)).collect(),
        },
    }
}

/// Converts a wire-form value back to a term, interning any new symbol
/// names into `interner`. Returns `None` for a top-level `Splice` (it has
/// no parent argument vector to flatten into — the same edge case as a
/// top-level `Splat`, §4.4's `fold.rs` comment).
#[must_use]
pub fn from_dto(dto: &TermDto, interner: &mut Interner) -> Option<Term> {
    match dto {
        TermDto::Num { v } => Some(Term::Number(*v)),
        TermDto::Str { v } => Some(Term::Str(v.clone())),
        TermDto::Sym { v } => Some(Term::Symbol(interner.intern(v))),
        TermDto::Call { h, a } => {
            let head = from_dto(h, interner)?;
            let mut args = Vec::with_capacity(a.len());
            for item in a {
                match item {
                    TermDto::Splice { items } => {
                        for inner in items {
                            args.push(from_dto(inner, interner)?);
                        }
                    }
                    other => args.push(from_dto(other, interner)?),
                }
            }
            Some(Term::app(head, args))
        }
        TermDto::Splice { .. } => None,
    }
}
