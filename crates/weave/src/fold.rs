//! The primitive folder (C5, §4.4): the host-evaluated layer under the
//! rewriter. `fold` is a single pre-order pass; the `Normalize` loop
//! (`rewrite.rs`) is what repeatedly re-folds after each rewrite step.

use ahash::AHashSet;
use rand::RngCore;

use crate::builtins::Builtins;
use crate::intern::{Interner, Sym};
use crate::primitives;
use crate::reserved::Reserved;
use crate::term::{Piece, Term};

/// Sink for the `Debug[label?, value]` built-in's side-effect log (§4.4).
/// Injected rather than hardcoded, so tests can capture it and the CLI/REPL
/// can point it at stderr.
pub trait DebugSink {
    fn log_debug(&mut self, line: &str);
}

/// The default sink: one line per `Debug` call, to stderr.
#[derive(Debug, Default)]
pub struct StderrDebugSink;

impl DebugSink for StderrDebugSink {
    fn log_debug(&mut self, line: &str) {
        eprintln!("{line}");
    }
}

/// A sink that only accumulates, for tests and for embedders that want to
/// inspect debug output programmatically instead of printing it.
#[derive(Debug, Default)]
pub struct RecordingDebugSink {
    pub lines: Vec<String>,
}

impl DebugSink for RecordingDebugSink {
    fn log_debug(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// `FreshId`'s counter (§4.4, §9's design note: "an injected monotonic
/// source", never a global). `epoch` disambiguates counters from different
/// engine instances/process runs; `counter` is the monotonic part.
#[derive(Debug, Clone)]
pub struct FreshIdSource {
    epoch: u64,
    counter: u64,
}

impl FreshIdSource {
    #[must_use]
    pub fn new(epoch: u64) -> Self {
        Self { epoch, counter: 0 }
    }

    pub fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("id_{}_{}", self.epoch, self.counter)
    }
}

/// Everything a fold pass needs beyond the term itself: the reserved-symbol
/// table, the built-in dispatch table, a per-call skip-list (§4.4's "single
/// policy parameter"), the mutable interner (only `Deserialize` and the
/// string-splitting built-ins mint new symbols), and the injected impure
/// sources (`FreshId` counter, RNG, debug sink).
pub struct FoldCtx<'a> {
    pub reserved: &'a Reserved,
    pub builtins: &'a Builtins,
    pub skip: &'a AHashSet<Sym>,
    pub interner: &'a mut Interner,
    pub fresh: &'a mut FreshIdSource,
    pub rng: &'a mut dyn RngCore,
    pub debug: &'a mut dyn DebugSink,
}

/// Folds `term`, per §4.4's strategy: recursively fold the head and each
/// argument (flattening any `Splat` result in the argument vector), then try
/// the built-in table on the folded head.
pub fn fold(term: &Term, ctx: &mut FoldCtx) -> Term {
    match term {
        Term::Number(_) | Term::Str(_) | Term::Symbol(_) => term.clone(),
        Term::App(head, args) => {
            let folded_head = fold(head, ctx);

            let mut folded_args = Vec::with_capacity(args.len());
            for arg in args {
                let folded = fold(arg, ctx);
                if let Some(items) = splat_items(&folded, ctx.reserved) {
                    folded_args.extend(items);
                } else {
                    folded_args.push(folded);
                }
            }

            if let Term::Symbol(sym) = &folded_head {
                if !ctx.skip.contains(sym) {
                    if let Some(op) = ctx.builtins.lookup(*sym) {
                        if let Some(result) = primitives::try_fold(op, &folded_args, ctx) {
                            return result;
                        }
                    }
                }
            }

            Term::App(Box::new(folded_head), folded_args)
        }
    }
}

/// If `term` is a (already-folded) `Splat`/`...!` application, returns its
/// argument vector for splicing into the parent's arguments. `Splat` is not
/// in the built-in table because it never produces a literal `Term` — its
/// result only makes sense flattened into a surrounding argument vector
/// (§3.3, §4.4's Splat group).
fn splat_items<'t>(term: &'t Term, reserved: &Reserved) -> Option<&'t [Term]> {
    match term {
        Term::App(head, args) => head.as_symbol().filter(|s| reserved.is_splat(*s)).map(|_| args.as_slice()),
        _ => None,
    }
}

/// Flattens a single argument position that may itself be a `Piece::Many`
/// (used by callers building a fresh argument vector, e.g. `Dispatch`).
#[must_use]
pub fn flatten(pieces: Vec<Piece>) -> Vec<Term> {
    let mut out = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match piece {
            Piece::One(t) => out.push(t),
            Piece::Many(items) => out.extend(items),
        }
    }
    out
}

/// Test-only scaffolding for building a [`FoldCtx`] without repeating the
/// same five-field struct literal in every primitive module's test suite.
#[cfg(test)]
pub(crate) mod test_support {
    use rand::rngs::mock::StepRng;

    use super::{AHashSet, Builtins, DebugSink, FoldCtx, FreshIdSource, Interner, Reserved, Sym};

    pub struct Harness {
        pub interner: Interner,
        pub reserved: Reserved,
        pub builtins: Builtins,
        pub skip: AHashSet<Sym>,
        pub fresh: FreshIdSource,
        pub rng: StepRng,
        pub debug: super::RecordingDebugSink,
    }

    impl Harness {
        pub fn new() -> Self {
            let mut interner = Interner::new();
            let reserved = Reserved::new(&mut interner);
            let builtins = Builtins::new(&mut interner);
            Self {
                interner,
                reserved,
                builtins,
                skip: AHashSet::default(),
                fresh: FreshIdSource::new(0),
                rng: StepRng::new(0, 1),
                debug: super::RecordingDebugSink::default(),
            }
        }

        pub fn ctx(&mut self) -> FoldCtx<'_> {
            FoldCtx {
                reserved: &self.reserved,
                builtins: &self.builtins,
                skip: &self.skip,
                interner: &mut self.interner,
                fresh: &mut self.fresh,
                rng: &mut self.rng,
                debug: &mut self.debug,
            }
        }
    }

    impl Default for Harness {
        fn default() -> Self {
            Self::new()
        }
    }

    #[allow(dead_code)]
    fn assert_debug_sink_is_usable(sink: &mut dyn DebugSink) {
        sink.log_debug("");
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;

    /// Add[Mul[2,3],4] folds to 10 with no rules involved at all.
    #[test]
    fn arithmetic_folds_bottom_up() {
        let mut h = Harness::new();
        let add = h.interner.intern("Add");
        let mul = h.interner.intern("Mul");
        let t = Term::app(
            Term::sym(add),
            vec![
                Term::app(Term::sym(mul), vec![Term::num(2.0), Term::num(3.0)]),
                Term::num(4.0),
            ],
        );
        let mut ctx = h.ctx();
        assert_eq!(fold(&t, &mut ctx), Term::num(10.0));
    }

    #[test]
    fn splat_flattens_into_parent_argument_vector() {
        let mut h = Harness::new();
        let f = h.interner.intern("F");
        let splat_sym = h.reserved.splat_long;
        let splat = Term::app(Term::sym(splat_sym), vec![Term::num(1.0), Term::num(2.0)]);
        let t = Term::app(Term::sym(f), vec![splat, Term::num(3.0)]);
        let mut ctx = h.ctx();
        let folded = fold(&t, &mut ctx);
        let (_, args) = folded.as_app().unwrap();
        assert_eq!(args, &[Term::num(1.0), Term::num(2.0), Term::num(3.0)]);
    }

    #[test]
    fn skip_list_suppresses_folding_of_named_symbol() {
        let mut h = Harness::new();
        let add = h.interner.intern("Add");
        h.skip.insert(add);
        let t = Term::app(Term::sym(add), vec![Term::num(1.0), Term::num(2.0)]);
        let mut ctx = h.ctx();
        assert_eq!(fold(&t, &mut ctx), t);
    }
}
