//! The engine/session facade (C11, §6.3): bundles an interner, the built-in
//! and reserved tables, a loaded `Universe` and its extracted rules, and the
//! injected impure sources, behind one ingest → dispatch → serialize API.
//! This is what the CLI and REPL binaries (§0.4) construct and hold.

use ahash::AHashSet;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::builtins::Builtins;
use crate::dispatch::dispatch as dispatch_impl;
use crate::error::EngineError;
use crate::fold::{fold, DebugSink, FoldCtx, FreshIdSource, StderrDebugSink};
use crate::intern::Interner;
use crate::meta::apply_rule_rules;
use crate::reserved::Reserved;
use crate::rewrite::{extract_rules, normalize, Rule, RewriteTracer};
use crate::rewrite::NormalizePolicy;
use crate::term::Term;
use crate::universe::{enrich_program_with_effects, program_of, rules_of};
use crate::wire::{from_dto, to_dto, TermDto};

/// One loaded session: a `Universe`, its effective (meta-rule-expanded)
/// rule set, and everything the folder/driver need to keep running.
pub struct Engine {
    interner: Interner,
    reserved: Reserved,
    builtins: Builtins,
    skip: AHashSet<crate::intern::Sym>,
    fresh: FreshIdSource,
    rng: StdRng,
    debug: Box<dyn DebugSink>,
    universe: Term,
    rules: Vec<Rule>,
}

impl Engine {
    /// Builds an engine from a `Universe` JSON document (§6.2): parses it,
    /// enriches `Program` with `Effects` (§3.5), runs the meta-rule pass
    /// (§4.6), and extracts the effective `Rules` (§4.5.1).
    pub fn ingest(json: &str, rng_seed: u64) -> Result<Self, EngineError> {
        let mut interner = Interner::new();
        let reserved = Reserved::new(&mut interner);
        let builtins = Builtins::new(&mut interner);

        let dto: TermDto = serde_json::from_str(json)
            .map_err(|_| EngineError::Shape(crate::error::ShapeError::NotAUniverse))?;
        let raw_universe =
            from_dto(&dto, &mut interner).ok_or(EngineError::Shape(crate::error::ShapeError::NotAUniverse))?;
        let enriched = enrich_program_with_effects(&raw_universe, &reserved);

        let mut engine = Self {
            interner,
            reserved,
            builtins,
            skip: AHashSet::default(),
            fresh: FreshIdSource::new(rng_seed),
            rng: StdRng::seed_from_u64(rng_seed),
            debug: Box::new(StderrDebugSink),
            universe: enriched,
            rules: Vec::new(),
        };

        let reserved = engine.reserved;
        let pre_meta_universe = engine.universe.clone();
        let universe = {
            let mut ctx = engine.ctx();
            apply_rule_rules(&pre_meta_universe, &reserved, &mut ctx)?
        };
        engine.universe = universe;

        let rules_args = rules_of(&engine.universe, &engine.reserved)?;
        engine.rules = extract_rules(rules_args, &engine.reserved)?;

        Ok(engine)
    }

    fn ctx(&mut self) -> FoldCtx<'_> {
        FoldCtx {
            reserved: &self.reserved,
            builtins: &self.builtins,
            skip: &self.skip,
            interner: &mut self.interner,
            fresh: &mut self.fresh,
            rng: &mut self.rng,
            debug: &mut *self.debug,
        }
    }

    /// Normalizes the `Program` section against the engine's effective rules
    /// and stores the result back into the held `Universe`.
    pub fn normalize_program<Tr: RewriteTracer>(&mut self, tracer: &mut Tr) -> Result<(), EngineError> {
        let program_args = program_of(&self.universe, &self.reserved)?;
        let program = Term::app(Term::sym(self.reserved.program), program_args.to_vec());
        let rules = self.rules.clone();
        let reserved = self.reserved;
        let result = {
            let mut ctx = self.ctx();
            normalize(&program, &rules, &NormalizePolicy::default(), &mut ctx, tracer)?
        };
        let new_children = match result.as_app_headed_by(reserved.program) {
            Some(args) => args.to_vec(),
            None => vec![result],
        };
        self.universe = crate::universe::replace_program(&self.universe, new_children, &reserved);
        Ok(())
    }

    /// Runs `Dispatch` (§4.7) with `action` and stores the resulting
    /// `Universe`.
    pub fn dispatch<Tr: RewriteTracer>(&mut self, action: &Term, tracer: &mut Tr) -> Result<(), EngineError> {
        let rules = self.rules.clone();
        let reserved = self.reserved;
        let universe_before = self.universe.clone();
        let result = {
            let mut ctx = self.ctx();
            dispatch_impl(&universe_before, &rules, action, &reserved, &mut ctx, tracer)?
        };
        self.universe = result;
        Ok(())
    }

    /// Folds `term` once using the engine's built-in table (exposed for the
    /// REPL and for callers that want `Fold` in isolation, §6.3).
    pub fn fold_term(&mut self, term: &Term) -> Term {
        let mut ctx = self.ctx();
        fold(term, &mut ctx)
    }

    /// Parses a JSON action term (§6.2) and interns any new symbol names.
    pub fn parse_action(&mut self, json: &str) -> Option<Term> {
        let dto: TermDto = serde_json::from_str(json).ok()?;
        from_dto(&dto, &mut self.interner)
    }

    /// The currently held `Program` section's arguments.
    #[must_use]
    pub fn program(&self) -> &[Term] {
        program_of(&self.universe, &self.reserved).unwrap_or(&[])
    }

    /// Serializes the whole `Universe` back to canonical JSON (§6.2).
    #[must_use]
    pub fn serialize_universe(&self) -> String {
        let dto = to_dto(&self.universe, &self.interner);
        serde_json::to_string(&dto).unwrap_or_default()
    }

    /// Resolves an interned symbol's text (for diagnostics/printing).
    #[must_use]
    pub fn resolve(&self, sym: crate::intern::Sym) -> &str {
        self.interner.resolve(sym)
    }

    /// Swaps in a different debug sink (e.g. a `RecordingDebugSink` for
    /// tests or an embedder that wants `Debug[...]` output captured instead
    /// of printed).
    pub fn set_debug_sink(&mut self, sink: Box<dyn DebugSink>) {
        self.debug = sink;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rewrite::NoopTracer;

    fn universe_json(program: &str, rules: &str) -> String {
        format!(
            r#"{{"k":"Call","h":{{"k":"Sym","v":"Universe"}},"a":[
                {{"k":"Call","h":{{"k":"Sym","v":"Program"}},"a":[{program}]}},
                {{"k":"Call","h":{{"k":"Sym","v":"Rules"}},"a":[{rules}]}},
                {{"k":"Call","h":{{"k":"Sym","v":"RuleRules"}},"a":[]}}
            ]}}"#
        )
    }

    /// Add[Mul[2,3],4] folds to 10 with no rules involved.
    #[test]
    fn ingests_and_normalizes_pure_arithmetic() {
        let program = r#"{"k":"Call","h":{"k":"Sym","v":"Add"},"a":[
            {"k":"Call","h":{"k":"Sym","v":"Mul"},"a":[{"k":"Num","v":2.0},{"k":"Num","v":3.0}]},
            {"k":"Num","v":4.0}
        ]}"#;
        let json = universe_json(program, "");
        let mut engine = Engine::ingest(&json, 0).unwrap();
        let mut tracer = NoopTracer;
        engine.normalize_program(&mut tracer).unwrap();
        assert_eq!(engine.program(), &[Term::num(10.0)]);
    }

    #[test]
    fn round_trips_universe_through_serialize() {
        let json = universe_json(r#"{"k":"Num","v":1.0}"#, "");
        let engine = Engine::ingest(&json, 0).unwrap();
        let dumped = engine.serialize_universe();
        let reingested = Engine::ingest(&dumped, 0).unwrap();
        assert_eq!(engine.program(), reingested.program());
    }
}
