//! A symbolic term-rewriting engine: an immutable expression algebra, a
//! backtracking pattern matcher, substitution, a primitive folder, and a
//! priority-ordered outermost-first rewrite driver, wrapped in an
//! ingest/dispatch/serialize session facade.

mod builtins;
mod dispatch;
mod engine;
mod error;
mod fold;
mod intern;
mod matcher;
mod meta;
mod primitives;
mod reserved;
mod rewrite;
mod subst;
mod term;
mod universe;
mod wire;

pub use crate::{
    builtins::{BuiltinOp, Builtins},
    dispatch::dispatch,
    engine::Engine,
    error::{EngineError, ShapeError},
    fold::{fold, DebugSink, FoldCtx, FreshIdSource, RecordingDebugSink, StderrDebugSink},
    intern::{Interner, Sym},
    matcher::{match_term, Binding, Env},
    meta::apply_rule_rules,
    reserved::Reserved,
    rewrite::{
        apply_once, extract_rules, normalize, normalize_with_trace, NoopTracer, NormalizePolicy, PathStep,
        ProfilingReport, ProfilingTracer, RecordingTracer, RewriteTracer, Rule, StderrTracer, TraceEvent,
    },
    subst::{subst, SubstError},
    term::{Piece, Term},
    universe::{enrich_program_with_effects, program_of, replace_program, replace_rules, rule_rules_of, rules_of},
    wire::{from_dto, to_dto, TermDto},
};
