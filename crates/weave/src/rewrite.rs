//! The rewrite driver (C6, §4.5): rule extraction, one outermost-first step
//! (`ApplyOnce`), and fixed-point iteration (`Normalize`), plus the zero-cost
//! tracer hierarchy (§0.1) that observes it without changing its semantics.

use std::fmt;

use crate::error::ShapeError;
use crate::fold::{fold, FoldCtx};
use crate::matcher::{match_term, Env};
use crate::reserved::Reserved;
use crate::subst::{subst, SubstError};
use crate::term::Term;

/// One extracted rule record (§3.4, §4.5.1).
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub lhs: Term,
    pub rhs: Term,
    pub guard: Option<Term>,
    pub prio: f64,
    /// Position in the original `Rules[...]`/`RuleRules[...]` vector, used to
    /// break priority ties (stable sort, §4.5.1, §9's open question).
    pub source_index: usize,
}

/// Extracts rule records from a `Rules[...]`/`RuleRules[...]` section,
/// sorted stably by descending priority.
pub fn extract_rules(section_args: &[Term], reserved: &Reserved) -> Result<Vec<Rule>, ShapeError> {
    let mut rules = Vec::with_capacity(section_args.len());
    for (index, r) in section_args.iter().enumerate() {
        rules.push(extract_one(r, reserved, index)?);
    }
    rules.sort_by(|a, b| b.prio.partial_cmp(&a.prio).unwrap_or(std::cmp::Ordering::Equal));
    Ok(rules)
}

fn extract_one(r: &Term, reserved: &Reserved, index: usize) -> Result<Rule, ShapeError> {
    let args = r
        .as_app_headed_by(reserved.rule)
        .ok_or(ShapeError::MalformedRule { index, reason: "not an R[...] application" })?;

    let [name, lhs, rhs, rest @ ..] = args else {
        return Err(ShapeError::MalformedRule { index, reason: "fewer than 3 arguments" });
    };

    let name = name
        .as_str()
        .ok_or(ShapeError::MalformedRule { index, reason: "name is not a String" })?;
    if name == "_" {
        return Err(ShapeError::MalformedRule { index, reason: "name is the wildcard \"_\"" });
    }

    let (guard, prio) = parse_metadata(rest, reserved, index)?;

    Ok(Rule {
        name: name.to_string(),
        lhs: lhs.clone(),
        rhs: rhs.clone(),
        guard,
        prio,
        source_index: index,
    })
}

/// Parses a rule's trailing metadata (§3.4): if any `:guard`/`:prio` keyword
/// appears, keyword parsing is used exclusively (§9's open question resolves
/// mixing this way); otherwise the legacy positional encoding applies.
fn parse_metadata(rest: &[Term], reserved: &Reserved, index: usize) -> Result<(Option<Term>, f64), ShapeError> {
    let has_keyword = rest.iter().any(|t| t.as_symbol() == Some(reserved.guard_kw) || t.as_symbol() == Some(reserved.prio_kw));

    if has_keyword {
        let mut guard = None;
        let mut prio = 0.0;
        let mut i = 0;
        while i < rest.len() {
            if rest[i].as_symbol() == Some(reserved.guard_kw) {
                let value = rest
                    .get(i + 1)
                    .ok_or(ShapeError::MalformedRule { index, reason: ":guard with no following term" })?;
                guard = Some(value.clone());
                i += 2;
            } else if rest[i].as_symbol() == Some(reserved.prio_kw) {
                let value = rest
                    .get(i + 1)
                    .and_then(Term::as_number)
                    .ok_or(ShapeError::MalformedRule { index, reason: ":prio with no following Number" })?;
                prio = value;
                i += 2;
            } else {
                i += 1;
            }
        }
        return Ok((guard, prio));
    }

    match rest {
        [] => Ok((None, 0.0)),
        [x] => match x.as_number() {
            Some(n) => Ok((None, n)),
            None => Ok((Some(x.clone()), 0.0)),
        },
        [x, y, ..] => {
            let prio = y
                .as_number()
                .ok_or(ShapeError::MalformedRule { index, reason: "5th legacy argument is not a Number" })?;
            Ok((Some(x.clone()), prio))
        }
    }
}

/// A step into a term, used by the tracing variant to report where a rule
/// fired (§4.5.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    Head,
    Arg(usize),
}

/// Hook points over the rewrite driver (§0.1, §4.5.4). Every method defaults
/// to an empty body; `Normalize`/`ApplyOnce` are generic over `Tr:
/// RewriteTracer`, so a caller using [`NoopTracer`] pays nothing — the
/// compiler monomorphizes the hook calls away.
pub trait RewriteTracer {
    #[inline(always)]
    fn on_candidate(&mut self, _rule_name: &str, _node: &Term) {}

    #[inline(always)]
    fn on_fire(&mut self, _step: usize, _rule_name: &str, _path: &[PathStep], _pre: &Term, _post: &Term) {}

    #[inline(always)]
    fn on_fold(&mut self, _step: usize, _term: &Term) {}

    #[inline(always)]
    fn on_budget_exceeded(&mut self, _budget: usize) {}

    #[inline(always)]
    fn on_dispatch_mis_normalization(&mut self, _result: &Term) {}
}

/// The default, zero-cost tracer. Every hook is the trait's empty default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl RewriteTracer for NoopTracer {}

/// Writes one human-readable line per firing/budget/dispatch-warning event to
/// stderr. `on_candidate`/`on_fold` stay silent — logging every rule-times-node
/// attempt would flood stderr on any non-trivial rule set.
#[derive(Debug, Default)]
pub struct StderrTracer;

impl RewriteTracer for StderrTracer {
    fn on_fire(&mut self, step: usize, rule_name: &str, path: &[PathStep], pre: &Term, post: &Term) {
        eprintln!("[{step}] {rule_name} at {path:?}: {pre:?} -> {post:?}");
    }

    fn on_budget_exceeded(&mut self, budget: usize) {
        eprintln!("--- step budget exceeded ({budget} steps) ---");
    }

    fn on_dispatch_mis_normalization(&mut self, result: &Term) {
        eprintln!("warning: dispatch result is neither Program nor App: {result:?}");
    }
}

/// One recorded event (§4.5.4). [`RecordingTracer`] accumulates these for
/// deterministic replay or post-mortem inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    Fire { step: usize, rule_name: String, path: Vec<PathStep>, pre: Term, post: Term },
    Fold { step: usize, term: Term },
    BudgetExceeded { budget: usize },
}

/// Records every event into a `Vec<TraceEvent>`. This is what
/// `NormalizeWithTrace` (§4.5.4) runs `Normalize` with — it is not a separate
/// code path, just another `RewriteTracer` instantiation.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    events: Vec<TraceEvent>,
}

impl RecordingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }
}

impl RewriteTracer for RecordingTracer {
    fn on_fire(&mut self, step: usize, rule_name: &str, path: &[PathStep], pre: &Term, post: &Term) {
        self.events.push(TraceEvent::Fire {
            step,
            rule_name: rule_name.to_string(),
            path: path.to_vec(),
            pre: pre.clone(),
            post: post.clone(),
        });
    }

    fn on_fold(&mut self, step: usize, term: &Term) {
        self.events.push(TraceEvent::Fold { step, term: term.clone() });
    }

    fn on_budget_exceeded(&mut self, budget: usize) {
        self.events.push(TraceEvent::BudgetExceeded { budget });
    }
}

/// Accumulates per-rule-name firing counts and a cumulative fold-step count
/// (§0.1). Retrieve results via [`ProfilingTracer::report`].
#[derive(Debug, Default)]
pub struct ProfilingTracer {
    fires: ahash::AHashMap<String, u64>,
    fold_steps: u64,
    total_fires: u64,
}

impl ProfilingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn report(&self) -> ProfilingReport {
        let mut fires: Vec<_> = self.fires.iter().map(|(k, &v)| (k.clone(), v)).collect();
        fires.sort_by(|a, b| b.1.cmp(&a.1));
        ProfilingReport {
            fires,
            fold_steps: self.fold_steps,
            total_fires: self.total_fires,
        }
    }
}

impl RewriteTracer for ProfilingTracer {
    fn on_fire(&mut self, _step: usize, rule_name: &str, _path: &[PathStep], _pre: &Term, _post: &Term) {
        *self.fires.entry(rule_name.to_string()).or_insert(0) += 1;
        self.total_fires += 1;
    }

    fn on_fold(&mut self, _step: usize, _term: &Term) {
        self.fold_steps += 1;
    }
}

/// Summary report from a profiling trace.
#[derive(Debug)]
pub struct ProfilingReport {
    pub fires: Vec<(String, u64)>,
    pub fold_steps: u64,
    pub total_fires: u64,
}

impl fmt::Display for ProfilingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Rewrite Profiling Report ===")?;
        writeln!(f, "Total fires: {}", self.total_fires)?;
        writeln!(f, "Fold passes: {}", self.fold_steps)?;
        writeln!(f)?;
        writeln!(f, "--- Firing Frequency ---")?;
        for (name, count) in &self.fires {
            writeln!(f, "  {name:<30} {count:>10}")?;
        }
        Ok(())
    }
}

/// The two policy knobs on the driver (§0.3, §4.5.3).
#[derive(Debug, Clone, Copy)]
pub struct NormalizePolicy {
    pub max_steps: usize,
    pub skip_prims: bool,
}

impl Default for NormalizePolicy {
    fn default() -> Self {
        Self { max_steps: 10_000, skip_prims: false }
    }
}

/// Tries every rule (already priority-sorted) against `node` itself (not its
/// children — the caller handles recursion). Returns the substituted
/// replacement on the first rule that matches and whose guard (if any)
/// reduces to `True`.
fn try_node<'r, Tr: RewriteTracer>(
    node: &Term,
    rules: &'r [Rule],
    ctx: &mut FoldCtx,
    tracer: &mut Tr,
) -> Result<Option<(&'r str, Term)>, SubstError> {
    for rule in rules {
        tracer.on_candidate(&rule.name, node);
        let Some(env) = match_term(&rule.lhs, node, Env::default(), ctx.reserved) else {
            continue;
        };

        if let Some(guard) = &rule.guard {
            let instantiated = subst(guard, &env, ctx.reserved)?;
            let folded = fold(&instantiated, ctx);
            if folded.as_symbol() != Some(ctx.reserved.true_) {
                continue;
            }
        }

        let replacement = subst(&rule.rhs, &env, ctx.reserved)?;
        return Ok(Some((rule.name.as_str(), replacement)));
    }
    Ok(None)
}

/// Outermost-first pre-order search: the root is tried first, then the head,
/// then each argument left to right, recursing into each (§4.5.2).
fn apply_once_at<Tr: RewriteTracer>(
    term: &Term,
    rules: &[Rule],
    ctx: &mut FoldCtx,
    tracer: &mut Tr,
    step: usize,
    path: &mut Vec<PathStep>,
) -> Result<Option<Term>, SubstError> {
    if let Some((rule_name, post)) = try_node(term, rules, ctx, tracer)? {
        tracer.on_fire(step, rule_name, path, term, &post);
        return Ok(Some(post));
    }

    match term {
        Term::App(head, args) => {
            path.push(PathStep::Head);
            let head_result = apply_once_at(head, rules, ctx, tracer, step, path)?;
            path.pop();
            if let Some(new_head) = head_result {
                return Ok(Some(Term::App(Box::new(new_head), args.clone())));
            }

            for (i, arg) in args.iter().enumerate() {
                path.push(PathStep::Arg(i));
                let arg_result = apply_once_at(arg, rules, ctx, tracer, step, path)?;
                path.pop();
                if let Some(new_arg) = arg_result {
                    let mut new_args = args.clone();
                    new_args[i] = new_arg;
                    return Ok(Some(Term::App(head.clone(), new_args)));
                }
            }
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// One rewrite step (§4.5.2): tries to fire a rule somewhere in `term`,
/// outermost-first. Returns the (possibly unchanged) term and whether
/// anything changed.
pub fn apply_once<Tr: RewriteTracer>(
    term: &Term,
    rules: &[Rule],
    ctx: &mut FoldCtx,
    tracer: &mut Tr,
) -> Result<(Term, bool), SubstError> {
    let mut path = Vec::new();
    match apply_once_at(term, rules, ctx, tracer, 0, &mut path)? {
        Some(replaced) => Ok((replaced, true)),
        None => Ok((term.clone(), false)),
    }
}

/// Repeatedly applies `apply_once`, folding between steps unless
/// `policy.skip_prims` is set, until a fixed point or `policy.max_steps` is
/// exhausted (§4.5.3).
pub fn normalize<Tr: RewriteTracer>(
    term: &Term,
    rules: &[Rule],
    policy: &NormalizePolicy,
    ctx: &mut FoldCtx,
    tracer: &mut Tr,
) -> Result<Term, crate::error::EngineError> {
    let mut current = term.clone();
    let mut path = Vec::new();
    for step in 0..policy.max_steps {
        path.clear();
        let stepped = apply_once_at(&current, rules, ctx, tracer, step, &mut path).map_err(crate::error::EngineError::Subst)?;
        let Some(mut next) = stepped else {
            return Ok(current);
        };
        if !policy.skip_prims {
            next = fold(&next, ctx);
            tracer.on_fold(step, &next);
        }
        current = next;
    }
    tracer.on_budget_exceeded(policy.max_steps);
    Err(crate::error::EngineError::NonTermination { budget: policy.max_steps })
}

/// Runs `normalize` with a fresh [`RecordingTracer`] and returns both the
/// result and the recorded trace (§4.5.4, §6.3) — not a separate code path.
pub fn normalize_with_trace(
    term: &Term,
    rules: &[Rule],
    policy: &NormalizePolicy,
    ctx: &mut FoldCtx,
) -> Result<(Term, Vec<TraceEvent>), crate::error::EngineError> {
    let mut tracer = RecordingTracer::new();
    let result = normalize(term, rules, policy, ctx, &mut tracer)?;
    Ok((result, tracer.into_events()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fold::test_support::Harness;

    fn rule(h: &mut Harness, name: &str, lhs: Term, rhs: Term) -> Rule {
        let _ = h;
        Rule { name: name.to_string(), lhs, rhs, guard: None, prio: 0.0, source_index: 0 }
    }

    /// A user rule fires on a subterm before the primitive folder would have
    /// evaluated it bottom-up, so rule matching sees the unevaluated shape.
    #[test]
    fn rule_fires_before_primitive_folding_wraps_it() {
        let mut h = Harness::new();
        let d = h.interner.intern("D");
        let add = h.interner.intern("Add");
        let var_x = Term::app(Term::sym(h.reserved.var), vec![Term::str("x")]);
        let lhs = Term::app(Term::sym(d), vec![var_x.clone()]);
        let rhs = Term::app(
            Term::sym(h.interner.intern("Mul")),
            vec![Term::num(2.0), Term::app(Term::sym(h.reserved.var), vec![Term::str("x")])],
        );
        let rules = vec![rule(&mut h, "double", lhs, rhs)];

        let input = Term::app(
            Term::sym(add),
            vec![Term::app(Term::sym(d), vec![Term::num(3.0)]), Term::num(1.0)],
        );
        let mut ctx = h.ctx();
        let mut tracer = NoopTracer;
        let result = normalize(&input, &rules, &NormalizePolicy::default(), &mut ctx, &mut tracer).unwrap();
        assert_eq!(result, Term::num(7.0));
    }

    /// A guard that does not reduce to True leaves the term unchanged.
    #[test]
    fn guard_false_skips_the_rule() {
        let mut h = Harness::new();
        let var_x = Term::app(Term::sym(h.reserved.var), vec![Term::str("x")]);
        let gt = h.interner.intern("Gt");
        let guard = Term::app(Term::sym(gt), vec![var_x.clone(), Term::num(0.0)]);
        let mut r = rule(
            &mut h,
            "pos",
            var_x,
            Term::str("positive"),
        );
        r.guard = Some(guard);
        let rules = vec![r];

        let mut ctx = h.ctx();
        let mut tracer = NoopTracer;
        let result = normalize(&Term::num(-3.0), &rules, &NormalizePolicy::default(), &mut ctx, &mut tracer).unwrap();
        assert_eq!(result, Term::num(-3.0));
    }

    /// A rewrite that never reaches a fixed point raises NonTermination once
    /// the step budget is exhausted.
    #[test]
    fn non_termination_is_caught_at_the_budget() {
        let mut h = Harness::new();
        let var_x = Term::app(Term::sym(h.reserved.var), vec![Term::str("x")]);
        let rules = vec![rule(&mut h, "loop", var_x.clone(), var_x)];
        let policy = NormalizePolicy { max_steps: 50, skip_prims: true };
        let mut ctx = h.ctx();
        let mut tracer = NoopTracer;
        let err = normalize(&Term::num(1.0), &rules, &policy, &mut ctx, &mut tracer).unwrap_err();
        assert_eq!(err, crate::error::EngineError::NonTermination { budget: 50 });
    }

    #[test]
    fn extract_rules_sorts_stably_by_descending_priority() {
        let mut interner = crate::intern::Interner::new();
        let reserved = Reserved::new(&mut interner);
        let r = |name: &str, prio: f64| {
            Term::app(
                Term::sym(reserved.rule),
                vec![Term::str(name), Term::num(0.0), Term::num(0.0), Term::num(prio)],
            )
        };
        let section = vec![r("a", 1.0), r("b", 5.0), r("c", 5.0), r("d", 0.0)];
        let rules = extract_rules(&section, &reserved).unwrap();
        let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn keyword_metadata_is_used_exclusively_when_present() {
        let mut interner = crate::intern::Interner::new();
        let reserved = Reserved::new(&mut interner);
        let guard_term = Term::num(1.0);
        let r = Term::app(
            Term::sym(reserved.rule),
            vec![
                Term::str("g"),
                Term::num(0.0),
                Term::num(0.0),
                Term::sym(reserved.guard_kw),
                guard_term.clone(),
                Term::sym(reserved.prio_kw),
                Term::num(9.0),
            ],
        );
        let rules = extract_rules(&[r], &reserved).unwrap();
        assert_eq!(rules[0].prio, 9.0);
        assert_eq!(rules[0].guard, Some(guard_term));
    }
}
