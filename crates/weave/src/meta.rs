//! The meta-rule pass (C7, §4.6): runs once per Universe ingestion, rewriting
//! the `Rules` section itself with the rules found in `RuleRules`.

use crate::error::EngineError;
use crate::fold::FoldCtx;
use crate::reserved::Reserved;
use crate::rewrite::{extract_rules, normalize, NoopTracer, NormalizePolicy};
use crate::term::Term;
use crate::universe::{replace_rules, rule_rules_of, rules_of};

/// Applies the meta-rule pass to `universe`. If `RuleRules` is absent or
/// empty, returns `universe` unchanged (§4.6, step 1). After this pass,
/// `RuleRules` is no longer consulted by the engine.
pub fn apply_rule_rules(universe: &Term, reserved: &Reserved, ctx: &mut FoldCtx) -> Result<Term, EngineError> {
    let rule_rules_args = rule_rules_of(universe, reserved)?;
    if rule_rules_args.is_empty() {
        return Ok(universe.clone());
    }
    let meta_rules = extract_rules(rule_rules_args, reserved)?;

    let rules_args = rules_of(universe, reserved)?;
    let rules_section = Term::app(Term::sym(reserved.rules), rules_args.to_vec());

    let policy = NormalizePolicy { max_steps: 10_000, skip_prims: true };
    let mut tracer = NoopTracer;
    let rewritten = normalize(&rules_section, &meta_rules, &policy, ctx, &mut tracer)?;

    let new_children = match rewritten.as_app_headed_by(reserved.rules) {
        Some(args) => args.to_vec(),
        None => vec![rewritten],
    };
    Ok(replace_rules(universe, new_children, reserved))
}
