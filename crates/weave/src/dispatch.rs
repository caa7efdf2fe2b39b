//! Dispatch (C8, §4.7): wraps an action term around the `Program` section and
//! renormalizes, with a rescue wrap when the result isn't recognizably a
//! `Program`.

use crate::error::EngineError;
use crate::fold::FoldCtx;
use crate::reserved::Reserved;
use crate::rewrite::{normalize, NormalizePolicy, Rule};
use crate::rewrite::RewriteTracer;
use crate::term::Term;
use crate::universe::{program_of, replace_program};

/// Runs `Dispatch(u, R, action)` (§4.7): forms `Apply[action, Program[...]]`,
/// normalizes it against `rules`, and replaces the Universe's `Program`
/// section with the (possibly rescue-wrapped) result.
pub fn dispatch<Tr: RewriteTracer>(
    universe: &Term,
    rules: &[Rule],
    action: &Term,
    reserved: &Reserved,
    ctx: &mut FoldCtx,
    tracer: &mut Tr,
) -> Result<Term, EngineError> {
    let program_args = program_of(universe, reserved)?;
    let program = Term::app(Term::sym(reserved.program), program_args.to_vec());
    let applied = Term::app(Term::sym(reserved.apply), vec![action.clone(), program]);

    let policy = NormalizePolicy::default();
    let result = normalize(&applied, rules, &policy, ctx, tracer)?;

    let new_program_children = match result.as_app_headed_by(reserved.program) {
        Some(args) => args.to_vec(),
        None if result.as_app_headed_by(reserved.app).is_some() => vec![result.clone()],
        None => {
            tracer.on_dispatch_mis_normalization(&result);
            return Ok(replace_program(universe, vec![result], reserved));
        }
    };

    Ok(replace_program(universe, new_program_children, reserved))
}
