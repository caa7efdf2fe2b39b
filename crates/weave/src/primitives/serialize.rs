//! Serialization built-ins (§4.4, Serialization group; wire format §6.2).
//! Both operations go through the one `TermDto` scheme in `wire.rs` shared
//! with whole-`Universe` ingestion, so the tagged-object encoding only has
//! to be specified once.

use crate::builtins::BuiltinOp;
use crate::fold::FoldCtx;
use crate::term::Term;
use crate::wire::{from_dto, to_dto, TermDto};

pub fn try_fold(op: BuiltinOp, args: &[Term], ctx: &mut FoldCtx) -> Option<Term> {
    match op {
        BuiltinOp::Serialize => {
            let [t] = args else { return None };
            let dto = to_dto(t, ctx.interner);
            serde_json::to_string(&dto).ok().map(Term::Str)
        }
        BuiltinOp::Deserialize => {
            let [s] = args else { return None };
            let dto: TermDto = serde_json::from_str(s.as_str()?).ok()?;
            from_dto(&dto, ctx.interner)
        }
        _ => None,
    }
}
