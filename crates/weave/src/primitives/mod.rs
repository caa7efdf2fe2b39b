//! The primitive built-in library (§4.4), split one module per group. Each
//! group module exposes a `try_fold(op, args, ctx) -> Option<Term>` and this
//! module just routes a [`BuiltinOp`] to the group that owns it.

mod arith;
mod boolean;
mod compare;
mod serialize;
mod strings;
mod types;
mod util;

use crate::builtins::BuiltinOp;
use crate::fold::FoldCtx;
use crate::term::Term;

/// Tries every matching group's folder for `op`. Each group only recognizes
/// its own operations and returns `None` for everything else, so routing by
/// trying each in turn (rather than a second lookup table) is fine — the
/// group functions are cheap `match`es.
pub fn try_fold(op: BuiltinOp, args: &[Term], ctx: &mut FoldCtx) -> Option<Term> {
    use BuiltinOp::{
        Abs, Add, And, AreNums, AreStrings, AreSyms, Ceil, CharFromCode, Concat, Debug, Deserialize, Div, Eq, Escape,
        Floor, FreshId, Gt, Gte, IndexOf, IsFalse, IsNum, IsStr, IsSym, IsTrue, Lt, Lte, Max, Min, Mod, Mul, Neq, Not,
        Or, ParseNum, Pow, Random, Replace, ReplaceAll, Round, Serialize, SplitBy, SplitToChars, Sqrt, StrLen, Sub,
        Substring, ToLower, ToNormalString, ToString, ToUpper, Trim, Unescape,
    };

    match op {
        Add | Sub | Mul | Div | Mod | Pow | Sqrt | Abs | Min | Max | Floor | Ceil | Round => {
            arith::try_fold(op, args, ctx)
        }
        Concat | ToString | ToNormalString | ToUpper | ToLower | Trim | StrLen | Substring | IndexOf | Replace
        | ReplaceAll | SplitToChars | SplitBy | Escape | Unescape | CharFromCode => strings::try_fold(op, args, ctx),
        Eq | Neq | Lt | Gt | Lte | Gte => compare::try_fold(op, args, ctx),
        And | Or | Not => boolean::try_fold(op, args, ctx),
        IsNum | IsStr | IsSym | IsTrue | IsFalse | AreNums | AreStrings | AreSyms => types::try_fold(op, args, ctx),
        FreshId | Random | ParseNum | Debug => util::try_fold(op, args, ctx),
        Serialize | Deserialize => serialize::try_fold(op, args, ctx),
    }
}
