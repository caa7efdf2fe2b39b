//! Type-test built-ins (§4.4, Type tests group). The `Are…` family is
//! effectively n-ary: by the time arguments reach the folder, any `Splat`
//! or bound `VarRest` that produced a sequence has already been flattened
//! into direct argument positions (§3.3), so "single sequence argument" and
//! "n direct arguments" collapse into the same check here. Empty is
//! vacuously true.

use crate::builtins::BuiltinOp;
use crate::fold::FoldCtx;
use crate::term::Term;

fn bool_term(ctx: &FoldCtx, value: bool) -> Term {
    Term::sym(if value { ctx.reserved.true_ } else { ctx.reserved.false_ })
}

pub fn try_fold(op: BuiltinOp, args: &[Term], ctx: &mut FoldCtx) -> Option<Term> {
    use BuiltinOp::{AreNums, AreStrings, AreSyms, IsFalse, IsNum, IsStr, IsSym, IsTrue};

    match op {
        IsNum => unary(args, ctx, |t| matches!(t, Term::Number(_))),
        IsStr => unary(args, ctx, |t| matches!(t, Term::Str(_))),
        IsSym => unary(args, ctx, |t| matches!(t, Term::Symbol(_))),
        IsTrue => unary(args, ctx, |t| t.as_symbol() == Some(ctx.reserved.true_)),
        IsFalse => unary(args, ctx, |t| t.as_symbol() == Some(ctx.reserved.false_)),
        AreNums => Some(bool_term(ctx, args.iter().all(|t| matches!(t, Term::Number(_))))),
        AreStrings => Some(bool_term(ctx, args.iter().all(|t| matches!(t, Term::Str(_))))),
        AreSyms => Some(bool_term(ctx, args.iter().all(|t| matches!(t, Term::Symbol(_))))),
        _ => None,
    }
}

fn unary(args: &[Term], ctx: &FoldCtx, pred: impl Fn(&Term) -> bool) -> Option<Term> {
    let [a] = args else { return None };
    Some(bool_term(ctx, pred(a)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fold::test_support::Harness;

    #[test]
    fn are_nums_is_vacuously_true_on_empty() {
        let mut h = Harness::new();
        let true_sym = h.reserved.true_;
        let mut ctx = h.ctx();
        assert_eq!(try_fold(BuiltinOp::AreNums, &[], &mut ctx), Some(Term::sym(true_sym)));
    }

    #[test]
    fn are_nums_false_on_mixed_types() {
        let mut h = Harness::new();
        let false_sym = h.reserved.false_;
        let mut ctx = h.ctx();
        let args = vec![Term::num(1.0), Term::str("x")];
        assert_eq!(try_fold(BuiltinOp::AreNums, &args, &mut ctx), Some(Term::sym(false_sym)));
    }

    #[test]
    fn is_true_checks_the_reserved_true_symbol() {
        let mut h = Harness::new();
        let (true_sym, false_sym) = (h.reserved.true_, h.reserved.false_);
        let mut ctx = h.ctx();
        assert_eq!(
            try_fold(BuiltinOp::IsTrue, &[Term::sym(true_sym)], &mut ctx),
            Some(Term::sym(true_sym))
        );
        assert_eq!(
            try_fold(BuiltinOp::IsTrue, &[Term::sym(false_sym)], &mut ctx),
            Some(Term::sym(false_sym))
        );
    }
}
