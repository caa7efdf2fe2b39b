//! Comparison built-ins (§4.4, Comparison group). `Eq`/`Neq` are
//! deep-structural and never refuse to fold; ordering comparisons require
//! two Numbers.

use crate::builtins::BuiltinOp;
use crate::fold::FoldCtx;
use crate::term::Term;

fn bool_term(ctx: &FoldCtx, value: bool) -> Term {
    let sym = if value { ctx.reserved.true_ } else { ctx.reserved.false_ };
    Term::sym(sym)
}

pub fn try_fold(op: BuiltinOp, args: &[Term], ctx: &mut FoldCtx) -> Option<Term> {
    use BuiltinOp::{Eq, Gt, Gte, Lt, Lte, Neq};

    match op {
        Eq => {
            let [a, b] = args else { return None };
            Some(bool_term(ctx, a.deep_eq(b)))
        }
        Neq => {
            let [a, b] = args else { return None };
            Some(bool_term(ctx, !a.deep_eq(b)))
        }
        Lt => ordered(args, ctx, |a, b| a < b),
        Gt => ordered(args, ctx, |a, b| a > b),
        Lte => ordered(args, ctx, |a, b| a <= b),
        Gte => ordered(args, ctx, |a, b| a >= b),
        _ => None,
    }
}

fn ordered(args: &[Term], ctx: &FoldCtx, cmp: impl Fn(f64, f64) -> bool) -> Option<Term> {
    let [a, b] = args else { return None };
    let (a, b) = (a.as_number()?, b.as_number()?);
    Some(bool_term(ctx, cmp(a, b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fold::test_support::Harness;

    #[test]
    fn eq_is_deep_structural_across_variants() {
        let mut h = Harness::new();
        let true_sym = h.reserved.true_;
        let false_sym = h.reserved.false_;
        let mut ctx = h.ctx();
        assert_eq!(
            try_fold(BuiltinOp::Eq, &[Term::num(1.0), Term::str("1")], &mut ctx),
            Some(Term::sym(false_sym))
        );
        assert_eq!(
            try_fold(BuiltinOp::Eq, &[Term::num(1.0), Term::num(1.0)], &mut ctx),
            Some(Term::sym(true_sym))
        );
    }

    #[test]
    fn ordering_requires_two_numbers() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        assert_eq!(try_fold(BuiltinOp::Lt, &[Term::str("a"), Term::num(1.0)], &mut ctx), None);
    }
}
