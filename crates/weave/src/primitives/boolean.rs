//! Boolean built-ins (§4.4, Boolean group). `And`/`Or` are n-ary and require
//! every argument to be `True`/`False`; `Not` is unary.

use crate::builtins::BuiltinOp;
use crate::fold::FoldCtx;
use crate::term::Term;

fn as_bool(ctx: &FoldCtx, t: &Term) -> Option<bool> {
    let sym = t.as_symbol()?;
    if sym == ctx.reserved.true_ {
        Some(true)
    } else if sym == ctx.reserved.false_ {
        Some(false)
    } else {
        None
    }
}

fn bool_term(ctx: &FoldCtx, value: bool) -> Term {
    Term::sym(if value { ctx.reserved.true_ } else { ctx.reserved.false_ })
}

pub fn try_fold(op: BuiltinOp, args: &[Term], ctx: &mut FoldCtx) -> Option<Term> {
    match op {
        BuiltinOp::And => {
            let mut values = Vec::with_capacity(args.len());
            for a in args {
                values.push(as_bool(ctx, a)?);
            }
            Some(bool_term(ctx, values.iter().all(|v| *v)))
        }
        BuiltinOp::Or => {
            let mut values = Vec::with_capacity(args.len());
            for a in args {
                values.push(as_bool(ctx, a)?);
            }
            Some(bool_term(ctx, values.iter().any(|v| *v)))
        }
        BuiltinOp::Not => {
            let [a] = args else { return None };
            as_bool(ctx, a).map(|v| bool_term(ctx, !v))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fold::test_support::Harness;

    #[test]
    fn and_requires_all_booleans() {
        let mut h = Harness::new();
        let true_sym = h.reserved.true_;
        let mut ctx = h.ctx();
        let args = vec![Term::sym(true_sym), Term::num(1.0)];
        assert_eq!(try_fold(BuiltinOp::And, &args, &mut ctx), None);
    }

    #[test]
    fn not_negates() {
        let mut h = Harness::new();
        let (true_sym, false_sym) = (h.reserved.true_, h.reserved.false_);
        let mut ctx = h.ctx();
        assert_eq!(
            try_fold(BuiltinOp::Not, &[Term::sym(true_sym)], &mut ctx),
            Some(Term::sym(false_sym))
        );
    }
}
