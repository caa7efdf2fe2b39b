//! Arithmetic built-ins (§4.4, Arithmetic group). IEEE-754 double precision
//! throughout; `Div`/`Mod` refuse a zero denominator and `Sqrt` refuses a
//! negative argument by returning "cannot fold" rather than raising.

use crate::builtins::BuiltinOp;
use crate::fold::FoldCtx;
use crate::term::Term;

pub fn try_fold(op: BuiltinOp, args: &[Term], _ctx: &mut FoldCtx) -> Option<Term> {
    use BuiltinOp::{Abs, Add, Ceil, Div, Floor, Max, Min, Mod, Mul, Pow, Round, Sqrt, Sub};

    match op {
        Add => binary(args, |a, b| Some(a + b)),
        Sub => binary(args, |a, b| Some(a - b)),
        Mul => binary(args, |a, b| Some(a * b)),
        Div => binary(args, |a, b| if b == 0.0 { None } else { Some(a / b) }),
        Mod => binary(args, |a, b| if b == 0.0 { None } else { Some(a % b) }),
        Pow => binary(args, |a, b| Some(a.powf(b))),
        Sqrt => unary(args, |a| if a < 0.0 { None } else { Some(a.sqrt()) }),
        Abs => unary(args, |a| Some(a.abs())),
        Floor => unary(args, |a| Some(a.floor())),
        Ceil => unary(args, |a| Some(a.ceil())),
        Round => unary(args, |a| Some(a.round())),
        Min => nary_fold(args, f64::min),
        Max => nary_fold(args, f64::max),
        _ => None,
    }
}

fn unary(args: &[Term], f: impl Fn(f64) -> Option<f64>) -> Option<Term> {
    let [a] = args else { return None };
    f(a.as_number()?).map(Term::Number)
}

fn binary(args: &[Term], f: impl Fn(f64, f64) -> Option<f64>) -> Option<Term> {
    let [a, b] = args else { return None };
    f(a.as_number()?, b.as_number()?).map(Term::Number)
}

fn nary_fold(args: &[Term], combine: impl Fn(f64, f64) -> f64) -> Option<Term> {
    if args.is_empty() {
        return None;
    }
    let mut numbers = args.iter().map(Term::as_number);
    let first = numbers.next()??;
    let mut acc = first;
    for n in numbers {
        acc = combine(acc, n?);
    }
    Some(Term::Number(acc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fold::test_support::Harness;

    #[test]
    fn div_by_zero_does_not_fold() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        assert_eq!(try_fold(BuiltinOp::Div, &[Term::num(1.0), Term::num(0.0)], &mut ctx), None);
    }

    #[test]
    fn sqrt_of_negative_does_not_fold() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        assert_eq!(try_fold(BuiltinOp::Sqrt, &[Term::num(-1.0)], &mut ctx), None);
    }

    #[test]
    fn min_max_accept_n_ary_arguments() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        let args = vec![Term::num(3.0), Term::num(1.0), Term::num(2.0)];
        assert_eq!(try_fold(BuiltinOp::Min, &args, &mut ctx), Some(Term::num(1.0)));
        assert_eq!(try_fold(BuiltinOp::Max, &args, &mut ctx), Some(Term::num(3.0)));
    }

    #[test]
    fn wrong_arity_does_not_fold() {
        let mut h = Harness::new();
        let mut ctx = h.ctx();
        assert_eq!(try_fold(BuiltinOp::Add, &[Term::num(1.0)], &mut ctx), None);
    }
}
