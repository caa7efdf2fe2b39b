//! Utility built-ins (§4.4, Utilities group). `FreshId` and `Random` are the
//! folder's only impure operations; both draw from sources injected through
//! [`FoldCtx`] rather than a global (§4.4, §9's design note).

use rand::Rng;

use crate::builtins::BuiltinOp;
use crate::fold::FoldCtx;
use crate::term::Term;

pub fn try_fold(op: BuiltinOp, args: &[Term], ctx: &mut FoldCtx) -> Option<Term> {
    match op {
        BuiltinOp::FreshId => {
            if !args.is_empty() {
                return None;
            }
            Some(Term::Str(ctx.fresh.next_id()))
        }
        BuiltinOp::Random => random(args, ctx),
        BuiltinOp::ParseNum => {
            let [s] = args else { return None };
            parse_float(s.as_str()?).map(Term::Number)
        }
        BuiltinOp::Debug => debug(args, ctx),
        _ => None,
    }
}

/// JS `parseFloat` semantics (§4.4's `ParseNum` entry): skip leading
/// whitespace, then take the longest valid numeric prefix (sign, digits,
/// optional fraction, optional exponent); trailing garbage after that prefix
/// is ignored rather than rejected. Returns `None` where `parseFloat` would
/// return `NaN` (no numeric prefix at all).
fn parse_float(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut saw_digits = i > digits_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > frac_start {
            saw_digits = true;
        }
        if saw_digits {
            i = j;
        }
    }

    if !saw_digits {
        return None;
    }

    let mantissa_end = i;
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_digits_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_digits_start {
            i = j;
        }
    }

    trimmed[..i].parse::<f64>().ok().or_else(|| trimmed[..mantissa_end].parse::<f64>().ok())
}

fn random(args: &[Term], ctx: &mut FoldCtx) -> Option<Term> {
    match args {
        [] => Some(Term::num(ctx.rng.gen::<f64>())),
        [lo, hi] => {
            let (lo, hi) = (lo.as_number()?, hi.as_number()?);
            Some(Term::num(lo + ctx.rng.gen::<f64>() * (hi - lo)))
        }
        _ => None,
    }
}

fn debug(args: &[Term], ctx: &mut FoldCtx) -> Option<Term> {
    let (label, value) = match args {
        [value] => (None, value),
        [label, value] => (Some(label.as_str()?), value),
        _ => return None,
    };
    let line = match label {
        Some(label) => format!("{label}: {value:?}"),
        None => format!("{value:?}"),
    };
    ctx.debug.log_debug(&line);
    Some(value.clone())
}
