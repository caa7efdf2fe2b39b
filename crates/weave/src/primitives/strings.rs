//! String built-ins (§4.4, Strings group).

use crate::builtins::BuiltinOp;
use crate::fold::FoldCtx;
use crate::term::Term;

pub fn try_fold(op: BuiltinOp, args: &[Term], ctx: &mut FoldCtx) -> Option<Term> {
    use BuiltinOp::{
        CharFromCode, Concat, Escape, IndexOf, Replace, ReplaceAll, SplitBy, SplitToChars, StrLen, Substring, ToLower,
        ToNormalString, ToString, ToUpper, Trim, Unescape,
    };

    match op {
        Concat => concat(args),
        ToString => Some(Term::Str(render_top_level(args.first()?, ctx))),
        ToNormalString => to_normal_string(args, ctx),
        ToUpper => unary_str(args, str::to_uppercase),
        ToLower => unary_str(args, str::to_lowercase),
        Trim => unary_str(args, |s| s.trim().to_string()),
        StrLen => {
            let [s] = args else { return None };
            Some(Term::num(s.as_str()?.chars().count() as f64))
        }
        Substring => substring(args),
        IndexOf => index_of(args),
        Replace => replace(args, false),
        ReplaceAll => replace(args, true),
        SplitToChars => split_to_chars(args, ctx),
        SplitBy => split_by(args, ctx),
        Escape => unary_str(args, escape),
        Unescape => unary_str(args, unescape),
        CharFromCode => char_from_code(args),
        _ => None,
    }
}

fn unary_str(args: &[Term], f: impl Fn(&str) -> String) -> Option<Term> {
    let [s] = args else { return None };
    Some(Term::Str(f(s.as_str()?)))
}

fn concat(args: &[Term]) -> Option<Term> {
    let mut out = String::new();
    for a in args {
        out.push_str(a.as_str()?);
    }
    Some(Term::Str(out))
}

fn substring(args: &[Term]) -> Option<Term> {
    let (s, b, e) = match args {
        [s, b] => (s.as_str()?, b.as_number()?, None),
        [s, b, e] => (s.as_str()?, b.as_number()?, Some(e.as_number()?)),
        _ => return None,
    };
    let chars: Vec<char> = s.chars().collect();
    let begin = non_negative_index(b)?;
    let end = match e {
        Some(e) => non_negative_index(e)?,
        None => chars.len(),
    };
    if begin > end || end > chars.len() {
        return None;
    }
    Some(Term::Str(chars[begin..end].iter().collect()))
}

fn non_negative_index(n: f64) -> Option<usize> {
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 {
        Some(n as usize)
    } else {
        None
    }
}

fn index_of(args: &[Term]) -> Option<Term> {
    let [haystack, needle] = args else { return None };
    let (haystack, needle) = (haystack.as_str()?, needle.as_str()?);
    let chars: Vec<char> = haystack.chars().collect();
    let needle_chars: Vec<char> = needle.chars().collect();
    if needle_chars.is_empty() {
        return Some(Term::num(0.0));
    }
    let found = chars
        .windows(needle_chars.len())
        .position(|w| w == needle_chars.as_slice());
    Some(Term::num(found.map_or(-1.0, |i| i as f64)))
}

fn replace(args: &[Term], all: bool) -> Option<Term> {
    let [s, pat, repl] = args else { return None };
    let (s, pat, repl) = (s.as_str()?, pat.as_str()?, repl.as_str()?);
    if pat.is_empty() {
        return None;
    }
    let out = if all {
        s.replace(pat, repl)
    } else {
        s.replacen(pat, repl, 1)
    };
    Some(Term::Str(out))
}

fn split_to_chars(args: &[Term], ctx: &mut FoldCtx) -> Option<Term> {
    let [s] = args else { return None };
    let s = s.as_str()?;
    let head = ctx.interner.intern("Chars");
    let parts = s.chars().map(|c| Term::Str(c.to_string())).collect();
    Some(Term::app(Term::sym(head), parts))
}

fn split_by(args: &[Term], ctx: &mut FoldCtx) -> Option<Term> {
    let [sep, s] = args else { return None };
    let (sep, s) = (sep.as_str()?, s.as_str()?);
    let head = ctx.interner.intern("Strings");
    let parts: Vec<Term> = if sep.is_empty() {
        s.chars().map(|c| Term::Str(c.to_string())).collect()
    } else {
        s.split(sep).map(|p| Term::Str(p.to_string())).collect()
    };
    Some(Term::app(Term::sym(head), parts))
}

fn char_from_code(args: &[Term]) -> Option<Term> {
    let [n] = args else { return None };
    let code = n.as_number()?;
    if !(0.0..=0x0010_FFFF as f64).contains(&code) || code.fract() != 0.0 {
        return None;
    }
    let ch = char::from_u32(code as u32)?;
    Some(Term::Str(ch.to_string()))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0C}' => out.push_str("\\f"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('f') => out.push('\u{0C}'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// `ToNormalString` only folds once its argument is already an atom; while
/// it is still an application, it returns "cannot fold" so the rewriter
/// keeps reducing it (§4.4's entry; §9's open question preserves this).
fn to_normal_string(args: &[Term], ctx: &FoldCtx) -> Option<Term> {
    let [a] = args else { return None };
    if a.as_app().is_some() {
        return None;
    }
    Some(Term::Str(render_top_level(a, ctx)))
}

/// Renders `t` the way `ToString` does: a top-level atom renders as its raw
/// literal text (no quoting); an application renders as `{head arg …}`
/// with every nested atom/string rendered recursively, strings quoted and
/// escaped once nested (§4.4's Strings group entry for `ToString`).
fn render_top_level(t: &Term, ctx: &FoldCtx) -> String {
    match t {
        Term::Str(s) => s.clone(),
        _ => render_nested(t, ctx),
    }
}

fn render_nested(t: &Term, ctx: &FoldCtx) -> String {
    match t {
        Term::Number(n) => render_number(*n),
        Term::Str(s) => format!("\"{}\"", escape(s)),
        Term::Symbol(s) => ctx.interner.resolve(*s).to_string(),
        Term::App(head, args) => {
            let mut out = String::from("{");
            out.push_str(&render_nested(head, ctx));
            for a in args {
                out.push(' ');
                out.push_str(&render_nested(a, ctx));
            }
            out.push('}');
            out
        }
    }
}

fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
