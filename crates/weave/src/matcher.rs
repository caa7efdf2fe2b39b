//! The pattern matcher (C3, §4.2).
//!
//! Patterns are ordinary [`Term`]s; `Var`/`VarRest` shapes are recognized by
//! symbol identity against [`Reserved`], not by a distinct pattern type
//! (§9's first design note).

use ahash::AHashMap;

use crate::reserved::Reserved;
use crate::term::Term;

/// What a variable name is bound to: one term for `Var`, a slice of terms
/// for `VarRest` (§4.2.1's closing paragraph).
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Single(Term),
    Seq(Vec<Term>),
}

/// A mapping from variable names to their bindings (the glossary's
/// "Environment"). Variable names are plain strings — they come from a
/// pattern's `Str` argument, not from the interner.
pub type Env = AHashMap<String, Binding>;

/// Returns `(name, is_rest)` if `t` is a `Var[Str n]` or `VarRest[Str n]`
/// shape.
fn pattern_var<'a>(t: &'a Term, reserved: &Reserved) -> Option<(&'a str, bool)> {
    if let Some([single]) = t.as_app_headed_by(reserved.var) {
        return single.as_str().map(|name| (name, false));
    }
    if let Some([single]) = t.as_app_headed_by(reserved.var_rest) {
        return single.as_str().map(|name| (name, true));
    }
    None
}

/// Matches `pat` against `subj` under `env`, per §4.2. Returns the updated
/// environment on success, `None` on failure; `env` is consumed rather than
/// mutated in place, so a caller that wants to retry with the original
/// bindings must hold its own clone.
pub fn match_term(pat: &Term, subj: &Term, env: Env, reserved: &Reserved) -> Option<Env> {
    if let Some((name, is_rest)) = pattern_var(pat, reserved) {
        if is_rest {
            // Rule 2: a VarRest may only appear inside an argument vector;
            // match_args intercepts it before calling match_term on it, so
            // reaching here means it was used standalone. No match.
            return None;
        }
        return match_var(name, subj, env);
    }
    match pat {
        Term::Number(_) | Term::Str(_) | Term::Symbol(_) => {
            if pat.deep_eq(subj) {
                Some(env)
            } else {
                None
            }
        }
        Term::App(phead, pargs) => {
            let (shead, sargs) = subj.as_app()?;
            let env = match_term(phead, shead, env, reserved)?;
            match_args(pargs, sargs, env, reserved)
        }
    }
}

fn match_var(name: &str, subj: &Term, mut env: Env) -> Option<Env> {
    if name == "_" {
        return Some(env);
    }
    match env.get(name) {
        Some(Binding::Single(existing)) => {
            if existing.deep_eq(subj) {
                Some(env)
            } else {
                None
            }
        }
        Some(Binding::Seq(_)) => None,
        None => {
            env.insert(name.to_string(), Binding::Single(subj.clone()));
            Some(env)
        }
    }
}

/// Matches an argument vector, handling rest-variable backtracking
/// (§4.2.1).
fn match_args(pats: &[Term], subs: &[Term], env: Env, reserved: &Reserved) -> Option<Env> {
    let first_rest = pats
        .iter()
        .position(|p| matches!(pattern_var(p, reserved), Some((_, true))));

    let Some(k) = first_rest else {
        // Fast path: no VarRest, match pairwise.
        if pats.len() != subs.len() {
            return None;
        }
        let mut env = env;
        for (p, s) in pats.iter().zip(subs) {
            env = match_term(p, s, env, reserved)?;
        }
        return Some(env);
    };

    let prefix = &pats[..k];
    let rest_pat = &pats[k];
    let suffix = &pats[k + 1..];
    let (rest_name, _) = pattern_var(rest_pat, reserved).expect("k indexes a VarRest");

    let min_tail = suffix
        .iter()
        .filter(|p| !matches!(pattern_var(p, reserved), Some((_, true))))
        .count();
    if subs.len() < prefix.len() + min_tail {
        return None;
    }

    let mut env = env;
    for (p, s) in prefix.iter().zip(&subs[..prefix.len()]) {
        env = match_term(p, s, env, reserved)?;
    }

    let max_take = subs.len() - prefix.len() - min_tail;
    for take in 0..=max_take {
        let candidate = &subs[prefix.len()..prefix.len() + take];
        let tail = &subs[prefix.len() + take..];

        let mut trial_env = env.clone();
        let proceed = if rest_name == "_" {
            true
        } else {
            match trial_env.get(rest_name) {
                Some(Binding::Seq(existing)) => Term::seq_deep_eq(existing, candidate),
                Some(Binding::Single(_)) => false,
                None => {
                    trial_env.insert(rest_name.to_string(), Binding::Seq(candidate.to_vec()));
                    true
                }
            }
        };
        if !proceed {
            continue;
        }

        if let Some(result) = match_args(suffix, tail, trial_env, reserved) {
            return Some(result);
        }
    }
    None
}
