//! Substitution (C4, §4.3): instantiate a template against a binding
//! environment.

use std::fmt;

use crate::matcher::{Binding, Env};
use crate::reserved::Reserved;
use crate::term::{Piece, Term};

/// A substitution failure (§7, second bullet): always a hard error, because
/// it indicates a malformed rule rather than a rewrite miss.
#[derive(Debug, Clone, PartialEq)]
pub enum SubstError {
    /// `Var`/`VarRest` referenced a name with no binding in `env`.
    UnboundVariable(String),
    /// The wildcard name `_` was used inside `Var`/`VarRest`/`Unbound` on a
    /// template (only legal as a match-time, non-binding pattern).
    WildcardInTemplate,
    /// A `VarRest` name was bound to a single term, not a sequence.
    RestNotBoundToSequence(String),
    /// A `VarRest` shape appeared outside an argument vector (e.g. as a head
    /// or as the lone argument of some other application).
    RestUsedOutsideArgumentVector,
}

impl fmt::Display for SubstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundVariable(name) => write!(f, "unbound variable {name:?} in template"),
            Self::WildcardInTemplate => write!(f, "wildcard name \"_\" used in a template position"),
            Self::RestNotBoundToSequence(name) => {
                write!(f, "rest variable {name:?} is not bound to a sequence")
            }
            Self::RestUsedOutsideArgumentVector => {
                write!(f, "VarRest used outside an argument vector")
            }
        }
    }
}

/// Instantiates `template` against `env`, per §4.3.
pub fn subst(template: &Term, env: &Env, reserved: &Reserved) -> Result<Term, SubstError> {
    if let Some([inner]) = template.as_app_headed_by(reserved.shield) {
        // `/! [X]` is a transparent shield: return X untouched.
        return Ok(inner.clone());
    }

    if let Some([arg]) = template.as_app_headed_by(reserved.unbound) {
        if let Some(name) = arg.as_str() {
            return expand_unbound(name, reserved);
        }
    }

    if let Some([arg]) = template.as_app_headed_by(reserved.var) {
        if let Some(name) = arg.as_str() {
            return subst_var(name, env);
        }
    }

    if template.as_app_headed_by(reserved.var_rest).is_some() {
        return Err(SubstError::RestUsedOutsideArgumentVector);
    }

    match template {
        Term::Number(_) | Term::Str(_) | Term::Symbol(_) => Ok(template.clone()),
        Term::App(head, args) => {
            let new_head = subst(head, env, reserved)?;
            let mut pieces = Vec::with_capacity(args.len());
            for arg in args {
                pieces.push(subst_piece(arg, env, reserved)?);
            }
            Ok(Term::app_flatten(new_head, pieces))
        }
    }
}

/// Substitutes one argument-vector slot, which may expand into a `Splice`
/// (only `VarRest` does this; everything else is a single term).
fn subst_piece(template: &Term, env: &Env, reserved: &Reserved) -> Result<Piece, SubstError> {
    if let Some([arg]) = template.as_app_headed_by(reserved.var_rest) {
        if let Some(name) = arg.as_str() {
            return subst_var_rest(name, env).map(Piece::Many);
        }
    }
    Ok(Piece::One(subst(template, env, reserved)?))
}

fn subst_var(name: &str, env: &Env) -> Result<Term, SubstError> {
    if name == "_" {
        return Err(SubstError::WildcardInTemplate);
    }
    match env.get(name) {
        Some(Binding::Single(v)) => Ok(v.clone()),
        Some(Binding::Seq(_)) | None => Err(SubstError::UnboundVariable(name.to_string())),
    }
}

fn subst_var_rest(name: &str, env: &Env) -> Result<Vec<Term>, SubstError> {
    if name == "_" {
        return Err(SubstError::WildcardInTemplate);
    }
    match env.get(name) {
        Some(Binding::Seq(items)) => Ok(items.clone()),
        Some(Binding::Single(_)) => Err(SubstError::RestNotBoundToSequence(name.to_string())),
        None => Err(SubstError::UnboundVariable(name.to_string())),
    }
}

fn expand_unbound(name: &str, reserved: &Reserved) -> Result<Term, SubstError> {
    if name == "_" {
        return Err(SubstError::WildcardInTemplate);
    }
    Ok(if let Some(stripped) = name.strip_suffix("...") {
        Term::app(Term::sym(reserved.var_rest), vec![Term::str(stripped)])
    } else {
        Term::app(Term::sym(reserved.var), vec![Term::str(name)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::Interner;

    fn setup() -> (Interner, Reserved) {
        let mut interner = Interner::new();
        let reserved = Reserved::new(&mut interner);
        (interner, reserved)
    }

    /// Substituting the environment a match produced reconstructs the
    /// original subject, for a ground (variable-free) pattern.
    #[test]
    fn subst_of_matched_pattern_reconstructs_subject() {
        use crate::matcher::match_term;

        let (mut interner, reserved) = setup();
        let f = interner.intern("F");
        let var_x = Term::app(Term::sym(reserved.var), vec![Term::str("x")]);
        let pat = Term::app(Term::sym(f), vec![var_x, Term::num(2.0)]);
        let subj = Term::app(Term::sym(f), vec![Term::num(1.0), Term::num(2.0)]);

        let env = match_term(&pat, &subj, Env::default(), &reserved).unwrap();
        let rebuilt = subst(&pat, &env, &reserved).unwrap();
        assert!(rebuilt.deep_eq(&subj));
    }

    #[test]
    fn shield_returns_contents_unsubstituted() {
        let (mut interner, reserved) = setup();
        let f = interner.intern("F");
        let var_x = Term::app(Term::sym(reserved.var), vec![Term::str("x")]);
        let shielded = Term::app(Term::sym(reserved.shield), vec![var_x]);
        let result = subst(&shielded, &Env::default(), &reserved).unwrap();
        assert!(matches!(result.as_app_headed_by(reserved.var), Some(_)));
    }

    #[test]
    fn unbound_with_dots_expands_to_fresh_var_rest() {
        let (_interner, reserved) = setup();
        let unbound = Term::app(Term::sym(reserved.unbound), vec![Term::str("xs...")]);
        let result = subst(&unbound, &Env::default(), &reserved).unwrap();
        let args = result.as_app_headed_by(reserved.var_rest).unwrap();
        assert_eq!(args[0].as_str(), Some("xs"));
    }

    #[test]
    fn unbound_without_dots_expands_to_fresh_var() {
        let (_interner, reserved) = setup();
        let unbound = Term::app(Term::sym(reserved.unbound), vec![Term::str("x")]);
        let result = subst(&unbound, &Env::default(), &reserved).unwrap();
        let args = result.as_app_headed_by(reserved.var).unwrap();
        assert_eq!(args[0].as_str(), Some("x"));
    }

    #[test]
    fn unbound_var_is_a_hard_error() {
        let (mut interner, reserved) = setup();
        let f = interner.intern("F");
        let var_y = Term::app(Term::sym(reserved.var), vec![Term::str("y")]);
        let template = Term::app(Term::sym(f), vec![var_y]);
        assert_eq!(
            subst(&template, &Env::default(), &reserved),
            Err(SubstError::UnboundVariable("y".to_string()))
        );
    }

    #[test]
    fn var_rest_substitutes_to_a_flattened_splice() {
        let (mut interner, reserved) = setup();
        let f = interner.intern("F");
        let rest_x = Term::app(Term::sym(reserved.var_rest), vec![Term::str("xs")]);
        let template = Term::app(Term::sym(f), vec![rest_x, Term::num(9.0)]);

        let mut env = Env::default();
        env.insert(
            "xs".to_string(),
            Binding::Seq(vec![Term::num(1.0), Term::num(2.0)]),
        );
        let result = subst(&template, &env, &reserved).unwrap();
        let (_, args) = result.as_app().unwrap();
        assert_eq!(args, &[Term::num(1.0), Term::num(2.0), Term::num(9.0)]);
    }
}
