//! The top-level `Universe` container (§3.5, C11's ingestion helpers):
//! locating its `Program`/`Rules`/`RuleRules` sections and the one-time
//! `Effects` enrichment.

use crate::error::ShapeError;
use crate::reserved::Reserved;
use crate::term::Term;

/// Returns the single `Program[...]` section's argument vector.
pub fn program_of<'t>(universe: &'t Term, reserved: &Reserved) -> Result<&'t [Term], ShapeError> {
    section_of(universe, reserved.program, "Program", reserved)
}

/// Returns the single `Rules[...]` section's argument vector.
pub fn rules_of<'t>(universe: &'t Term, reserved: &Reserved) -> Result<&'t [Term], ShapeError> {
    section_of(universe, reserved.rules, "Rules", reserved)
}

/// Returns the single `RuleRules[...]` section's argument vector (may be
/// empty, but the section itself must be present exactly once).
pub fn rule_rules_of<'t>(universe: &'t Term, reserved: &Reserved) -> Result<&'t [Term], ShapeError> {
    section_of(universe, reserved.rule_rules, "RuleRules", reserved)
}

fn section_of<'t>(
    universe: &'t Term,
    head: crate::intern::Sym,
    name: &'static str,
    reserved: &Reserved,
) -> Result<&'t [Term], ShapeError> {
    let (_, children) = universe.as_app_headed_by(reserved.universe).ok_or(ShapeError::NotAUniverse)?;
    let mut found: Option<&[Term]> = None;
    for child in children {
        if let Some(args) = child.as_app_headed_by(head) {
            if found.is_some() {
                return Err(ShapeError::DuplicateSection { section: name });
            }
            found = Some(args);
        }
    }
    found.ok_or(ShapeError::MissingSection { section: name })
}

/// Returns a copy of `universe` with its `Program` section's children
/// replaced by `new_program`.
#[must_use]
pub fn replace_program(universe: &Term, new_program: Vec<Term>, reserved: &Reserved) -> Term {
    replace_section(universe, reserved.program, new_program, reserved)
}

/// Returns a copy of `universe` with its `Rules` section's children replaced
/// by `new_rules`.
#[must_use]
pub fn replace_rules(universe: &Term, new_rules: Vec<Term>, reserved: &Reserved) -> Term {
    replace_section(universe, reserved.rules, new_rules, reserved)
}

fn replace_section(universe: &Term, head: crate::intern::Sym, new_children: Vec<Term>, reserved: &Reserved) -> Term {
    let Some((universe_head, children)) = universe.as_app() else {
        return universe.clone();
    };
    let new_children: Vec<Term> = children
        .iter()
        .map(|child| {
            if child.as_app_headed_by(head).is_some() {
                Term::app(Term::sym(head), new_children.clone())
            } else {
                child.clone()
            }
        })
        .collect();
    let _ = reserved;
    Term::app(universe_head.clone(), new_children)
}

/// Ensures the `Program` section carries an `Effects[Pending[], Inbox[]]`
/// child. Idempotent: a `Program` that already has one is returned unchanged
/// (§3.5).
#[must_use]
pub fn enrich_program_with_effects(universe: &Term, reserved: &Reserved) -> Term {
    let Ok(program_children) = program_of(universe, reserved) else {
        return universe.clone();
    };
    let already_has_effects = program_children
        .iter()
        .any(|c| c.as_app_headed_by(reserved.effects).is_some());
    if already_has_effects {
        return universe.clone();
    }

    let effects = Term::app(
        Term::sym(reserved.effects),
        vec![
            Term::app(Term::sym(reserved.pending), vec![]),
            Term::app(Term::sym(reserved.inbox), vec![]),
        ],
    );
    let mut new_children = program_children.to_vec();
    new_children.push(effects);
    replace_program(universe, new_children, reserved)
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

    fn minimal_universe(reserved: &Reserved, program_arg: Term) -> Term {
        Term::app(
            Term::sym(reserved.universe),
            vec![
                Term::app(Term::sym(reserved.program), vec![program_arg]),
                Term::app(Term::sym(reserved.rules), vec![]),
                Term::app(Term::sym(reserved.rule_rules), vec![]),
            ],
        )
    }

    #[test]
    fn program_of_finds_the_single_section() {
        let (_interner, reserved) = setup();
        let u = minimal_universe(&reserved, Term::num(42.0));
        assert_eq!(program_of(&u, &reserved).unwrap(), &[Term::num(42.0)]);
    }

    #[test]
    fn missing_section_is_a_shape_error() {
        let (_interner, reserved) = setup();
        let u = Term::app(Term::sym(reserved.universe), vec![]);
        assert_eq!(
            program_of(&u, &reserved),
            Err(ShapeError::MissingSection { section: "Program" })
        );
    }

    #[test]
    fn enrich_is_idempotent() {
        let (_interner, reserved) = setup();
        let u = minimal_universe(&reserved, Term::num(1.0));
        let once = enrich_program_with_effects(&u, &reserved);
        let twice = enrich_program_with_effects(&once, &reserved);
        assert_eq!(once, twice);
        assert_eq!(program_of(&once, &reserved).unwrap().len(), 2);
    }
}
