//! Reserved symbols (§6.1): the fixed vocabulary the engine itself
//! interprets. Every name here is interned exactly once, at [`Reserved::new`]
//! time, so every later comparison against a reserved name is an id
//! comparison rather than a string comparison.

use crate::intern::{Interner, Sym};

/// Pre-interned ids for every symbol the engine gives special meaning to.
///
/// An [`crate::engine::Engine`] owns one `Reserved` alongside its
/// [`Interner`]; every other component (matcher, substitution, folder,
/// driver) takes `&Reserved` as a plain function argument, the same way the
/// reference interpreter threads its `Interns` table through the VM.
#[derive(Debug, Clone, Copy)]
pub struct Reserved {
    pub universe: Sym,
    pub program: Sym,
    pub rules: Sym,
    pub rule_rules: Sym,
    pub rule: Sym,
    pub apply: Sym,
    pub app: Sym,
    pub var: Sym,
    pub var_rest: Sym,
    pub splat_long: Sym,
    pub splat_short: Sym,
    pub unbound: Sym,
    pub shield: Sym,
    pub true_: Sym,
    pub false_: Sym,
    pub effects: Sym,
    pub pending: Sym,
    pub inbox: Sym,
    pub guard_kw: Sym,
    pub prio_kw: Sym,
}

impl Reserved {
    /// Interns every reserved name into `interner` and records its id.
    pub fn new(interner: &mut Interner) -> Self {
        Self {
            universe: interner.intern("Universe"),
            program: interner.intern("Program"),
            rules: interner.intern("Rules"),
            rule_rules: interner.intern("RuleRules"),
            rule: interner.intern("R"),
            apply: interner.intern("Apply"),
            app: interner.intern("App"),
            var: interner.intern("Var"),
            var_rest: interner.intern("VarRest"),
            splat_long: interner.intern("Splat"),
            splat_short: interner.intern("...!"),
            unbound: interner.intern("Unbound"),
            shield: interner.intern("/!"),
            true_: interner.intern("True"),
            false_: interner.intern("False"),
            effects: interner.intern("Effects"),
            pending: interner.intern("Pending"),
            inbox: interner.intern("Inbox"),
            guard_kw: interner.intern(":guard"),
            prio_kw: interner.intern(":prio"),
        }
    }

    /// Whether `sym` is either spelling of the splat marker (§4.4's Splat
    /// group: `Splat`/`...!` are two distinct reserved symbols that both
    /// trigger the same flattening behaviour).
    #[must_use]
    pub fn is_splat(&self, sym: Sym) -> bool {
        sym == self.splat_long || sym == self.splat_short
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splat_aliases_are_distinct_ids_but_both_recognised() {
        let mut interner = Interner::new();
        let reserved = Reserved::new(&mut interner);
        assert_ne!(reserved.splat_long, reserved.splat_short);
        assert!(reserved.is_splat(reserved.splat_long));
        assert!(reserved.is_splat(reserved.splat_short));
    }
}
