//! The built-in operation table (§4.4): maps a reserved symbol id (a
//! canonical name or one of its one-/two-character aliases) to the
//! [`BuiltinOp`] it triggers. `Splat`/`...!` is deliberately absent — it is
//! recognized structurally during argument flattening (see `fold.rs`), not
//! dispatched through this table, because its result is a Splice rather than
//! a literal value.

use ahash::AHashMap;
use strum::Display;

use crate::intern::{Interner, Sym};

/// One recognized built-in operation (§4.4's grouped table). Variants are
/// named after the *canonical* spelling; aliases resolve to the same
/// variant through [`Builtins::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BuiltinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Sqrt,
    Abs,
    Min,
    Max,
    Floor,
    Ceil,
    Round,
    // Strings
    Concat,
    ToString,
    ToNormalString,
    ToUpper,
    ToLower,
    Trim,
    StrLen,
    Substring,
    IndexOf,
    Replace,
    ReplaceAll,
    SplitToChars,
    SplitBy,
    Escape,
    Unescape,
    CharFromCode,
    // Comparison
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    // Boolean
    And,
    Or,
    Not,
    // Type tests
    IsNum,
    IsStr,
    IsSym,
    IsTrue,
    IsFalse,
    AreNums,
    AreStrings,
    AreSyms,
    // Utilities
    FreshId,
    Random,
    ParseNum,
    Debug,
    // Serialization
    Serialize,
    Deserialize,
}

/// The built-in dispatch table, built once per [`crate::engine::Engine`].
#[derive(Debug)]
pub struct Builtins {
    table: AHashMap<Sym, BuiltinOp>,
}

fn register(table: &mut AHashMap<Sym, BuiltinOp>, interner: &mut Interner, op: BuiltinOp, names: &[&str]) {
    for &name in names {
        table.insert(interner.intern(name), op);
    }
}

impl Builtins {
    /// Interns every built-in name (and alias) into `interner` and records
    /// its operation.
    pub fn new(interner: &mut Interner) -> Self {
        let mut table = AHashMap::default();
        use BuiltinOp::{
            Abs, Add, And, AreNums, AreStrings, AreSyms, Ceil, CharFromCode, Concat, Debug, Deserialize, Div, Eq,
            Escape, Floor, FreshId, Gt, Gte, IndexOf, IsFalse, IsNum, IsStr, IsSym, IsTrue, Lt, Lte, Max, Min, Mod,
            Mul, Neq, Not, Or, ParseNum, Pow, Random, Replace, ReplaceAll, Round, Serialize, SplitBy, SplitToChars,
            Sqrt, StrLen, Sub, Substring, ToLower, ToNormalString, ToString, ToUpper, Trim, Unescape,
        };

        register(&mut table, interner, Add, &["Add", "+"]);
        register(&mut table, interner, Sub, &["Sub", "-"]);
        register(&mut table, interner, Mul, &["Mul", "*"]);
        register(&mut table, interner, Div, &["Div", "/"]);
        register(&mut table, interner, Mod, &["Mod", "%"]);
        register(&mut table, interner, Pow, &["Pow", "^"]);
        register(&mut table, interner, Sqrt, &["Sqrt"]);
        register(&mut table, interner, Abs, &["Abs"]);
        register(&mut table, interner, Min, &["Min"]);
        register(&mut table, interner, Max, &["Max"]);
        register(&mut table, interner, Floor, &["Floor"]);
        register(&mut table, interner, Ceil, &["Ceil"]);
        register(&mut table, interner, Round, &["Round"]);

        register(&mut table, interner, Concat, &["Concat"]);
        register(&mut table, interner, ToString, &["ToString"]);
        register(&mut table, interner, ToNormalString, &["ToNormalString"]);
        register(&mut table, interner, ToUpper, &["ToUpper"]);
        register(&mut table, interner, ToLower, &["ToLower"]);
        register(&mut table, interner, Trim, &["Trim"]);
        register(&mut table, interner, StrLen, &["StrLen"]);
        register(&mut table, interner, Substring, &["Substring"]);
        register(&mut table, interner, IndexOf, &["IndexOf"]);
        register(&mut table, interner, Replace, &["Replace"]);
        register(&mut table, interner, ReplaceAll, &["ReplaceAll"]);
        register(&mut table, interner, SplitToChars, &["SplitToChars"]);
        register(&mut table, interner, SplitBy, &["SplitBy"]);
        register(&mut table, interner, Escape, &["Escape"]);
        register(&mut table, interner, Unescape, &["Unescape"]);
        register(&mut table, interner, CharFromCode, &["CharFromCode"]);

        register(&mut table, interner, Eq, &["Eq", "=="]);
        register(&mut table, interner, Neq, &["Neq", "!="]);
        register(&mut table, interner, Lt, &["Lt", "<"]);
        register(&mut table, interner, Gt, &["Gt", ">"]);
        register(&mut table, interner, Lte, &["Lte", "<="]);
        register(&mut table, interner, Gte, &["Gte", ">="]);

        register(&mut table, interner, And, &["And"]);
        register(&mut table, interner, Or, &["Or"]);
        register(&mut table, interner, Not, &["Not"]);

        register(&mut table, interner, IsNum, &["IsNum"]);
        register(&mut table, interner, IsStr, &["IsStr"]);
        register(&mut table, interner, IsSym, &["IsSym"]);
        register(&mut table, interner, IsTrue, &["IsTrue"]);
        register(&mut table, interner, IsFalse, &["IsFalse"]);
        register(&mut table, interner, AreNums, &["AreNums"]);
        register(&mut table, interner, AreStrings, &["AreStrings"]);
        register(&mut table, interner, AreSyms, &["AreSyms"]);

        register(&mut table, interner, FreshId, &["FreshId"]);
        register(&mut table, interner, Random, &["Random"]);
        register(&mut table, interner, ParseNum, &["ParseNum"]);
        register(&mut table, interner, Debug, &["Debug"]);

        register(&mut table, interner, Serialize, &["Serialize"]);
        register(&mut table, interner, Deserialize, &["Deserialize"]);

        Self { table }
    }

    /// Looks up the operation a symbol dispatches to, if any.
    #[must_use]
    pub fn lookup(&self, sym: Sym) -> Option<BuiltinOp> {
        self.table.get(&sym).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_the_same_operation() {
        let mut interner = Interner::new();
        let builtins = Builtins::new(&mut interner);
        let add = interner.intern("Add");
        let plus = interner.intern("+");
        assert_eq!(builtins.lookup(add), Some(BuiltinOp::Add));
        assert_eq!(builtins.lookup(plus), Some(BuiltinOp::Add));
    }
}
