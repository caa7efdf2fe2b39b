//! Error taxonomy (§0.2, §7): plain enums with hand-written `Display` impls,
//! propagated with `Result`/`?`. No `anyhow`, no `thiserror`.

use std::fmt;

use crate::subst::SubstError;

/// A malformed `Universe`/`Rules`/`R[...]` shape (§7, first bullet). Always
/// fatal to the call that discovered it; the Universe is left untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// The top-level value is not an application headed by `Universe`.
    NotAUniverse,
    /// `Universe` has zero or more than one child headed by `section`.
    MissingSection { section: &'static str },
    DuplicateSection { section: &'static str },
    /// An `R[...]` application did not match §3.4's shape.
    MalformedRule { index: usize, reason: &'static str },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAUniverse => write!(f, "value is not headed by Universe"),
            Self::MissingSection { section } => write!(f, "Universe has no {section} section"),
            Self::DuplicateSection { section } => write!(f, "Universe has more than one {section} section"),
            Self::MalformedRule { index, reason } => {
                write!(f, "rule at index {index} is ill-formed: {reason}")
            }
        }
    }
}

/// The top-level error type returned by `Normalize`/`Dispatch`/`ExtractRules`
/// and ingestion (§0.2, §7, third bullet).
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Shape(ShapeError),
    Subst(SubstError),
    /// `Normalize` exhausted its step budget without reaching a fixed point.
    NonTermination { budget: usize },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape(e) => write!(f, "{e}"),
            Self::Subst(e) => write!(f, "{e}"),
            Self::NonTermination { budget } => write!(f, "rewriting did not reach a fixed point within {budget} steps"),
        }
    }
}

impl From<ShapeError> for EngineError {
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}

impl From<SubstError> for EngineError {
    fn from(e: SubstError) -> Self {
        Self::Subst(e)
    }
}
