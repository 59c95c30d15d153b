//! Observable trace of the choices a strategy made.

use crate::rewrite::RewritePattern;
use std::fmt;

/// One recorded decision. Graders read these to tell a faithful run from a
/// mutated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An `If` ran with its branches in order (`correct`) or swapped.
    IfInterpretation { correct: bool },
    /// A name resolved to its bound value, or to its own spelling.
    NameInterpretation { name: String, as_value: bool },
    /// `%` ran as modulo, or as true division.
    ModInterpretation { as_mod: bool },
    /// A rewrite pattern fired. `choice` is set for the four-term pattern.
    PatternFired {
        pattern: RewritePattern,
        choice: Option<u32>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IfInterpretation { correct: true } => f.write_str("Correct interpretation"),
            Self::IfInterpretation { correct: false } => f.write_str("Incorrect interpretation"),
            Self::NameInterpretation {
                name,
                as_value: true,
            } => write!(f, "name `{name}` read as value"),
            Self::NameInterpretation {
                name,
                as_value: false,
            } => write!(f, "name `{name}` read as string"),
            Self::ModInterpretation { as_mod: true } => f.write_str("% applied as modulo"),
            Self::ModInterpretation { as_mod: false } => f.write_str("% applied as division"),
            Self::PatternFired {
                pattern,
                choice: None,
            } => f.write_str(pattern.label()),
            Self::PatternFired {
                pattern,
                choice: Some(choice),
            } => write!(f, "{} (rewrite {choice})", pattern.label()),
        }
    }
}
