use thiserror::Error;

/// Errors raised while loading a program handed over by a front end.
#[derive(Debug, Error)]
pub enum ProgramError {
    /// The JSON document is not a valid Pylite program.
    #[error("malformed program: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A `Compare` node whose operator and comparator lists disagree in length.
    #[error("compare node has {ops} operators but {comparators} comparators")]
    CompareArity { ops: usize, comparators: usize },
}
