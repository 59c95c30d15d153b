//! Runtime error types for the Pylite evaluator.

use thiserror::Error;

/// Evaluation error. Any of these aborts the current run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Name or augmented-assignment target that was never bound
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),
    /// Call target found neither in the builtins nor in the environment
    #[error("undefined function `{0}`")]
    UndefinedFunction(String),
    /// Operator applied to operand types it does not support
    #[error("type mismatch: unsupported operand types for {op}: '{left}' and '{right}'")]
    TypeMismatch {
        op: String,
        left: &'static str,
        right: &'static str,
    },
    /// Call target bound in the environment to a non-callable value
    #[error("'{type_name}' object `{name}` is not callable")]
    NotCallable {
        name: String,
        type_name: &'static str,
    },
    /// Division, floor division or modulo by zero
    #[error("division by zero in {0}")]
    DivisionByZero(String),
    /// Integer result outside the i64 range
    #[error("integer overflow in {0}")]
    Overflow(String),
    /// Evaluation nested deeper than the configured limit
    #[error("maximum evaluation depth exceeded ({limit})")]
    StackExhausted { limit: usize },
    /// Step budget used up
    #[error("gas exhausted after {limit} steps")]
    GasExhausted { limit: u64 },
    /// A builtin reported a failure
    #[error("builtin `{name}` failed: {message}")]
    Builtin { name: String, message: String },
}

impl EvalError {
    pub(crate) fn type_mismatch(op: impl ToString, left: &'static str, right: &'static str) -> Self {
        Self::TypeMismatch {
            op: op.to_string(),
            left,
            right,
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
