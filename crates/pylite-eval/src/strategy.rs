//! Evaluation strategies and their hook sets.
//!
//! A strategy is a [`Hooks`] record: plain function pointers for the four
//! dispatch points that differ between strategies. The deterministic set
//! lives here; the fault-injecting and pattern-rewriting sets live in
//! [`crate::fault`] and [`crate::rewrite`].

use crate::error::EvalResult;
use crate::evaluator::Interpreter;
use crate::value::Value;
use crate::{fault, rewrite};
use pylite_types::ast::{Node, OperatorKind};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Resolve a `Name` node (also used for an `AugAssign` target's current value).
pub type ResolveNameFn = fn(&mut Interpreter, &str) -> EvalResult<Value>;
/// Pick the operator that `%` stands for at this visit.
pub type ResolveModFn = fn(&mut Interpreter) -> OperatorKind;
/// Execute an `If` statement: test, body, orelse.
pub type ExecIfFn = fn(&mut Interpreter, &Node, &[Node], &[Node]) -> EvalResult<()>;
/// Evaluate a `BinaryOp` node from its operator and unevaluated children.
pub type EvalBinaryFn = fn(&mut Interpreter, OperatorKind, &Node, &Node) -> EvalResult<Value>;

/// The dispatch points a strategy may override.
#[derive(Clone, Copy)]
pub struct Hooks {
    pub resolve_name: ResolveNameFn,
    pub resolve_mod: ResolveModFn,
    pub exec_if: ExecIfFn,
    pub eval_binary: EvalBinaryFn,
}

impl Hooks {
    /// Standard semantics at every dispatch point.
    pub const DETERMINISTIC: Hooks = Hooks {
        resolve_name,
        resolve_mod,
        exec_if,
        eval_binary,
    };
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

fn resolve_name(interp: &mut Interpreter, name: &str) -> EvalResult<Value> {
    interp.lookup(name)
}

fn resolve_mod(_interp: &mut Interpreter) -> OperatorKind {
    OperatorKind::Mod
}

fn exec_if(interp: &mut Interpreter, test: &Node, body: &[Node], orelse: &[Node]) -> EvalResult<()> {
    interp.exec_branch(test, body, orelse, false)
}

fn eval_binary(
    interp: &mut Interpreter,
    op: OperatorKind,
    left: &Node,
    right: &Node,
) -> EvalResult<Value> {
    interp.eval_binary_operands(op, left, right)
}

// ══════════════════════════════════════════════════════════════════════════════
// Strategy selection
// ══════════════════════════════════════════════════════════════════════════════

/// The three interchangeable evaluation behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Standard semantics.
    Deterministic,
    /// Randomly substitutes wrong rules for names, `%` and `If`.
    FaultInjecting,
    /// Evaluates certain arithmetic shapes through algebraic rewrites.
    PatternRewriting,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Deterministic,
        Strategy::FaultInjecting,
        Strategy::PatternRewriting,
    ];

    pub fn hooks(self) -> Hooks {
        match self {
            Self::Deterministic => Hooks::DETERMINISTIC,
            Self::FaultInjecting => fault::HOOKS,
            Self::PatternRewriting => rewrite::HOOKS,
        }
    }

    /// Short selection name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Deterministic => "correct",
            Self::FaultInjecting => "stochastic",
            Self::PatternRewriting => "binding",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy `{0}` (expected correct, stochastic or binding)")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "correct" | "deterministic" => Ok(Self::Deterministic),
            "stochastic" | "fault-injecting" | "fault_injecting" => Ok(Self::FaultInjecting),
            "binding" | "pattern-rewriting" | "pattern_rewriting" => Ok(Self::PatternRewriting),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}
