//! Fault-injecting hook set.
//!
//! Each override draws a fresh binary choice every time its node is visited:
//! 0 keeps the standard rule, 1 substitutes the faulty one. All other
//! dispatch points behave exactly as in the deterministic strategy.

use crate::diagnostic::Diagnostic;
use crate::error::EvalResult;
use crate::evaluator::Interpreter;
use crate::strategy::Hooks;
use crate::value::Value;
use pylite_types::ast::{Node, OperatorKind};

pub(crate) const HOOKS: Hooks = Hooks {
    resolve_name,
    resolve_mod,
    exec_if,
    ..Hooks::DETERMINISTIC
};

/// The name must still be bound; the fault only changes what it reads as.
fn resolve_name(interp: &mut Interpreter, name: &str) -> EvalResult<Value> {
    let value = interp.lookup(name)?;
    let as_value = interp.choose(2) == 0;
    interp.record(Diagnostic::NameInterpretation {
        name: name.to_string(),
        as_value,
    });
    Ok(if as_value {
        value
    } else {
        Value::Str(name.to_string())
    })
}

/// Drawn when the operator is resolved: after both operands of a `BinaryOp`,
/// but before the target read of an `AugAssign`.
fn resolve_mod(interp: &mut Interpreter) -> OperatorKind {
    let as_mod = interp.choose(2) == 0;
    interp.record(Diagnostic::ModInterpretation { as_mod });
    if as_mod {
        OperatorKind::Mod
    } else {
        OperatorKind::Div
    }
}

/// The draw happens before the test is evaluated.
fn exec_if(interp: &mut Interpreter, test: &Node, body: &[Node], orelse: &[Node]) -> EvalResult<()> {
    let correct = interp.choose(2) == 0;
    interp.record(Diagnostic::IfInterpretation { correct });
    interp.exec_branch(test, body, orelse, !correct)
}
