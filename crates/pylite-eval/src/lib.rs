//! Pylite tree-walking evaluator.
//!
//! Executes an already-parsed Pylite program under one of three
//! interchangeable strategies:
//!
//! - [`Strategy::Deterministic`]: standard semantics.
//! - [`Strategy::FaultInjecting`]: randomly swaps in wrong rules for name
//!   lookup, `%` and `If`, producing mutated traces for grader testing.
//! - [`Strategy::PatternRewriting`]: evaluates a fixed set of arithmetic
//!   shapes through algebraic regroupings instead of the literal operators.
//!
//! A `While` whose test never turns false does not terminate unless the run
//! carries a gas limit (see [`EvalConfig`]).

pub mod builtins;
pub mod choice;
pub mod config;
pub mod diagnostic;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod fault;
pub mod ops;
pub mod rewrite;
pub mod strategy;
pub mod value;

pub use builtins::{Builtins, OutputBuffer};
pub use choice::{ChoiceSource, RandomChoices, ScriptedChoices};
pub use config::EvalConfig;
pub use diagnostic::Diagnostic;
pub use env::Environment;
pub use error::{EvalError, EvalResult};
pub use evaluator::Interpreter;
pub use rewrite::RewritePattern;
pub use strategy::{Hooks, Strategy, UnknownStrategy};
pub use value::{Callable, Value};

use pylite_types::ast::Program;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber for strategy diagnostics.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=pylite_eval=info` (or `debug` for every draw).
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the embedder.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

/// Run `program` under `strategy` with the standard builtins and fresh
/// randomness. Returns the value of the last top-level node.
pub fn run(strategy: Strategy, program: &Program) -> EvalResult<Value> {
    Interpreter::new(strategy).run(program)
}

pub fn run_deterministic(program: &Program) -> EvalResult<Value> {
    run(Strategy::Deterministic, program)
}

pub fn run_fault_injecting(program: &Program) -> EvalResult<Value> {
    run(Strategy::FaultInjecting, program)
}

pub fn run_pattern_rewriting(program: &Program) -> EvalResult<Value> {
    run(Strategy::PatternRewriting, program)
}
