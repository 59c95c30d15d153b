//! Core node evaluator.
//!
//! [`Interpreter`] walks the tree with an exhaustive match over [`Node`].
//! Four dispatch points (name resolution, `%` resolution, `If` execution
//! and `BinaryOp` evaluation) go through the [`Hooks`] of the selected
//! [`Strategy`]; everything else is shared by all strategies.

use crate::builtins::Builtins;
use crate::choice::{ChoiceSource, RandomChoices};
use crate::config::EvalConfig;
use crate::diagnostic::Diagnostic;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::ops;
use crate::strategy::{Hooks, Strategy};
use crate::value::Value;
use pylite_types::ast::{CompareKind, Node, OperatorKind, Program};

/// Minimum stack to keep free before recursing (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack allocated per growth (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// One interpreter run: owns its environment, choice source and trace.
pub struct Interpreter {
    strategy: Strategy,
    hooks: Hooks,
    env: Environment,
    builtins: Builtins,
    choices: Box<dyn ChoiceSource>,
    config: EvalConfig,
    depth: usize,
    gas: u64,
    diagnostics: Vec<Diagnostic>,
    last_value: Value,
}

impl Interpreter {
    /// Create an interpreter with the standard builtins, entropy-seeded
    /// randomness and default limits.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            hooks: strategy.hooks(),
            env: Environment::new(),
            builtins: Builtins::standard(),
            choices: Box::new(RandomChoices::from_entropy()),
            config: EvalConfig::default(),
            depth: 0,
            gas: 0,
            diagnostics: Vec::new(),
            last_value: Value::Unit,
        }
    }

    pub fn with_builtins(mut self, builtins: Builtins) -> Self {
        self.builtins = builtins;
        self
    }

    pub fn with_choices(mut self, choices: impl ChoiceSource + 'static) -> Self {
        self.choices = Box::new(choices);
        self
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Decisions recorded by the strategy so far, in order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Value of the last top-level node evaluated.
    pub fn last_value(&self) -> &Value {
        &self.last_value
    }

    /// Nodes visited so far.
    pub fn gas_used(&self) -> u64 {
        self.gas
    }

    // ══════════════════════════════════════════════════════════════════════
    // Entry points
    // ══════════════════════════════════════════════════════════════════════

    /// Execute every top-level node in order and return the value of the
    /// last one (`Unit` for statements or an empty program).
    #[tracing::instrument(level = "debug", skip_all, fields(strategy = %self.strategy))]
    pub fn run(&mut self, program: &Program) -> EvalResult<Value> {
        self.run_nodes(&program.body)
    }

    pub fn run_nodes(&mut self, nodes: &[Node]) -> EvalResult<Value> {
        self.last_value = Value::Unit;
        for node in nodes {
            self.last_value = self.eval(node)?;
        }
        Ok(self.last_value.clone())
    }

    /// Evaluate one node. Statements evaluate to `Unit`.
    pub fn eval(&mut self, node: &Node) -> EvalResult<Value> {
        if self.depth >= self.config.max_depth {
            return Err(EvalError::StackExhausted {
                limit: self.config.max_depth,
            });
        }
        self.tick()?;
        self.depth += 1;
        let result = stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || self.dispatch(node));
        self.depth -= 1;
        result
    }

    fn tick(&mut self) -> EvalResult<()> {
        self.gas += 1;
        match self.config.gas_limit {
            Some(limit) if self.gas > limit => Err(EvalError::GasExhausted { limit }),
            _ => Ok(()),
        }
    }

    fn dispatch(&mut self, node: &Node) -> EvalResult<Value> {
        match node {
            Node::Literal(constant) => Ok(Value::from(constant)),
            Node::Name(name) => {
                let resolve = self.hooks.resolve_name;
                resolve(self, name)
            }
            Node::BinaryOp { op, left, right } => {
                let eval_binary = self.hooks.eval_binary;
                eval_binary(self, *op, left, right)
            }
            Node::Compare {
                left,
                ops,
                comparators,
            } => self.eval_compare(left, ops, comparators),
            Node::Assign { target, value } => {
                let value = self.eval(value)?;
                self.env.set(target, value);
                Ok(Value::Unit)
            }
            Node::AugAssign { target, op, value } => {
                // The operator is resolved before the target is read.
                let op = self.resolve_operator(*op);
                let resolve = self.hooks.resolve_name;
                let current = resolve(self, target)?;
                let rhs = self.eval(value)?;
                let result = ops::apply(op, &current, &rhs)?;
                self.env.set(target, result);
                Ok(Value::Unit)
            }
            Node::If { test, body, orelse } => {
                let exec_if = self.hooks.exec_if;
                exec_if(self, test, body, orelse)?;
                Ok(Value::Unit)
            }
            Node::While { test, body } => {
                while self.eval(test)?.is_truthy() {
                    self.exec_block(body)?;
                }
                Ok(Value::Unit)
            }
            Node::Call { function, args } => self.eval_call(function, args),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Shared building blocks for strategy hooks
    // ══════════════════════════════════════════════════════════════════════

    /// Bound value of `name`, without going through the name hook.
    pub fn lookup(&self, name: &str) -> EvalResult<Value> {
        self.env.get(name).cloned()
    }

    /// The operator actually applied for `op`; `%` goes through the
    /// strategy's hook.
    pub fn resolve_operator(&mut self, op: OperatorKind) -> OperatorKind {
        if op == OperatorKind::Mod {
            let resolve_mod = self.hooks.resolve_mod;
            resolve_mod(self)
        } else {
            op
        }
    }

    /// Evaluate left, then right (both always), then resolve and apply the
    /// operator.
    pub fn eval_binary_operands(
        &mut self,
        op: OperatorKind,
        left: &Node,
        right: &Node,
    ) -> EvalResult<Value> {
        let lv = self.eval(left)?;
        let rv = self.eval(right)?;
        let op = self.resolve_operator(op);
        ops::apply(op, &lv, &rv)
    }

    /// Evaluate `test` and run `body` when it is truthy, `orelse` otherwise.
    /// With `swapped` the branches trade places.
    pub fn exec_branch(
        &mut self,
        test: &Node,
        body: &[Node],
        orelse: &[Node],
        swapped: bool,
    ) -> EvalResult<()> {
        let taken = self.eval(test)?.is_truthy() != swapped;
        self.exec_block(if taken { body } else { orelse })
    }

    pub fn exec_block(&mut self, body: &[Node]) -> EvalResult<()> {
        for stmt in body {
            self.eval(stmt)?;
        }
        Ok(())
    }

    /// Draw a choice in `0..n` from the run's choice source.
    pub fn choose(&mut self, n: u32) -> u32 {
        self.choices.choose(n)
    }

    /// Record a strategy decision and emit it as a tracing event.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::NameInterpretation { .. } | Diagnostic::ModInterpretation { .. } => {
                tracing::debug!(strategy = %self.strategy, "{diagnostic}")
            }
            Diagnostic::IfInterpretation { .. } | Diagnostic::PatternFired { .. } => {
                tracing::info!(strategy = %self.strategy, "{diagnostic}")
            }
        }
        self.diagnostics.push(diagnostic);
    }

    // ── Comparisons & Calls ──────────────────────────────────────────────

    /// Every operand is evaluated before the first comparison runs; the
    /// chain then stops at the first pair that compares false.
    fn eval_compare(
        &mut self,
        left: &Node,
        kinds: &[CompareKind],
        comparators: &[Node],
    ) -> EvalResult<Value> {
        let mut values = Vec::with_capacity(comparators.len() + 1);
        values.push(self.eval(left)?);
        for comparator in comparators {
            values.push(self.eval(comparator)?);
        }
        for (kind, pair) in kinds.iter().zip(values.windows(2)) {
            if !ops::compare(*kind, &pair[0], &pair[1])? {
                return Ok(Value::Bool(false));
            }
        }
        Ok(Value::Bool(true))
    }

    /// Builtins win over environment bindings of the same name.
    fn eval_call(&mut self, function: &str, args: &[Node]) -> EvalResult<Value> {
        let target = match self.builtins.get(function) {
            Some(builtin) => Value::Callable(builtin.clone()),
            None => self
                .env
                .lookup(function)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedFunction(function.to_string()))?,
        };

        let mut arg_vals = Vec::with_capacity(args.len());
        for arg in args {
            arg_vals.push(self.eval(arg)?);
        }

        match target {
            Value::Callable(callable) => callable.invoke(&arg_vals),
            other => Err(EvalError::NotCallable {
                name: function.to_string(),
                type_name: other.type_name(),
            }),
        }
    }
}
