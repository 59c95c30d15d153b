//! Variable environment for the Pylite evaluator.

use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use std::collections::BTreeMap;

/// A single flat namespace owned by one interpreter run.
///
/// There is no scoping and no deletion: `set` inserts or overwrites, and
/// every later read in the same run sees the update.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a variable, failing with `UndefinedVariable` when unbound.
    pub fn get(&self, name: &str) -> EvalResult<&Value> {
        self.bindings
            .get(name)
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    /// Look up a variable without treating absence as an error.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bind `name`, replacing any previous value.
    pub fn set(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    /// All bindings, for capturing final state.
    pub fn bindings(&self) -> &BTreeMap<String, Value> {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
