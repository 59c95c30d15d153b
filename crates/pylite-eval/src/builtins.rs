//! Builtin function table.
//!
//! A [`Builtins`] table is an immutable value handed to each interpreter at
//! construction. Call resolution consults it before the environment.

use crate::error::{EvalError, EvalResult};
use crate::value::{Callable, Value};
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Immutable name → callable table.
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    table: BTreeMap<String, Callable>,
}

impl Builtins {
    /// An empty table, with no `print`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard table: `print` writes to stdout.
    pub fn standard() -> Self {
        Self::empty().with(Callable::new("print", |args| {
            print_to(&mut std::io::stdout().lock(), args)
        }))
    }

    /// A table whose `print` appends to the returned buffer instead of stdout.
    pub fn capturing() -> (Self, OutputBuffer) {
        let buffer = OutputBuffer::default();
        let sink = buffer.clone();
        let builtins = Self::empty().with(Callable::new("print", move |args| {
            sink.push(render_line(args));
            Ok(Value::Unit)
        }));
        (builtins, buffer)
    }

    /// Add (or replace) a builtin.
    pub fn with(mut self, callable: Callable) -> Self {
        self.table.insert(callable.name().to_string(), callable);
        self
    }

    /// Add a builtin from a bare closure.
    pub fn with_fn(
        self,
        name: &str,
        func: impl Fn(&[Value]) -> EvalResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.with(Callable::new(name, func))
    }

    pub fn get(&self, name: &str) -> Option<&Callable> {
        self.table.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

/// Arguments joined by single spaces, the way `print` shows them.
fn render_line(args: &[Value]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write one `print` line; a failed write surfaces as a `print` error.
fn print_to(out: &mut impl Write, args: &[Value]) -> EvalResult<Value> {
    writeln!(out, "{}", render_line(args)).map_err(|e| EvalError::Builtin {
        name: "print".into(),
        message: e.to_string(),
    })?;
    Ok(Value::Unit)
}

/// Lines printed by a capturing `print`.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl OutputBuffer {
    fn push(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }

    /// Snapshot of everything printed so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
