//! Runtime values.

use crate::error::EvalResult;
use pylite_types::ast::Constant;
use std::fmt;
use std::sync::Arc;

/// Host function signature shared by builtins and bound callables.
pub type NativeFn = dyn Fn(&[Value]) -> EvalResult<Value> + Send + Sync;

/// A named host function.
#[derive(Clone)]
pub struct Callable {
    name: String,
    func: Arc<NativeFn>,
}

impl Callable {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> EvalResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, args: &[Value]) -> EvalResult<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

/// A runtime value. Values are never shared mutably; cloning copies.
///
/// `PartialEq` here is structural (`Int(1) != Float(1.0)`). Language-level
/// equality lives in [`crate::ops::compare`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Callable(Callable),
    Unit,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Str(_) => "str",
            Self::Callable(_) => "builtin_function",
            Self::Unit => "NoneType",
        }
    }

    /// Nonzero numbers, non-empty strings, `true` and callables are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(n) => *n != 0,
            Self::Float(n) => *n != 0.0,
            Self::Bool(b) => *b,
            Self::Str(s) => !s.is_empty(),
            Self::Callable(_) => true,
            Self::Unit => false,
        }
    }

    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }
}

impl From<&Constant> for Value {
    fn from(constant: &Constant) -> Self {
        match constant {
            Constant::Int(n) => Self::Int(*n),
            Constant::Float(n) => Self::Float(*n),
            Constant::Str(s) => Self::Str(s.clone()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

/// Shortest round-trip digits, switching to exponent form (`1e+16`,
/// `1e-05`) outside `1e-4 <= |n| < 1e16`.
fn fmt_float(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("nan");
    }
    if n.is_infinite() {
        return f.write_str(if n > 0.0 { "inf" } else { "-inf" });
    }
    let magnitude = n.abs();
    if n == 0.0 || (1e-4..1e16).contains(&magnitude) {
        return if n.fract() == 0.0 {
            write!(f, "{n:.1}")
        } else {
            write!(f, "{n}")
        };
    }
    let scientific = format!("{n:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    write!(f, "{mantissa}e{sign}{:02}", exponent.abs())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => fmt_float(*n, f),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Str(s) => f.write_str(s),
            Self::Callable(c) => write!(f, "<built-in function {}>", c.name()),
            Self::Unit => f.write_str("None"),
        }
    }
}
