//! Operator table: arithmetic and comparison semantics over [`Value`]s.
//!
//! Integers stay integers where the host would keep them so (`+ - * // % **`
//! with a non-negative exponent); `/` always yields a float. Booleans take
//! part in arithmetic as 0 and 1. Floor division and modulo round toward
//! negative infinity, so the remainder takes the sign of the divisor.

use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use pylite_types::ast::{CompareKind, OperatorKind};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Int(n) => Some(Self::Int(*n)),
            Value::Bool(b) => Some(Self::Int(i64::from(*b))),
            Value::Float(n) => Some(Self::Float(*n)),
            _ => None,
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(n) => n,
        }
    }
}

/// Apply an arithmetic operator to two values.
pub fn apply(op: OperatorKind, left: &Value, right: &Value) -> EvalResult<Value> {
    match (Num::of(left), Num::of(right)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => apply_int(op, a, b),
        (Some(a), Some(b)) => apply_float(op, a.to_f64(), b.to_f64()),
        _ => Err(EvalError::type_mismatch(
            op,
            left.type_name(),
            right.type_name(),
        )),
    }
}

fn apply_int(op: OperatorKind, a: i64, b: i64) -> EvalResult<Value> {
    let overflow = || EvalError::Overflow(op.to_string());
    let zero_check = || {
        if b == 0 {
            Err(EvalError::DivisionByZero(op.to_string()))
        } else {
            Ok(())
        }
    };

    let result = match op {
        OperatorKind::Add => a.checked_add(b).ok_or_else(overflow)?,
        OperatorKind::Sub => a.checked_sub(b).ok_or_else(overflow)?,
        OperatorKind::Mult => a.checked_mul(b).ok_or_else(overflow)?,
        OperatorKind::Div => {
            zero_check()?;
            return Ok(Value::Float(a as f64 / b as f64));
        }
        OperatorKind::FloorDiv => {
            zero_check()?;
            let q = a.checked_div(b).ok_or_else(overflow)?;
            if a % b != 0 && (a < 0) != (b < 0) {
                q - 1
            } else {
                q
            }
        }
        OperatorKind::Mod => {
            zero_check()?;
            let r = a.wrapping_rem(b);
            if r != 0 && (r < 0) != (b < 0) {
                r + b
            } else {
                r
            }
        }
        OperatorKind::Pow => {
            if b < 0 {
                if a == 0 {
                    return Err(EvalError::DivisionByZero(op.to_string()));
                }
                return Ok(Value::Float((a as f64).powf(b as f64)));
            }
            let exp = u32::try_from(b).map_err(|_| overflow())?;
            a.checked_pow(exp).ok_or_else(overflow)?
        }
    };
    Ok(Value::Int(result))
}

fn apply_float(op: OperatorKind, a: f64, b: f64) -> EvalResult<Value> {
    let zero_check = || {
        if b == 0.0 {
            Err(EvalError::DivisionByZero(op.to_string()))
        } else {
            Ok(())
        }
    };

    let result = match op {
        OperatorKind::Add => a + b,
        OperatorKind::Sub => a - b,
        OperatorKind::Mult => a * b,
        OperatorKind::Div => {
            zero_check()?;
            a / b
        }
        OperatorKind::FloorDiv => {
            zero_check()?;
            float_divmod(a, b).0
        }
        OperatorKind::Mod => {
            zero_check()?;
            float_divmod(a, b).1
        }
        OperatorKind::Pow => {
            if a == 0.0 && b < 0.0 {
                return Err(EvalError::DivisionByZero(op.to_string()));
            }
            a.powf(b)
        }
    };
    Ok(Value::Float(result))
}

/// Floor quotient and remainder of two floats, `b != 0`.
///
/// The quotient is derived from the remainder so that `q * b + r == a` holds
/// as closely as floating point allows (`1.0 // 0.1 == 9.0`, not `10.0`).
fn float_divmod(a: f64, b: f64) -> (f64, f64) {
    let mut r = a % b;
    let mut div = (a - r) / b;
    if r != 0.0 {
        if (b < 0.0) != (r < 0.0) {
            r += b;
            div -= 1.0;
        }
    } else {
        r = 0.0_f64.copysign(b);
    }
    let q = if div != 0.0 {
        let floor = div.floor();
        if div - floor > 0.5 {
            floor + 1.0
        } else {
            floor
        }
    } else {
        0.0_f64.copysign(a / b)
    };
    (q, r)
}

/// Language-level equality: numbers compare by value across int, float and
/// bool; everything else compares within its own kind.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Callable(a), Value::Callable(b)) => a == b,
        (Value::Unit, Value::Unit) => true,
        _ => match (Num::of(left), Num::of(right)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => a == b,
            (Some(a), Some(b)) => a.to_f64() == b.to_f64(),
            _ => false,
        },
    }
}

fn ordering(kind: CompareKind, left: &Value, right: &Value) -> EvalResult<Option<Ordering>> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        _ => match (Num::of(left), Num::of(right)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(Some(a.cmp(&b))),
            (Some(a), Some(b)) => Ok(a.to_f64().partial_cmp(&b.to_f64())),
            _ => Err(EvalError::type_mismatch(
                kind,
                left.type_name(),
                right.type_name(),
            )),
        },
    }
}

/// Apply one comparison of a chain.
pub fn compare(kind: CompareKind, left: &Value, right: &Value) -> EvalResult<bool> {
    let holds = match kind {
        CompareKind::Eq => values_equal(left, right),
        CompareKind::Ne => !values_equal(left, right),
        // NaN orders as `None`, which fails every ordering test.
        CompareKind::Lt => ordering(kind, left, right)? == Some(Ordering::Less),
        CompareKind::Gt => ordering(kind, left, right)? == Some(Ordering::Greater),
        CompareKind::Le => matches!(
            ordering(kind, left, right)?,
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareKind::Ge => matches!(
            ordering(kind, left, right)?,
            Some(Ordering::Greater | Ordering::Equal)
        ),
    };
    Ok(holds)
}
