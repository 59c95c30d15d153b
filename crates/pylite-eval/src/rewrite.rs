//! Pattern-rewriting hook set.
//!
//! Only `BinaryOp` is overridden. Before the generic operator runs, the node
//! and its children (grandchildren for the four-term shape) are matched
//! against a fixed, ordered list of shapes whose leaves are all numeric
//! literals. The first shape that matches computes its rewritten result;
//! when none matches, evaluation falls back to the standard rule.
//!
//! | # | shape         | evaluated as                                   |
//! |---|---------------|------------------------------------------------|
//! | 1 | `(a*b)+c`     | `a*(b+c)`                                      |
//! | 2 | `a+(b*c)`     | `(a+b)*c`                                      |
//! | 3 | `(a*b)-c`     | `a*(b-c)`                                      |
//! | 4 | `a-(b*c)`     | `(a-b)*c`                                      |
//! | 5 | `(a/b)+c`     | `a/(c+b)`                                      |
//! | 6 | `a+(b/c)`     | `(a+b)/c`                                      |
//! | 7 | `(a+(b/c))+d` | one of `((a+b)/c)+d`, `(a+b)/(c+d)`, `a+(b/(c+d))` |

use crate::diagnostic::Diagnostic;
use crate::error::EvalResult;
use crate::evaluator::Interpreter;
use crate::ops::apply;
use crate::strategy::Hooks;
use crate::value::Value;
use pylite_types::ast::{Node, OperatorKind};
use std::fmt;

pub(crate) const HOOKS: Hooks = Hooks {
    eval_binary,
    ..Hooks::DETERMINISTIC
};

/// The shapes recognised by the rewriting strategy, in match order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewritePattern {
    /// `(a*b)+c` → `a*(b+c)`
    MultAddLeft,
    /// `a+(b*c)` → `(a+b)*c`
    MultAddRight,
    /// `(a*b)-c` → `a*(b-c)`
    MultSubLeft,
    /// `a-(b*c)` → `(a-b)*c`
    MultSubRight,
    /// `(a/b)+c` → `a/(c+b)`
    DivAddLeft,
    /// `a+(b/c)` → `(a+b)/c`
    DivAddRight,
    /// `(a+(b/c))+d` → one of three regroupings
    FourTerm,
}

impl RewritePattern {
    pub fn label(self) -> &'static str {
        match self {
            Self::MultAddLeft => "first case mult/add",
            Self::MultAddRight => "second case mult/add",
            Self::MultSubLeft => "first case mult/sub",
            Self::MultSubRight => "second case mult/sub",
            Self::DivAddLeft => "first case division",
            Self::DivAddRight => "second case division",
            Self::FourTerm => "4 term expression",
        }
    }
}

impl fmt::Display for RewritePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The six shapes with three literal leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThreeLeaf {
    MultAddLeft,
    MultAddRight,
    MultSubLeft,
    MultSubRight,
    DivAddLeft,
    DivAddRight,
}

impl ThreeLeaf {
    fn pattern(self) -> RewritePattern {
        match self {
            Self::MultAddLeft => RewritePattern::MultAddLeft,
            Self::MultAddRight => RewritePattern::MultAddRight,
            Self::MultSubLeft => RewritePattern::MultSubLeft,
            Self::MultSubRight => RewritePattern::MultSubRight,
            Self::DivAddLeft => RewritePattern::DivAddLeft,
            Self::DivAddRight => RewritePattern::DivAddRight,
        }
    }
}

/// A matched shape together with its literal leaves, left to right.
enum Matched {
    Three(ThreeLeaf, Value, Value, Value),
    Four(Value, Value, Value, Value),
}

fn leaf(node: &Node) -> Option<Value> {
    node.as_numeric_literal().map(Value::from)
}

/// `x OP y` where both operands are numeric literals.
fn literal_pair(node: &Node, kind: OperatorKind) -> Option<(Value, Value)> {
    match node {
        Node::BinaryOp { op, left, right } if *op == kind => Some((leaf(left)?, leaf(right)?)),
        _ => None,
    }
}

/// `a + (b / c)` with literal leaves.
fn add_of_quotient(node: &Node) -> Option<(Value, Value, Value)> {
    match node {
        Node::BinaryOp {
            op: OperatorKind::Add,
            left,
            right,
        } => {
            let a = leaf(left)?;
            let (b, c) = literal_pair(right, OperatorKind::Div)?;
            Some((a, b, c))
        }
        _ => None,
    }
}

fn match_shape(op: OperatorKind, left: &Node, right: &Node) -> Option<Matched> {
    use OperatorKind::{Add, Div, Mult, Sub};
    use ThreeLeaf::*;

    let left_outer = |kind: OperatorKind, shape: ThreeLeaf| -> Option<Matched> {
        let (a, b) = literal_pair(left, kind)?;
        Some(Matched::Three(shape, a, b, leaf(right)?))
    };
    let right_outer = |kind: OperatorKind, shape: ThreeLeaf| -> Option<Matched> {
        let (b, c) = literal_pair(right, kind)?;
        Some(Matched::Three(shape, leaf(left)?, b, c))
    };

    match op {
        Add => left_outer(Mult, MultAddLeft)
            .or_else(|| right_outer(Mult, MultAddRight))
            .or_else(|| left_outer(Div, DivAddLeft))
            .or_else(|| right_outer(Div, DivAddRight))
            .or_else(|| {
                let (a, b, c) = add_of_quotient(left)?;
                Some(Matched::Four(a, b, c, leaf(right)?))
            }),
        Sub => left_outer(Mult, MultSubLeft).or_else(|| right_outer(Mult, MultSubRight)),
        _ => None,
    }
}

fn eval_binary(
    interp: &mut Interpreter,
    op: OperatorKind,
    left: &Node,
    right: &Node,
) -> EvalResult<Value> {
    match match_shape(op, left, right) {
        Some(Matched::Three(shape, a, b, c)) => {
            interp.record(Diagnostic::PatternFired {
                pattern: shape.pattern(),
                choice: None,
            });
            rewrite_three(shape, &a, &b, &c)
        }
        Some(Matched::Four(a, b, c, d)) => {
            let choice = interp.choose(3);
            interp.record(Diagnostic::PatternFired {
                pattern: RewritePattern::FourTerm,
                choice: Some(choice),
            });
            rewrite_four(choice, &a, &b, &c, &d)
        }
        None => interp.eval_binary_operands(op, left, right),
    }
}

fn rewrite_three(shape: ThreeLeaf, a: &Value, b: &Value, c: &Value) -> EvalResult<Value> {
    use OperatorKind::{Add, Div, Mult, Sub};

    match shape {
        ThreeLeaf::MultAddLeft => apply(Mult, a, &apply(Add, b, c)?),
        ThreeLeaf::MultAddRight => apply(Mult, &apply(Add, a, b)?, c),
        ThreeLeaf::MultSubLeft => apply(Mult, a, &apply(Sub, b, c)?),
        ThreeLeaf::MultSubRight => apply(Mult, &apply(Sub, a, b)?, c),
        ThreeLeaf::DivAddLeft => apply(Div, a, &apply(Add, c, b)?),
        ThreeLeaf::DivAddRight => apply(Div, &apply(Add, a, b)?, c),
    }
}

fn rewrite_four(choice: u32, a: &Value, b: &Value, c: &Value, d: &Value) -> EvalResult<Value> {
    use OperatorKind::{Add, Div};

    match choice {
        0 => apply(Add, &apply(Div, &apply(Add, a, b)?, c)?, d),
        1 => apply(Div, &apply(Add, a, b)?, &apply(Add, c, d)?),
        _ => apply(Add, a, &apply(Div, b, &apply(Add, c, d)?)?),
    }
}
