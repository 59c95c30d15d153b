//! AST node types for Pylite.
//!
//! The tree mirrors the small statement/expression subset the evaluator
//! understands. Recursive positions are boxed; statement lists keep source
//! order.

use crate::ProgramError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete program: an ordered sequence of top-level nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Node>,
}

impl Program {
    pub fn new(body: Vec<Node>) -> Self {
        Self { body }
    }

    /// Load a program from its JSON form and check `Compare` arity.
    ///
    /// Nesting depth is not limited here; the evaluator's own depth bound
    /// decides how deep a program may go.
    pub fn from_json(source: &str) -> crate::Result<Self> {
        let mut de = serde_json::Deserializer::from_str(source);
        de.disable_recursion_limit();
        let program = Program::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        for node in &program.body {
            node.check_arity()?;
        }
        Ok(program)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

/// Arithmetic operators usable in `BinaryOp` and `AugAssign`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    Add,
    Sub,
    Mult,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl OperatorKind {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mult => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Comparison operators usable in a `Compare` chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareKind {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

impl CompareKind {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Ge => ">=",
            Self::Gt => ">",
        }
    }
}

impl fmt::Display for CompareKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Nodes
// ══════════════════════════════════════════════════════════════════════════════

/// A literal constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Constant {
    /// Numeric literals are the only leaves the rewrite patterns accept.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }
}

/// A node of the tree. Expressions and statements share one enum; a
/// statement evaluates to no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Literal(Constant),
    Name(String),
    BinaryOp {
        op: OperatorKind,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// `left ops[0] comparators[0] ops[1] comparators[1] ...`
    Compare {
        left: Box<Node>,
        ops: Vec<CompareKind>,
        comparators: Vec<Node>,
    },
    Assign {
        target: String,
        value: Box<Node>,
    },
    AugAssign {
        target: String,
        op: OperatorKind,
        value: Box<Node>,
    },
    If {
        test: Box<Node>,
        body: Vec<Node>,
        orelse: Vec<Node>,
    },
    While {
        test: Box<Node>,
        body: Vec<Node>,
    },
    Call {
        function: String,
        args: Vec<Node>,
    },
}

impl Node {
    pub fn int(n: i64) -> Self {
        Self::Literal(Constant::Int(n))
    }

    pub fn float(n: f64) -> Self {
        Self::Literal(Constant::Float(n))
    }

    pub fn str(s: impl Into<String>) -> Self {
        Self::Literal(Constant::Str(s.into()))
    }

    pub fn name(id: impl Into<String>) -> Self {
        Self::Name(id.into())
    }

    pub fn binary(op: OperatorKind, left: Node, right: Node) -> Self {
        Self::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn compare(left: Node, ops: Vec<CompareKind>, comparators: Vec<Node>) -> Self {
        Self::Compare {
            left: Box::new(left),
            ops,
            comparators,
        }
    }

    pub fn assign(target: impl Into<String>, value: Node) -> Self {
        Self::Assign {
            target: target.into(),
            value: Box::new(value),
        }
    }

    pub fn aug_assign(target: impl Into<String>, op: OperatorKind, value: Node) -> Self {
        Self::AugAssign {
            target: target.into(),
            op,
            value: Box::new(value),
        }
    }

    pub fn if_(test: Node, body: Vec<Node>, orelse: Vec<Node>) -> Self {
        Self::If {
            test: Box::new(test),
            body,
            orelse,
        }
    }

    pub fn while_(test: Node, body: Vec<Node>) -> Self {
        Self::While {
            test: Box::new(test),
            body,
        }
    }

    pub fn call(function: impl Into<String>, args: Vec<Node>) -> Self {
        Self::Call {
            function: function.into(),
            args,
        }
    }

    /// The constant carried by a numeric literal, if this node is one.
    pub fn as_numeric_literal(&self) -> Option<&Constant> {
        match self {
            Self::Literal(c) if c.is_numeric() => Some(c),
            _ => None,
        }
    }

    /// Verify that every `Compare` in this subtree pairs each operator with
    /// exactly one comparator.
    pub fn check_arity(&self) -> crate::Result<()> {
        match self {
            Self::Literal(_) | Self::Name(_) => Ok(()),
            Self::BinaryOp { left, right, .. } => {
                left.check_arity()?;
                right.check_arity()
            }
            Self::Compare {
                left,
                ops,
                comparators,
            } => {
                if ops.len() != comparators.len() {
                    return Err(ProgramError::CompareArity {
                        ops: ops.len(),
                        comparators: comparators.len(),
                    });
                }
                left.check_arity()?;
                comparators.iter().try_for_each(Node::check_arity)
            }
            Self::Assign { value, .. } | Self::AugAssign { value, .. } => value.check_arity(),
            Self::If { test, body, orelse } => {
                test.check_arity()?;
                body.iter().chain(orelse).try_for_each(Node::check_arity)
            }
            Self::While { test, body } => {
                test.check_arity()?;
                body.iter().try_for_each(Node::check_arity)
            }
            Self::Call { args, .. } => args.iter().try_for_each(Node::check_arity),
        }
    }
}
