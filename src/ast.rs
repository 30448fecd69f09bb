use std::fmt::Display;
use std::str::FromStr;

use crate::interpreter::RuntimeError;
use crate::tokens::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Mul,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Mul => "*",
        }
    }

    /// Combine two integers; both operations wrap like the 32-bit machine instructions do
    pub fn apply(self, left: i32, right: i32) -> i32 {
        match self {
            BinOp::Add => left.wrapping_add(right),
            BinOp::Mul => left.wrapping_mul(right),
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.symbol().fmt(f)
    }
}

/// Operator from its source symbol.
/// This is the only place `RuntimeError::UnsupportedOperator` is raised,
/// since a parsed tree can only hold the closed `BinOp` set.
impl FromStr for BinOp {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(BinOp::Add),
            "*" => Ok(BinOp::Mul),
            other => Err(RuntimeError::UnsupportedOperator(other.to_string())),
        }
    }
}

/// Syntax tree nodes. Statements and expressions share one closed family;
/// only `Assignment` and `Print` are produced at statement level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Number(i32),
    Variable(String),
    BinaryOp {
        left: Box<Node>,
        op: BinOp,
        right: Box<Node>,
    },
    Assignment {
        name: String,
        expr: Box<Node>,
    },
    Print(Box<Node>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Position of the token that started the node
    pub pos: Pos,
}

impl Node {
    pub fn new(kind: NodeKind, pos: Pos) -> Self {
        Self { kind, pos }
    }

    pub fn new_number(value: i32, pos: Pos) -> Node {
        Self::new(NodeKind::Number(value), pos)
    }

    pub fn new_variable<S: Into<String>>(name: S, pos: Pos) -> Node {
        Self::new(NodeKind::Variable(name.into()), pos)
    }

    pub fn new_binary(left: Node, op: BinOp, right: Node, pos: Pos) -> Node {
        Self::new(
            NodeKind::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            pos,
        )
    }

    pub fn new_assignment<S: Into<String>>(name: S, expr: Node, pos: Pos) -> Node {
        Self::new(
            NodeKind::Assignment {
                name: name.into(),
                expr: Box::new(expr),
            },
            pos,
        )
    }

    pub fn new_print(expr: Node, pos: Pos) -> Node {
        Self::new(NodeKind::Print(Box::new(expr)), pos)
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Assignment { .. } | NodeKind::Print(_)
        )
    }
}

/// Canonical debug form, e.g. `Assignment(result, BinOp(Variable(i), *, Variable(i)))`
impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            NodeKind::Number(value) => write!(f, "Number({value})"),
            NodeKind::Variable(name) => write!(f, "Variable({name})"),
            NodeKind::BinaryOp { left, op, right } => write!(f, "BinOp({left}, {op}, {right})"),
            NodeKind::Assignment { name, expr } => write!(f, "Assignment({name}, {expr})"),
            NodeKind::Print(expr) => write!(f, "Print({expr})"),
        }
    }
}

#[cfg(test)]
#[path = "_tests/test_ast.rs"]
mod test_ast;
