use std::collections::HashMap;
use std::io::Write;

use log::trace;
use thiserror::Error;

use crate::ast::{Node, NodeKind};
use crate::rewrite::{Rewrite, find_rewrite};
use crate::tokens::Pos;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// print(y) with no `int y = ...` before it
    #[error("{1}: undefined variable `{0}`")]
    UndefinedVariable(String, Pos),
    #[error("unsupported operator `{0}`")]
    UnsupportedOperator(String),
    /// Expression node at statement level; the parser never produces one
    #[error("{1}: unknown statement {0}")]
    UnknownStatement(String, Pos),
    /// Statement node at operand level; the parser never produces one
    #[error("{1}: statement {0} used as an expression")]
    NotAnExpression(String, Pos),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Tree-walking evaluator. Each `Print` writes one decimal line to `out`.
pub struct Interpreter<W: Write> {
    env: HashMap<String, i32>,
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self {
            env: HashMap::new(),
            out,
        }
    }

    /// Current value of a variable
    pub fn get(&self, name: &str) -> Option<i32> {
        self.env.get(name).copied()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Execute statements in order, stopping at the first error
    pub fn evaluate(&mut self, program: &[Node]) -> Result<(), RuntimeError> {
        for stmt in program {
            self.exec(stmt)?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn exec(&mut self, node: &Node) -> Result<(), RuntimeError> {
        match &node.kind {
            NodeKind::Assignment { name, expr } => {
                let value = self.eval_expr(expr)?;
                trace!("{name} = {value}");
                // Redeclaration simply rebinds
                self.env.insert(name.clone(), value);
                Ok(())
            }
            NodeKind::Print(expr) => {
                let value = self.eval_expr(expr)?;
                writeln!(self.out, "{value}")?;
                Ok(())
            }
            NodeKind::Number(_) | NodeKind::Variable(_) | NodeKind::BinaryOp { .. } => Err(
                RuntimeError::UnknownStatement(node.to_string(), node.pos),
            ),
        }
    }

    fn lookup(&self, name: &str, pos: Pos) -> Result<i32, RuntimeError> {
        self.get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string(), pos))
    }

    pub fn eval_expr(&self, node: &Node) -> Result<i32, RuntimeError> {
        match &node.kind {
            NodeKind::Number(value) => Ok(*value),
            NodeKind::Variable(name) => self.lookup(name, node.pos),
            NodeKind::BinaryOp { left, op, right } => {
                if let Some(rewrite) = find_rewrite(node) {
                    return match rewrite {
                        Rewrite::Square { name } => {
                            let value = self.lookup(name, left.pos)?;
                            Ok(value.wrapping_mul(value))
                        }
                    };
                }
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                Ok(op.apply(lhs, rhs))
            }
            NodeKind::Assignment { .. } | NodeKind::Print(_) => Err(
                RuntimeError::NotAnExpression(node.to_string(), node.pos),
            ),
        }
    }
}

/// Run `program`, writing printed values to `out`
pub fn evaluate<W: Write>(program: &[Node], out: W) -> Result<W, RuntimeError> {
    let mut interpreter = Interpreter::new(out);
    interpreter.evaluate(program)?;
    Ok(interpreter.into_output())
}

#[cfg(test)]
#[path = "_tests/test_interpreter.rs"]
mod test_interpreter;
