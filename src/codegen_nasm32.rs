use std::collections::HashMap;
use std::fmt::Display;

use log::{debug, warn};
use thiserror::Error;

use crate::{
    ast::{BinOp, Node, NodeKind},
    codegen::CodeGen,
    rewrite::{Rewrite, find_rewrite},
    tokens::Pos,
};

/// Config for nasm32 based code generation
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CodeGenNasm32Config {
    /// Label of the exported entry function
    pub entry_point: String,
    /// External routine called by `print`, with cdecl (format, value) arguments
    pub print_routine: String,
    /// Data label of the `%d\n` format string
    pub format_label: String,
}

impl Default for CodeGenNasm32Config {
    fn default() -> Self {
        Self {
            entry_point: "main".to_string(),
            print_routine: "printf".to_string(),
            format_label: "format".to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodeGenError {
    /// A statement node where an operand is required; the parser never builds one
    #[error("{1}: statement {0} cannot be used as an operand")]
    StatementAsOperand(String, Pos),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Eax,
    Ebx,
    Ecx,
    Edx,
    Esp,
}

/// Registers handed out to variables, in first-use order.
/// The pool wraps: the fifth variable gets the first register again.
const VARIABLE_REGISTERS: [Register; 4] = [Register::Eax, Register::Ebx, Register::Ecx, Register::Edx];

/// Every arithmetic result lands here
const ACCUMULATOR: Register = Register::Eax;

impl Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Register::Eax => "eax".fmt(f),
            Register::Ebx => "ebx".fmt(f),
            Register::Ecx => "ecx".fmt(f),
            Register::Edx => "edx".fmt(f),
            Register::Esp => "esp".fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    Reg(Register),
    Imm(i32),
    Label(String),
}

fn reg(register: Register) -> Operand {
    Operand::Reg(register)
}
fn imm(value: i32) -> Operand {
    Operand::Imm(value)
}
fn label<S: Into<String>>(s: S) -> Operand {
    Operand::Label(s.into())
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Reg(r) => r.fmt(f),
            Operand::Imm(v) => v.fmt(f),
            Operand::Label(l) => l.fmt(f),
        }
    }
}

struct Builder {
    buffer: Vec<String>,
}

impl Builder {
    fn new() -> Self {
        Self { buffer: vec![] }
    }

    // General functions
    /// Add a new string to our buffer
    fn str<S: Into<String>>(&mut self, code_line: S) {
        self.buffer.push(code_line.into());
    }
    /// Write a line using a single level of indentation
    fn indented<D: Display>(&mut self, d: D) {
        self.str(format!("    {d}"));
    }

    /// Write empty line
    fn nl(&mut self) {
        self.str("");
    }

    // General meta non-instructions
    fn section(&mut self, section: &str) {
        self.str(format!("section {section}"));
    }
    fn global(&mut self, label: &str) {
        self.indented(format!("global {label}"));
    }
    fn extern_(&mut self, label: &str) {
        self.indented(format!("extern {label}"));
    }
    fn db(&mut self, label: &str, bytes: &str) {
        self.indented(format!("{label} db {bytes}"));
    }
    fn comment(&mut self, text: &str) {
        self.indented(format!("; {text}"));
    }
    fn label<D: Display>(&mut self, label: D) {
        self.str(format!("{label}:"));
    }
    // General instructions
    fn mov(&mut self, dest: Operand, src: Operand) {
        self.indented(format!("mov {}, {}", dest, src));
    }
    fn add(&mut self, dest: Operand, src: Operand) {
        self.indented(format!("add {}, {}", dest, src));
    }
    /// One-operand multiply: accumulator *= operand
    fn mul(&mut self, src: Operand) {
        self.indented(format!("mul {src}"));
    }
    fn push(&mut self, src: Operand) {
        self.indented(format!("push {src}"));
    }
    fn call(&mut self, func: Operand) {
        self.indented(format!("call {func}"));
    }
    fn ret(&mut self) {
        self.indented("ret");
    }
}

/// Emits a 32-bit NASM listing with a `printf` call per `print`.
/// Variables live in registers for the whole program; there is no spilling.
pub struct CodeGenNasm32 {
    code: Builder,
    config: CodeGenNasm32Config,
    registers: HashMap<String, Register>,
    register_counter: usize,
    label_counter: usize,
}

impl CodeGenNasm32 {
    pub fn new() -> Self {
        Self::with_config(CodeGenNasm32Config::default())
    }

    pub fn with_config(config: CodeGenNasm32Config) -> Self {
        Self {
            code: Builder::new(),
            config,
            registers: HashMap::new(),
            register_counter: 0,
            label_counter: 0,
        }
    }

    /// Register assigned to a variable so far, if any
    pub fn register_of(&self, name: &str) -> Option<Register> {
        self.registers.get(name).copied()
    }

    /// Register of a variable, allocating the next pool slot on first use
    fn register_for(&mut self, name: &str) -> Register {
        if let Some(register) = self.registers.get(name) {
            return *register;
        }
        let register = VARIABLE_REGISTERS[self.register_counter % VARIABLE_REGISTERS.len()];
        if self.register_counter >= VARIABLE_REGISTERS.len() {
            // Wrapped around: both variables now alias one register
            warn!("register pool exhausted: `{name}` shares {register} with an earlier variable");
        }
        debug!("variable `{name}` -> {register}");
        self.register_counter += 1;
        self.registers.insert(name.to_string(), register);
        register
    }

    // Reserved for branching constructs; nothing in the grammar needs labels yet.
    #[allow(dead_code)]
    fn new_label(&mut self, prefix: &str) -> String {
        let id = self.label_counter;
        self.label_counter += 1;
        format!("{prefix}_{id}")
    }

    /// Emit code for an operand and return where its value lives
    fn write_expr(&mut self, node: &Node) -> Result<Operand, CodeGenError> {
        match &node.kind {
            NodeKind::Number(value) => Ok(imm(*value)),
            NodeKind::Variable(name) => Ok(reg(self.register_for(name))),
            NodeKind::BinaryOp { left, op, right } => {
                if let Some(rewrite) = find_rewrite(node) {
                    return Ok(self.write_rewrite(rewrite));
                }
                let lhs = self.write_expr(left)?;
                let rhs = self.write_expr(right)?;
                self.code.mov(reg(ACCUMULATOR), lhs);
                match op {
                    BinOp::Add => self.code.add(reg(ACCUMULATOR), rhs),
                    BinOp::Mul => self.code.mul(rhs),
                }
                Ok(reg(ACCUMULATOR))
            }
            NodeKind::Assignment { .. } | NodeKind::Print(_) => Err(
                CodeGenError::StatementAsOperand(node.to_string(), node.pos),
            ),
        }
    }

    fn write_rewrite(&mut self, rewrite: Rewrite<'_>) -> Operand {
        match rewrite {
            Rewrite::Square { name } => {
                let src = self.register_for(name);
                self.code
                    .comment(&format!("SQUARE instruction: {name} * {name}"));
                self.code.mov(reg(ACCUMULATOR), reg(src));
                self.code.mul(reg(ACCUMULATOR));
                reg(ACCUMULATOR)
            }
        }
    }

    fn write_statement(&mut self, node: &Node) -> Result<(), CodeGenError> {
        match &node.kind {
            NodeKind::Assignment { name, expr } => {
                // Destination is allocated before anything on the right-hand side
                let dest = self.register_for(name);
                let src = match &expr.kind {
                    NodeKind::Number(value) => imm(*value),
                    _ => self.write_expr(expr)?,
                };
                self.code.mov(reg(dest), src);
            }
            NodeKind::Print(expr) => {
                let value = self.write_expr(expr)?;
                self.code.push(value);
                self.code.push(label(&self.config.format_label));
                self.code.call(label(&self.config.print_routine));
                self.code.add(reg(Register::Esp), imm(8));
            }
            NodeKind::Number(_) | NodeKind::Variable(_) | NodeKind::BinaryOp { .. } => {
                // Bare expression: generated for its instructions, result dropped
                self.write_expr(node)?;
            }
        }
        Ok(())
    }

    /// Data and text section preamble, up to the entry label
    fn write_header(&self, out: &mut Builder) {
        out.section(".data");
        out.db(&self.config.format_label, "\"%d\", 10, 0");
        out.nl();
        out.section(".text");
        out.global(&self.config.entry_point);
        out.extern_(&self.config.print_routine);
        out.nl();
        out.label(&self.config.entry_point);
    }

    fn write_footer(&self, out: &mut Builder) {
        out.nl();
        out.ret();
    }

    pub fn from_program_with_config(
        program: &[Node],
        config: CodeGenNasm32Config,
    ) -> Result<Self, CodeGenError> {
        let mut cg = Self::with_config(config);
        for stmt in program {
            cg.write_statement(stmt)?;
        }
        Ok(cg)
    }
}

impl Default for CodeGenNasm32 {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGen for CodeGenNasm32 {
    type Error = CodeGenError;

    fn from_program(program: &[Node]) -> Result<Self, Self::Error> {
        Self::from_program_with_config(program, CodeGenNasm32Config::default())
    }

    fn to_text(&self) -> Vec<String> {
        let mut out = Builder::new();
        self.write_header(&mut out);
        out.buffer.extend(self.code.buffer.iter().cloned());
        self.write_footer(&mut out);
        out.buffer
    }
}

/// Generate a complete listing for `program`
pub fn generate(program: &[Node]) -> Result<String, CodeGenError> {
    generate_with_config(program, CodeGenNasm32Config::default())
}

pub fn generate_with_config(
    program: &[Node],
    config: CodeGenNasm32Config,
) -> Result<String, CodeGenError> {
    let cg = CodeGenNasm32::from_program_with_config(program, config)?;
    Ok(cg.to_text().join("\n") + "\n")
}

#[cfg(test)]
#[path = "_tests/test_codegen_nasm32.rs"]
mod test_codegen_nasm32;
