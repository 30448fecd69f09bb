pub mod ast;
pub mod codegen;
pub mod codegen_nasm32;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod rewrite;
pub mod tokens;

#[cfg(test)]
mod test_tools;

use std::io::Write;

use log::debug;
use thiserror::Error;

pub use ast::{BinOp, Node, NodeKind};
pub use codegen::CodeGen;
pub use codegen_nasm32::{
    CodeGenError, CodeGenNasm32, CodeGenNasm32Config, generate, generate_with_config,
};
pub use interpreter::{Interpreter, RuntimeError};
pub use lexer::{LexError, tokenize};
pub use parser::{ParseError, parse};
pub use tokens::{Pos, Token, TokenKind};

/// Any failure of the pipeline; the first error aborts the run
#[derive(Debug, Error)]
pub enum Error {
    #[error("lexer error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("codegen error: {0}")]
    CodeGen(#[from] CodeGenError),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Everything the front end and the assembly backend produce for one source
#[derive(Debug)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub program: Vec<Node>,
    pub assembly: String,
}

/// Lex, parse and generate assembly for `source` with the given emitter settings
pub fn compile_with_config(source: &str, config: CodeGenNasm32Config) -> Result<Compilation, Error> {
    let tokens = tokenize(source)?;
    let program = parse(&tokens)?;
    let assembly = generate_with_config(&program, config)?;
    debug!(
        "compiled {} statements into {} bytes of assembly",
        program.len(),
        assembly.len()
    );
    Ok(Compilation {
        tokens,
        program,
        assembly,
    })
}

pub fn compile(source: &str) -> Result<Compilation, Error> {
    compile_with_config(source, CodeGenNasm32Config::default())
}

/// Lex, parse and interpret `source`, writing printed values to `out`
pub fn run<W: Write>(source: &str, out: W) -> Result<W, Error> {
    let tokens = tokenize(source)?;
    let program = parse(&tokens)?;
    Ok(interpreter::evaluate(&program, out)?)
}

#[cfg(test)]
#[path = "_tests/test_pipeline.rs"]
mod test_pipeline;
