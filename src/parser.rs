use log::debug;
use thiserror::Error;

use crate::ast::{BinOp, Node};
use crate::tokens::{Pos, Token, TokenKind, Tokens};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `int x 5;`
    #[error("{pos}: expected {}, found {found}", describe_expected(.expected))]
    UnexpectedToken {
        expected: &'static [TokenKind],
        found: TokenKind,
        pos: Pos,
    },
    /// `print(99999999999);`
    #[error("{pos}: integer literal `{text}` does not fit in 32 bits")]
    InvalidNumber { text: String, pos: Pos },
    /// Long operator chains or deep parenthesis nesting
    #[error("{pos}: expression nested deeper than {} levels", MAX_DEPTH)]
    TooDeep { pos: Pos },
}

fn describe_expected(kinds: &[TokenKind]) -> String {
    let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
    match names.as_slice() {
        [single] => single.to_string(),
        _ => format!("one of {}", names.join(", ")),
    }
}

const STATEMENT_START: &[TokenKind] = &[TokenKind::Int, TokenKind::Print];
const FACTOR_START: &[TokenKind] = &[TokenKind::Number, TokenKind::Id, TokenKind::LParen];

/// Deepest expression tree and parenthesis nesting accepted.
/// The parser and both backends walk expressions recursively.
pub const MAX_DEPTH: usize = 256;

/// Recursive-descent parser; one token of lookahead, stops at the first error.
pub struct Parser<'a> {
    toks: Tokens<'a>,
    /// Currently open parenthesis groups
    nesting: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            toks: Tokens::new(tokens),
            nesting: 0,
        }
    }

    fn unexpected(&self, expected: &'static [TokenKind]) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.toks.current_kind(),
            pos: self.toks.current_pos(),
        }
    }

    fn check_depth(depth: usize, pos: Pos) -> Result<usize, ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { pos });
        }
        Ok(depth)
    }

    /// Consume the current token if it has the expected kind
    fn eat(&mut self, expected: &'static [TokenKind]) -> Result<&'a Token, ParseError> {
        match self.toks.current() {
            Some(tok) if expected.contains(&tok.kind) => {
                self.toks.advance();
                Ok(tok)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// PROGRAM ::= STATEMENT* EOF
    pub fn parse_program(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut statements = vec![];
        while !self.toks.kind_eq(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        debug!("parsed {} statements", statements.len());
        Ok(statements)
    }

    /// STATEMENT ::= `int` ID `=` EXPR `;`
    ///           |   `print` `(` EXPR `)` `;`
    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        let pos = self.toks.current_pos();
        match self.toks.current_kind() {
            TokenKind::Int => {
                self.eat(&[TokenKind::Int])?;
                let name = self.eat(&[TokenKind::Id])?.text.clone();
                self.eat(&[TokenKind::Assign])?;
                let (expr, _) = self.parse_expr()?;
                self.eat(&[TokenKind::Semicolon])?;
                Ok(Node::new_assignment(name, expr, pos))
            }
            TokenKind::Print => {
                self.eat(&[TokenKind::Print])?;
                self.eat(&[TokenKind::LParen])?;
                let (expr, _) = self.parse_expr()?;
                self.eat(&[TokenKind::RParen])?;
                self.eat(&[TokenKind::Semicolon])?;
                Ok(Node::new_print(expr, pos))
            }
            _ => Err(self.unexpected(STATEMENT_START)),
        }
    }

    /// EXPR ::= TERM { `+` TERM }
    ///
    /// Expression parsers return the node together with the depth of its tree.
    fn parse_expr(&mut self) -> Result<(Node, usize), ParseError> {
        let (mut node, mut depth) = self.parse_term()?;
        while self.toks.kind_eq(TokenKind::Add) {
            let pos = self.eat(&[TokenKind::Add])?.pos;
            let (right, right_depth) = self.parse_term()?;
            depth = Self::check_depth(depth.max(right_depth) + 1, pos)?;
            node = Node::new_binary(node, BinOp::Add, right, pos);
        }
        Ok((node, depth))
    }

    /// TERM ::= FACTOR { `*` FACTOR }
    fn parse_term(&mut self) -> Result<(Node, usize), ParseError> {
        let (mut node, mut depth) = self.parse_factor()?;
        while self.toks.kind_eq(TokenKind::Mul) {
            let pos = self.eat(&[TokenKind::Mul])?.pos;
            let (right, right_depth) = self.parse_factor()?;
            depth = Self::check_depth(depth.max(right_depth) + 1, pos)?;
            node = Node::new_binary(node, BinOp::Mul, right, pos);
        }
        Ok((node, depth))
    }

    /// FACTOR ::= NUMBER | ID | `(` EXPR `)`
    fn parse_factor(&mut self) -> Result<(Node, usize), ParseError> {
        let tok = self.eat(FACTOR_START)?;
        match tok.kind {
            TokenKind::Number => {
                let value = tok
                    .text
                    .parse::<i32>()
                    .map_err(|_| ParseError::InvalidNumber {
                        text: tok.text.clone(),
                        pos: tok.pos,
                    })?;
                Ok((Node::new_number(value, tok.pos), 1))
            }
            TokenKind::Id => Ok((Node::new_variable(&tok.text, tok.pos), 1)),
            _ => {
                // Parentheses only group; no node of their own
                self.nesting = Self::check_depth(self.nesting + 1, tok.pos)?;
                let expr = self.parse_expr()?;
                self.eat(&[TokenKind::RParen])?;
                self.nesting -= 1;
                Ok(expr)
            }
        }
    }
}

pub fn parse(tokens: &[Token]) -> Result<Vec<Node>, ParseError> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
#[path = "_tests/test_parser.rs"]
mod test_parser;
