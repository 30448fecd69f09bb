use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Int,
    Print,
    Number,
    Id,
    Assign,
    Mul,
    Add,
    LParen,
    RParen,
    Semicolon,
    Eof,
}

impl TokenKind {
    /// Upper-case name used in token dumps and diagnostics
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Int => "INT",
            TokenKind::Print => "PRINT",
            TokenKind::Number => "NUMBER",
            TokenKind::Id => "ID",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Mul => "MUL",
            TokenKind::Add => "ADD",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Eof => "EOF",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name().fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Matched source text; empty for EOF
    pub text: String,
    pub pos: Pos,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, text: S, pos: Pos) -> Self {
        Token {
            kind,
            text: text.into(),
            pos,
        }
    }

    pub fn eof(pos: Pos) -> Self {
        Token::new(TokenKind::Eof, "", pos)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.kind, self.text)
    }
}

/// Read cursor over a token slice.
/// Reading past the end yields EOF, so a slice without a trailing EOF token is still well-formed.
pub struct Tokens<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    pub fn current_kind(&self) -> TokenKind {
        self.current().map_or(TokenKind::Eof, |t| t.kind)
    }

    pub fn current_pos(&self) -> Pos {
        match self.current() {
            Some(t) => t.pos,
            None => self.tokens.last().map_or(Pos::default(), |t| t.pos),
        }
    }

    pub fn kind_eq(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub fn advance(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(line: usize, col: usize) -> Self {
        Pos { line, col }
    }
}

impl Default for Pos {
    fn default() -> Self {
        Pos::new(1, 1)
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone)]
pub struct CharPos<'a> {
    pub pos: Pos,
    /// Byte offset into the source
    pub offset: usize,
    text: &'a str,
}

impl<'a> CharPos<'a> {
    pub fn from_str(txt: &'a str) -> Self {
        Self {
            pos: Pos::default(),
            offset: 0,
            text: txt,
        }
    }

    /// Unconsumed part of the source
    pub fn rest(&self) -> &'a str {
        &self.text[self.offset..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peekz(&self) -> char {
        self.peek().unwrap_or('\0')
    }

    /// Advances one character forward, updating the position
    /// Returns:
    /// * true iff end-of-file was reached
    pub fn advance(&mut self) -> bool {
        match self.peek() {
            None => return true,
            Some('\n') => {
                self.pos.line += 1;
                self.pos.col = 1;
                self.offset += 1;
            }
            Some(c) => {
                self.pos.col += 1;
                self.offset += c.len_utf8();
            }
        }
        self.peek().is_none()
    }

    /// Advances over `len` bytes of the source.
    /// `len` must end on a character boundary, which is the case for any regex match length.
    pub fn advance_by(&mut self, len: usize) {
        let end = self.offset + len;
        while self.offset < end {
            if self.advance() {
                break;
            }
        }
    }
}
