use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::tokens::{CharPos, Pos, Token, TokenKind};

/// Character that no token rule accepts
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{pos}: unexpected character {ch:?} at offset {offset}")]
pub struct LexError {
    pub ch: char,
    pub pos: Pos,
    pub offset: usize,
}

struct Rule {
    kind: TokenKind,
    pattern: Regex,
}

/// Token rules in priority order: keywords precede the identifier rule
/// so that a tie on length resolves to the keyword.
static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    [
        (TokenKind::Int, r"^int"),
        (TokenKind::Print, r"^print"),
        (TokenKind::Number, r"^[0-9]+"),
        (TokenKind::Id, r"^[A-Za-z_][A-Za-z0-9_]*"),
        (TokenKind::Assign, r"^="),
        (TokenKind::Mul, r"^\*"),
        (TokenKind::Add, r"^\+"),
        (TokenKind::LParen, r"^\("),
        (TokenKind::RParen, r"^\)"),
        (TokenKind::Semicolon, r"^;"),
    ]
    .into_iter()
    .map(|(kind, pattern)| Rule {
        kind,
        pattern: Regex::new(pattern).expect("invalid token pattern"),
    })
    .collect()
});

/// Skip whitespace, newlines included
pub(crate) fn skip_ws(cur: &mut CharPos) {
    while cur.peekz().is_whitespace() {
        cur.advance();
    }
}

/// Find the rule producing the longest match at the start of `text`.
/// Returns the token kind and the length of the match in bytes.
pub(crate) fn longest_match(text: &str) -> Option<(TokenKind, usize)> {
    let mut best: Option<(TokenKind, usize)> = None;
    for rule in RULES.iter() {
        let Some(m) = rule.pattern.find(text) else {
            continue;
        };
        // Strictly longer only: on equal length the earlier rule stays
        if best.is_none_or(|(_, len)| m.end() > len) {
            best = Some((rule.kind, m.end()));
        }
    }
    best
}

pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = vec![];
    let mut cur = CharPos::from_str(text);

    loop {
        skip_ws(&mut cur);
        let Some(ch) = cur.peek() else {
            break;
        };

        let pos0 = cur.pos;
        let rest = cur.rest();
        match longest_match(rest) {
            Some((kind, len)) => {
                tokens.push(Token::new(kind, &rest[..len], pos0));
                cur.advance_by(len);
            }
            None => {
                return Err(LexError {
                    ch,
                    pos: pos0,
                    offset: cur.offset,
                });
            }
        }
    }

    tokens.push(Token::eof(cur.pos));
    debug!("lexer produced {} tokens", tokens.len());
    Ok(tokens)
}

#[cfg(test)]
#[path = "_tests/test_lexer.rs"]
mod test_lexer;
