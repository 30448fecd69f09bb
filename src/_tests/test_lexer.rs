use crate::lexer::{LexError, longest_match, skip_ws, tokenize};
use crate::tokens::{CharPos, Pos, Token, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).unwrap().iter().map(|t| t.kind).collect()
}

#[test]
fn test_advance_on_empty() {
    let src = "";
    let mut char_pos = CharPos::from_str(src);
    assert!(char_pos.advance());
    assert_eq!(char_pos.pos, Pos::new(1, 1));
    assert_eq!(char_pos.offset, 0);
    // repeat advance over eof
    assert!(char_pos.advance());
    assert_eq!(char_pos.pos, Pos::new(1, 1));
    assert_eq!(char_pos.offset, 0);
}

#[test]
fn test_advance_base() {
    let src = "1\n2";
    let mut char_pos = CharPos::from_str(src);
    assert_eq!(char_pos.pos, Pos::new(1, 1));
    assert_eq!(char_pos.peekz(), '1');
    assert!(!char_pos.advance());
    assert_eq!(char_pos.pos, Pos::new(1, 2));
    assert_eq!(char_pos.offset, 1);
    assert_eq!(char_pos.peekz(), '\n');
    assert!(!char_pos.advance());
    assert_eq!(char_pos.pos, Pos::new(2, 1));
    assert_eq!(char_pos.offset, 2);
    assert_eq!(char_pos.peekz(), '2');
    assert!(char_pos.advance());
    assert_eq!(char_pos.pos, Pos::new(2, 2));
    assert_eq!(char_pos.offset, 3);
    assert!(char_pos.peek().is_none());
    assert_eq!(char_pos.peekz(), '\0');
    assert_eq!(char_pos.rest(), "");
}

#[test]
fn test_advance_by() {
    let mut cp = CharPos::from_str("print(x);\nint");
    cp.advance_by(5);
    assert_eq!(cp.rest(), "(x);\nint");
    assert_eq!(cp.pos, Pos::new(1, 6));
    cp.advance_by(5);
    assert_eq!(cp.rest(), "int");
    assert_eq!(cp.pos, Pos::new(2, 1));
    assert_eq!(cp.offset, 10);
}

#[test]
fn test_skipws_none() {
    let mut cp_dense = CharPos::from_str("dense");
    skip_ws(&mut cp_dense);
    assert_eq!(cp_dense.pos, Pos::new(1, 1));
    assert_eq!(cp_dense.offset, 0);
    let mut cp_eof = CharPos::from_str("");
    skip_ws(&mut cp_eof);
    assert_eq!(cp_eof.pos, Pos::new(1, 1));
}

#[test]
fn test_skipws_combo() {
    let mut cp = CharPos::from_str(" \t\n\n  d");
    skip_ws(&mut cp);
    assert_eq!(cp.pos, Pos::new(3, 3));
    assert_eq!(cp.offset, 6);
    assert_eq!(cp.peekz(), 'd');
}

#[test]
fn test_longest_match_keyword_ties() {
    assert_eq!(longest_match("int x"), Some((TokenKind::Int, 3)));
    assert_eq!(longest_match("print("), Some((TokenKind::Print, 5)));
    assert_eq!(longest_match("integer"), Some((TokenKind::Id, 7)));
    assert_eq!(longest_match("int_x"), Some((TokenKind::Id, 5)));
    assert_eq!(longest_match("printer"), Some((TokenKind::Id, 7)));
    assert_eq!(longest_match("_tmp1 "), Some((TokenKind::Id, 5)));
    assert_eq!(longest_match("123;"), Some((TokenKind::Number, 3)));
    assert_eq!(longest_match("@"), None);
}

#[test]
fn test_tokenize_statement() {
    let toks = tokenize("int x = 3;").unwrap();
    assert_eq!(
        toks,
        [
            Token::new(TokenKind::Int, "int", Pos::new(1, 1)),
            Token::new(TokenKind::Id, "x", Pos::new(1, 5)),
            Token::new(TokenKind::Assign, "=", Pos::new(1, 7)),
            Token::new(TokenKind::Number, "3", Pos::new(1, 9)),
            Token::new(TokenKind::Semicolon, ";", Pos::new(1, 10)),
            Token::eof(Pos::new(1, 11)),
        ]
    );
}

#[test]
fn test_tokenize_all_kinds() {
    assert_eq!(
        kinds("print((a + 1) * b);"),
        [
            TokenKind::Print,
            TokenKind::LParen,
            TokenKind::LParen,
            TokenKind::Id,
            TokenKind::Add,
            TokenKind::Number,
            TokenKind::RParen,
            TokenKind::Mul,
            TokenKind::Id,
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_tokenize_dense() {
    let toks = tokenize("intx=12ab;").unwrap();
    let texts: Vec<&str> = toks.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["intx", "=", "12", "ab", ";", ""]);
    assert_eq!(toks[0].kind, TokenKind::Id);
    assert_eq!(toks[2].kind, TokenKind::Number);
    assert_eq!(toks[3].kind, TokenKind::Id);
}

#[test]
fn test_tokenize_multiline_positions() {
    let toks = tokenize("\nint i = 5;\n  print(i);\n").unwrap();
    assert_eq!(toks[0].pos, Pos::new(2, 1));
    assert_eq!(toks[5].kind, TokenKind::Print);
    assert_eq!(toks[5].pos, Pos::new(3, 3));
    let eof = toks.last().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.pos, Pos::new(4, 1));
}

#[test]
fn test_tokenize_empty() {
    assert_eq!(kinds(""), [TokenKind::Eof]);
    assert_eq!(kinds(" "), [TokenKind::Eof]);
    assert_eq!(kinds("\n\t\n"), [TokenKind::Eof]);
}

#[test]
fn test_tokenize_err() {
    let err = tokenize("int x = 3 @ 4;").unwrap_err();
    assert_eq!(
        err,
        LexError {
            ch: '@',
            pos: Pos::new(1, 11),
            offset: 10,
        }
    );
    assert_eq!(err.to_string(), "1:11: unexpected character '@' at offset 10");
}

#[test]
fn test_tokenize_err_second_line() {
    let err = tokenize("int a = 1;\n  $").unwrap_err();
    assert_eq!(err.ch, '$');
    assert_eq!(err.pos, Pos::new(2, 3));
    assert_eq!(err.offset, 13);
}

#[test]
fn test_tokenize_err_non_ascii() {
    let err = tokenize("int é = 1;").unwrap_err();
    assert_eq!(err.ch, 'é');
    assert_eq!(err.pos, Pos::new(1, 5));
    // Operators outside the language are rejected too
    assert_eq!(tokenize("print(1 - 2);").unwrap_err().ch, '-');
}

#[test]
fn test_token_display() {
    let toks = tokenize("int result").unwrap();
    assert_eq!(toks[0].to_string(), "(INT, int)");
    assert_eq!(toks[1].to_string(), "(ID, result)");
}
