use crate::unwrap_variant;
use crate::ast::{BinOp, Node, NodeKind};
use crate::lexer::tokenize;
use crate::parser::{MAX_DEPTH, ParseError, parse};
use crate::tokens::{Pos, TokenKind};

fn parse_text(source: &str) -> Result<Vec<Node>, ParseError> {
    let toks = tokenize(source).unwrap_or_else(|e| panic!("Lexer failed for {source}: {e}"));
    parse(&toks)
}

fn render(source: &str) -> Vec<String> {
    parse_text(source)
        .unwrap()
        .iter()
        .map(|n| n.to_string())
        .collect()
}

#[test]
fn test_square_program() {
    assert_eq!(
        render("int i = 5;\nint result = i * i;\nprint(result);"),
        [
            "Assignment(i, Number(5))",
            "Assignment(result, BinOp(Variable(i), *, Variable(i)))",
            "Print(Variable(result))",
        ]
    );
}

#[test]
fn test_empty_program() {
    assert!(parse_text("").unwrap().is_empty());
    assert!(parse(&[]).unwrap().is_empty());
}

#[test]
fn test_precedence() {
    assert_eq!(
        render("print(2 * 3 + 4);"),
        ["Print(BinOp(BinOp(Number(2), *, Number(3)), +, Number(4)))"]
    );
    assert_eq!(
        render("print(2 + 3 * 4);"),
        ["Print(BinOp(Number(2), +, BinOp(Number(3), *, Number(4))))"]
    );
}

#[test]
fn test_left_associativity() {
    assert_eq!(
        render("print(1 + 2 + 3);"),
        ["Print(BinOp(BinOp(Number(1), +, Number(2)), +, Number(3)))"]
    );
    assert_eq!(
        render("print(a * b * c);"),
        ["Print(BinOp(BinOp(Variable(a), *, Variable(b)), *, Variable(c)))"]
    );
}

#[test]
fn test_parentheses_group_only() {
    assert_eq!(
        render("print((1 + 2) * 3);"),
        ["Print(BinOp(BinOp(Number(1), +, Number(2)), *, Number(3)))"]
    );
    assert_eq!(render("print(((x)));"), ["Print(Variable(x))"]);
}

#[test]
fn test_statement_structure() {
    let program = parse_text("int total = a + 2;").unwrap();
    assert_eq!(program.len(), 1);
    let NodeKind::Assignment { name, expr } = &program[0].kind else {
        panic!("assignment expected, got {:?}", program[0].kind);
    };
    assert_eq!(name, "total");
    let NodeKind::BinaryOp { left, op, right } = &expr.kind else {
        panic!("binary op expected, got {:?}", expr.kind);
    };
    assert_eq!(*op, BinOp::Add);
    assert_eq!(left.kind, NodeKind::Variable("a".to_string()));
    assert_eq!(right.kind, NodeKind::Number(2));
}

#[test]
fn test_node_positions() {
    let program = parse_text("int a = 1;\n  print(a + 2);").unwrap();
    assert_eq!(program[0].pos, Pos::new(1, 1));
    assert_eq!(program[1].pos, Pos::new(2, 3));
    let inner = crate::unwrap_variant!(&program[1].kind, NodeKind::Print);
    // Binary nodes sit at their operator
    assert_eq!(inner.pos, Pos::new(2, 11));
}

#[test]
fn test_deterministic_rendering() {
    let source = "int x = (1 + 2) * 3; int y = x * x + x; print(y * (x + 1));";
    assert_eq!(render(source), render(source));
    assert_eq!(parse_text(source).unwrap(), parse_text(source).unwrap());
}

#[test]
fn test_missing_assign() {
    let err = parse_text("int x 5;").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedToken {
            expected: &[TokenKind::Assign],
            found: TokenKind::Number,
            pos: Pos::new(1, 7),
        }
    );
    assert_eq!(err.to_string(), "1:7: expected ASSIGN, found NUMBER");
}

#[test]
fn test_bad_statement_start() {
    let err = parse_text("x = 5;").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedToken {
            expected: &[TokenKind::Int, TokenKind::Print],
            found: TokenKind::Id,
            pos: Pos::new(1, 1),
        }
    );
    assert_eq!(err.to_string(), "1:1: expected one of INT, PRINT, found ID");
}

#[test]
fn test_bad_factor() {
    let err = parse_text("print(+);").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedToken {
            expected: &[TokenKind::Number, TokenKind::Id, TokenKind::LParen],
            found: TokenKind::Add,
            pos: Pos::new(1, 7),
        }
    );
}

#[test]
fn test_unexpected_token_kinds() {
    fn check(source: &str, expected: TokenKind, found: TokenKind) {
        println!("testing {source}");
        match parse_text(source).unwrap_err() {
            ParseError::UnexpectedToken {
                expected: e,
                found: f,
                ..
            } => {
                assert_eq!(e, [expected]);
                assert_eq!(f, found);
            }
            other => panic!("unexpected token error expected, got {other:?}"),
        }
    }
    check("print 5;", TokenKind::LParen, TokenKind::Number);
    check("int 5 = 5;", TokenKind::Id, TokenKind::Number);
    check("int x = 5", TokenKind::Semicolon, TokenKind::Eof);
    check("print((1);", TokenKind::RParen, TokenKind::Semicolon);
    check("print(1)", TokenKind::Semicolon, TokenKind::Eof);
    check("int x = 1 2;", TokenKind::Semicolon, TokenKind::Number);
}

#[test]
fn test_first_error_wins() {
    let err = parse_text("int x 5; print(;").unwrap_err();
    let ParseError::UnexpectedToken { found, pos, .. } = err else {
        panic!("unexpected token error expected");
    };
    assert_eq!(found, TokenKind::Number);
    assert_eq!(pos, Pos::new(1, 7));
}

#[test]
fn test_eof_error_position() {
    let err = parse_text("int x = 5").unwrap_err();
    let ParseError::UnexpectedToken { pos, .. } = err else {
        panic!("unexpected token error expected");
    };
    assert_eq!(pos, Pos::new(1, 10));
}

#[test]
fn test_missing_trailing_eof() {
    let toks = tokenize("print(1);").unwrap();
    let without_eof = &toks[..toks.len() - 1];
    assert_eq!(parse(without_eof).unwrap(), parse(&toks).unwrap());

    let toks = tokenize("print(1").unwrap();
    let err = parse(&toks[..toks.len() - 1]).unwrap_err();
    let ParseError::UnexpectedToken { found, .. } = err else {
        panic!("unexpected token error expected");
    };
    assert_eq!(found, TokenKind::Eof);
}

#[test]
fn test_number_out_of_range() {
    let err = parse_text("print(3000000000);").unwrap_err();
    assert_eq!(
        err,
        ParseError::InvalidNumber {
            text: "3000000000".to_string(),
            pos: Pos::new(1, 7),
        }
    );
    assert_eq!(render("print(2147483647);"), ["Print(Number(2147483647))"]);
}

fn sum_of_ones(terms: usize) -> String {
    format!("print({});", vec!["1"; terms].join(" + "))
}

fn nested_parens(levels: usize) -> String {
    format!("print({}1{});", "(".repeat(levels), ")".repeat(levels))
}

#[test]
fn test_long_chain_too_deep() {
    // A flat chain of n terms is a left-leaning tree of depth n
    assert!(parse_text(&sum_of_ones(MAX_DEPTH)).is_ok());
    assert_eq!(
        parse_text(&sum_of_ones(MAX_DEPTH + 1)).unwrap_err(),
        ParseError::TooDeep {
            pos: Pos::new(1, 4 * MAX_DEPTH + 5)
        }
    );
    let err = parse_text(&sum_of_ones(10_000)).unwrap_err();
    assert!(matches!(err, ParseError::TooDeep { .. }));

    let product = format!("print({});", vec!["x"; 5_000].join(" * "));
    assert!(matches!(
        parse_text(&product),
        Err(ParseError::TooDeep { .. })
    ));
}

#[test]
fn test_nested_parens_too_deep() {
    assert_eq!(
        render(&nested_parens(MAX_DEPTH)),
        ["Print(Number(1))"]
    );
    let err = parse_text(&nested_parens(MAX_DEPTH + 1)).unwrap_err();
    // Reported at the first parenthesis past the limit
    assert_eq!(
        err,
        ParseError::TooDeep {
            pos: Pos::new(1, 7 + MAX_DEPTH)
        }
    );
    assert!(matches!(
        parse_text(&nested_parens(2_000)),
        Err(ParseError::TooDeep { .. })
    ));
}

#[test]
fn test_depth_counts_longest_path() {
    // Balanced sums stay shallow even with many operators
    let pair = "(1 + 1)";
    let mut source = pair.to_string();
    for _ in 0..6 {
        source = format!("({source} * {source})");
    }
    assert!(parse_text(&format!("print({source});")).is_ok());
    assert_eq!(
        parse_text("int x = 1 + 2 * 3;").unwrap()[0].to_string(),
        "Assignment(x, BinOp(Number(1), +, BinOp(Number(2), *, Number(3))))"
    );
}

#[test]
fn test_too_deep_message() {
    let err = parse_text(&sum_of_ones(MAX_DEPTH + 1)).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("1:{}: expression nested deeper than 256 levels", 4 * MAX_DEPTH + 5)
    );
}
