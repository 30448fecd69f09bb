use crate::ast::{BinOp, Node, NodeKind};
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::rewrite::{Rewrite, find_rewrite};
use crate::tokens::Pos;
use crate::unwrap_variant;

/// Parse `print(<expr>);` and return the printed expression
fn expr(text: &str) -> Node {
    let source = format!("print({text});");
    let toks = tokenize(&source).unwrap();
    let mut program = parse(&toks).unwrap();
    let stmt = program.remove(0);
    *unwrap_variant!(stmt.kind, NodeKind::Print)
}

#[test]
fn test_square_detected() {
    assert_eq!(find_rewrite(&expr("i * i")), Some(Rewrite::Square { name: "i" }));
    assert_eq!(
        find_rewrite(&expr("(value) * (value)")),
        Some(Rewrite::Square { name: "value" })
    );
}

#[test]
fn test_square_not_detected() {
    for text in ["i * j", "i + i", "2 * 2", "i * 2", "i", "7", "(i + 0) * i"] {
        println!("testing {text}");
        assert_eq!(find_rewrite(&expr(text)), None);
    }
}

#[test]
fn test_square_inner_only() {
    let node = expr("i * i * i");
    assert_eq!(find_rewrite(&node), None);
    let NodeKind::BinaryOp { left, .. } = &node.kind else {
        panic!("binary op expected");
    };
    assert_eq!(find_rewrite(left), Some(Rewrite::Square { name: "i" }));
}

#[test]
fn test_square_on_statement_is_none() {
    let square = Node::new_binary(
        Node::new_variable("i", Pos::default()),
        BinOp::Mul,
        Node::new_variable("i", Pos::default()),
        Pos::default(),
    );
    let stmt = Node::new_print(square, Pos::default());
    assert_eq!(find_rewrite(&stmt), None);
}
