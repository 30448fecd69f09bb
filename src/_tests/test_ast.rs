use crate::ast::{BinOp, Node};
use crate::interpreter::RuntimeError;
use crate::tokens::Pos;
use crate::unwrap_variant;

fn num(value: i32) -> Node {
    Node::new_number(value, Pos::default())
}

fn var(name: &str) -> Node {
    Node::new_variable(name, Pos::default())
}

#[test]
fn test_render_leaves() {
    assert_eq!(num(42).to_string(), "Number(42)");
    assert_eq!(var("abc").to_string(), "Variable(abc)");
}

#[test]
fn test_render_nested() {
    let square = Node::new_binary(var("i"), BinOp::Mul, var("i"), Pos::default());
    let stmt = Node::new_assignment("result", square, Pos::default());
    assert_eq!(
        stmt.to_string(),
        "Assignment(result, BinOp(Variable(i), *, Variable(i)))"
    );

    let sum = Node::new_binary(num(1), BinOp::Add, var("x"), Pos::default());
    let print = Node::new_print(sum, Pos::default());
    assert_eq!(print.to_string(), "Print(BinOp(Number(1), +, Variable(x)))");
}

#[test]
fn test_is_statement() {
    assert!(Node::new_print(num(1), Pos::default()).is_statement());
    assert!(Node::new_assignment("a", num(1), Pos::default()).is_statement());
    assert!(!num(1).is_statement());
    assert!(!var("a").is_statement());
    assert!(!Node::new_binary(num(1), BinOp::Add, num(2), Pos::default()).is_statement());
}

#[test]
fn test_binop_from_symbol() {
    assert_eq!("+".parse::<BinOp>().unwrap(), BinOp::Add);
    assert_eq!("*".parse::<BinOp>().unwrap(), BinOp::Mul);
    for symbol in ["-", "/", "**", ""] {
        let err = symbol.parse::<BinOp>().unwrap_err();
        let op = unwrap_variant!(&err, RuntimeError::UnsupportedOperator);
        assert_eq!(op, symbol);
    }
    assert_eq!(
        "%".parse::<BinOp>().unwrap_err().to_string(),
        "unsupported operator `%`"
    );
}

#[test]
fn test_binop_apply_wraps() {
    assert_eq!(BinOp::Add.apply(2, 3), 5);
    assert_eq!(BinOp::Mul.apply(2, 3), 6);
    assert_eq!(BinOp::Add.apply(i32::MAX, 1), i32::MIN);
    assert_eq!(BinOp::Mul.apply(65536, 65536), 0);
}
