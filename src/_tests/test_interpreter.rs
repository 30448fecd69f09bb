use std::io::{self, Write};

use crate::ast::{BinOp, Node};
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::tokens::Pos;
use crate::unwrap_variant;

use super::{Interpreter, RuntimeError, evaluate};

fn program(source: &str) -> Vec<Node> {
    let toks = tokenize(source).unwrap_or_else(|e| panic!("Lexer failed for {source}: {e}"));
    parse(&toks).unwrap_or_else(|e| panic!("Parser failed for {source}: {e}"))
}

fn run_text(source: &str) -> Result<String, RuntimeError> {
    let out = evaluate(&program(source), Vec::<u8>::new())?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_print_variable() {
    assert_eq!(run_text("int x = 3; print(x);").unwrap(), "3\n");
}

#[test]
fn test_square() {
    let source = "int i = 5;\nint result = i * i;\nprint(result);";
    assert_eq!(run_text(source).unwrap(), "25\n");
}

#[test]
fn test_arithmetic() {
    fn check(expr: &str, expected: i32) {
        println!("testing {expr}");
        let out = run_text(&format!("print({expr});")).unwrap();
        assert_eq!(out, format!("{expected}\n"));
    }
    check("1 + 2 + 3", 6);
    check("2 * 3 + 4", 10);
    check("2 + 3 * 4", 14);
    check("(2 + 3) * 4", 20);
    check("2 * (3 + 4) * 5", 70);
    check("0", 0);
}

#[test]
fn test_prints_in_order() {
    let out = run_text("int a = 1; print(a); int b = a + 1; print(b); print(a + b * 10);").unwrap();
    assert_eq!(out, "1\n2\n21\n");
}

#[test]
fn test_redeclaration_rebinds() {
    let out = run_text("int x = 1; int x = x + 1; int x = x * 10; print(x);").unwrap();
    assert_eq!(out, "20\n");
}

#[test]
fn test_environment_after_run() {
    let mut interpreter = Interpreter::new(Vec::<u8>::new());
    interpreter
        .evaluate(&program("int i = 5; int result = i * i;"))
        .unwrap();
    assert_eq!(interpreter.get("i"), Some(5));
    assert_eq!(interpreter.get("result"), Some(25));
    assert_eq!(interpreter.get("missing"), None);
    assert!(interpreter.into_output().is_empty());
}

#[test]
fn test_undefined_variable() {
    let err = run_text("print(y);").unwrap_err();
    let (name, pos) = unwrap_variant!(&err, RuntimeError::UndefinedVariable, 2);
    assert_eq!(name, "y");
    assert_eq!(*pos, Pos::new(1, 7));
    assert_eq!(err.to_string(), "1:7: undefined variable `y`");
}

#[test]
fn test_undefined_variable_never_defaults() {
    fn undefined_name(source: &str) -> String {
        let err = run_text(source).unwrap_err();
        unwrap_variant!(err, RuntimeError::UndefinedVariable, 2).0
    }
    // The square shortcut looks the variable up like any other read
    assert_eq!(undefined_name("print(z * z);"), "z");
    assert_eq!(undefined_name("int a = 1; print(a + b);"), "b");
    assert_eq!(undefined_name("int x = x;"), "x");
}

#[test]
fn test_error_aborts_run() {
    let mut interpreter = Interpreter::new(Vec::<u8>::new());
    let result = interpreter.evaluate(&program("print(1); print(y); print(2);"));
    assert!(matches!(result, Err(RuntimeError::UndefinedVariable(..))));
    assert_eq!(interpreter.into_output(), b"1\n");
}

#[test]
fn test_square_matches_generic_path() {
    // 46341 * 46341 overflows 32 bits; both paths must wrap the same way
    for value in [0, 1, 5, 46341, 2147483647] {
        let square = run_text(&format!("int i = {value}; print(i * i);")).unwrap();
        let generic = run_text(&format!("int i = {value}; print(i * (i + 0));")).unwrap();
        assert_eq!(square, generic, "value {value}");
    }
}

#[test]
fn test_wrapping_arithmetic() {
    assert_eq!(
        run_text("int big = 2147483647; print(big + 1);").unwrap(),
        "-2147483648\n"
    );
}

#[test]
fn test_unknown_statement() {
    let mut interpreter = Interpreter::new(Vec::<u8>::new());
    let bare = [
        Node::new_number(5, Pos::new(3, 1)),
        Node::new_variable("x", Pos::new(3, 1)),
        Node::new_binary(
            Node::new_number(1, Pos::new(3, 1)),
            BinOp::Add,
            Node::new_number(2, Pos::new(3, 3)),
            Pos::new(3, 2),
        ),
    ];
    for node in bare {
        let err = interpreter.exec(&node).unwrap_err();
        let (rendered, _) = unwrap_variant!(&err, RuntimeError::UnknownStatement, 2);
        assert_eq!(rendered, &node.to_string());
    }
    let err = interpreter.exec(&Node::new_number(5, Pos::new(3, 1))).unwrap_err();
    assert_eq!(err.to_string(), "3:1: unknown statement Number(5)");
}

#[test]
fn test_statement_is_not_an_expression() {
    let interpreter = Interpreter::new(Vec::<u8>::new());
    let print = Node::new_print(Node::new_number(1, Pos::default()), Pos::default());
    let err = interpreter.eval_expr(&print).unwrap_err();
    let (rendered, _) = unwrap_variant!(&err, RuntimeError::NotAnExpression, 2);
    assert_eq!(rendered, "Print(Number(1))");
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_failure() {
    let err = evaluate(&program("print(1);"), ClosedPipe).err().unwrap();
    let io_err = unwrap_variant!(&err, RuntimeError::Io);
    assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
}
