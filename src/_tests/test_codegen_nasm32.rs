use pretty_assertions::assert_eq;

use crate::ast::{BinOp, Node};
use crate::codegen::CodeGen;
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::tokens::Pos;
use crate::unwrap_variant;

use super::{CodeGenError, CodeGenNasm32, CodeGenNasm32Config, Register, generate};

fn program(source: &str) -> Vec<Node> {
    let toks = tokenize(source).unwrap();
    parse(&toks).unwrap()
}

/// Instruction lines between the entry label and the epilogue
fn body(source: &str) -> Vec<String> {
    let cg = CodeGenNasm32::from_program(&program(source)).unwrap();
    cg.code.buffer.clone()
}

#[test]
fn test_square_listing() {
    let text = generate(&program("int i = 5;\nint result = i * i;\nprint(result);")).unwrap();
    let expected = "\
section .data
    format db \"%d\", 10, 0

section .text
    global main
    extern printf

main:
    mov eax, 5
    ; SQUARE instruction: i * i
    mov eax, eax
    mul eax
    mov ebx, eax
    push ebx
    push format
    call printf
    add esp, 8

    ret
";
    assert_eq!(text, expected);
}

#[test]
fn test_empty_program() {
    let text = generate(&[]).unwrap();
    let expected = "\
section .data
    format db \"%d\", 10, 0

section .text
    global main
    extern printf

main:

    ret
";
    assert_eq!(text, expected);
}

#[test]
fn test_generic_add() {
    assert_eq!(
        body("int a = 1; int b = a + 2;"),
        ["    mov eax, 1", "    mov eax, eax", "    add eax, 2", "    mov ebx, eax"]
    );
}

#[test]
fn test_generic_mul_is_not_square() {
    let lines = body("int a = 3; print(a * 4);");
    assert_eq!(
        lines,
        [
            "    mov eax, 3",
            "    mov eax, eax",
            "    mul 4",
            "    push eax",
            "    push format",
            "    call printf",
            "    add esp, 8",
        ]
    );
    assert!(!lines.iter().any(|l| l.contains("SQUARE")));

    let lines = body("int a = 3; int b = 4; print(a * b);");
    assert!(lines.contains(&"    mul ebx".to_string()));
    assert!(!lines.iter().any(|l| l.contains("SQUARE")));
}

#[test]
fn test_literal_assignment_moves_directly() {
    assert_eq!(body("int x = 42;"), ["    mov eax, 42"]);
}

#[test]
fn test_destination_allocated_first() {
    let cg = CodeGenNasm32::from_program(&program("int x = y + 1;")).unwrap();
    assert_eq!(cg.register_of("x"), Some(Register::Eax));
    assert_eq!(cg.register_of("y"), Some(Register::Ebx));
    assert_eq!(
        cg.code.buffer,
        ["    mov eax, ebx", "    add eax, 1", "    mov eax, eax"]
    );
}

#[test]
fn test_print_literal() {
    assert_eq!(
        body("print(7);"),
        ["    push 7", "    push format", "    call printf", "    add esp, 8"]
    );
}

#[test]
fn test_emission_follows_source_order() {
    let lines = body("print(1); print(2); print(3);");
    let pushed: Vec<&str> = lines
        .iter()
        .filter(|l| l.starts_with("    push ") && !l.ends_with("format"))
        .map(|l| l.as_str())
        .collect();
    assert_eq!(pushed, ["    push 1", "    push 2", "    push 3"]);
}

#[test]
fn test_register_pool_wraps() {
    let source = "int a = 1; int b = 2; int c = 3; int d = 4; int e = 5;";
    let cg = CodeGenNasm32::from_program(&program(source)).unwrap();
    assert_eq!(
        cg.code.buffer,
        ["    mov eax, 1", "    mov ebx, 2", "    mov ecx, 3", "    mov edx, 4", "    mov eax, 5"]
    );
    // The fifth variable aliases the first one
    assert_eq!(cg.register_of("a"), Some(Register::Eax));
    assert_eq!(cg.register_of("e"), Some(Register::Eax));
    assert_eq!(cg.register_of("d"), Some(Register::Edx));
}

#[test]
fn test_register_is_stable() {
    let cg = CodeGenNasm32::from_program(&program("int a = 1; int b = 2; int a = 3; print(a);")).unwrap();
    assert_eq!(cg.register_of("a"), Some(Register::Eax));
    assert_eq!(cg.register_of("b"), Some(Register::Ebx));
    assert_eq!(cg.code.buffer[2], "    mov eax, 3");
    assert_eq!(cg.code.buffer[3], "    push eax");
    assert_eq!(cg.register_of("unused"), None);
}

#[test]
fn test_bare_expression_statement() {
    let stmt = Node::new_binary(
        Node::new_variable("a", Pos::default()),
        BinOp::Add,
        Node::new_number(1, Pos::default()),
        Pos::default(),
    );
    let cg = CodeGenNasm32::from_program(&[stmt, Node::new_number(9, Pos::default())]).unwrap();
    assert_eq!(cg.code.buffer, ["    mov eax, eax", "    add eax, 1"]);
}

#[test]
fn test_statement_as_operand() {
    let inner = Node::new_print(Node::new_number(1, Pos::new(2, 3)), Pos::new(2, 3));
    let outer = Node::new_print(inner, Pos::new(2, 1));
    let err = generate(&[outer]).unwrap_err();
    let (rendered, pos) = unwrap_variant!(&err, CodeGenError::StatementAsOperand, 2);
    assert_eq!(rendered, "Print(Number(1))");
    assert_eq!(*pos, Pos::new(2, 3));
}

#[test]
fn test_custom_config() {
    let config = CodeGenNasm32Config {
        entry_point: "start".to_string(),
        print_routine: "print_int".to_string(),
        format_label: "fmt".to_string(),
    };
    let cg = CodeGenNasm32::from_program_with_config(&program("print(1);"), config).unwrap();
    let text = cg.to_text();
    assert_eq!(text[1], "    fmt db \"%d\", 10, 0");
    assert_eq!(text[4], "    global start");
    assert_eq!(text[5], "    extern print_int");
    assert_eq!(text[7], "start:");
    assert!(text.contains(&"    push fmt".to_string()));
    assert!(text.contains(&"    call print_int".to_string()));
}

#[test]
fn test_labels() {
    let mut cg = CodeGenNasm32::new();
    assert_eq!(cg.new_label("loop"), "loop_0");
    assert_eq!(cg.new_label("end"), "end_1");
}
