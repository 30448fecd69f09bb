use pretty_assertions::assert_eq;

use mini_compiler::{CodeGenNasm32Config, ParseError};

use super::{DEMO_SOURCE, compile_stages};

fn dump(source: &str, verbose: bool) -> (anyhow::Result<(Vec<mini_compiler::Node>, String)>, String) {
    let mut out = Vec::<u8>::new();
    let result = compile_stages(source, CodeGenNasm32Config::default(), verbose, &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_demo_stages() {
    let (result, text) = dump(DEMO_SOURCE, true);
    let (program, assembly) = result.unwrap();
    assert_eq!(program.len(), 3);
    assert!(assembly.contains("SQUARE"));

    let tokens_at = text.find("<---Tokenisation--->").unwrap();
    let tree_at = text.find("<---Abstract Parse Tree--->").unwrap();
    let asm_at = text.find("<---x86 Assembly Output--->").unwrap();
    assert!(tokens_at < tree_at && tree_at < asm_at);
    assert!(text.contains("\n(INT, int)\n(ID, i)\n"));
    assert!(text.contains("\nPrint(Variable(result))\n"));
    assert!(!text.contains("EOF"));
}

#[test]
fn test_parse_failure_keeps_token_dump() {
    let (result, text) = dump("int x 5;", true);
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ParseError>(),
        Some(ParseError::UnexpectedToken { .. })
    ));
    assert_eq!(
        text,
        "\n<---Tokenisation--->\n\n(INT, int)\n(ID, x)\n(NUMBER, 5)\n(SEMICOLON, ;)\n"
    );
}

#[test]
fn test_quiet_writes_nothing() {
    let (result, text) = dump(DEMO_SOURCE, false);
    assert!(result.is_ok());
    assert_eq!(text, "");
}
