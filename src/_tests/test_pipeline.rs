use crate::{CodeGenNasm32Config, Error, TokenKind, compile, compile_with_config, run};

fn run_text(source: &str) -> Result<String, Error> {
    let out = run(source, Vec::<u8>::new())?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_compile_square() {
    let compilation = compile("int i = 5;\nint result = i * i;\nprint(result);").unwrap();
    assert_eq!(compilation.tokens.len(), 18);
    assert_eq!(compilation.tokens.last().unwrap().kind, TokenKind::Eof);
    assert_eq!(compilation.program.len(), 3);
    assert!(compilation.assembly.contains("    ; SQUARE instruction: i * i\n"));
    assert!(compilation.assembly.ends_with("\n    ret\n"));
}

#[test]
fn test_both_backends_agree_on_statements() {
    let source = "int a = 2; int b = a * a + 1; print(b); print(a);";
    assert_eq!(run_text(source).unwrap(), "5\n2\n");
    let asm = compile(source).unwrap().assembly;
    assert_eq!(asm.matches("call printf").count(), 2);
}

#[test]
fn test_custom_entry() {
    let config = CodeGenNasm32Config {
        entry_point: "_start".to_string(),
        ..Default::default()
    };
    let compilation = compile_with_config("print(1);", config).unwrap();
    assert!(compilation.assembly.contains("\n_start:\n"));
    assert!(compilation.assembly.contains("    global _start\n"));
}

#[test]
fn test_stage_errors() {
    assert!(matches!(run_text("int x = 1 @ 2;"), Err(Error::Lex(_))));
    assert!(matches!(run_text("int x 5;"), Err(Error::Parse(_))));
    assert!(matches!(run_text("print(y);"), Err(Error::Runtime(_))));
    assert!(matches!(compile("print(@);"), Err(Error::Lex(_))));
    // The emitter has no notion of undefined variables
    assert!(compile("print(y);").is_ok());
}

#[test]
fn test_error_messages() {
    let err = run_text("int x 5;").unwrap_err();
    assert_eq!(err.to_string(), "parse error: 1:7: expected ASSIGN, found NUMBER");
    let err = run_text("\n@").unwrap_err();
    assert_eq!(
        err.to_string(),
        "lexer error: 2:1: unexpected character '@' at offset 1"
    );
}

#[test]
fn test_deep_input_is_rejected() {
    let long_sum = format!("print({});", vec!["1"; 10_000].join(" + "));
    assert!(matches!(run_text(&long_sum), Err(Error::Parse(_))));
    assert!(matches!(compile(&long_sum), Err(Error::Parse(_))));

    let nested = format!("print({}1{});", "(".repeat(2_000), ")".repeat(2_000));
    assert!(matches!(run_text(&nested), Err(Error::Parse(_))));

    let at_limit = format!("print({});", vec!["1"; crate::parser::MAX_DEPTH].join(" + "));
    assert_eq!(run_text(&at_limit).unwrap(), "256\n");
    assert!(compile(&at_limit).is_ok());
}
