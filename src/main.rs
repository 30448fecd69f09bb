use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use mini_compiler::{
    CodeGenNasm32Config, Node, TokenKind, generate_with_config, interpreter, parse, tokenize,
};

/// Program compiled when no input file is given
const DEMO_SOURCE: &str = "
int i = 5;
int result = i * i;
print(result);
";

#[derive(Parser, Debug)]
#[command(name = "mini_compiler")]
#[command(about = "Interpret a mini program and translate it to x86 assembly", long_about = None)]
struct Cli {
    /// Source file; the built-in demo program is used when omitted
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE", default_value = "output.asm")]
    out: PathBuf,

    /// Label of the generated entry function
    #[arg(long, value_name = "LABEL", default_value = "main")]
    entry: String,

    /// Only print program results, no intermediate stages
    #[arg(short, long)]
    quiet: bool,
}

fn banner<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "\n<---{title}--->\n")
}

/// Run the compile stages, dumping each one to `out` before the next starts,
/// so a failing stage still leaves the output of the earlier ones.
fn compile_stages<W: Write>(
    source: &str,
    config: CodeGenNasm32Config,
    verbose: bool,
    out: &mut W,
) -> Result<(Vec<Node>, String)> {
    let tokens = tokenize(source)?;
    if verbose {
        banner(out, "Tokenisation")?;
        for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
            writeln!(out, "{token}")?;
        }
    }

    let program = parse(&tokens)?;
    if verbose {
        banner(out, "Abstract Parse Tree")?;
        for stmt in &program {
            writeln!(out, "{stmt}")?;
        }
    }

    let assembly = generate_with_config(&program, config)?;
    if verbose {
        banner(out, "x86 Assembly Output")?;
        writeln!(out, "{assembly}")?;
    }
    Ok((program, assembly))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let source = match &cli.input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?,
        None => DEMO_SOURCE.to_string(),
    };

    let config = CodeGenNasm32Config {
        entry_point: cli.entry.clone(),
        ..Default::default()
    };
    let (program, assembly) = compile_stages(&source, config, !cli.quiet, &mut io::stdout())?;

    fs::write(&cli.out, &assembly).with_context(|| format!("writing {:?}", cli.out))?;
    info!("wrote {} bytes to {:?}", assembly.len(), cli.out);
    if !cli.quiet {
        println!("\nx86 Assembly code written to {}", cli.out.display());
        println!("Compilation Successful!");
        banner(&mut io::stdout(), "Result(s)")?;
    }

    let _stdout = interpreter::evaluate(&program, io::stdout().lock())?;
    Ok(())
}

#[cfg(test)]
#[path = "_tests/test_main.rs"]
mod test_main;
