//! Frond CLI: type inference and evaluation for frond programs.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use frond::builtins::{global_scope, initial_env};
use frond::diagnostics::print_error;
use frond::error::FrondError;
use frond::eval::Evaluator;
use frond::infer::InferState;
use frond::parser::parse;
use frond::types::PrettyContext;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: frond <file.fr> | frond -");
        eprintln!("       frond --help");
        return ExitCode::from(1);
    }

    if args[1] == "--help" || args[1] == "-h" {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args[1] == "--version" || args[1] == "-V" {
        println!("frond {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let (source, filename) = if args[1] == "-" {
        let mut source = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut source) {
            eprintln!("Error reading stdin: {}", e);
            return ExitCode::from(1);
        }
        (source, "<stdin>".to_string())
    } else {
        let filename = &args[1];
        match fs::read_to_string(filename) {
            Ok(source) => (source, filename.clone()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", filename, e);
                return ExitCode::from(1);
            }
        }
    };

    match run(&source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(&filename, &source, &error);
            ExitCode::from(1)
        }
    }
}

fn print_help() {
    println!(
        r#"frond - type inference for the frond expression language

USAGE:
    frond <file.fr>      Check and run a frond program
    frond -              Read from stdin

OPTIONS:
    -h, --help           Print help information
    -V, --version        Print version information

DESCRIPTION:
    Frond is a small purely-functional expression language with
    Hindley-Milner type inference extended by:

    - Row-polymorphic records: {{hello: "world"}}
    - Polymorphic variants: Ok(1), Err("boom")
    - Pattern matching: when v is Ok(x) -> x else 0
    - Top-level generalisation: id = \x -> x

    Each top-level declaration is printed with its inferred scheme,
    then the program is evaluated.
"#
    );
}

fn run(source: &str) -> Result<(), FrondError> {
    let program = parse(source)?;

    // Type checking: every declaration in order, generalising as we go
    let mut state = InferState::new();
    let (schemes, _env) = state.infer_program(&initial_env(), &program)?;

    for (name, scheme) in &schemes {
        let mut ctx = PrettyContext::new();
        match name {
            Some(name) => println!("{} : {}", name, ctx.format_scheme(scheme)),
            None => println!("_ : {}", ctx.format_scheme(scheme)),
        }
    }

    // Evaluation
    let mut evaluator = Evaluator::new(global_scope());
    if let Some(value) = evaluator.eval_program(&program)? {
        println!();
        println!("{}", value);
    }

    Ok(())
}
