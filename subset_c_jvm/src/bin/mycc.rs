//! Compiler driver.
//!
//! One positional flag selects the pipeline stage, followed by the input
//! path for stages 2..5:
//!
//! ```text
//! mycc -1            compiler info
//! mycc -2 file.c     lexical scan, print tokens
//! mycc -3 file.c     parse, dump the AST as JSON
//! mycc -4 file.c     type check, report diagnostics
//! mycc -5 file.c     full codegen, write file.j
//! ```

use std::env;
use std::path::Path;
use std::process::ExitCode;

use subset_c_jvm::pipeline;
use subset_c_jvm_parser::Lexer;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage() {
    eprintln!("Usage:\n  mycc -mode infile\n");
    eprintln!("mode: integer 1-5");
    eprintln!("infile: path to the file to compile (not used for mode 1)");
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let Some(mode) = args.get(1).and_then(|arg| arg.strip_prefix('-')) else {
        eprintln!("No mode specified.");
        usage();
        return ExitCode::FAILURE;
    };
    let Ok(mode) = mode.parse::<u32>() else {
        eprintln!("Improper input format.");
        usage();
        return ExitCode::FAILURE;
    };

    if mode == 1 {
        eprintln!("subset_c_jvm: a compiler from a C subset to JVM bytecode (Jasmin text).");
        eprintln!("Version {}", VERSION);
        return ExitCode::SUCCESS;
    }

    let Some(input) = args.get(2) else {
        eprintln!("Mode {} requires an infile.", mode);
        usage();
        return ExitCode::FAILURE;
    };
    let path = Path::new(input);

    match mode {
        2 => lex_only(path),
        3 => parse_only(path),
        4 => check_only(path),
        5 => codegen(path),
        _ => {
            eprintln!("Improper input format.");
            usage();
            ExitCode::FAILURE
        }
    }
}

fn read(path: &Path) -> Result<String, ExitCode> {
    std::fs::read_to_string(path).map_err(|err| {
        eprintln!("{}: {}", path.display(), err);
        ExitCode::FAILURE
    })
}

fn lex_only(path: &Path) -> ExitCode {
    let source = match read(path) {
        Ok(source) => source,
        Err(code) => return code,
    };
    match Lexer::new(&source).tokenize() {
        Ok(tokens) => {
            for token in tokens {
                println!("{:4}  {:?}  {}", token.span.line, token.token, token.text);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}: {}", path.display(), err);
            ExitCode::FAILURE
        }
    }
}

fn parse_only(path: &Path) -> ExitCode {
    let source = match read(path) {
        Ok(source) => source,
        Err(code) => return code,
    };
    match pipeline::parse_source(&source) {
        Ok(program) => {
            match serde_json::to_string_pretty(&program) {
                Ok(json) => println!("{}", json),
                Err(err) => {
                    eprintln!("{}: {}", path.display(), err);
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}: {}", path.display(), err);
            ExitCode::FAILURE
        }
    }
}

fn check_only(path: &Path) -> ExitCode {
    let source = match read(path) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let file = path.to_string_lossy();
    match pipeline::check_source(&source, &file) {
        Ok((_, checked)) => {
            for diagnostic in &checked.diagnostics {
                eprintln!("{}", diagnostic);
            }
            if checked.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn codegen(path: &Path) -> ExitCode {
    match pipeline::compile_file(path) {
        Ok((output, diagnostics)) => {
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic);
            }
            if diagnostics.is_empty() {
                println!("{}", output.display());
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
