//! Compilation pipeline: source text → Jasmin class text.
//!
//! Stages run to completion over the whole program before the next begins:
//! parse, type check, per-function lowering, emission. Semantic errors do
//! not stop the pipeline (the checker recovers and the later stages emit
//! best effort), but they mark the compilation as failed, which
//! [`compile_source`] surfaces as an error and [`compile_file`] returns
//! alongside the written path.

use std::fs;
use std::path::{Path, PathBuf};

use subset_c_jvm_parser::ast::{Item, Program};

use crate::codegen;
use crate::error::{CompileError, Diagnostic};
use crate::ir::LabelSeq;
use crate::lowering;
use crate::typecheck::{self, Checked};

/// Result of a best-effort compilation: the emitted text plus whatever
/// diagnostics the checker produced. Empty diagnostics mean success.
#[derive(Debug)]
pub struct CompileOutcome {
    pub jasmin: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse only.
pub fn parse_source(source: &str) -> Result<Program, CompileError> {
    Ok(subset_c_jvm_parser::parse(source)?)
}

/// Parse and type-check; parse errors abort, semantic diagnostics are
/// collected in the returned [`Checked`].
pub fn check_source(source: &str, file: &str) -> Result<(Program, Checked), CompileError> {
    let program = parse_source(source)?;
    let checked = typecheck::check(&program, file);
    Ok((program, checked))
}

/// Full pipeline with best-effort emission. The label counter starts fresh
/// per compilation, so identical input yields byte-identical output.
pub fn compile_to_jasmin(
    source: &str,
    file: &str,
    class_name: &str,
) -> Result<CompileOutcome, CompileError> {
    let (program, checked) = check_source(source, file)?;

    let mut labels = LabelSeq::new();
    let functions: Vec<_> = program
        .items
        .iter()
        .filter_map(|item| match item {
            Item::Function(func) => Some(lowering::lower_function(func, &checked, &mut labels)),
            _ => None,
        })
        .collect();

    let jasmin = codegen::emit(&program, &checked, &functions, class_name, &mut labels);
    Ok(CompileOutcome {
        jasmin,
        diagnostics: checked.diagnostics,
    })
}

/// Strict variant: any semantic diagnostic is an error.
pub fn compile_source(
    source: &str,
    file: &str,
    class_name: &str,
) -> Result<String, CompileError> {
    let outcome = compile_to_jasmin(source, file, class_name)?;
    if outcome.diagnostics.is_empty() {
        Ok(outcome.jasmin)
    } else {
        Err(CompileError::Check(outcome.diagnostics))
    }
}

/// Compile a source file to its `.j` sibling. The output is written even
/// when semantic diagnostics were reported (the returned list marks the
/// compilation failed); parse and I/O failures write nothing.
pub fn compile_file(path: &Path) -> Result<(PathBuf, Vec<Diagnostic>), CompileError> {
    let source = fs::read_to_string(path)?;
    let file = path.to_string_lossy().into_owned();
    let class_name = class_name_for(path);
    let outcome = compile_to_jasmin(&source, &file, &class_name)?;

    let output = output_path_for(path);
    fs::write(&output, &outcome.jasmin)?;
    Ok((output, outcome.diagnostics))
}

/// Class name: the input file's stem.
pub fn class_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Main".to_string())
}

/// Output path: the input with its extension replaced by `.j`.
pub fn output_path_for(path: &Path) -> PathBuf {
    path.with_extension("j")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_from_path() {
        assert_eq!(class_name_for(Path::new("dir/prog.c")), "prog");
        assert_eq!(class_name_for(Path::new("main.c")), "main");
    }

    #[test]
    fn test_output_path_replaces_extension() {
        assert_eq!(output_path_for(Path::new("dir/prog.c")), Path::new("dir/prog.j"));
    }

    #[test]
    fn test_compile_source_rejects_semantic_errors() {
        let source = "const int x = 3; int main() { x = 4; return x; }";
        let err = compile_source(source, "prog.c", "prog").unwrap_err();
        let CompileError::Check(diagnostics) = err else {
            panic!("expected check failure");
        };
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0]
            .message
            .contains("Assignment to read-only variable 'x'"));
    }

    #[test]
    fn test_best_effort_emission_survives_semantic_errors() {
        let source = "int main() { y = 4; return 0; }";
        let outcome = compile_to_jasmin(source, "prog.c", "prog").unwrap();
        assert!(!outcome.diagnostics.is_empty());
        assert!(outcome.jasmin.contains(".class public prog"));
    }

    #[test]
    fn test_emission_is_deterministic() {
        let source = "int main(){ int i; i=0; while (i<10) { i=i+1; } return i; }";
        let first = compile_source(source, "prog.c", "prog").unwrap();
        let second = compile_source(source, "prog.c", "prog").unwrap();
        assert_eq!(first, second);
    }
}
