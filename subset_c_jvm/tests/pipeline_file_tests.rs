//! File-level pipeline behavior: output naming, writing, failure modes.

use std::fs;

use subset_c_jvm::pipeline::compile_file;
use subset_c_jvm::CompileError;

#[test]
fn test_compile_file_writes_dot_j_sibling() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("fib.c");
    fs::write(
        &input,
        "int fib(int n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }\
         int main() { putint(fib(10)); return 0; }",
    )
    .unwrap();

    let (output, diagnostics) = compile_file(&input).expect("compile failed");
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(output, dir.path().join("fib.j"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with(".class public fib\n.super java/lang/Object\n"));
    assert!(text.contains("invokestatic Method fib fib (I)I"));
    assert!(text.contains("invokestatic Method java/lang/System exit (I)V"));
}

#[test]
fn test_compile_file_reports_diagnostics_but_still_writes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("bad.c");
    fs::write(&input, "int main() { return missing; }").unwrap();

    let (output, diagnostics) = compile_file(&input).expect("pipeline error");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("Undeclared identifier"));
    assert!(output.exists());
}

#[test]
fn test_missing_input_is_io_error() {
    let err = compile_file(std::path::Path::new("/nonexistent/nope.c")).unwrap_err();
    assert!(matches!(err, CompileError::Io(_)));
}

#[test]
fn test_parse_error_surfaces_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("broken.c");
    fs::write(&input, "int main( { return 0; }").unwrap();

    let err = compile_file(&input).unwrap_err();
    assert!(matches!(err, CompileError::Parse(_)));
    assert!(!dir.path().join("broken.j").exists());
}
