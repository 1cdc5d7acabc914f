//! Compilation errors and semantic diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};
use subset_c_jvm_parser::ParseError;
use thiserror::Error;

/// One semantic error, reported with its source position.
///
/// The type checker collects diagnostics and keeps going, so a single run
/// can report every error in the translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.message)
    }
}

/// Pipeline-level failure.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{}", format_diagnostics(.0))]
    Check(Vec<Diagnostic>),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new("prog.c", 7, "Undeclared identifier 'x'");
        assert_eq!(d.to_string(), "prog.c:7: Undeclared identifier 'x'");
    }

    #[test]
    fn test_check_error_joins_diagnostics() {
        let err = CompileError::Check(vec![
            Diagnostic::new("a.c", 1, "first"),
            Diagnostic::new("a.c", 2, "second"),
        ]);
        assert_eq!(err.to_string(), "a.c:1: first\na.c:2: second");
    }
}
