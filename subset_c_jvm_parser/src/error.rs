//! Parse error types

use crate::span::Span;
use thiserror::Error;

/// Result alias used throughout the parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse error type
#[derive(Error, Debug, Clone)]
pub enum ParseError {
    /// Unexpected token
    #[error("line {}: unexpected token '{found}', expected {expected}", .span.line)]
    UnexpectedToken {
        found: String,
        expected: String,
        span: Span,
    },

    /// Unexpected end of input
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    /// Invalid escape sequence
    #[error("line {}: invalid escape sequence '{sequence}'", .span.line)]
    InvalidEscape { sequence: String, span: Span },

    /// Unterminated block comment
    #[error("line {}: unterminated block comment", .span.line)]
    UnterminatedBlockComment { span: Span },

    /// Invalid number literal
    #[error("line {}: invalid number literal '{literal}'", .span.line)]
    InvalidNumber { literal: String, span: Span },

    /// Unrecognized input
    #[error("line {}: unrecognized token", .span.line)]
    LexerError { span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span, .. } => *span,
            ParseError::InvalidEscape { span, .. } => *span,
            ParseError::UnterminatedBlockComment { span } => *span,
            ParseError::InvalidNumber { span, .. } => *span,
            ParseError::LexerError { span } => *span,
        }
    }

    pub fn unexpected_token(
        found: impl Into<String>,
        expected: impl Into<String>,
        span: Span,
    ) -> Self {
        ParseError::UnexpectedToken {
            found: found.into(),
            expected: expected.into(),
            span,
        }
    }

    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        ParseError::UnexpectedEof {
            expected: expected.into(),
            span,
        }
    }
}
