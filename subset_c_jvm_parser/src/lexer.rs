//! Lexer for the C subset.
//!
//! Wraps the logos-generated token stream, scanning block comments by hand
//! (logos has no non-greedy repetition) and attaching spans with line
//! numbers. Escape decoding for char and string literals also lives here so
//! the parser can work with decoded values.

use logos::Logos;

use crate::error::{ParseError, ParseResult};
use crate::span::{SourceMap, Span};
use crate::token::Token;

/// A token with its span and raw text.
#[derive(Debug, Clone)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub span: Span,
    pub text: &'a str,
}

/// C-subset lexer.
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Token>,
    source_map: SourceMap,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("source_len", &self.source.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            source_map: SourceMap::new(source),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Lex the whole input. Stops at the first invalid token.
    pub fn tokenize(mut self) -> ParseResult<Vec<SpannedToken<'a>>> {
        let mut tokens = Vec::new();
        while let Some(result) = self.inner.next() {
            let range = self.inner.span();
            let span = self.source_map.span(range.start, range.end);
            match result {
                Ok(Token::BlockCommentStart) => {
                    let close = self.scan_block_comment(range.end)?;
                    // Restart the inner lexer just past the comment, keeping
                    // spans relative to the original source.
                    let mut restarted = Token::lexer(self.source);
                    restarted.bump(close);
                    self.inner = restarted;
                }
                Ok(token) => {
                    tokens.push(SpannedToken {
                        token,
                        span,
                        text: &self.source[range.start..range.end],
                    });
                }
                Err(()) => return Err(ParseError::LexerError { span }),
            }
        }
        Ok(tokens)
    }

    /// Scan past a `/* ... */` comment starting just after the opener.
    /// Returns the offset one past the closing delimiter.
    fn scan_block_comment(&self, start: usize) -> ParseResult<usize> {
        let bytes = self.source.as_bytes();
        let mut pos = start;
        while pos < bytes.len() {
            match memchr::memchr(b'*', &bytes[pos..]) {
                None => break,
                Some(offset) => {
                    pos += offset;
                    if pos + 1 < bytes.len() && bytes[pos + 1] == b'/' {
                        return Ok(pos + 2);
                    }
                    pos += 1;
                }
            }
        }
        Err(ParseError::UnterminatedBlockComment {
            span: self.source_map.span(start.saturating_sub(2), self.source.len()),
        })
    }
}

/// Decode the body of a char literal (text without the surrounding quotes).
pub fn unescape_char(body: &str, span: Span) -> ParseResult<u8> {
    let mut chars = body.chars();
    let value = match chars.next() {
        Some('\\') => {
            let esc = chars.next().unwrap_or('\0');
            decode_escape(esc, span)?
        }
        Some(c) if c.is_ascii() => c as u8,
        _ => {
            return Err(ParseError::InvalidEscape {
                sequence: body.to_string(),
                span,
            })
        }
    };
    Ok(value)
}

/// Decode the body of a string literal (text without the surrounding quotes).
pub fn unescape_string(body: &str, span: Span) -> ParseResult<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let esc = chars.next().unwrap_or('\0');
            out.push(decode_escape(esc, span)? as char);
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

fn decode_escape(esc: char, span: Span) -> ParseResult<u8> {
    let value = match esc {
        'n' => b'\n',
        't' => b'\t',
        'r' => b'\r',
        '0' => b'\0',
        '\\' => b'\\',
        '\'' => b'\'',
        '"' => b'"',
        _ => {
            return Err(ParseError::InvalidEscape {
                sequence: format!("\\{}", esc),
                span,
            })
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .tokenize()
            .expect("lex failed")
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_block_comment_skipped() {
        assert_eq!(
            kinds("1 /* comment * still // comment */ 2"),
            vec![Token::IntLiteral, Token::IntLiteral]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = Lexer::new("int x; /* oops").tokenize().unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedBlockComment { .. }));
    }

    #[test]
    fn test_spans_track_lines() {
        let tokens = Lexer::new("int\nx;").tokenize().unwrap();
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[1].span.line, 2);
    }

    #[test]
    fn test_unescape() {
        let span = Span::default();
        assert_eq!(unescape_char("a", span).unwrap(), b'a');
        assert_eq!(unescape_char("\\n", span).unwrap(), b'\n');
        assert_eq!(unescape_string("hi\\tthere", span).unwrap(), "hi\tthere");
        assert!(unescape_string("\\q", span).is_err());
    }
}
