//! Token definitions for the C-subset lexer.

mod precedence;

use logos::Logos;

pub use precedence::{precedence_of, InfixOp, LOWEST_PREC};

/// Tokens of the source language.
///
/// Literal tokens keep their raw text; numeric and escape decoding happens in
/// the parser so a bad literal can be reported with its span.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // ==================== Keywords ====================
    #[token("int")]
    KwInt,
    #[token("char")]
    KwChar,
    #[token("float")]
    KwFloat,
    #[token("void")]
    KwVoid,
    #[token("const")]
    KwConst,
    #[token("struct")]
    KwStruct,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("while")]
    KwWhile,
    #[token("do")]
    KwDo,
    #[token("for")]
    KwFor,
    #[token("return")]
    KwReturn,
    #[token("break")]
    KwBreak,
    #[token("continue")]
    KwContinue,

    // ==================== Literals ====================
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    /// Decimal, hex (0x...) or octal (0...) integer literal
    #[regex(r"0[xX][0-9a-fA-F]+|[0-9]+")]
    IntLiteral,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?|\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+")]
    FloatLiteral,
    #[regex(r"'(\\.|[^'\\\n])'")]
    CharLiteral,
    #[regex(r#""(\\.|[^"\\\n])*""#)]
    StringLiteral,

    // ==================== Delimiters ====================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // ==================== Operators ====================
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,

    /// Start of a block comment; the lexer scans to the matching `*/`.
    #[token("/*")]
    BlockCommentStart,
}

impl Token {
    /// True for tokens that can begin a type specifier.
    pub fn starts_type(&self) -> bool {
        matches!(
            self,
            Token::KwInt
                | Token::KwChar
                | Token::KwFloat
                | Token::KwVoid
                | Token::KwConst
                | Token::KwStruct
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos::Logos;

    fn lex_kinds(source: &str) -> Vec<Token> {
        Token::lexer(source).map(|t| t.unwrap()).collect()
    }

    #[test]
    fn test_keywords_and_idents() {
        assert_eq!(
            lex_kinds("int x while whilex"),
            vec![Token::KwInt, Token::Identifier, Token::KwWhile, Token::Identifier]
        );
    }

    #[test]
    fn test_numeric_literals() {
        assert_eq!(lex_kinds("42 0x1f 077"), vec![Token::IntLiteral; 3]);
        assert_eq!(
            lex_kinds("3.14 .5 1e9 2.5e-3"),
            vec![Token::FloatLiteral; 4]
        );
    }

    #[test]
    fn test_compound_operators() {
        assert_eq!(
            lex_kinds("<<= << <= <"),
            vec![Token::ShlEq, Token::Shl, Token::Le, Token::Lt]
        );
        assert_eq!(
            lex_kinds("++ += +"),
            vec![Token::PlusPlus, Token::PlusEq, Token::Plus]
        );
    }

    #[test]
    fn test_char_and_string() {
        assert_eq!(
            lex_kinds(r#"'a' '\n' "hi\"there""#),
            vec![Token::CharLiteral, Token::CharLiteral, Token::StringLiteral]
        );
    }

    #[test]
    fn test_line_comment_skipped() {
        assert_eq!(lex_kinds("1 // comment\n2"), vec![Token::IntLiteral; 2]);
    }
}
