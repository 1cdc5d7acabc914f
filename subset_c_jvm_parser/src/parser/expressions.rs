//! Expression parsing: precedence climbing over the infix table, with
//! structural handling of assignment, the conditional operator, prefix and
//! postfix forms.

use super::Parser;
use crate::ast::{AssignOp, Expr, TypeSpec, UnaryOp};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{unescape_char, unescape_string};
use crate::span::Span;
use crate::token::{precedence_of, InfixOp, Token, LOWEST_PREC};

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_assignment()
    }

    /// Assignment is right-associative and parsed structurally: any
    /// conditional expression may appear on the left, the checker validates
    /// lvalue shape.
    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let target = self.parse_ternary()?;
        let Some(op) = self.peek_kind().and_then(assign_op_of) else {
            return Ok(target);
        };
        self.advance()?;
        let value = self.parse_assignment()?;
        let span = target.span().merge(&value.span());
        Ok(Expr::Assign {
            id: self.fresh_id(),
            op,
            target: Box::new(target),
            value: Box::new(value),
            span,
        })
    }

    fn parse_ternary(&mut self) -> ParseResult<Expr> {
        let cond = self.parse_binary(LOWEST_PREC)?;
        if !self.eat(Token::Question) {
            return Ok(cond);
        }
        let then_expr = self.parse_expr()?;
        self.expect(Token::Colon, "':'")?;
        let else_expr = self.parse_ternary()?;
        let span = cond.span().merge(&else_expr.span());
        Ok(Expr::Ternary {
            id: self.fresh_id(),
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
            span,
        })
    }

    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let mut lhs = self.parse_unary()?;
        while let Some((prec, op)) = self.peek_kind().and_then(precedence_of) {
            if prec < min_prec {
                break;
            }
            self.advance()?;
            let rhs = self.parse_binary(prec + 1)?;
            let span = lhs.span().merge(&rhs.span());
            lhs = match op {
                InfixOp::Bin(bin) => Expr::Binary {
                    id: self.fresh_id(),
                    op: bin,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                    span,
                },
                InfixOp::LogicalAnd => Expr::Logical {
                    id: self.fresh_id(),
                    op: crate::ast::LogicalOp::And,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                    span,
                },
                InfixOp::LogicalOr => Expr::Logical {
                    id: self.fresh_id(),
                    op: crate::ast::LogicalOp::Or,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                    span,
                },
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let prefix = match self.peek_kind() {
            Some(Token::Plus) => Some(UnaryOp::Plus),
            Some(Token::Minus) => Some(UnaryOp::Neg),
            Some(Token::Bang) => Some(UnaryOp::LogicalNot),
            Some(Token::Tilde) => Some(UnaryOp::BitNot),
            Some(Token::PlusPlus) => Some(UnaryOp::PreInc),
            Some(Token::MinusMinus) => Some(UnaryOp::PreDec),
            Some(Token::Amp) => Some(UnaryOp::Addr),
            Some(Token::Star) => Some(UnaryOp::Deref),
            _ => None,
        };
        if let Some(op) = prefix {
            let start = self.advance()?.span;
            let operand = self.parse_unary()?;
            let span = start.merge(&operand.span());
            return Ok(Expr::Unary {
                id: self.fresh_id(),
                op,
                operand: Box::new(operand),
                span,
            });
        }

        // Cast: `(` followed by a primitive type specifier.
        if self.peek_kind() == Some(Token::LParen)
            && matches!(
                self.peek_kind_at(1),
                Some(Token::KwInt | Token::KwChar | Token::KwFloat)
            )
        {
            let start = self.advance()?.span;
            let spec = match self.advance()?.token {
                Token::KwInt => TypeSpec::Int,
                Token::KwChar => TypeSpec::Char,
                _ => TypeSpec::Float,
            };
            self.expect(Token::RParen, "')'")?;
            let operand = self.parse_unary()?;
            let span = start.merge(&operand.span());
            return Ok(Expr::Cast {
                id: self.fresh_id(),
                spec,
                operand: Box::new(operand),
                span,
            });
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                Some(Token::LParen) => {
                    self.advance()?;
                    let mut args = Vec::new();
                    if self.peek_kind() != Some(Token::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if !self.eat(Token::Comma) {
                                break;
                            }
                        }
                    }
                    let end = self.expect(Token::RParen, "')'")?.span;
                    let span = expr.span().merge(&end);
                    expr = Expr::Call {
                        id: self.fresh_id(),
                        callee: Box::new(expr),
                        args,
                        span,
                    };
                }
                Some(Token::LBracket) => {
                    self.advance()?;
                    let index = self.parse_expr()?;
                    let end = self.expect(Token::RBracket, "']'")?.span;
                    let span = expr.span().merge(&end);
                    expr = Expr::Index {
                        id: self.fresh_id(),
                        array: Box::new(expr),
                        index: Box::new(index),
                        span,
                    };
                }
                Some(Token::Dot) => {
                    self.advance()?;
                    let field = self.expect(Token::Identifier, "member name")?;
                    let span = expr.span().merge(&field.span);
                    expr = Expr::Member {
                        id: self.fresh_id(),
                        object: Box::new(expr),
                        field: field.text.to_string(),
                        span,
                    };
                }
                Some(Token::PlusPlus) => {
                    let end = self.advance()?.span;
                    let span = expr.span().merge(&end);
                    expr = Expr::Unary {
                        id: self.fresh_id(),
                        op: UnaryOp::PostInc,
                        operand: Box::new(expr),
                        span,
                    };
                }
                Some(Token::MinusMinus) => {
                    let end = self.advance()?.span;
                    let span = expr.span().merge(&end);
                    expr = Expr::Unary {
                        id: self.fresh_id(),
                        op: UnaryOp::PostDec,
                        operand: Box::new(expr),
                        span,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let tok = self.advance()?;
        let span = tok.span;
        let expr = match tok.token {
            Token::IntLiteral => Expr::IntLit {
                id: self.fresh_id(),
                value: self.decode_int(tok.text, span)?,
                span,
            },
            Token::FloatLiteral => {
                let value = tok.text.parse::<f32>().map_err(|_| ParseError::InvalidNumber {
                    literal: tok.text.to_string(),
                    span,
                })?;
                Expr::FloatLit {
                    id: self.fresh_id(),
                    value,
                    span,
                }
            }
            Token::CharLiteral => Expr::CharLit {
                id: self.fresh_id(),
                value: unescape_char(&tok.text[1..tok.text.len() - 1], span)?,
                span,
            },
            Token::StringLiteral => Expr::StrLit {
                id: self.fresh_id(),
                value: unescape_string(&tok.text[1..tok.text.len() - 1], span)?,
                span,
            },
            Token::True => Expr::BoolLit {
                id: self.fresh_id(),
                value: true,
                span,
            },
            Token::False => Expr::BoolLit {
                id: self.fresh_id(),
                value: false,
                span,
            },
            Token::Identifier => Expr::Ident {
                id: self.fresh_id(),
                name: tok.text.to_string(),
                span,
            },
            Token::LParen => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen, "')'")?;
                inner
            }
            _ => {
                return Err(ParseError::unexpected_token(
                    tok.text,
                    "expression",
                    span,
                ))
            }
        };
        Ok(expr)
    }

    /// Decode an integer literal: decimal, `0x` hex or leading-zero octal.
    pub(crate) fn decode_int(&self, text: &str, span: Span) -> ParseResult<i64> {
        let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
        {
            i64::from_str_radix(hex, 16)
        } else if text.len() > 1 && text.starts_with('0') {
            i64::from_str_radix(&text[1..], 8)
        } else {
            text.parse::<i64>()
        };
        parsed.map_err(|_| ParseError::InvalidNumber {
            literal: text.to_string(),
            span,
        })
    }
}

fn assign_op_of(token: Token) -> Option<AssignOp> {
    let op = match token {
        Token::Eq => AssignOp::Assign,
        Token::PlusEq => AssignOp::Add,
        Token::MinusEq => AssignOp::Sub,
        Token::StarEq => AssignOp::Mul,
        Token::SlashEq => AssignOp::Div,
        Token::PercentEq => AssignOp::Mod,
        Token::AmpEq => AssignOp::BitAnd,
        Token::PipeEq => AssignOp::BitOr,
        Token::CaretEq => AssignOp::BitXor,
        Token::ShlEq => AssignOp::Shl,
        Token::ShrEq => AssignOp::Shr,
        _ => return None,
    };
    Some(op)
}
