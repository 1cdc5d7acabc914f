//! Statement parsing.

use super::Parser;
use crate::ast::Stmt;
use crate::error::ParseResult;
use crate::token::Token;

impl<'a> Parser<'a> {
    /// One entry of a block: a declaration line (possibly several `Decl`s),
    /// a nested struct definition, or a statement.
    pub(crate) fn parse_block_entry(&mut self, stmts: &mut Vec<Stmt>) -> ParseResult<()> {
        if self.at_struct_definition() {
            let def = self.parse_struct_def()?;
            stmts.push(Stmt::Struct(def));
            return Ok(());
        }
        if self.peek_kind().is_some_and(|t| t.starts_type()) {
            let decls = self.parse_decl_stmts()?;
            stmts.extend(decls.into_iter().map(Stmt::Decl));
            return Ok(());
        }
        stmts.push(self.parse_stmt()?);
        Ok(())
    }

    /// A statement in any position (branch bodies included). Declarations
    /// are only accepted at block level, via [`Self::parse_block_entry`].
    pub(crate) fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match self.peek_kind() {
            Some(Token::LBrace) => Ok(Stmt::Block(self.parse_block()?)),
            Some(Token::KwIf) => self.parse_if(),
            Some(Token::KwWhile) => self.parse_while(),
            Some(Token::KwDo) => self.parse_do_while(),
            Some(Token::KwFor) => self.parse_for(),
            Some(Token::KwReturn) => self.parse_return(),
            Some(Token::KwBreak) => {
                let span = self.advance()?.span;
                self.expect(Token::Semicolon, "';'")?;
                Ok(Stmt::Break { span })
            }
            Some(Token::KwContinue) => {
                let span = self.advance()?.span;
                self.expect(Token::Semicolon, "';'")?;
                Ok(Stmt::Continue { span })
            }
            Some(Token::Semicolon) => {
                let span = self.advance()?.span;
                Ok(Stmt::Empty { span })
            }
            _ => {
                let expr = self.parse_expr()?;
                let span = expr.span();
                self.expect(Token::Semicolon, "';'")?;
                Ok(Stmt::Expr { expr, span })
            }
        }
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::KwIf, "'if'")?.span;
        self.expect(Token::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen, "')'")?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.eat(Token::KwElse) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        let end = else_branch
            .as_deref()
            .map(|s| s.span())
            .unwrap_or_else(|| then_branch.span());
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
            span: start.merge(&end),
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::KwWhile, "'while'")?.span;
        self.expect(Token::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen, "')'")?;
        let body = Box::new(self.parse_stmt()?);
        let span = start.merge(&body.span());
        Ok(Stmt::While { cond, body, span })
    }

    fn parse_do_while(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::KwDo, "'do'")?.span;
        let body = Box::new(self.parse_stmt()?);
        self.expect(Token::KwWhile, "'while'")?;
        self.expect(Token::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen, "')'")?;
        let end = self.expect(Token::Semicolon, "';'")?.span;
        Ok(Stmt::DoWhile {
            body,
            cond,
            span: start.merge(&end),
        })
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::KwFor, "'for'")?.span;
        self.expect(Token::LParen, "'('")?;

        let init = if self.eat(Token::Semicolon) {
            None
        } else if self.peek_kind().is_some_and(|t| t.starts_type()) {
            Some(Box::new(Stmt::Decl(self.parse_single_decl()?)))
        } else {
            let expr = self.parse_expr()?;
            let span = expr.span();
            self.expect(Token::Semicolon, "';'")?;
            Some(Box::new(Stmt::Expr { expr, span }))
        };

        let cond = if self.peek_kind() == Some(Token::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(Token::Semicolon, "';'")?;

        let post = if self.peek_kind() == Some(Token::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(Token::RParen, "')'")?;

        let body = Box::new(self.parse_stmt()?);
        let span = start.merge(&body.span());
        Ok(Stmt::For {
            init,
            cond,
            post,
            body,
            span,
        })
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::KwReturn, "'return'")?.span;
        if self.eat(Token::Semicolon) {
            return Ok(Stmt::Return {
                value: None,
                span: start,
            });
        }
        let value = self.parse_expr()?;
        let end = self.expect(Token::Semicolon, "';'")?.span;
        Ok(Stmt::Return {
            value: Some(value),
            span: start.merge(&end),
        })
    }
}
