//! Declarations: type specifiers, variables, functions and structs.

use super::Parser;
use crate::ast::{ArrayLen, Block, Decl, Function, Item, StructDef, TypeSpec};
use crate::error::{ParseError, ParseResult};
use crate::token::Token;

impl<'a> Parser<'a> {
    /// Parse one top-level item; multi-declarator lines append several.
    pub(crate) fn parse_item(&mut self, items: &mut Vec<Item>) -> ParseResult<()> {
        if self.at_struct_definition() {
            let def = self.parse_struct_def()?;
            items.push(Item::Struct(def));
            return Ok(());
        }

        let start = self.current_span();
        let is_const = self.eat(Token::KwConst);
        let spec = self.parse_base_spec()?;
        let name_tok = self.expect(Token::Identifier, "identifier")?;
        let name = name_tok.text.to_string();

        if self.peek_kind() == Some(Token::LParen) {
            let func = self.parse_function_rest(spec, name, start)?;
            items.push(Item::Function(func));
        } else {
            let decls = self.parse_declarators(spec, is_const, name, start)?;
            items.extend(decls.into_iter().map(Item::Decl));
        }
        Ok(())
    }

    /// `struct` followed by a name and `{` introduces a definition;
    /// otherwise it is the specifier of a variable declaration.
    pub(crate) fn at_struct_definition(&self) -> bool {
        self.peek_kind() == Some(Token::KwStruct)
            && self.peek_kind_at(1) == Some(Token::Identifier)
            && self.peek_kind_at(2) == Some(Token::LBrace)
    }

    /// Base type specifier: `int`, `char`, `float`, `void` or `struct Name`.
    pub(crate) fn parse_base_spec(&mut self) -> ParseResult<TypeSpec> {
        let tok = self.advance()?;
        let spec = match tok.token {
            Token::KwInt => TypeSpec::Int,
            Token::KwChar => TypeSpec::Char,
            Token::KwFloat => TypeSpec::Float,
            Token::KwVoid => TypeSpec::Void,
            Token::KwStruct => {
                let name = self.expect(Token::Identifier, "struct name")?;
                TypeSpec::Struct(name.text.to_string())
            }
            _ => {
                return Err(ParseError::unexpected_token(
                    tok.text,
                    "type specifier",
                    tok.span,
                ))
            }
        };
        Ok(spec)
    }

    /// Declarator list after the first name has been read:
    /// `x[10] = init, y, z = 3;`
    fn parse_declarators(
        &mut self,
        spec: TypeSpec,
        is_const: bool,
        first_name: String,
        start: crate::span::Span,
    ) -> ParseResult<Vec<Decl>> {
        let mut decls = Vec::new();
        let mut name = first_name;
        loop {
            let array = self.parse_array_suffix()?;
            let init = if self.eat(Token::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            let end = init
                .as_ref()
                .map(|e| e.span())
                .unwrap_or_else(|| self.current_span());
            decls.push(Decl {
                id: self.fresh_id(),
                name,
                spec: spec.clone(),
                is_const,
                array,
                init,
                span: start.merge(&end),
            });
            if !self.eat(Token::Comma) {
                break;
            }
            name = self.expect(Token::Identifier, "identifier")?.text.to_string();
        }
        self.expect(Token::Semicolon, "';'")?;
        Ok(decls)
    }

    /// A single-declarator declaration (used by `for` initializers).
    pub(crate) fn parse_single_decl(&mut self) -> ParseResult<Decl> {
        let start = self.current_span();
        let is_const = self.eat(Token::KwConst);
        let spec = self.parse_base_spec()?;
        let name = self.expect(Token::Identifier, "identifier")?.text.to_string();
        let array = self.parse_array_suffix()?;
        let init = if self.eat(Token::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(Token::Semicolon, "';'")?;
        Ok(Decl {
            id: self.fresh_id(),
            name,
            spec,
            is_const,
            array,
            init,
            span: start,
        })
    }

    /// Declaration statements inside a block; one source line may produce
    /// several `Decl`s.
    pub(crate) fn parse_decl_stmts(&mut self) -> ParseResult<Vec<Decl>> {
        let start = self.current_span();
        let is_const = self.eat(Token::KwConst);
        let spec = self.parse_base_spec()?;
        let name = self.expect(Token::Identifier, "identifier")?.text.to_string();
        self.parse_declarators(spec, is_const, name, start)
    }

    fn parse_array_suffix(&mut self) -> ParseResult<Option<ArrayLen>> {
        if !self.eat(Token::LBracket) {
            return Ok(None);
        }
        if self.eat(Token::RBracket) {
            return Ok(Some(ArrayLen::Unspecified));
        }
        let size_tok = self.expect(Token::IntLiteral, "array size")?;
        let size = self.decode_int(size_tok.text, size_tok.span)?;
        self.expect(Token::RBracket, "']'")?;
        Ok(Some(ArrayLen::Fixed(size as u32)))
    }

    // ==================== Functions ====================

    fn parse_function_rest(
        &mut self,
        return_spec: TypeSpec,
        name: String,
        start: crate::span::Span,
    ) -> ParseResult<Function> {
        self.expect(Token::LParen, "'('")?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let span = start.merge(&body.span);
        Ok(Function {
            id: self.fresh_id(),
            name,
            return_spec,
            params,
            body,
            span,
        })
    }

    fn parse_params(&mut self) -> ParseResult<Vec<Decl>> {
        let mut params = Vec::new();
        if self.eat(Token::RParen) {
            return Ok(params);
        }
        // `f(void)` declares an empty parameter list.
        if self.peek_kind() == Some(Token::KwVoid) && self.peek_kind_at(1) == Some(Token::RParen) {
            self.advance()?;
            self.advance()?;
            return Ok(params);
        }
        loop {
            let start = self.current_span();
            let is_const = self.eat(Token::KwConst);
            let spec = self.parse_base_spec()?;
            let name = self.expect(Token::Identifier, "parameter name")?.text.to_string();
            let array = self.parse_array_suffix()?;
            params.push(Decl {
                id: self.fresh_id(),
                name,
                spec,
                is_const,
                array,
                init: None,
                span: start,
            });
            if !self.eat(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen, "')'")?;
        Ok(params)
    }

    // ==================== Structs ====================

    pub(crate) fn parse_struct_def(&mut self) -> ParseResult<StructDef> {
        let start = self.expect(Token::KwStruct, "'struct'")?.span;
        let name = self.expect(Token::Identifier, "struct name")?.text.to_string();
        self.expect(Token::LBrace, "'{'")?;
        let mut members = Vec::new();
        while self.peek_kind() != Some(Token::RBrace) {
            let mut decls = self.parse_decl_stmts()?;
            members.append(&mut decls);
        }
        let end = self.expect(Token::RBrace, "'}'")?.span;
        self.expect(Token::Semicolon, "';'")?;
        Ok(StructDef {
            id: self.fresh_id(),
            name,
            members,
            span: start.merge(&end),
        })
    }

    pub(crate) fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.expect(Token::LBrace, "'{'")?.span;
        let mut stmts = Vec::new();
        while self.peek_kind() != Some(Token::RBrace) {
            if self.at_eof() {
                return Err(ParseError::unexpected_eof("'}'", self.current_span()));
            }
            self.parse_block_entry(&mut stmts)?;
        }
        let end = self.expect(Token::RBrace, "'}'")?.span;
        Ok(Block {
            stmts,
            span: start.merge(&end),
        })
    }
}
