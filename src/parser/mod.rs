//! Parser for frond source code.

pub mod ast;

use crate::error::{ParseError, Result};
use crate::lexer::{Scanner, Span, Spanned, Token};
use ast::*;

/// Parse a source string into a program.
pub fn parse(source: &str) -> Result<Program> {
    let tokens = Scanner::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}

/// The parser for frond source code.
pub struct Parser {
    tokens: Vec<Spanned<Token>>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned<Token>>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse the entire program.
    pub fn parse_program(&mut self) -> Result<Program> {
        let start = self.current_span().start;
        let mut decls = Vec::new();

        while !self.is_at_end() {
            decls.push(self.parse_decl()?);
        }

        let end = decls.last().map_or(start, |d| d.span().end);

        Ok(Program {
            decls,
            span: Span::new(start, end),
        })
    }

    fn parse_decl(&mut self) -> Result<Decl> {
        // `name = expr` is a binding; anything else is a bare expression.
        if let Token::Ident(name) = self.current().clone() {
            if self.peek_next() == Some(&Token::Equals) {
                let start = self.current_span();
                self.advance(); // name
                self.advance(); // =
                let value = self.parse_expr()?;
                let span = start.merge(value.span());
                return Ok(Decl::Bind { name, value, span });
            }
        }

        Ok(Decl::Expr(self.parse_expr()?))
    }

    // ========== Expression Parsing ==========

    pub fn parse_expr(&mut self) -> Result<Expr> {
        match self.current() {
            Token::Backslash => self.parse_lambda(),
            Token::When => self.parse_match(),
            _ => self.parse_bind(),
        }
    }

    fn parse_lambda(&mut self) -> Result<Expr> {
        let start = self.current_span();
        self.expect(Token::Backslash)?;

        let mut params = Vec::new();
        if self.check(&Token::LParen) {
            self.advance();
            loop {
                params.push(self.expect_ident()?);
                if self.check(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            self.expect(Token::RParen)?;
        } else {
            params.push(self.expect_ident()?);
        }

        self.expect(Token::Arrow)?;
        let body = self.parse_expr()?;
        let span = start.merge(body.span());

        Ok(Expr::Lam {
            params,
            body: Box::new(body),
            span,
        })
    }

    fn parse_match(&mut self) -> Result<Expr> {
        let start = self.current_span();
        self.expect(Token::When)?;
        let scrutinee = self.parse_bind()?;
        self.expect(Token::Is)?;

        let mut cases = Vec::new();
        loop {
            let pattern = self.parse_pattern()?;
            if !matches!(pattern, Pattern::Cons { .. }) {
                return Err(ParseError::CaseNotATag {
                    span: pattern.span(),
                }
                .into());
            }
            self.expect(Token::Arrow)?;
            let body = self.parse_expr()?;
            cases.push(MatchCase { pattern, body });

            if self.check(&Token::Comma) {
                self.advance();
            } else {
                break;
            }
        }

        let otherwise = if self.check(&Token::Else) {
            self.advance();
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };

        let end = otherwise
            .as_ref()
            .map(|e| e.span())
            .unwrap_or_else(|| cases.last().map(|c| c.body.span()).unwrap_or(start));
        let span = start.merge(end);

        Ok(Expr::Match {
            scrutinee: Box::new(scrutinee),
            cases,
            otherwise,
            span,
        })
    }

    /// Lowest-precedence operator tier: `&>`.
    fn parse_bind(&mut self) -> Result<Expr> {
        let mut left = self.parse_concat()?;
        while self.check(&Token::AmpGt) {
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_concat()?;
            left = Self::binary("&>", op_span, left, right);
        }
        Ok(left)
    }

    /// `^` and `++`.
    fn parse_concat(&mut self) -> Result<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let name = match self.current() {
                Token::Caret => "^",
                Token::PlusPlus => "++",
                _ => break,
            };
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_additive()?;
            left = Self::binary(name, op_span, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_mult()?;
        while self.check(&Token::Plus) {
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_mult()?;
            left = Self::binary("+", op_span, left, right);
        }
        Ok(left)
    }

    fn parse_mult(&mut self) -> Result<Expr> {
        let mut left = self.parse_postfix()?;
        while self.check(&Token::Star) {
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_postfix()?;
            left = Self::binary("*", op_span, left, right);
        }
        Ok(left)
    }

    fn binary(name: &str, op_span: Span, left: Expr, right: Expr) -> Expr {
        let span = left.span().merge(right.span());
        Expr::App {
            func: Box::new(Expr::Id {
                name: name.to_string(),
                span: op_span,
            }),
            args: vec![left, right],
            span,
        }
    }

    /// Application and field access.
    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.current() {
                Token::LParen => {
                    self.advance();
                    let mut args = Vec::new();
                    if !self.check(&Token::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if self.check(&Token::Comma) {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    let close = self.current_span();
                    self.expect(Token::RParen)?;
                    let span = expr.span().merge(close);
                    expr = Expr::App {
                        func: Box::new(expr),
                        args,
                        span,
                    };
                }
                Token::Dot => {
                    self.advance();
                    let prop_span = self.current_span();
                    let prop = self.expect_ident()?;
                    let span = expr.span().merge(prop_span);
                    expr = Expr::Acc {
                        expr: Box::new(expr),
                        prop,
                        span,
                    };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let span = self.current_span();

        match self.current().clone() {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::Lit {
                    value: Literal::Number(n),
                    span,
                })
            }
            Token::String(s) => {
                self.advance();
                Ok(Expr::Lit {
                    value: Literal::String(s),
                    span,
                })
            }
            Token::Ident(name) => {
                self.advance();
                Ok(Expr::Id { name, span })
            }
            Token::Tag(name) => {
                self.advance();
                let (payload, span) = self.parse_tag_payload(&name, span, Self::parse_expr)?;
                Ok(Expr::Cons {
                    name,
                    payload: payload.map(Box::new),
                    span,
                })
            }
            Token::LBrace => self.parse_record(),
            Token::LBracket => self.parse_list(),
            Token::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::Backslash => self.parse_lambda(),
            Token::When => self.parse_match(),
            token => Err(self.unexpected(&token, "an expression")),
        }
    }

    /// Parse the optional `(payload)` after a tag name. Shared between
    /// expressions and patterns via the `parse_inner` callback.
    fn parse_tag_payload<T>(
        &mut self,
        name: &str,
        start: Span,
        parse_inner: fn(&mut Self) -> Result<T>,
    ) -> Result<(Option<T>, Span)> {
        if !self.check(&Token::LParen) {
            return Ok((None, start));
        }

        self.advance();
        let payload = parse_inner(self)?;
        if self.check(&Token::Comma) {
            return Err(ParseError::TagPayloadArity {
                name: name.to_string(),
                span: self.current_span(),
            }
            .into());
        }
        let close = self.current_span();
        self.expect(Token::RParen)?;

        Ok((Some(payload), start.merge(close)))
    }

    fn parse_record(&mut self) -> Result<Expr> {
        let start = self.current_span();
        self.expect(Token::LBrace)?;

        let mut fields: Vec<(String, Expr)> = Vec::new();
        if !self.check(&Token::RBrace) {
            loop {
                let key_span = self.current_span();
                let key = self.expect_ident()?;
                if fields.iter().any(|(k, _)| *k == key) {
                    return Err(ParseError::DuplicateKey {
                        name: key,
                        span: key_span,
                    }
                    .into());
                }
                self.expect(Token::Colon)?;
                let value = self.parse_expr()?;
                fields.push((key, value));

                if self.check(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let close = self.current_span();
        self.expect(Token::RBrace)?;

        Ok(Expr::Rec {
            fields,
            span: start.merge(close),
        })
    }

    fn parse_list(&mut self) -> Result<Expr> {
        let start = self.current_span();
        self.expect(Token::LBracket)?;

        let mut items = Vec::new();
        if !self.check(&Token::RBracket) {
            loop {
                items.push(self.parse_expr()?);
                if self.check(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let close = self.current_span();
        self.expect(Token::RBracket)?;

        Ok(Expr::List {
            items,
            span: start.merge(close),
        })
    }

    // ========== Pattern Parsing ==========

    fn parse_pattern(&mut self) -> Result<Pattern> {
        let span = self.current_span();

        match self.current().clone() {
            Token::Number(n) => {
                self.advance();
                Ok(Pattern::Lit {
                    value: Literal::Number(n),
                    span,
                })
            }
            Token::String(s) => {
                self.advance();
                Ok(Pattern::Lit {
                    value: Literal::String(s),
                    span,
                })
            }
            Token::Ident(name) => {
                self.advance();
                Ok(Pattern::Id { name, span })
            }
            Token::Tag(name) => {
                self.advance();
                let (payload, span) = self.parse_tag_payload(&name, span, Self::parse_pattern)?;
                Ok(Pattern::Cons {
                    name,
                    payload: payload.map(Box::new),
                    span,
                })
            }
            Token::LBrace => self.parse_record_pattern(),
            Token::LBracket => self.parse_list_pattern(),
            token => Err(self.unexpected(&token, "a pattern")),
        }
    }

    fn parse_record_pattern(&mut self) -> Result<Pattern> {
        let start = self.current_span();
        self.expect(Token::LBrace)?;

        let mut fields: Vec<(String, Pattern)> = Vec::new();
        if !self.check(&Token::RBrace) {
            loop {
                let key_span = self.current_span();
                let key = self.expect_ident()?;
                if fields.iter().any(|(k, _)| *k == key) {
                    return Err(ParseError::DuplicateKey {
                        name: key,
                        span: key_span,
                    }
                    .into());
                }
                self.expect(Token::Colon)?;
                let pat = self.parse_pattern()?;
                fields.push((key, pat));

                if self.check(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let close = self.current_span();
        self.expect(Token::RBrace)?;

        Ok(Pattern::Rec {
            fields,
            span: start.merge(close),
        })
    }

    fn parse_list_pattern(&mut self) -> Result<Pattern> {
        let start = self.current_span();
        self.expect(Token::LBracket)?;

        let mut items = Vec::new();
        if !self.check(&Token::RBracket) {
            loop {
                items.push(self.parse_pattern()?);
                if self.check(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let close = self.current_span();
        self.expect(Token::RBracket)?;

        Ok(Pattern::List {
            items,
            span: start.merge(close),
        })
    }

    // ========== Token Helpers ==========

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].value
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos.min(self.tokens.len() - 1)].span
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|t| &t.value)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn check(&self, token: &Token) -> bool {
        self.current() == token
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        if self.check(&token) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&self.current().clone(), &format!("'{}'", token)))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.current().clone() {
            Token::Ident(name) => {
                self.advance();
                Ok(name)
            }
            token => Err(self.unexpected(&token, "an identifier")),
        }
    }

    fn unexpected(&self, found: &Token, expected: &str) -> crate::error::FrondError {
        let span = self.current_span();
        if matches!(found, Token::Eof) {
            ParseError::UnexpectedEof { span }.into()
        } else {
            ParseError::UnexpectedToken {
                found: found.to_string(),
                expected: expected.to_string(),
                span,
            }
            .into()
        }
    }
}
