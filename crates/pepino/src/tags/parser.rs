//! Recursive-descent parser over the tag lexemes.

use super::ast::{Expr, TagExprError};
use super::lexer::{Lexeme, Spanned};

pub(super) struct Parser<'t> {
    tokens: &'t [Spanned],
    pos: usize,
    end: usize,
}

impl<'t> Parser<'t> {
    /// `end` is the input length, reported when the expression stops short.
    pub(super) fn new(tokens: &'t [Spanned], end: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
        }
    }

    /// Parse a complete expression, rejecting trailing input.
    pub(super) fn parse(mut self) -> Result<Expr, TagExprError> {
        let expr = self.or()?;
        if let Some(token) = self.peek() {
            return Err(TagExprError::new(
                token.offset,
                format!("unexpected {}", token.lexeme.describe()),
            ));
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&'t Spanned> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, lexeme: &Lexeme) -> bool {
        if self.peek().is_some_and(|token| &token.lexeme == lexeme) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Expr, TagExprError> {
        let mut node = self.and()?;
        while self.eat(&Lexeme::Or) {
            let rhs = self.operand_after("or", Self::and)?;
            node = Expr::Or(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn and(&mut self) -> Result<Expr, TagExprError> {
        let mut node = self.not()?;
        while self.eat(&Lexeme::And) {
            let rhs = self.operand_after("and", Self::not)?;
            node = Expr::And(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn operand_after(
        &mut self,
        operator: &str,
        parse: fn(&mut Self) -> Result<Expr, TagExprError>,
    ) -> Result<Expr, TagExprError> {
        let offset = match self.peek() {
            None => self.end,
            Some(token) if matches!(token.lexeme, Lexeme::And | Lexeme::Or | Lexeme::Close) => {
                token.offset
            }
            Some(_) => return parse(self),
        };
        Err(TagExprError::new(
            offset,
            format!("expected tag or '(' after '{operator}'"),
        ))
    }

    fn not(&mut self) -> Result<Expr, TagExprError> {
        if self.eat(&Lexeme::Not) {
            let inner = self.not()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, TagExprError> {
        let Some(token) = self.peek() else {
            return Err(TagExprError::new(self.end, "expected tag or '('"));
        };
        match &token.lexeme {
            Lexeme::Tag(tag) => {
                self.pos += 1;
                Ok(Expr::Tag(tag.clone()))
            }
            Lexeme::Open => {
                self.pos += 1;
                let inner = self.or()?;
                if self.eat(&Lexeme::Close) {
                    Ok(inner)
                } else {
                    Err(TagExprError::new(token.offset, "missing ')'"))
                }
            }
            other => Err(TagExprError::new(
                token.offset,
                format!("expected tag or '(' but found {}", other.describe()),
            )),
        }
    }
}
