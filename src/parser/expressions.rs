//! Expression parsing using Pratt precedence.

use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::error::ParserError;
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};
use super::precedence::{get_precedence, Precedence};

impl Parser {
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.parse_precedence(Precedence::Assignment)
    }

    pub(crate) fn parse_precedence(&mut self, min_precedence: Precedence) -> ParseResult<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.is_at_end() {
            let precedence = get_precedence(&self.peek().kind);
            if precedence < min_precedence {
                break;
            }

            left = self.parse_infix(left, precedence)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        if self.is_at_end() {
            return Err(ParserError::UnexpectedEof(self.current_span()));
        }

        let token = self.advance();
        let start_span = token.span;

        match &token.kind {
            TokenKind::NumberLiteral { lexeme, value } => Ok(Expr::new(
                ExprKind::NumberLiteral {
                    lexeme: lexeme.clone(),
                    value: *value,
                },
                start_span,
            )),
            TokenKind::StringLiteral(s) => {
                Ok(Expr::new(ExprKind::StringLiteral(s.clone()), start_span))
            }
            TokenKind::BoolLiteral(b) => Ok(Expr::new(ExprKind::BoolLiteral(*b), start_span)),
            TokenKind::Null => Ok(Expr::new(ExprKind::Null, start_span)),
            TokenKind::Undefined => Ok(Expr::new(ExprKind::Undefined, start_span)),

            TokenKind::Identifier(name) => {
                Ok(Expr::new(ExprKind::Identifier(name.clone()), start_span))
            }

            TokenKind::LeftParen => {
                let expr = self.expression()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(expr)
            }

            TokenKind::Minus => {
                let right = self.parse_precedence(Precedence::Unary)?;
                let span = start_span.merge(&right.span);
                Ok(Expr::new(
                    ExprKind::Prefix {
                        op: UnaryOp::Negate,
                        right: Box::new(right),
                    },
                    span,
                ))
            }

            TokenKind::Plus => {
                let right = self.parse_precedence(Precedence::Unary)?;
                let span = start_span.merge(&right.span);
                Ok(Expr::new(
                    ExprKind::Prefix {
                        op: UnaryOp::Plus,
                        right: Box::new(right),
                    },
                    span,
                ))
            }

            kind => Err(ParserError::unexpected_token(
                "expression",
                format!("{}", kind),
                start_span,
            )),
        }
    }

    fn parse_infix(&mut self, left: Expr, precedence: Precedence) -> ParseResult<Expr> {
        let token = self.advance();

        match &token.kind {
            TokenKind::Equal => {
                if !matches!(left.kind, ExprKind::Identifier(_)) {
                    return Err(ParserError::InvalidAssignmentTarget(left.span));
                }
                // Right-associative: re-enter at assignment level.
                let value = self.parse_precedence(Precedence::Assignment)?;
                let span = left.span.merge(&value.span);
                Ok(Expr::new(
                    ExprKind::Assign {
                        target: Box::new(left),
                        value: Box::new(value),
                    },
                    span,
                ))
            }

            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent => {
                let op = match &token.kind {
                    TokenKind::Plus => BinaryOp::Add,
                    TokenKind::Minus => BinaryOp::Subtract,
                    TokenKind::Star => BinaryOp::Multiply,
                    TokenKind::Slash => BinaryOp::Divide,
                    _ => BinaryOp::Modulo,
                };
                let right = self.parse_precedence(precedence.next())?;
                let span = left.span.merge(&right.span);
                Ok(Expr::new(
                    ExprKind::Infix {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    },
                    span,
                ))
            }

            kind => Err(ParserError::unexpected_token(
                "operator",
                format!("{}", kind),
                token.span,
            )),
        }
    }
}
