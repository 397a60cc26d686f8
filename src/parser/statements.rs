//! Statement parsing.

use crate::ast::{Expr, ExprKind, Stmt, StmtKind};
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};
use super::precedence::Precedence;

impl Parser {
    pub(crate) fn statement(&mut self) -> ParseResult<Stmt> {
        match &self.peek().kind {
            TokenKind::Semicolon => {
                let span = self.current_span();
                self.advance();
                Ok(Stmt::new(StmtKind::Empty, span))
            }
            TokenKind::LeftBrace => self.block_statement(),
            TokenKind::Var => self.var_statement(),
            _ => self.expression_statement(),
        }
    }

    fn block_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span();
        self.expect(&TokenKind::LeftBrace)?;

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        self.expect(&TokenKind::RightBrace)?;
        let span = start.merge(&self.previous_span());
        Ok(Stmt::new(StmtKind::Block(statements), span))
    }

    fn var_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span();
        self.expect(&TokenKind::Var)?;

        let mut declarations = Vec::new();
        loop {
            let (name, name_span) = self.expect_identifier()?;
            let target = Expr::new(ExprKind::Identifier(name), name_span);

            // `var x;` declares to undefined.
            let value = if self.match_token(&TokenKind::Equal) {
                self.parse_precedence(Precedence::Assignment)?
            } else {
                Expr::new(ExprKind::Undefined, name_span)
            };

            let span = name_span.merge(&value.span);
            declarations.push(Expr::new(
                ExprKind::Assign {
                    target: Box::new(target),
                    value: Box::new(value),
                },
                span,
            ));

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.match_token(&TokenKind::Semicolon);
        let span = start.merge(&self.previous_span());
        Ok(Stmt::new(StmtKind::Var { declarations }, span))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.match_token(&TokenKind::Semicolon);
        let span = expression.span.merge(&self.previous_span());
        Ok(Stmt::new(StmtKind::Expression(expression), span))
    }
}
