//! Expression parsing using Pratt parsing.

use glint_common::GlintResult;

use super::Parser;
use crate::ast::*;
use crate::token::TokenKind;

/// Operator precedence levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest = 0,
    Or,      // ||
    And,     // &&
    Equals,  // == !=
    Compare, // < <= > >=
    Sum,     // + - | ^
    Shift,   // << >>
    Product, // * / % &
    Prefix,  // -x !x ^x *x &x <-x
    Postfix, // f(x) a.b
}

impl Precedence {
    fn from_token(kind: &TokenKind) -> Self {
        match kind {
            TokenKind::PipePipe => Precedence::Or,
            TokenKind::AmpAmp => Precedence::And,
            TokenKind::EqEq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq => {
                Precedence::Compare
            }
            TokenKind::Plus | TokenKind::Minus | TokenKind::Pipe | TokenKind::Caret => {
                Precedence::Sum
            }
            TokenKind::Shl | TokenKind::Shr => Precedence::Shift,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent | TokenKind::Amp => {
                Precedence::Product
            }
            TokenKind::LParen | TokenKind::Dot => Precedence::Postfix,
            _ => Precedence::Lowest,
        }
    }
}

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::AmpAmp => BinaryOp::LogAnd,
        TokenKind::PipePipe => BinaryOp::LogOr,
        _ => return None,
    };
    Some(op)
}

impl<'a> Parser<'a> {
    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> GlintResult<Expr> {
        self.parse_expression_prec(Precedence::Lowest)
    }

    /// Parse a comma-separated expression list.
    ///
    /// ExpressionList = Expression { "," Expression } .
    pub(crate) fn parse_expression_list(&mut self) -> GlintResult<Vec<Expr>> {
        let mut exprs = vec![self.parse_expression()?];
        while self.eat(&TokenKind::Comma)? {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }

    fn parse_expression_prec(&mut self, min_prec: Precedence) -> GlintResult<Expr> {
        let mut left = self.parse_prefix_expression()?;

        loop {
            let prec = Precedence::from_token(&self.lexer.peek_token(0)?.kind);
            if prec <= min_prec {
                break;
            }
            left = self.parse_infix_expression(left, prec)?;
        }

        Ok(left)
    }

    fn parse_prefix_expression(&mut self) -> GlintResult<Expr> {
        let tok = self.get()?;
        let span = tok.span;

        match tok.kind {
            TokenKind::Ident(name) => Ok(Expr {
                kind: ExprKind::Ident(Ident::new(name, span)),
                span,
            }),
            TokenKind::Int(v) => Ok(Expr {
                kind: ExprKind::Int(v),
                span,
            }),
            TokenKind::Float(v) => Ok(Expr {
                kind: ExprKind::Float(v),
                span,
            }),
            TokenKind::String(s) => Ok(Expr {
                kind: ExprKind::String(s),
                span,
            }),
            TokenKind::Rune(v) => Ok(Expr {
                kind: ExprKind::Rune(v),
                span,
            }),

            TokenKind::LParen => {
                let inner = self.parse_expression()?;
                let close =
                    self.expect_token(TokenKind::RParen, "this bracketed expression needs a ')' here")?;
                // grouping is transparent; only the span widens
                Ok(Expr {
                    kind: inner.kind,
                    span: span.merge(&close),
                })
            }

            TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Not
            | TokenKind::Caret
            | TokenKind::Star
            | TokenKind::Amp => {
                let op = match tok.kind {
                    TokenKind::Minus => UnaryOp::Neg,
                    TokenKind::Plus => UnaryOp::Pos,
                    TokenKind::Not => UnaryOp::Not,
                    TokenKind::Caret => UnaryOp::BitNot,
                    TokenKind::Star => UnaryOp::Deref,
                    _ => UnaryOp::Addr,
                };
                let operand = self.parse_expression_prec(Precedence::Prefix)?;
                let span = span.merge(&operand.span);
                Ok(Expr {
                    kind: ExprKind::Unary(Box::new(UnaryExpr { op, operand })),
                    span,
                })
            }

            TokenKind::Arrow => {
                // channel receive: <-ch
                let operand = self.parse_expression_prec(Precedence::Prefix)?;
                let span = span.merge(&operand.span);
                Ok(Expr {
                    kind: ExprKind::Receive(Box::new(operand)),
                    span,
                })
            }

            _ => Err(self.error(span, "I was hoping to find an expression here")),
        }
    }

    fn parse_infix_expression(&mut self, left: Expr, prec: Precedence) -> GlintResult<Expr> {
        let tok = self.get()?;
        let tok_span = tok.span;

        match tok.kind {
            // call expression
            TokenKind::LParen => {
                let (args, spread) = self.parse_call_arguments()?;
                let close =
                    self.expect_token(TokenKind::RParen, "this call needs a ')' to finish it off")?;
                let span = left.span.merge(&close);
                Ok(Expr {
                    kind: ExprKind::Call(Box::new(CallExpr {
                        func: left,
                        args,
                        spread,
                    })),
                    span,
                })
            }

            // selector: x.field
            TokenKind::Dot => {
                let sel_tok = self.get()?;
                match sel_tok.kind {
                    TokenKind::Ident(name) => {
                        let sel = Ident::new(name, sel_tok.span);
                        let span = left.span.merge(&sel_tok.span);
                        Ok(Expr {
                            kind: ExprKind::Selector(Box::new(SelectorExpr { expr: left, sel })),
                            span,
                        })
                    }
                    _ => Err(self.error(
                        sel_tok.span,
                        "if you could just put an identifier here that'd be greeeat",
                    )),
                }
            }

            kind => match binary_op(&kind) {
                Some(op) => {
                    let right = self.parse_expression_prec(prec)?;
                    let span = left.span.merge(&right.span);
                    Ok(Expr {
                        kind: ExprKind::Binary(Box::new(BinaryExpr { left, op, right })),
                        span,
                    })
                }
                // the precedence table only admits operators, so this is
                // out of reach; fail politely rather than panic
                None => Err(self.error(tok_span, "this operator can't be used here")),
            },
        }
    }

    fn parse_call_arguments(&mut self) -> GlintResult<(Vec<Expr>, bool)> {
        let mut args = Vec::new();
        let mut spread = false;

        if self.at(&TokenKind::RParen)? {
            return Ok((args, spread));
        }

        loop {
            args.push(self.parse_expression()?);

            if self.eat(&TokenKind::Ellipsis)? {
                spread = true;
                break;
            }
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }

        Ok((args, spread))
    }
}
