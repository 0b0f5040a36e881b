//! Statement parsing.
//!
//! Handles function bodies: blocks, control flow, assignments, and local
//! declarations.

use glint_common::GlintResult;

use super::Parser;
use crate::ast::*;
use crate::token::TokenKind;

fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Assign => AssignOp::Assign,
        TokenKind::PlusAssign => AssignOp::Add,
        TokenKind::MinusAssign => AssignOp::Sub,
        TokenKind::StarAssign => AssignOp::Mul,
        TokenKind::SlashAssign => AssignOp::Div,
        TokenKind::PercentAssign => AssignOp::Rem,
        TokenKind::AmpAssign => AssignOp::BitAnd,
        TokenKind::PipeAssign => AssignOp::BitOr,
        TokenKind::CaretAssign => AssignOp::BitXor,
        TokenKind::ShlAssign => AssignOp::Shl,
        TokenKind::ShrAssign => AssignOp::Shr,
        _ => return None,
    };
    Some(op)
}

impl<'a> Parser<'a> {
    /// Parse a block: `{ stmt* }`.
    pub(crate) fn parse_block(&mut self) -> GlintResult<Block> {
        let open = self.expect_token(TokenKind::LBrace, "blocks start with a '{'")?;

        let mut stmts = Vec::new();
        while !self.at(&TokenKind::RBrace)? && !self.at(&TokenKind::Eof)? {
            stmts.push(self.parse_stmt()?);
        }

        let close = self.expect_token(TokenKind::RBrace, "this block needs a '}' here")?;
        Ok(Block {
            stmts,
            span: open.merge(&close),
        })
    }

    /// Parse one statement, including its trailing separator.
    pub(crate) fn parse_stmt(&mut self) -> GlintResult<Stmt> {
        match self.peek_kind(0)? {
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                self.expect_stmt_semi()?;
                Ok(Stmt::Block(block))
            }
            TokenKind::Const => {
                let decls = self.parse_decl(Self::parse_const_spec, "const")?;
                self.expect_stmt_semi()?;
                Ok(Stmt::Decl(decls))
            }
            TokenKind::Var => {
                let decls = self.parse_decl(Self::parse_var_spec, "var")?;
                self.expect_stmt_semi()?;
                Ok(Stmt::Decl(decls))
            }
            TokenKind::Type => {
                let decls = self.parse_decl(Self::parse_type_spec, "type")?;
                self.expect_stmt_semi()?;
                Ok(Stmt::Decl(decls))
            }
            TokenKind::Return => {
                let stmt = self.parse_return_stmt()?;
                self.expect_stmt_semi()?;
                Ok(stmt)
            }
            TokenKind::If => {
                let stmt = self.parse_if_stmt()?;
                self.expect_stmt_semi()?;
                Ok(Stmt::If(Box::new(stmt)))
            }
            TokenKind::For => {
                let stmt = self.parse_for_stmt()?;
                self.expect_stmt_semi()?;
                Ok(Stmt::For(Box::new(stmt)))
            }
            TokenKind::Break => {
                let span = self.get()?.span;
                self.expect_stmt_semi()?;
                Ok(Stmt::Break(span))
            }
            TokenKind::Continue => {
                let span = self.get()?.span;
                self.expect_stmt_semi()?;
                Ok(Stmt::Continue(span))
            }
            TokenKind::Go => {
                let go_span = self.get()?.span;
                let call = self.parse_expression()?;
                self.expect_stmt_semi()?;
                let span = go_span.merge(&call.span);
                Ok(Stmt::Go(GoStmt { call, span }))
            }
            TokenKind::Defer => {
                let defer_span = self.get()?.span;
                let call = self.parse_expression()?;
                self.expect_stmt_semi()?;
                let span = defer_span.merge(&call.span);
                Ok(Stmt::Defer(DeferStmt { call, span }))
            }
            TokenKind::Semi => {
                let span = self.get()?.span;
                Ok(Stmt::Empty(span))
            }
            _ => {
                let stmt = self.parse_simple_stmt()?;
                self.expect_stmt_semi()?;
                Ok(stmt)
            }
        }
    }

    /// Consume a statement separator. A statement may also end flush
    /// against the closing brace of its block.
    fn expect_stmt_semi(&mut self) -> GlintResult<()> {
        if self.eat(&TokenKind::Semi)? {
            return Ok(());
        }
        if self.at(&TokenKind::RBrace)? || self.at(&TokenKind::Eof)? {
            return Ok(());
        }
        let span = self.peek_span(0)?;
        Err(self.error(span, "I need a semicolon or a newline after this statement"))
    }

    /// Parse a simple statement: expression, assignment, short variable
    /// declaration, or increment/decrement. Does not consume the trailing
    /// separator, so the for-loop clauses can reuse it.
    fn parse_simple_stmt(&mut self) -> GlintResult<Stmt> {
        let exprs = self.parse_expression_list()?;
        let kind = self.peek_kind(0)?;

        // short variable declaration: x, y := a, b
        if kind == TokenKind::ColonAssign {
            self.get()?;
            let values = self.parse_expression_list()?;

            let mut names = Vec::new();
            for expr in exprs {
                match expr.kind {
                    ExprKind::Ident(id) => names.push(id),
                    _ => {
                        return Err(
                            self.error(expr.span, "only plain names can be declared with ':='")
                        )
                    }
                }
            }

            let span = names
                .iter()
                .map(|n| n.span)
                .chain(values.iter().map(|v| v.span))
                .reduce(|a, b| a.merge(&b))
                .unwrap_or_else(glint_common::SrcSpan::start_of_file);
            return Ok(Stmt::ShortVar(ShortVarDecl {
                names,
                values,
                span,
            }));
        }

        // assignment, plain or compound
        if let Some(op) = assign_op(&kind) {
            self.get()?;
            let right = self.parse_expression_list()?;

            let span = exprs
                .iter()
                .map(|e| e.span)
                .chain(right.iter().map(|e| e.span))
                .reduce(|a, b| a.merge(&b))
                .unwrap_or_else(glint_common::SrcSpan::start_of_file);
            return Ok(Stmt::Assign(Assignment {
                left: exprs,
                op,
                right,
                span,
            }));
        }

        // increment/decrement
        if kind == TokenKind::Inc || kind == TokenKind::Dec {
            let op_span = self.get()?.span;
            let mut exprs = exprs;
            let target = match (exprs.pop(), exprs.is_empty()) {
                (Some(target), true) => target,
                _ => {
                    return Err(
                        self.error(op_span, "'++' and '--' work on a single operand")
                    )
                }
            };
            let span = target.span.merge(&op_span);
            return Ok(Stmt::IncDec(IncDecStmt {
                target,
                is_inc: kind == TokenKind::Inc,
                span,
            }));
        }

        // a bare expression statement
        let mut exprs = exprs;
        match (exprs.pop(), exprs.is_empty()) {
            (Some(expr), true) => {
                let span = expr.span;
                Ok(Stmt::Expr(ExprStmt { expr, span }))
            }
            _ => {
                let span = self.peek_span(0)?;
                Err(self.error(span, "I wanted an assignment or a declaration here"))
            }
        }
    }

    /// Parse a return statement with optional values.
    fn parse_return_stmt(&mut self) -> GlintResult<Stmt> {
        let return_span = self.get()?.span;

        let values = if self.at(&TokenKind::Semi)? || self.at(&TokenKind::RBrace)? {
            Vec::new()
        } else {
            self.parse_expression_list()?
        };

        let span = values.iter().fold(return_span, |s, v| s.merge(&v.span));
        Ok(Stmt::Return(ReturnStmt { values, span }))
    }

    /// Parse an if statement with optional else-if chain.
    fn parse_if_stmt(&mut self) -> GlintResult<IfStmt> {
        // the caller peeked the 'if' keyword
        let if_span = self.get()?.span;

        let cond = self.parse_expression()?;
        let then_block = self.parse_block()?;
        let mut span = if_span.merge(&then_block.span);

        let else_arm = if self.eat(&TokenKind::Else)? {
            if self.at(&TokenKind::If)? {
                let nested = self.parse_if_stmt()?;
                span = span.merge(&nested.span);
                Some(ElseArm::If(Box::new(nested)))
            } else {
                let block = self.parse_block()?;
                span = span.merge(&block.span);
                Some(ElseArm::Block(block))
            }
        } else {
            None
        };

        Ok(IfStmt {
            cond,
            then_block,
            else_arm,
            span,
        })
    }

    /// Parse a for statement in any of its clause forms.
    fn parse_for_stmt(&mut self) -> GlintResult<ForStmt> {
        // the caller peeked the 'for' keyword
        let for_span = self.get()?.span;

        let clause = if self.at(&TokenKind::LBrace)? {
            ForClause::Infinite
        } else if self.at(&TokenKind::Semi)? {
            self.parse_for_three(None)?
        } else {
            let first = self.parse_simple_stmt()?;
            if self.at(&TokenKind::Semi)? {
                self.parse_for_three(Some(Box::new(first)))?
            } else {
                // a single clause must be the loop condition
                match first {
                    Stmt::Expr(e) => ForClause::Cond(e.expr),
                    other => {
                        return Err(
                            self.error(other.span(), "this loop needs a condition expression here")
                        )
                    }
                }
            }
        };

        let body = self.parse_block()?;
        let span = for_span.merge(&body.span);
        Ok(ForStmt { clause, body, span })
    }

    /// Parse the rest of a three-clause for: `init ; cond ; post`.
    fn parse_for_three(&mut self, init: Option<Box<Stmt>>) -> GlintResult<ForClause> {
        self.expect_token(
            TokenKind::Semi,
            "the clauses of a 'for' are separated by semicolons",
        )?;

        let cond = if self.at(&TokenKind::Semi)? {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_token(
            TokenKind::Semi,
            "the clauses of a 'for' are separated by semicolons",
        )?;

        let post = if self.at(&TokenKind::LBrace)? {
            None
        } else {
            Some(Box::new(self.parse_simple_stmt()?))
        };

        Ok(ForClause::Three { init, cond, post })
    }
}
