//! Declaration parsing.

use glint_common::{GlintResult, SrcSpan};

use super::Parser;
use crate::ast::*;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// Parse a top-level declaration, dispatched on the next token.
    ///
    /// TopLevelDecl = ConstDecl | TypeDecl | VarDecl | FunctionDecl .
    pub(crate) fn parse_top_level_decl(&mut self) -> GlintResult<Vec<Decl>> {
        match self.peek_kind(0)? {
            TokenKind::Const => self.parse_decl(Self::parse_const_spec, "const"),
            TokenKind::Type => self.parse_decl(Self::parse_type_spec, "type"),
            TokenKind::Var => self.parse_decl(Self::parse_var_spec, "var"),
            TokenKind::Func => Ok(vec![Decl::Func(self.parse_function_decl()?)]),
            _ => {
                let span = self.peek_span(0)?;
                Err(self.error(
                    span,
                    "so I wanted a top level thing like a type, a func, a const or a var, but no... you had to be different",
                ))
            }
        }
    }

    /// Parse a declaration. Used for const, type and var declarations
    /// since they're all fairly similar.
    ///
    /// ConstDecl = "const" ( ConstSpec | "(" { ConstSpec ";" } ")" ) .
    /// TypeDecl  = "type"  ( TypeSpec  | "(" { TypeSpec  ";" } ")" ) .
    /// VarDecl   = "var"   ( VarSpec   | "(" { VarSpec   ";" } ")" ) .
    pub(crate) fn parse_decl(
        &mut self,
        parse_spec: fn(&mut Self) -> GlintResult<Vec<Decl>>,
        verb: &str,
    ) -> GlintResult<Vec<Decl>> {
        // the caller peeked the declaration keyword
        self.get()?;

        if self.at(&TokenKind::LParen)? {
            self.parse_group(parse_spec, verb)
        } else {
            parse_spec(self)
        }
    }

    /// Parse a bracketed group of specs with a semicolon after each entry.
    fn parse_group(
        &mut self,
        parse_spec: fn(&mut Self) -> GlintResult<Vec<Decl>>,
        verb: &str,
    ) -> GlintResult<Vec<Decl>> {
        self.expect_token(TokenKind::LParen, "there should be a '(' here")?;
        let semi_message = format!("I really wanted a semicolon between these '{}'s", verb);

        let mut decls = Vec::new();
        loop {
            if self.at(&TokenKind::RParen)? {
                self.get()?;
                return Ok(decls);
            }
            decls.extend(parse_spec(self)?);
            self.expect_token(TokenKind::Semi, &semi_message)?;
        }
    }

    /// Parse a constant spec.
    ///
    /// ConstSpec = IdentifierList [ [ Type ] "=" ExpressionList ] .
    pub(crate) fn parse_const_spec(&mut self) -> GlintResult<Vec<Decl>> {
        let idents = self.parse_identifier_list("constant")?;
        let ty = self.parse_data_type()?;

        let values = if ty.is_some() || self.at(&TokenKind::Assign)? {
            // after a type the '=' and expression list are mandatory
            if !self.at(&TokenKind::Assign)? {
                let span = self.peek_span(0)?;
                return Err(self.error(span, "after a data type I expected to see '=' here"));
            }
            self.get()?;
            Some(self.parse_expression_list()?)
        } else {
            None
        };

        self.pair_bindings(idents, ty, values, |name, ty, value, span| {
            Decl::Const(ConstDecl {
                name,
                ty,
                value,
                span,
            })
        })
    }

    /// Parse a type declaration specification.
    ///
    /// TypeSpec = identifier Type .
    pub(crate) fn parse_type_spec(&mut self) -> GlintResult<Vec<Decl>> {
        let tok = self.get()?;
        let name = match tok.kind {
            TokenKind::Ident(name) => Ident::new(name, tok.span),
            _ => {
                return Err(
                    self.error(tok.span, "this should have been a name for a type, but it's not")
                )
            }
        };

        // the type is mandatory here
        let ty = match self.parse_data_type()? {
            Some(ty) => ty,
            None => {
                let span = self.peek_span(0)?;
                return Err(
                    self.error(span, "this should have been a name for a type, but it's not")
                );
            }
        };

        let span = name.span.merge(&ty.span);
        Ok(vec![Decl::Type(TypeDecl { name, ty, span })])
    }

    /// Parse a variable declaration specification.
    ///
    /// VarSpec = IdentifierList ( Type [ "=" ExpressionList ] | "=" ExpressionList ) .
    pub(crate) fn parse_var_spec(&mut self) -> GlintResult<Vec<Decl>> {
        let idents = self.parse_identifier_list("variable")?;
        let ty = self.parse_data_type()?;

        let values = if ty.is_some() {
            // optional initializer
            if self.eat(&TokenKind::Assign)? {
                Some(self.parse_expression_list()?)
            } else {
                None
            }
        } else {
            // without a type the initializer is required
            self.expect_token(TokenKind::Assign, "I was expecting to see an '=' here")?;
            Some(self.parse_expression_list()?)
        };

        self.pair_bindings(idents, ty, values, |name, ty, value, span| {
            Decl::Var(VarDecl {
                name,
                ty,
                value,
                span,
            })
        })
    }

    /// Expand an identifier list and optional expression list into one
    /// declaration per name, pairing identifier[i] with expression[i] and
    /// the shared type. The two lists must be the same length; a mismatch
    /// is reported over the whole identifier list.
    fn pair_bindings(
        &mut self,
        idents: Vec<Ident>,
        ty: Option<TypeName>,
        values: Option<Vec<Expr>>,
        make: fn(Ident, Option<TypeName>, Option<Expr>, SrcSpan) -> Decl,
    ) -> GlintResult<Vec<Decl>> {
        if let Some(values) = &values {
            let ident_span = idents
                .iter()
                .map(|i| i.span)
                .reduce(|a, b| a.merge(&b))
                .unwrap_or_else(SrcSpan::start_of_file);

            if idents.len() > values.len() {
                return Err(self.error(ident_span, "there are more names here than there are values"));
            } else if idents.len() < values.len() {
                return Err(self.error(ident_span, "there are less names here than there are values"));
            }
        }

        let mut value_iter = values.map(Vec::into_iter);
        let decls = idents
            .into_iter()
            .map(|name| {
                let value = value_iter.as_mut().and_then(|it| it.next());
                let mut span = name.span;
                if let Some(t) = &ty {
                    span = span.merge(&t.span);
                }
                if let Some(v) = &value {
                    span = span.merge(&v.span);
                }
                make(name, ty.clone(), value, span)
            })
            .collect();

        Ok(decls)
    }

    /// Parse a function or method declaration.
    ///
    /// FunctionDecl = "func" [ Receiver ] FunctionName Signature [ Block ] .
    pub(crate) fn parse_function_decl(&mut self) -> GlintResult<FuncDecl> {
        // the caller peeked the 'func' keyword
        let func_span = self.get()?.span;

        // an immediate '(' means a receiver
        let receiver = if self.at(&TokenKind::LParen)? {
            Some(self.parse_receiver()?)
        } else {
            None
        };

        let tok = self.get()?;
        let name = match tok.kind {
            TokenKind::Ident(name) => Ident::new(name, tok.span),
            _ => {
                return Err(
                    self.error(tok.span, "this should have been a function name, but it's not")
                )
            }
        };

        let (params, results) = self.parse_signature()?;

        // a '{' admits a function body; without one this is a forward
        // declaration
        let body = if self.at(&TokenKind::LBrace)? {
            Some(self.parse_block()?)
        } else {
            None
        };

        let span = func_span.merge(&name.span);
        Ok(FuncDecl {
            receiver,
            name,
            params,
            results,
            body,
            span,
        })
    }

    /// Parse a method receiver.
    ///
    /// Receiver     = "(" [ identifier ] [ "*" ] BaseTypeName ")" .
    /// BaseTypeName = identifier .
    fn parse_receiver(&mut self) -> GlintResult<Receiver> {
        let open = self.expect_token(
            TokenKind::LParen,
            "receivers start with an open bracket, but that's not what I'm seeing",
        )?;

        // a lone identifier before the ')' is the base type itself;
        // otherwise the first identifier binds the receiver variable
        let first_is_ident = matches!(self.lexer.peek_token(0)?.kind, TokenKind::Ident(_));
        let second_closes = matches!(self.lexer.peek_token(1)?.kind, TokenKind::RParen);

        let name = if first_is_ident && !second_closes {
            let tok = self.get()?;
            if let TokenKind::Ident(n) = tok.kind {
                Some(Ident::new(n, tok.span))
            } else {
                None
            }
        } else {
            None
        };

        let is_pointer = self.eat(&TokenKind::Star)?;

        let tok = self.get()?;
        let base = match tok.kind {
            TokenKind::Ident(n) => Ident::new(n, tok.span),
            _ => {
                return Err(self.error(
                    tok.span,
                    "I was expecting a type name in this receiver. Receivers should look like '(rec_var [*]type_name)'",
                ))
            }
        };

        let close = self.expect_token(
            TokenKind::RParen,
            "I'd like a ')' to finish this receiver... thanks",
        )?;

        Ok(Receiver {
            name,
            is_pointer,
            base,
            span: open.merge(&close),
        })
    }

    /// Parse a function/method signature.
    ///
    /// Signature = Parameters [ Result ] .
    /// Result    = Parameters | Type .
    pub(crate) fn parse_signature(&mut self) -> GlintResult<(Vec<Param>, Vec<Param>)> {
        let params = self.parse_bracketed_parameter_list()?;

        let results = if self.at(&TokenKind::LParen)? {
            self.parse_bracketed_parameter_list()?
        } else {
            match self.parse_data_type()? {
                Some(ty) => {
                    let span = ty.span;
                    vec![Param {
                        name: ParamName::None,
                        ty,
                        span,
                    }]
                }
                None => Vec::new(),
            }
        };

        Ok((params, results))
    }

    /// Parse a parameter list surrounded by brackets: empty, or
    /// comma-separated declarations terminated by ')'.
    ///
    /// Parameters    = "(" [ ParameterList [ "," ] ] ")" .
    /// ParameterList = ParameterDecl { "," ParameterDecl } .
    fn parse_bracketed_parameter_list(&mut self) -> GlintResult<Vec<Param>> {
        self.expect_token(TokenKind::LParen, "parameter lists should start with '('")?;

        let mut params = Vec::new();
        if !self.at(&TokenKind::RParen)? {
            loop {
                params.extend(self.parse_parameter_decl()?);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
        }

        self.expect_token(
            TokenKind::RParen,
            "this parameter list needs a ')' to finish it off",
        )?;
        Ok(params)
    }

    /// Parse one parameter declaration, expanded into one entry per name.
    /// A trailing '...' before the type marks the declaration variadic.
    ///
    /// ParameterDecl = IdentifierList [ "..." ] Type .
    fn parse_parameter_decl(&mut self) -> GlintResult<Vec<Param>> {
        let idents = self.parse_identifier_list("parameter")?;

        let ellipsis = if self.at(&TokenKind::Ellipsis)? {
            Some(self.get()?.span)
        } else {
            None
        };

        let type_span = self.peek_span(0)?;
        let ty = match self.parse_data_type()? {
            Some(ty) => ty,
            None => {
                return Err(self.error(type_span, "there's a missing type in this parameter list"))
            }
        };

        let mut params: Vec<Param> = idents
            .into_iter()
            .map(|ident| {
                let span = ident.span.merge(&ty.span);
                Param {
                    name: ParamName::Ident(ident),
                    ty: ty.clone(),
                    span,
                }
            })
            .collect();

        if let Some(ellipsis_span) = ellipsis {
            params.push(Param {
                name: ParamName::Ellipsis(ellipsis_span),
                ty: ty.clone(),
                span: ellipsis_span.merge(&ty.span),
            });
        }

        Ok(params)
    }
}
