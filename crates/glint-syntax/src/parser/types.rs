//! Type reference parsing.
//!
//! The parser recognizes only the shape of a type reference; what the
//! name means is the type store's business.

use glint_common::GlintResult;

use super::Parser;
use crate::ast::{Ident, TypeName};
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// Recognize a reference to a named type, if one is present.
    ///
    /// At this level a type is an optionally-qualified identifier; it is
    /// handed to the type store and the returned handle is recorded in
    /// the AST. Anything else means "no type present" and is left for the
    /// caller to deal with.
    pub(crate) fn parse_data_type(&mut self) -> GlintResult<Option<TypeName>> {
        if !matches!(self.lexer.peek_token(0)?.kind, TokenKind::Ident(_)) {
            return Ok(None);
        }

        let ident = self.parse_optionally_qualified_identifier()?;
        let id = self.types.intern(ident.package.as_deref(), &ident.name);

        Ok(Some(TypeName {
            id,
            package: ident.package,
            name: ident.name,
            span: ident.span,
        }))
    }

    /// Parse an identifier with or without a package qualifier.
    ///
    /// OptionallyQualifiedIdent = identifier | QualifiedIdent .
    /// QualifiedIdent           = PackageName "." identifier .
    pub(crate) fn parse_optionally_qualified_identifier(&mut self) -> GlintResult<Ident> {
        let tok = self.get()?;
        let mut ident = match tok.kind {
            TokenKind::Ident(name) => Ident::new(name, tok.span),
            _ => {
                return Err(self.error(
                    tok.span,
                    "if you could just put an identifier here that'd be greeeat",
                ))
            }
        };

        // might be followed by a '.' and the real name
        if self.at(&TokenKind::Dot)? {
            self.get()?;

            let tok = self.get()?;
            match tok.kind {
                TokenKind::Ident(name) => {
                    ident.package = Some(std::mem::replace(&mut ident.name, name));
                    ident.span = ident.span.merge(&tok.span);
                }
                _ => {
                    return Err(self.error(
                        tok.span,
                        "if you could just put an identifier here that'd be greeeat",
                    ))
                }
            }
        }

        Ok(ident)
    }
}
