//! Parser for the Glint language.
//!
//! This module provides a recursive descent parser that pulls tokens from
//! the lexer (with bounded peeking) and builds an Abstract Syntax Tree.
//! Expression parsing uses Pratt parsing for correct precedence handling.
//!
//! The parser performs no error recovery: the first ill-formed construct
//! aborts the parse and the error is returned to the caller. Each
//! expected-token check carries a message describing the grammatical
//! expectation in context.

mod decl;
mod expr;
mod stmt;
mod types;

use tracing::{debug, trace};

use glint_common::{GlintError, GlintResult, SrcSpan};

use crate::ast::*;
use crate::imports::{ImportHandle, ImportQueue};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::types::TypeStore;

/// The parser for Glint source code.
pub struct Parser<'a> {
    /// The token source.
    lexer: Lexer<'a>,
    /// The type store every recognized type reference is interned into.
    types: &'a mut dyn TypeStore,
    /// The sending end of the source-file coordinator queue.
    imports: ImportQueue,
    /// Completion handles for the imports this parse has requested.
    pending_imports: Vec<ImportHandle>,
    /// The name of the file being parsed, for diagnostics.
    filename: String,
}

impl<'a> Parser<'a> {
    /// Create a parser over a lexer and its collaborators.
    pub fn new(lexer: Lexer<'a>, types: &'a mut dyn TypeStore, imports: ImportQueue) -> Self {
        let filename = lexer.filename().to_string();
        Self {
            lexer,
            types,
            imports,
            pending_imports: Vec::new(),
            filename,
        }
    }

    /// Run the parser, producing the file's AST.
    pub fn parse(&mut self) -> GlintResult<SourceFile> {
        self.parse_source_file()
    }

    /// Take the completion handles for the imports requested so far.
    /// Semantic analysis awaits these before resolving cross-package names.
    pub fn take_pending_imports(&mut self) -> Vec<ImportHandle> {
        std::mem::take(&mut self.pending_imports)
    }

    // =========================================================================
    // Token plumbing
    // =========================================================================

    fn get(&mut self) -> GlintResult<Token> {
        self.lexer.get_token()
    }

    fn peek_kind(&mut self, ahead: usize) -> GlintResult<TokenKind> {
        Ok(self.lexer.peek_token(ahead)?.kind.clone())
    }

    fn peek_span(&mut self, ahead: usize) -> GlintResult<SrcSpan> {
        Ok(self.lexer.peek_token(ahead)?.span)
    }

    fn at(&mut self, kind: &TokenKind) -> GlintResult<bool> {
        Ok(&self.lexer.peek_token(0)?.kind == kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> GlintResult<bool> {
        if self.at(kind)? {
            self.get()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume a required token, failing with the caller's description of
    /// what was expected. Returns the token's span.
    fn expect_token(&mut self, kind: TokenKind, message: &str) -> GlintResult<SrcSpan> {
        let tok = self.get()?;
        if tok.kind != kind {
            return Err(self.error(tok.span, message));
        }
        Ok(tok.span)
    }

    fn error(&self, span: SrcSpan, message: impl Into<String>) -> GlintError {
        GlintError::new(self.filename.as_str(), span, message)
    }

    // =========================================================================
    // Source file structure
    // =========================================================================

    /// Parse the contents of an entire source file.
    ///
    /// SourceFile = PackageClause ";" { ImportDecl ";" } { TopLevelDecl ";" } .
    fn parse_source_file(&mut self) -> GlintResult<SourceFile> {
        debug!(file = %self.filename, "parsing source file");

        let start = self.peek_span(0)?;
        let package = self.parse_package()?;
        self.expect_token(
            TokenKind::Semi,
            "I'm gonna be needing a semicolon after this 'package' declaration",
        )?;

        let mut imports = Vec::new();
        while self.at(&TokenKind::Import)? {
            imports.extend(self.parse_import()?);
            self.expect_token(
                TokenKind::Semi,
                "I'm gonna be needing a semicolon after this 'import' declaration",
            )?;
        }

        let mut decls = Vec::new();
        while !self.at(&TokenKind::Eof)? {
            decls.extend(self.parse_top_level_decl()?);
            self.expect_token(TokenKind::Semi, "I need a semicolon here")?;
        }

        let end = self.expect_token(
            TokenKind::Eof,
            "I don't really know what this is or why it's here",
        )?;

        debug!(
            imports = imports.len(),
            decls = decls.len(),
            "parsed source file"
        );
        Ok(SourceFile {
            package,
            imports,
            decls,
            span: start.merge(&end),
        })
    }

    /// Parse a package declaration.
    ///
    /// PackageClause = "package" PackageName .
    fn parse_package(&mut self) -> GlintResult<Ident> {
        self.expect_token(
            TokenKind::Package,
            "the file should start with 'package <package name>'",
        )?;

        let tok = self.get()?;
        match tok.kind {
            TokenKind::Ident(name) => Ok(Ident::new(name, tok.span)),
            _ => Err(self.error(
                tok.span,
                "the package name should be a plain word. eg. 'package horatio'",
            )),
        }
    }

    /// Parse an import declaration.
    ///
    /// ImportDecl = "import" ( ImportSpec | "(" { ImportSpec ";" } ")" ) .
    fn parse_import(&mut self) -> GlintResult<Vec<Import>> {
        // the caller peeked the 'import' keyword
        self.get()?;

        if self.at(&TokenKind::LParen)? {
            self.parse_import_group()
        } else {
            Ok(vec![self.parse_import_spec()?])
        }
    }

    fn parse_import_group(&mut self) -> GlintResult<Vec<Import>> {
        self.expect_token(TokenKind::LParen, "there should be a '(' here")?;

        let mut imports = Vec::new();
        loop {
            if self.at(&TokenKind::RParen)? {
                self.get()?;
                return Ok(imports);
            }
            imports.push(self.parse_import_spec()?);
            self.expect_token(
                TokenKind::Semi,
                "I really wanted a semicolon between these 'import's",
            )?;
        }
    }

    /// Parse one import specification.
    ///
    /// ImportSpec = [ PackageName ] ImportPath .
    fn parse_import_spec(&mut self) -> GlintResult<Import> {
        let tok = self.get()?;
        match tok.kind {
            TokenKind::Ident(alias) => {
                // 'import fred "frod"' - an aliased import
                let alias = Ident::new(alias, tok.span);
                let path_tok = self.get()?;
                match path_tok.kind {
                    TokenKind::String(path) => {
                        self.request_import(&path, path_tok.span);
                        Ok(Import {
                            alias: Some(alias),
                            path,
                            span: tok.span.merge(&path_tok.span),
                        })
                    }
                    _ => Err(self.error(
                        path_tok.span,
                        "this should have been a string. eg. 'import fred \"github.com/fred/thefredpackage\"'",
                    )),
                }
            }
            TokenKind::String(path) => {
                self.request_import(&path, tok.span);
                Ok(Import {
                    alias: None,
                    path,
                    span: tok.span,
                })
            }
            _ => Err(self.error(
                tok.span,
                "this import makes no sense. It should be like 'import [cool] \"coolpackage\"'",
            )),
        }
    }

    /// Tell the coordinator to read the imported file. The parse itself
    /// never waits on the result.
    fn request_import(&mut self, path: &str, span: SrcSpan) {
        trace!(path, "requesting import");
        let handle = self.imports.request(path, self.filename.as_str(), span);
        self.pending_imports.push(handle);
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    /// Parse a comma-separated list of identifiers.
    ///
    /// IdentifierList = identifier { "," identifier } .
    pub(crate) fn parse_identifier_list(&mut self, what: &str) -> GlintResult<Vec<Ident>> {
        let mut idents = Vec::new();

        loop {
            let tok = self.get()?;
            match tok.kind {
                TokenKind::Ident(name) => idents.push(Ident::new(name, tok.span)),
                _ => {
                    return Err(self.error(
                        tok.span,
                        format!("this should have been a name for a {}, but it's not", what),
                    ))
                }
            }

            if !self.at(&TokenKind::Comma)? {
                break;
            }
            self.get()?;
        }

        Ok(idents)
    }
}

/// Parse a single source file, interning type references into `types` and
/// emitting import requests onto `imports`. On success, returns the AST
/// and the completion handles for every import requested.
pub fn parse(
    filename: &str,
    source: &str,
    types: &mut dyn TypeStore,
    imports: &ImportQueue,
) -> GlintResult<(SourceFile, Vec<ImportHandle>)> {
    let lexer = Lexer::new(filename, source);
    let mut parser = Parser::new(lexer, types, imports.clone());
    let file = parser.parse()?;
    let handles = parser.take_pending_imports();
    Ok((file, handles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeTable;
    use glint_common::SrcLoc;

    fn parse_str(source: &str) -> GlintResult<SourceFile> {
        let mut types = TypeTable::new();
        let (queue, _rx) = ImportQueue::new();
        parse("test.gt", source, &mut types, &queue).map(|(file, _)| file)
    }

    fn parse_ok(source: &str) -> SourceFile {
        match parse_str(source) {
            Ok(file) => file,
            Err(e) => panic!("parse error: {}", e),
        }
    }

    fn parse_err(source: &str) -> GlintError {
        match parse_str(source) {
            Ok(_) => panic!("expected a parse error"),
            Err(e) => e,
        }
    }

    // =========================================================================
    // File structure
    // =========================================================================

    #[test]
    fn test_package_only() {
        let file = parse_ok("package main\n");
        assert_eq!(file.package.name, "main");
        assert!(file.imports.is_empty());
        assert!(file.decls.is_empty());
    }

    #[test]
    fn test_package_without_trailing_newline() {
        let file = parse_ok("package main");
        assert_eq!(file.package.name, "main");
    }

    #[test]
    fn test_missing_package() {
        let err = parse_err("const x = 1\n");
        assert_eq!(err.message, "the file should start with 'package <package name>'");
    }

    #[test]
    fn test_package_name_must_be_identifier() {
        let err = parse_err("package 12\n");
        assert_eq!(
            err.message,
            "the package name should be a plain word. eg. 'package horatio'"
        );
    }

    #[test]
    fn test_junk_at_top_level() {
        let err = parse_err("package main\nwat\n");
        assert_eq!(
            err.message,
            "so I wanted a top level thing like a type, a func, a const or a var, but no... you had to be different"
        );
    }

    // =========================================================================
    // Imports
    // =========================================================================

    #[test]
    fn test_single_import() {
        let file = parse_ok("package main\nimport \"fmt\"\n");
        assert_eq!(file.imports.len(), 1);
        assert_eq!(file.imports[0].path, "fmt");
        assert!(file.imports[0].alias.is_none());
    }

    #[test]
    fn test_aliased_import() {
        let file = parse_ok("package main\nimport f \"fmt\"\n");
        assert_eq!(file.imports[0].path, "fmt");
        assert_eq!(file.imports[0].alias.as_ref().map(|a| a.name.as_str()), Some("f"));
    }

    #[test]
    fn test_grouped_imports() {
        let file = parse_ok("package main\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n");
        assert_eq!(file.imports.len(), 2);
        assert_eq!(file.imports[0].path, "fmt");
        assert_eq!(file.imports[1].path, "os");
    }

    #[test]
    fn test_import_requests_reach_the_coordinator() {
        let mut types = TypeTable::new();
        let (queue, rx) = ImportQueue::new();
        let (_, handles) = parse(
            "main.gt",
            "package main\nimport (\n\t\"fmt\"\n\tsys \"os\"\n)\n",
            &mut types,
            &queue,
        )
        .unwrap();

        let requests: Vec<_> = rx.try_iter().collect();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, "fmt");
        assert_eq!(requests[0].requesting_file, "main.gt");
        assert_eq!(requests[1].path, "os");

        // the parse never waits, but the handles become ready once the
        // coordinator signals
        assert_eq!(handles.len(), 2);
        assert!(!handles[0].is_done());
        requests[0].done.send(()).unwrap();
        assert!(handles[0].is_done());
    }

    #[test]
    fn test_import_needs_a_path() {
        let err = parse_err("package main\nimport 42\n");
        assert_eq!(
            err.message,
            "this import makes no sense. It should be like 'import [cool] \"coolpackage\"'"
        );
    }

    #[test]
    fn test_aliased_import_needs_a_string() {
        let err = parse_err("package main\nimport fred 42\n");
        assert_eq!(
            err.message,
            "this should have been a string. eg. 'import fred \"github.com/fred/thefredpackage\"'"
        );
    }

    // =========================================================================
    // Const declarations
    // =========================================================================

    #[test]
    fn test_const_decl() {
        let file = parse_ok("package main\nconst x = 1\n");
        assert_eq!(file.decls.len(), 1);
        match &file.decls[0] {
            Decl::Const(c) => {
                assert_eq!(c.name.name, "x");
                assert!(c.ty.is_none());
                assert!(matches!(c.value, Some(Expr { kind: ExprKind::Int(1), .. })));
            }
            other => panic!("expected const decl, got {:?}", other),
        }
    }

    #[test]
    fn test_const_decl_with_type() {
        let file = parse_ok("package main\nconst x int = 1\n");
        match &file.decls[0] {
            Decl::Const(c) => {
                assert_eq!(c.ty.as_ref().map(|t| t.name.as_str()), Some("int"));
            }
            other => panic!("expected const decl, got {:?}", other),
        }
    }

    #[test]
    fn test_const_multi_name_expands_per_identifier() {
        let file = parse_ok("package main\nconst a, b = 1, 2\n");
        assert_eq!(file.decls.len(), 2);
        match (&file.decls[0], &file.decls[1]) {
            (Decl::Const(a), Decl::Const(b)) => {
                assert_eq!(a.name.name, "a");
                assert!(matches!(a.value, Some(Expr { kind: ExprKind::Int(1), .. })));
                assert_eq!(b.name.name, "b");
                assert!(matches!(b.value, Some(Expr { kind: ExprKind::Int(2), .. })));
            }
            other => panic!("expected two const decls, got {:?}", other),
        }
    }

    #[test]
    fn test_const_length_mismatch_more_names() {
        let err = parse_err("package main\nconst a, b = 1\n");
        assert_eq!(err.message, "there are more names here than there are values");
        // positioned over the whole identifier list
        assert_eq!(err.span.start, SrcLoc::new(2, 7));
        assert_eq!(err.span.end, SrcLoc::new(2, 11));
    }

    #[test]
    fn test_const_length_mismatch_more_values() {
        let err = parse_err("package main\nconst a = 1, 2\n");
        assert_eq!(err.message, "there are less names here than there are values");
    }

    #[test]
    fn test_const_type_requires_initializer() {
        let err = parse_err("package main\nconst x int\n");
        assert_eq!(err.message, "after a data type I expected to see '=' here");
    }

    #[test]
    fn test_const_grouped() {
        let file = parse_ok("package main\nconst (\n\ta = 1\n\tb = 2\n)\n");
        assert_eq!(file.decls.len(), 2);
    }

    #[test]
    fn test_const_group_needs_semicolons() {
        let err = parse_err("package main\nconst (a = 1)\n");
        assert_eq!(err.message, "I really wanted a semicolon between these 'const's");
    }

    // =========================================================================
    // Var declarations
    // =========================================================================

    #[test]
    fn test_var_decl_with_type_only() {
        let file = parse_ok("package main\nvar x int\n");
        match &file.decls[0] {
            Decl::Var(v) => {
                assert_eq!(v.name.name, "x");
                assert_eq!(v.ty.as_ref().map(|t| t.name.as_str()), Some("int"));
                assert!(v.value.is_none());
            }
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_var_decl_with_initializer_only() {
        let file = parse_ok("package main\nvar x = 42\n");
        match &file.decls[0] {
            Decl::Var(v) => {
                assert!(v.ty.is_none());
                assert!(matches!(v.value, Some(Expr { kind: ExprKind::Int(42), .. })));
            }
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_var_decl_with_type_and_initializer() {
        let file = parse_ok("package main\nvar x, y int = 1, 2\n");
        assert_eq!(file.decls.len(), 2);
        match &file.decls[1] {
            Decl::Var(v) => {
                assert_eq!(v.name.name, "y");
                assert_eq!(v.ty.as_ref().map(|t| t.name.as_str()), Some("int"));
                assert!(matches!(v.value, Some(Expr { kind: ExprKind::Int(2), .. })));
            }
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_var_without_type_requires_initializer() {
        let err = parse_err("package main\nvar x\n");
        assert_eq!(err.message, "I was expecting to see an '=' here");
    }

    #[test]
    fn test_var_length_mismatch() {
        let err = parse_err("package main\nvar a, b, c = 1, 2\n");
        assert_eq!(err.message, "there are more names here than there are values");
    }

    #[test]
    fn test_var_grouped_mixed_specs() {
        let file = parse_ok("package main\nvar (\n\ta int\n\tb = 1\n\tc, d string\n)\n");
        assert_eq!(file.decls.len(), 4);
    }

    // =========================================================================
    // Type declarations
    // =========================================================================

    #[test]
    fn test_type_decl() {
        let file = parse_ok("package main\ntype MyInt int\n");
        match &file.decls[0] {
            Decl::Type(t) => {
                assert_eq!(t.name.name, "MyInt");
                assert_eq!(t.ty.name, "int");
                assert!(t.ty.package.is_none());
            }
            other => panic!("expected type decl, got {:?}", other),
        }
    }

    #[test]
    fn test_type_decl_qualified() {
        let file = parse_ok("package main\ntype R io.Reader\n");
        match &file.decls[0] {
            Decl::Type(t) => {
                assert_eq!(t.ty.package.as_deref(), Some("io"));
                assert_eq!(t.ty.name, "Reader");
            }
            other => panic!("expected type decl, got {:?}", other),
        }
    }

    #[test]
    fn test_type_references_are_interned_once() {
        let mut types = TypeTable::new();
        let (queue, _rx) = ImportQueue::new();
        let (file, _) = parse(
            "test.gt",
            "package main\nvar a int\nvar b int\nvar c string\n",
            &mut types,
            &queue,
        )
        .unwrap();

        assert_eq!(types.len(), 2);
        match (&file.decls[0], &file.decls[1]) {
            (Decl::Var(a), Decl::Var(b)) => {
                assert_eq!(a.ty.as_ref().map(|t| t.id), b.ty.as_ref().map(|t| t.id));
            }
            other => panic!("expected var decls, got {:?}", other),
        }
    }

    #[test]
    fn test_type_decl_requires_a_type() {
        let err = parse_err("package main\ntype MyInt\n");
        assert_eq!(err.message, "this should have been a name for a type, but it's not");
    }

    // =========================================================================
    // Function declarations
    // =========================================================================

    #[test]
    fn test_func_decl_simple() {
        let file = parse_ok("package main\nfunc main() {}\n");
        match &file.decls[0] {
            Decl::Func(f) => {
                assert_eq!(f.name.name, "main");
                assert!(f.receiver.is_none());
                assert!(f.params.is_empty());
                assert!(f.results.is_empty());
                assert!(matches!(&f.body, Some(b) if b.stmts.is_empty()));
            }
            other => panic!("expected func decl, got {:?}", other),
        }
    }

    #[test]
    fn test_func_forward_declaration() {
        let file = parse_ok("package main\nfunc external()\n");
        match &file.decls[0] {
            Decl::Func(f) => assert!(f.is_forward()),
            other => panic!("expected func decl, got {:?}", other),
        }
    }

    #[test]
    fn test_func_decl_with_params_and_result() {
        let file = parse_ok("package main\nfunc add(a, b int) int {\n\treturn a + b\n}\n");
        match &file.decls[0] {
            Decl::Func(f) => {
                assert_eq!(f.params.len(), 2);
                assert!(matches!(&f.params[0].name, ParamName::Ident(i) if i.name == "a"));
                assert!(matches!(&f.params[1].name, ParamName::Ident(i) if i.name == "b"));
                assert_eq!(f.params[0].ty.name, "int");
                assert_eq!(f.results.len(), 1);
                assert!(matches!(f.results[0].name, ParamName::None));
            }
            other => panic!("expected func decl, got {:?}", other),
        }
    }

    #[test]
    fn test_func_decl_with_pointer_receiver() {
        let file = parse_ok("package main\nfunc (r *T) M() {}\n");
        match &file.decls[0] {
            Decl::Func(f) => {
                let recv = f.receiver.as_ref().expect("receiver");
                assert_eq!(recv.name.as_ref().map(|n| n.name.as_str()), Some("r"));
                assert!(recv.is_pointer);
                assert_eq!(recv.base.name, "T");
                assert_eq!(f.name.name, "M");
                assert!(f.params.is_empty());
                assert!(f.results.is_empty());
                assert!(matches!(&f.body, Some(b) if b.stmts.is_empty()));
            }
            other => panic!("expected func decl, got {:?}", other),
        }
    }

    #[test]
    fn test_func_decl_with_unbound_receiver() {
        let file = parse_ok("package main\nfunc (T) M() {}\n");
        match &file.decls[0] {
            Decl::Func(f) => {
                let recv = f.receiver.as_ref().expect("receiver");
                assert!(recv.name.is_none());
                assert!(!recv.is_pointer);
                assert_eq!(recv.base.name, "T");
            }
            other => panic!("expected func decl, got {:?}", other),
        }
    }

    #[test]
    fn test_func_decl_variadic() {
        let file = parse_ok("package main\nfunc printf(format string, args ...int) {}\n");
        match &file.decls[0] {
            Decl::Func(f) => {
                assert_eq!(f.params.len(), 3);
                assert!(matches!(&f.params[1].name, ParamName::Ident(i) if i.name == "args"));
                assert!(matches!(f.params[2].name, ParamName::Ellipsis(_)));
                assert_eq!(f.params[2].ty.name, "int");
            }
            other => panic!("expected func decl, got {:?}", other),
        }
    }

    #[test]
    fn test_func_decl_named_results() {
        let file = parse_ok("package main\nfunc f() (n int, err error) {}\n");
        match &file.decls[0] {
            Decl::Func(f) => {
                assert_eq!(f.results.len(), 2);
                assert!(matches!(&f.results[0].name, ParamName::Ident(i) if i.name == "n"));
                assert_eq!(f.results[1].ty.name, "error");
            }
            other => panic!("expected func decl, got {:?}", other),
        }
    }

    #[test]
    fn test_parameter_missing_type() {
        let err = parse_err("package main\nfunc f(a, b) {}\n");
        assert_eq!(err.message, "there's a missing type in this parameter list");
    }

    #[test]
    fn test_receiver_needs_base_type() {
        let err = parse_err("package main\nfunc (r *) M() {}\n");
        assert_eq!(
            err.message,
            "I was expecting a type name in this receiver. Receivers should look like '(rec_var [*]type_name)'"
        );
    }

    // =========================================================================
    // Statements and expressions
    // =========================================================================

    fn body_of(file: &SourceFile) -> &Block {
        match &file.decls[0] {
            Decl::Func(f) => f.body.as_ref().expect("function body"),
            other => panic!("expected func decl, got {:?}", other),
        }
    }

    #[test]
    fn test_short_var_and_assignment() {
        let file = parse_ok("package main\nfunc f() {\n\tx := 1\n\tx = 2\n\tx += 3\n}\n");
        let body = body_of(&file);
        assert_eq!(body.stmts.len(), 3);
        assert!(matches!(&body.stmts[0], Stmt::ShortVar(s) if s.names[0].name == "x"));
        assert!(matches!(&body.stmts[1], Stmt::Assign(a) if a.op == AssignOp::Assign));
        assert!(matches!(&body.stmts[2], Stmt::Assign(a) if a.op == AssignOp::Add));
    }

    #[test]
    fn test_inc_dec_statements() {
        let file = parse_ok("package main\nfunc f() {\n\tx++\n\ty--\n}\n");
        let body = body_of(&file);
        assert!(matches!(&body.stmts[0], Stmt::IncDec(s) if s.is_inc));
        assert!(matches!(&body.stmts[1], Stmt::IncDec(s) if !s.is_inc));
    }

    #[test]
    fn test_return_with_values() {
        let file = parse_ok("package main\nfunc f() {\n\treturn 1, 2\n}\n");
        let body = body_of(&file);
        assert!(matches!(&body.stmts[0], Stmt::Return(r) if r.values.len() == 2));
    }

    #[test]
    fn test_if_else_chain() {
        let file = parse_ok(
            "package main\nfunc f() {\n\tif x > 0 {\n\t\treturn\n\t} else if x < 0 {\n\t\treturn\n\t} else {\n\t\treturn\n\t}\n}\n",
        );
        let body = body_of(&file);
        match &body.stmts[0] {
            Stmt::If(i) => match &i.else_arm {
                Some(ElseArm::If(nested)) => {
                    assert!(matches!(nested.else_arm, Some(ElseArm::Block(_))));
                }
                other => panic!("expected else-if, got {:?}", other),
            },
            other => panic!("expected if stmt, got {:?}", other),
        }
    }

    #[test]
    fn test_for_forms() {
        let file = parse_ok(
            "package main\nfunc f() {\n\tfor {\n\t\tbreak\n\t}\n\tfor x < 10 {\n\t\tcontinue\n\t}\n\tfor i := 0; i < 10; i++ {\n\t\tx = i\n\t}\n}\n",
        );
        let body = body_of(&file);
        assert!(matches!(&body.stmts[0], Stmt::For(f) if matches!(f.clause, ForClause::Infinite)));
        assert!(matches!(&body.stmts[1], Stmt::For(f) if matches!(f.clause, ForClause::Cond(_))));
        match &body.stmts[2] {
            Stmt::For(f) => match &f.clause {
                ForClause::Three { init, cond, post } => {
                    assert!(matches!(init.as_deref(), Some(Stmt::ShortVar(_))));
                    assert!(cond.is_some());
                    assert!(matches!(post.as_deref(), Some(Stmt::IncDec(_))));
                }
                other => panic!("expected three-clause for, got {:?}", other),
            },
            other => panic!("expected for stmt, got {:?}", other),
        }
    }

    #[test]
    fn test_go_and_defer() {
        let file = parse_ok("package main\nfunc f() {\n\tgo worker()\n\tdefer cleanup()\n}\n");
        let body = body_of(&file);
        assert!(matches!(&body.stmts[0], Stmt::Go(g) if matches!(g.call.kind, ExprKind::Call(_))));
        assert!(matches!(&body.stmts[1], Stmt::Defer(_)));
    }

    #[test]
    fn test_local_declarations() {
        let file = parse_ok("package main\nfunc f() {\n\tvar x int\n\tconst c = 1\n}\n");
        let body = body_of(&file);
        assert!(matches!(&body.stmts[0], Stmt::Decl(d) if matches!(d[0], Decl::Var(_))));
        assert!(matches!(&body.stmts[1], Stmt::Decl(d) if matches!(d[0], Decl::Const(_))));
    }

    #[test]
    fn test_expression_precedence() {
        let file = parse_ok("package main\nvar x = 1 + 2 * 3\n");
        match &file.decls[0] {
            Decl::Var(v) => match &v.value.as_ref().unwrap().kind {
                ExprKind::Binary(b) => {
                    assert_eq!(b.op, BinaryOp::Add);
                    assert!(matches!(b.left.kind, ExprKind::Int(1)));
                    assert!(
                        matches!(&b.right.kind, ExprKind::Binary(inner) if inner.op == BinaryOp::Mul)
                    );
                }
                other => panic!("expected binary expr, got {:?}", other),
            },
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized_grouping() {
        let file = parse_ok("package main\nvar x = (1 + 2) * 3\n");
        match &file.decls[0] {
            Decl::Var(v) => match &v.value.as_ref().unwrap().kind {
                ExprKind::Binary(b) => {
                    assert_eq!(b.op, BinaryOp::Mul);
                    assert!(
                        matches!(&b.left.kind, ExprKind::Binary(inner) if inner.op == BinaryOp::Add)
                    );
                }
                other => panic!("expected binary expr, got {:?}", other),
            },
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_is_left_associative() {
        let file = parse_ok("package main\nvar x = 1 - 2 - 3\n");
        match &file.decls[0] {
            Decl::Var(v) => match &v.value.as_ref().unwrap().kind {
                ExprKind::Binary(b) => {
                    assert_eq!(b.op, BinaryOp::Sub);
                    assert!(matches!(b.right.kind, ExprKind::Int(3)));
                    assert!(
                        matches!(&b.left.kind, ExprKind::Binary(inner) if inner.op == BinaryOp::Sub)
                    );
                }
                other => panic!("expected binary expr, got {:?}", other),
            },
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_and_receive_expressions() {
        let file = parse_ok("package main\nvar x = -a * b\nvar y = <-ch\n");
        match &file.decls[0] {
            Decl::Var(v) => match &v.value.as_ref().unwrap().kind {
                ExprKind::Binary(b) => {
                    assert_eq!(b.op, BinaryOp::Mul);
                    assert!(
                        matches!(&b.left.kind, ExprKind::Unary(u) if u.op == UnaryOp::Neg)
                    );
                }
                other => panic!("expected binary expr, got {:?}", other),
            },
            other => panic!("expected var decl, got {:?}", other),
        }
        match &file.decls[1] {
            Decl::Var(v) => {
                assert!(matches!(&v.value.as_ref().unwrap().kind, ExprKind::Receive(_)));
            }
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_call_selector_and_spread() {
        let file = parse_ok("package main\nfunc f() {\n\tfmt.Println(a, xs...)\n}\n");
        let body = body_of(&file);
        match &body.stmts[0] {
            Stmt::Expr(e) => match &e.expr.kind {
                ExprKind::Call(c) => {
                    assert!(matches!(&c.func.kind, ExprKind::Selector(s) if s.sel.name == "Println"));
                    assert_eq!(c.args.len(), 2);
                    assert!(c.spread);
                }
                other => panic!("expected call expr, got {:?}", other),
            },
            other => panic!("expected expr stmt, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_expression() {
        let err = parse_err("package main\nvar x = +\n");
        assert_eq!(err.message, "I was hoping to find an expression here");
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse_err("package main\nfunc f() {\n\tx := 1\n");
        assert_eq!(err.message, "this block needs a '}' here");
    }
}
