//! Glint Syntax - Lexer, Parser, and AST for the Glint language.
//!
//! This crate provides the frontend components of the Glint compiler:
//! - **Lexer**: Tokenizes Glint source code
//! - **Parser**: Produces an AST from tokens
//! - **AST**: Abstract Syntax Tree types
//! - **Seams**: the type-store and import-coordinator protocols the
//!   parser hands work off to

pub mod ast;
pub mod imports;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod types;
