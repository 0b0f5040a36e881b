//! # glint-common
//!
//! Shared infrastructure for the Glint front end.
//!
//! This crate provides foundational types used throughout the front end:
//! - Source file management and line/column location tracking
//! - Diagnostic reporting with rich formatting
//! - The positioned error type all lexer/parser failures return

pub mod diagnostic;
pub mod error;
pub mod source;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBag, Severity};
pub use error::{GlintError, GlintResult};
pub use source::{FileId, SourceManager};
pub use span::{SrcLoc, SrcSpan};
