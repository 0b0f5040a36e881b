//! The front-end error type.

use crate::diagnostic::Diagnostic;
use crate::source::FileId;
use crate::span::SrcSpan;

/// A positioned front-end error.
///
/// Every failure path in the lexer and parser returns one of these; no
/// component panics or aborts the process.
#[derive(Debug, Clone)]
pub struct GlintError {
    /// Name of the source file the error occurred in.
    pub file: String,
    /// Where in the file the error occurred.
    pub span: SrcSpan,
    /// Human-readable description of what went wrong.
    pub message: String,
}

impl GlintError {
    /// Create an error at a source location.
    pub fn new(file: impl Into<String>, span: SrcSpan, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            span,
            message: message.into(),
        }
    }

    /// Convert to a Diagnostic for rich rendering.
    pub fn to_diagnostic(&self, file_id: FileId) -> Diagnostic {
        Diagnostic::error(&self.message).with_label(self.span, file_id, "here")
    }
}

impl std::fmt::Display for GlintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.span, self.message)
    }
}

impl std::error::Error for GlintError {}

/// Result type alias for front-end operations.
pub type GlintResult<T> = Result<T, GlintError>;
