//! Source file management for the front end.
//!
//! Provides a centralized registry of source files with:
//! - File ID assignment for cross-referencing
//! - Source text access and filesystem loading
//! - Conversion of line/column spans to byte ranges for codespan-reporting

use codespan_reporting::files::{Files, SimpleFiles};
use std::ops::Range;
use std::path::Path;

use crate::span::{SrcLoc, SrcSpan};

/// A unique identifier for a source file.
pub type FileId = usize;

/// Manages source files loaded by the front end.
pub struct SourceManager {
    files: SimpleFiles<String, String>,
}

impl SourceManager {
    /// Create an empty source manager.
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
        }
    }

    /// Add a file with the given name and source content.
    /// Returns a unique FileId for referencing this file.
    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> FileId {
        self.files.add(name.into(), source.into())
    }

    /// Add a file from the filesystem. I/O failures are returned verbatim.
    pub fn add_file_from_path(&mut self, path: &Path) -> std::io::Result<FileId> {
        let name = path.display().to_string();
        let source = std::fs::read_to_string(path)?;
        Ok(self.add_file(name, source))
    }

    /// Get the source text of a file by ID.
    pub fn get_source(&self, id: FileId) -> Option<&str> {
        self.files.get(id).ok().map(|f| f.source().as_str())
    }

    /// Get the file name by ID.
    pub fn get_name(&self, id: FileId) -> Option<&str> {
        self.files.get(id).ok().map(|f| f.name().as_str())
    }

    /// Convert a 1-based line/column location to a byte offset.
    ///
    /// Locations past the last line (an end-of-source token) clamp to the
    /// end of the file.
    pub fn byte_offset(&self, id: FileId, loc: SrcLoc) -> Option<usize> {
        let line_index = (loc.line as usize).checked_sub(1)?;
        match self.files.line_range(id, line_index) {
            Ok(range) => Some((range.start + loc.column as usize - 1).min(range.end)),
            Err(_) => self.get_source(id).map(|s| s.len()),
        }
    }

    /// Convert a line/column span to a byte range for codespan-reporting.
    pub fn byte_range(&self, id: FileId, span: SrcSpan) -> Option<Range<usize>> {
        let start = self.byte_offset(id, span.start)?;
        let end = self.byte_offset(id, span.end)?;
        Some(start..end.max(start))
    }

    /// Format a location string like "file.gt:10:5".
    pub fn format_location(&self, id: FileId, loc: SrcLoc) -> String {
        let name = self.get_name(id).unwrap_or("<unknown>");
        format!("{}:{}", name, loc)
    }

    /// Access the underlying SimpleFiles for codespan-reporting.
    pub fn files(&self) -> &SimpleFiles<String, String> {
        &self.files
    }
}

impl Default for SourceManager {
    fn default() -> Self {
        Self::new()
    }
}
