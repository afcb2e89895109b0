//! Document state management

use buglang_config::DiagnosticReport;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent, Url};

use crate::convert::byte_offset_at;
use crate::diagnostics::{self, Diagnostic};

/// State of a single document in the LSP server
pub struct DocumentState {
    pub uri: Url,
    pub text: String,
    pub version: i32,
    pub diagnostics: Vec<Diagnostic>,
}

impl DocumentState {
    /// Create a new document and analyze it
    pub fn new(uri: Url, text: String, version: i32, report: DiagnosticReport) -> Self {
        let mut doc = Self {
            uri,
            text,
            version,
            diagnostics: Vec::new(),
        };
        doc.analyze(report);
        doc
    }

    /// Apply a batch of content changes in order and re-analyze
    pub fn update(
        &mut self,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
        report: DiagnosticReport,
    ) {
        for change in changes {
            self.apply_change(change);
        }
        self.version = version;
        self.analyze(report);
    }

    /// Apply one change: ranged changes splice, range-less ones replace
    pub fn apply_change(&mut self, change: TextDocumentContentChangeEvent) {
        match change.range {
            Some(range) => {
                let start = self.offset_at(range.start);
                let end = self.offset_at(range.end);
                let (start, end) = if start <= end { (start, end) } else { (end, start) };
                self.text.replace_range(start..end, &change.text);
            }
            None => self.text = change.text,
        }
    }

    /// Byte offset of an LSP position, clamped to the document
    pub fn offset_at(&self, position: Position) -> usize {
        let mut line_start = 0;
        for (index, line) in self.text.split_inclusive('\n').enumerate() {
            if index == position.line as usize {
                let content = line.strip_suffix('\n').unwrap_or(line);
                return line_start + byte_offset_at(content, position.character);
            }
            line_start += line.len();
        }
        self.text.len()
    }

    /// Full document text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text of one line including its line break, or `None` past the end
    pub fn line_text(&self, line: u32) -> Option<&str> {
        self.text.split_inclusive('\n').nth(line as usize)
    }

    /// Re-run the diagnostic scan over the current text
    fn analyze(&mut self, report: DiagnosticReport) {
        self.diagnostics = diagnostics::scan(&self.text, report);
    }
}
