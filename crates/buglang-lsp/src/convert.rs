//! Type conversions between Buglang and LSP types

use crate::diagnostics::{Diagnostic, Severity};
use tower_lsp::lsp_types;

/// Convert a scanner diagnostic to an LSP diagnostic
pub fn diagnostic_to_lsp(diag: &Diagnostic, source: &str) -> lsp_types::Diagnostic {
    lsp_types::Diagnostic {
        range: lsp_types::Range {
            start: lsp_types::Position {
                line: diag.line,
                character: diag.start,
            },
            end: lsp_types::Position {
                line: diag.line,
                character: diag.end,
            },
        },
        severity: Some(match diag.severity {
            Severity::Error => lsp_types::DiagnosticSeverity::ERROR,
        }),
        source: Some(source.to_string()),
        message: diag.message.clone(),
        ..Default::default()
    }
}

/// Length of `text` in UTF-16 code units
pub fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

/// UTF-16 column of a byte offset within a single line
pub fn utf16_column(line: &str, byte_offset: usize) -> u32 {
    let end = byte_offset.min(line.len());
    utf16_len(line.get(..end).unwrap_or(line))
}

/// Byte offset of a UTF-16 column within a single line, clamped to the line end
pub fn byte_offset_at(line: &str, character: u32) -> usize {
    let mut utf16_count = 0u32;
    for (byte_idx, ch) in line.char_indices() {
        if utf16_count >= character {
            return byte_idx;
        }
        utf16_count += ch.len_utf16() as u32;
    }
    line.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_to_lsp() {
        let diag = Diagnostic {
            line: 3,
            start: 4,
            end: 9,
            severity: Severity::Error,
            message: "bad".to_string(),
        };
        let lsp = diagnostic_to_lsp(&diag, "Buglang LSP");
        assert_eq!(lsp.range.start.line, 3);
        assert_eq!(lsp.range.start.character, 4);
        assert_eq!(lsp.range.end.character, 9);
        assert_eq!(lsp.severity, Some(lsp_types::DiagnosticSeverity::ERROR));
        assert_eq!(lsp.source.as_deref(), Some("Buglang LSP"));
        assert_eq!(lsp.message, "bad");
    }

    #[test]
    fn test_utf16_column_ascii() {
        assert_eq!(utf16_column("hello world", 6), 6);
    }

    #[test]
    fn test_utf16_column_multibyte() {
        // 'é' is two bytes in UTF-8 but one UTF-16 unit
        assert_eq!(utf16_column("é funct", 3), 2);
        // '😀' is four bytes and two UTF-16 units
        assert_eq!(utf16_column("😀x", 4), 2);
    }

    #[test]
    fn test_byte_offset_at() {
        assert_eq!(byte_offset_at("é funct", 2), 3);
        assert_eq!(byte_offset_at("abc", 10), 3);
        assert_eq!(byte_offset_at("", 0), 0);
    }
}
