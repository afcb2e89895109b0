//! Diagnostic scanning
//!
//! Line-oriented pattern matching over the full document text. The only check
//! is the misspelled keyword `funct`.

use std::sync::OnceLock;

use buglang_config::DiagnosticReport;
use regex::Regex;

use crate::convert::{utf16_column, utf16_len};

/// Message attached to every `funct` diagnostic
pub const MISSPELLED_FUNC_MESSAGE: &str = r#""funct" is incorrect. Use "func" instead."#;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
}

/// A single-line diagnostic; columns are UTF-16 code units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub start: u32,
    pub end: u32,
    pub severity: Severity,
    pub message: String,
}

/// The misspelled keyword, matched as a whole word
const MISSPELLED: &str = "funct";

/// Maximal runs of ASCII word characters; non-ASCII letters separate words
fn ascii_words() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9A-Za-z_]+").expect("word pattern is valid"))
}

/// Scan `text` and return its diagnostics in line order, then column order.
///
/// Lines are split on `\n` only, so a trailing `\r` stays part of its line.
pub fn scan(text: &str, report: DiagnosticReport) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (index, line) in text.split('\n').enumerate() {
        let matches = ascii_words()
            .find_iter(line)
            .filter(|word| word.as_str() == MISSPELLED);
        let limit = match report {
            DiagnosticReport::First => 1,
            DiagnosticReport::All => usize::MAX,
        };

        for found in matches.take(limit) {
            let start = utf16_column(line, found.start());
            diagnostics.push(Diagnostic {
                line: index as u32,
                start,
                end: start + utf16_len(found.as_str()),
                severity: Severity::Error,
                message: MISSPELLED_FUNC_MESSAGE.to_string(),
            });
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_misspelling() {
        let diags = scan("funct main() {}", DiagnosticReport::First);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 0);
        assert_eq!(diags[0].start, 0);
        assert_eq!(diags[0].end, 5);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].message, MISSPELLED_FUNC_MESSAGE);
    }

    #[test]
    fn test_correct_keyword_is_clean() {
        assert!(scan("func main() {}", DiagnosticReport::First).is_empty());
    }

    #[test]
    fn test_whole_word_only() {
        assert!(scan("function functor defunct funct_x", DiagnosticReport::All).is_empty());
    }

    #[test]
    fn test_case_sensitive() {
        assert!(scan("Funct FUNCT", DiagnosticReport::All).is_empty());
    }

    #[test]
    fn test_first_policy_reports_one_per_line() {
        let diags = scan("funct a() funct b()", DiagnosticReport::First);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].start, 0);
    }

    #[test]
    fn test_all_policy_reports_every_match() {
        let diags = scan("funct a() funct b()", DiagnosticReport::All);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[1].start, 10);
        assert_eq!(diags[1].end, 15);
    }

    #[test]
    fn test_line_indices() {
        let text = "func ok() {}\n  funct bad() {}\n\nfunct(x)";
        let diags = scan(text, DiagnosticReport::First);
        let positions: Vec<(u32, u32)> = diags.iter().map(|d| (d.line, d.start)).collect();
        assert_eq!(positions, vec![(1, 2), (3, 0)]);
    }

    #[test]
    fn test_carriage_return_stays_on_line() {
        let diags = scan("funct\r\nfunct", DiagnosticReport::First);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[1].line, 1);
    }

    #[test]
    fn test_empty_text() {
        assert!(scan("", DiagnosticReport::All).is_empty());
    }

    #[test]
    fn test_non_ascii_letters_are_word_breaks() {
        let diags = scan("éfunct x", DiagnosticReport::First);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].start, 1);
        assert_eq!(diags[0].end, 6);

        assert_eq!(scan("functé ñfunctñ", DiagnosticReport::All).len(), 2);
    }

    #[test]
    fn test_columns_are_utf16() {
        let diags = scan("😀 funct", DiagnosticReport::First);
        assert_eq!(diags[0].start, 3);
        assert_eq!(diags[0].end, 8);
    }
}
