//! Hover information provider for LSP
//!
//! Finds the word under the cursor on a single line, classifies it against
//! the symbol tables and renders:
//! - a code fragment of the raw word
//! - a keyword, builtin or identifier description line

use std::sync::OnceLock;

use buglang_config::HoverSpan;
use regex::Regex;
use tower_lsp::lsp_types::{Hover, HoverContents, LanguageString, MarkedString};

use crate::convert::{utf16_column, utf16_len};
use crate::symbols::{Classification, SymbolTables};

/// Shown for keywords without a description
pub const KEYWORD_FALLBACK: &str = "Used for control flow or structure.";

/// Shown for builtins without a description
pub const BUILTIN_FALLBACK: &str = "Built-in function.";

/// Shown for every other word
pub const IDENTIFIER_TEXT: &str = "Identifier in Buglang code.";

/// Rendering and word-location options
#[derive(Debug, Clone, Copy)]
pub struct HoverOptions<'a> {
    /// Language tag of the code fragment
    pub language_id: &'a str,
    pub span: HoverSpan,
}

impl Default for HoverOptions<'_> {
    fn default() -> Self {
        Self {
            language_id: buglang_config::settings::DEFAULT_LANGUAGE_ID,
            span: HoverSpan::default(),
        }
    }
}

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9A-Za-z_]+").expect("word pattern is valid"))
}

/// Find the word whose span covers `character` (a UTF-16 column).
///
/// Words are runs of ASCII letters, digits and underscores; any other
/// character, including a non-ASCII letter, separates them.
///
/// Words are tried left to right and the span check is inclusive at both
/// ends, so a cursor just past a word still selects it. With
/// [`HoverSpan::FirstOccurrence`] a word's span starts at the first place its
/// text appears in the line, even when that is inside an earlier word.
pub fn find_word_at(line: &str, character: u32, span: HoverSpan) -> Option<&str> {
    word_pattern()
        .find_iter(line)
        .find(|found| {
            let word = found.as_str();
            let start_byte = match span {
                HoverSpan::FirstOccurrence => line.find(word).unwrap_or(found.start()),
                HoverSpan::Cursor => found.start(),
            };
            let start = utf16_column(line, start_byte);
            let end = start + utf16_len(word);
            start <= character && character <= end
        })
        .map(|found| found.as_str())
}

/// Description line for a classified word
pub fn describe(tables: &SymbolTables, word: &str) -> String {
    match tables.classify(word) {
        Classification::Keyword => format!(
            "Buglang keyword: {}",
            tables.description(word).unwrap_or(KEYWORD_FALLBACK)
        ),
        Classification::Builtin => format!(
            "Buglang built-in function: {}",
            tables.description(word).unwrap_or(BUILTIN_FALLBACK)
        ),
        Classification::Identifier => IDENTIFIER_TEXT.to_string(),
    }
}

/// Generate hover information for a cursor column on `line`
pub fn generate_hover(
    tables: &SymbolTables,
    line: &str,
    character: u32,
    options: HoverOptions<'_>,
) -> Option<Hover> {
    let word = find_word_at(line, character, options.span)?;

    Some(Hover {
        contents: HoverContents::Array(vec![
            MarkedString::LanguageString(LanguageString {
                language: options.language_id.to_string(),
                value: word.to_string(),
            }),
            MarkedString::String(describe(tables, word)),
        ]),
        range: None,
    })
}
