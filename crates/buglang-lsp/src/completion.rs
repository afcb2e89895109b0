//! Code completion helpers
//!
//! Completion is not contextual: every request gets the full keyword and
//! builtin list, and the editor filters by prefix.

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, MarkupContent, MarkupKind,
};

use crate::symbols::SymbolTables;

/// Generate completion items for keywords
pub fn keyword_completions(tables: &SymbolTables) -> Vec<CompletionItem> {
    tables
        .keywords()
        .map(|keyword| CompletionItem {
            label: keyword.to_string(),
            kind: Some(CompletionItemKind::KEYWORD),
            detail: Some(format!("Buglang keyword: {keyword}")),
            documentation: plain_documentation(tables, keyword),
            ..Default::default()
        })
        .collect()
}

/// Generate completion items for built-in functions
pub fn builtin_completions(tables: &SymbolTables) -> Vec<CompletionItem> {
    tables
        .builtins()
        .map(|builtin| CompletionItem {
            label: builtin.to_string(),
            kind: Some(CompletionItemKind::FUNCTION),
            detail: Some(format!("Buglang built-in: {builtin}")),
            documentation: plain_documentation(tables, builtin),
            ..Default::default()
        })
        .collect()
}

fn plain_documentation(tables: &SymbolTables, name: &str) -> Option<Documentation> {
    tables
        .description(name)
        .map(|doc| Documentation::String(doc.to_string()))
}

/// All completion items: keywords first, then builtins
pub fn completion_items(tables: &SymbolTables) -> Vec<CompletionItem> {
    let mut items = keyword_completions(tables);
    items.extend(builtin_completions(tables));
    items
}

/// Upgrade an item's documentation to markdown when the label is documented.
///
/// Unknown labels come back untouched.
pub fn resolve_completion(tables: &SymbolTables, mut item: CompletionItem) -> CompletionItem {
    if let Some(doc) = tables.description(&item.label) {
        item.documentation = Some(Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: doc.to_string(),
        }));
    }
    item
}
