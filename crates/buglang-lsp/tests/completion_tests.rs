//! Completion provider tests

use buglang_lsp::completion::{completion_items, resolve_completion};
use buglang_lsp::server::BuglangLspServer;
use buglang_lsp::symbols::{SymbolTables, BUILTINS, KEYWORDS};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tower_lsp::lsp_types::*;
use tower_lsp::{LanguageServer, LspService};

fn completion_params(uri: &Url, line: u32, character: u32) -> CompletionParams {
    CompletionParams {
        text_document_position: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
            position: Position::new(line, character),
        },
        work_done_progress_params: WorkDoneProgressParams::default(),
        partial_result_params: PartialResultParams::default(),
        context: None,
    }
}

fn labels(response: Option<CompletionResponse>) -> Vec<String> {
    match response {
        Some(CompletionResponse::Array(items)) => items.into_iter().map(|i| i.label).collect(),
        other => panic!("expected a completion array, got {:?}", other),
    }
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_completion_order_follows_tables() {
    let items = completion_items(&SymbolTables::buglang());
    let expected: Vec<&str> = KEYWORDS.iter().chain(BUILTINS.iter()).copied().collect();
    let actual: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_completion_length_matches_tables() {
    let tables = SymbolTables::new(&["a", "b"], &["c"], &[]);
    assert_eq!(completion_items(&tables).len(), 3);
    assert_eq!(
        completion_items(&SymbolTables::buglang()).len(),
        KEYWORDS.len() + BUILTINS.len()
    );
}

#[rstest]
#[case("class", CompletionItemKind::KEYWORD, "Buglang keyword: class")]
#[case("while", CompletionItemKind::KEYWORD, "Buglang keyword: while")]
#[case("println", CompletionItemKind::FUNCTION, "Buglang built-in: println")]
#[case("ffi.call", CompletionItemKind::FUNCTION, "Buglang built-in: ffi.call")]
fn test_completion_kind_and_detail(
    #[case] label: &str,
    #[case] kind: CompletionItemKind,
    #[case] detail: &str,
) {
    let items = completion_items(&SymbolTables::buglang());
    let item = items.iter().find(|i| i.label == label).unwrap();
    assert_eq!(item.kind, Some(kind));
    assert_eq!(item.detail.as_deref(), Some(detail));
}

#[test]
fn test_completion_documentation_is_plain_string() {
    let items = completion_items(&SymbolTables::buglang());
    let println = items.iter().find(|i| i.label == "println").unwrap();
    assert_eq!(
        println.documentation,
        Some(Documentation::String(
            "Prints a line to the console.".to_string()
        ))
    );
}

#[tokio::test]
async fn test_completion_is_position_invariant() {
    let (service, _socket) = LspService::new(BuglangLspServer::new);
    let server = service.inner();
    let uri = Url::parse("file:///test.bug").unwrap();

    server
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "buglang".to_string(),
                version: 1,
                text: "class Foo {\n  func bar() {\n    pri\n  }\n}".to_string(),
            },
        })
        .await;

    let first = labels(server.completion(completion_params(&uri, 2, 7)).await.unwrap());
    let second = labels(server.completion(completion_params(&uri, 0, 0)).await.unwrap());
    let past_end = labels(server.completion(completion_params(&uri, 40, 99)).await.unwrap());

    assert_eq!(first.len(), 20);
    assert_eq!(first, second);
    assert_eq!(first, past_end);
}

#[tokio::test]
async fn test_completion_without_open_document() {
    let (service, _socket) = LspService::new(BuglangLspServer::new);
    let server = service.inner();
    let uri = Url::parse("file:///never-opened.bug").unwrap();

    let result = server.completion(completion_params(&uri, 0, 0)).await.unwrap();
    assert_eq!(labels(result).len(), 20);
}

// ============================================================================
// Resolve Tests
// ============================================================================

#[tokio::test]
async fn test_resolve_class_gets_markdown_documentation() {
    let (service, _socket) = LspService::new(BuglangLspServer::new);
    let server = service.inner();

    let item = completion_items(&SymbolTables::buglang())
        .into_iter()
        .find(|i| i.label == "class")
        .unwrap();

    let resolved = server.completion_resolve(item.clone()).await.unwrap();

    assert_eq!(
        resolved.documentation,
        Some(Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: "Defines a class in Buglang.".to_string(),
        }))
    );
    assert_eq!(resolved.label, item.label);
    assert_eq!(resolved.detail, item.detail);
    assert_eq!(resolved.kind, item.kind);
}

#[test]
fn test_resolve_description_only_entry() {
    // "math.round" has a description but is not offered in the list
    let item = CompletionItem {
        label: "math.round".to_string(),
        ..Default::default()
    };
    let resolved = resolve_completion(&SymbolTables::buglang(), item);
    assert_eq!(
        resolved.documentation,
        Some(Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: "Rounds a number to the specified decimal places.".to_string(),
        }))
    );
}

#[rstest]
#[case("synthetic_unknown")]
#[case("console")]
#[case("Class")]
fn test_resolve_unknown_label_unchanged(#[case] label: &str) {
    let item = CompletionItem {
        label: label.to_string(),
        kind: Some(CompletionItemKind::FUNCTION),
        detail: Some("detail".to_string()),
        documentation: Some(Documentation::String("kept".to_string())),
        ..Default::default()
    };
    assert_eq!(resolve_completion(&SymbolTables::buglang(), item.clone()), item);
}
