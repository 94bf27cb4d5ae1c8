//! Word-processing documents, mostly on the library backend.

use std::sync::Arc;
use std::time::Duration;

use office_mcp_core::{Block, ListKind};
use office_mcp_ooxml::DocxReader;
use office_mcp_server::{Dispatcher, ErrorKind};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{call, create, fail, library_dispatcher, slow_automation_dispatcher, Reply};

#[tokio::test]
async fn test_report_saved_as_docx() {
    let dispatcher = library_dispatcher();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.docx");
    let path_str = path.to_string_lossy().into_owned();

    let id = create(&dispatcher, "create_document", json!({"title": "Report"})).await;
    call(&dispatcher, "add_heading", json!({"id": id, "text": "Intro", "level": 1})).await;
    call(&dispatcher, "add_paragraph", json!({"id": id, "text": "Body text"})).await;

    let saved = call(&dispatcher, "save_document", json!({"id": id, "file_path": path_str})).await;
    assert_eq!(
        serde_json::Value::Object(saved),
        json!({"status": "success", "file_path": path_str, "format": "docx"})
    );

    let info = call(&dispatcher, "get_session_info", json!({"id": id})).await;
    assert_eq!(info["dirty"], json!(false));
    assert_eq!(info["file_path"], json!(path_str));

    let read = DocxReader::read_file(&path, "Report").unwrap();
    let texts: Vec<&str> = read
        .blocks()
        .iter()
        .filter_map(|b| match b {
            Block::Heading { text, .. } | Block::Paragraph { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["Report", "Intro", "Body text"]);
}

#[tokio::test]
async fn test_lists_and_tables() {
    let dispatcher = library_dispatcher();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("plan.docx");

    let id = create(&dispatcher, "create_document", json!({})).await;
    let list = call(
        &dispatcher,
        "add_list",
        json!({"id": id, "items": ["Plan", "Execute"], "list_type": "number"}),
    )
    .await;
    assert_eq!(list["list_type"], json!("number"));

    call(
        &dispatcher,
        "add_table",
        json!({"id": id, "rows": 2, "columns": 2, "data": [["Region", "Revenue"], ["North", 1.5]]}),
    )
    .await;

    let info = call(&dispatcher, "get_session_info", json!({"id": id})).await;
    assert_eq!(info["content"], json!({"headings": 0, "paragraphs": 0, "lists": 1, "tables": 1}));

    call(
        &dispatcher,
        "save_document",
        json!({"id": id, "file_path": path.to_string_lossy()}),
    )
    .await;
    let read = DocxReader::read_file(&path, "New Document").unwrap();
    match &read.blocks()[0] {
        Block::List { items, kind, .. } => {
            assert_eq!(items, &vec!["Plan".to_string(), "Execute".to_string()]);
            assert_eq!(*kind, ListKind::Number);
        }
        other => panic!("expected a list, got {other:?}"),
    }
    match &read.blocks()[1] {
        Block::Table(table) => assert_eq!(table.cells()[1], vec!["North".to_string(), "1.5".to_string()]),
        other => panic!("expected a table, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_content_reports_fields() {
    let dispatcher = library_dispatcher();
    let id = create(&dispatcher, "create_document", json!({})).await;

    let kind = fail(&dispatcher, "add_heading", json!({"id": id, "text": "", "level": 9})).await;
    assert_eq!(kind, ErrorKind::InvalidParameters);
    let kind = fail(&dispatcher, "add_list", json!({"id": id, "items": []})).await;
    assert_eq!(kind, ErrorKind::InvalidParameters);
    let kind = fail(&dispatcher, "add_table", json!({"id": id, "rows": 0, "columns": 2})).await;
    assert_eq!(kind, ErrorKind::InvalidParameters);

    let err = dispatcher
        .invoke_named("add_heading", json!({"id": id, "text": "", "level": 9}))
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("text"), "{message}");
    assert!(message.contains("level"), "{message}");

    let info = call(&dispatcher, "get_session_info", json!({"id": id})).await;
    assert_eq!(info["dirty"], json!(false));
}

#[tokio::test]
async fn test_plain_text_export() {
    let dispatcher = library_dispatcher();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memo");

    let id = create(&dispatcher, "create_document", json!({"title": "Memo"})).await;
    call(&dispatcher, "add_paragraph", json!({"id": id, "text": "Ship it"})).await;
    let saved = call(
        &dispatcher,
        "save_document",
        json!({"id": id, "file_path": path.to_string_lossy(), "format": "TXT"}),
    )
    .await;
    assert_eq!(saved["format"], json!("txt"));

    let written = dir.path().join("memo.txt");
    assert_eq!(saved["file_path"], json!(written.to_string_lossy()));
    let text = std::fs::read_to_string(written).unwrap();
    assert!(text.contains("Memo"));
    assert!(text.contains("Ship it"));
}

#[tokio::test]
async fn test_save_rejects_mismatched_extension() {
    let dispatcher = library_dispatcher();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.docx");

    let id = create(&dispatcher, "create_document", json!({"title": "Memo"})).await;
    call(&dispatcher, "add_paragraph", json!({"id": id, "text": "Draft"})).await;
    let kind = fail(
        &dispatcher,
        "save_document",
        json!({"id": id, "file_path": path.to_string_lossy(), "format": "txt"}),
    )
    .await;
    assert_eq!(kind, ErrorKind::InvalidParameters);
    assert!(!path.exists());

    let info = call(&dispatcher, "get_session_info", json!({"id": id})).await;
    assert_eq!(info["dirty"], json!(true));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_mutations_both_land() {
    let dispatcher = Arc::new(library_dispatcher());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.docx");
    let id = create(&dispatcher, "create_document", json!({"title": "Race"})).await;

    let first = tokio::spawn(paragraph(dispatcher.clone(), id.clone(), "one"));
    let second = tokio::spawn(paragraph(dispatcher.clone(), id.clone(), "two"));
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    call(
        &dispatcher,
        "save_document",
        json!({"id": id, "file_path": path.to_string_lossy()}),
    )
    .await;
    let read = DocxReader::read_file(&path, "Race").unwrap();
    let texts: Vec<&str> = read
        .blocks()
        .iter()
        .filter_map(|b| match b {
            Block::Paragraph { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert!(
        texts == vec!["one", "two"] || texts == vec!["two", "one"],
        "{texts:?}"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_live_mutations_run_one_at_a_time() {
    let (dispatcher, runner) = slow_automation_dispatcher(
        vec![
            Reply::Output("true"),
            Reply::Output("Document1"),
            Reply::Output(""),
            Reply::Output(""),
        ],
        Duration::from_millis(50),
    );
    let dispatcher = Arc::new(dispatcher);
    let id = create(&dispatcher, "create_document", json!({"title": "Memo"})).await;

    let first = tokio::spawn(paragraph(dispatcher.clone(), id.clone(), "one"));
    let second = tokio::spawn(paragraph(dispatcher.clone(), id.clone(), "two"));
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let spans = runner.spans();
    assert_eq!(spans.len(), 4);
    let (first_start, first_end) = spans[2];
    let (second_start, _) = spans[3];
    assert!(second_start >= first_end);
    assert!(first_start < first_end);

    let scripts = runner.scripts();
    let appended: Vec<&str> = scripts[2..]
        .iter()
        .map(|script| match (script.contains("\"one\""), script.contains("\"two\"")) {
            (true, false) => "one",
            (false, true) => "two",
            _ => panic!("expected exactly one paragraph in {script}"),
        })
        .collect();
    assert!(
        appended == vec!["one", "two"] || appended == vec!["two", "one"],
        "{appended:?}"
    );
}

async fn paragraph(
    dispatcher: Arc<Dispatcher>,
    id: String,
    text: &str,
) -> office_mcp_server::OfficeResult<office_mcp_server::Response> {
    dispatcher
        .invoke_named("add_paragraph", json!({"id": id, "text": text}))
        .await
}
