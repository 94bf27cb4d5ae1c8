//! Session lifecycle through the dispatcher.

use office_mcp_server::ErrorKind;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{call, create, fail, library_dispatcher};

#[tokio::test]
async fn test_unknown_session_for_every_targeted_operation() {
    let dispatcher = library_dispatcher();
    let requests = [
        ("add_slide", json!({"presentation_id": "nope"})),
        ("add_text_to_slide", json!({"id": "nope", "slide_id": 256, "text": "x"})),
        ("add_speaker_notes", json!({"id": "nope", "slide_id": 256, "notes": "x"})),
        (
            "add_image_to_slide",
            json!({"id": "nope", "slide_id": 256, "image_source": "/tmp/never.png"}),
        ),
        ("save_presentation", json!({"id": "nope", "file_path": "/tmp/never.pptx"})),
        ("add_heading", json!({"document_id": "nope", "text": "x"})),
        ("add_paragraph", json!({"id": "nope", "text": "x"})),
        ("add_list", json!({"id": "nope", "items": ["a"]})),
        ("add_table", json!({"id": "nope", "rows": 1, "columns": 1})),
        ("save_document", json!({"id": "nope", "file_path": "/tmp/never.docx"})),
        ("add_worksheet", json!({"workbook_id": "nope", "name": "Data"})),
        ("write_cell", json!({"id": "nope", "sheet_name": "Sheet1", "cell": "A1", "value": 1})),
        (
            "write_range",
            json!({"id": "nope", "sheet_name": "Sheet1", "start_cell": "A1", "data": [[1]]}),
        ),
        (
            "add_formula",
            json!({"id": "nope", "sheet_name": "Sheet1", "cell": "A2", "formula": "=A1"}),
        ),
        (
            "create_chart",
            json!({"id": "nope", "sheet_name": "Sheet1", "chart_type": "bar", "data_range": "A1:B2"}),
        ),
        ("save_workbook", json!({"id": "nope", "file_path": "/tmp/never.xlsx"})),
        ("get_session_info", json!({"id": "nope"})),
        ("close_session", json!({"id": "nope"})),
        ("list_worksheets", json!({"id": "nope"})),
    ];
    for (name, params) in requests {
        assert_eq!(fail(&dispatcher, name, params).await, ErrorKind::SessionNotFound, "{name}");
    }
}

#[tokio::test]
async fn test_kind_mismatch_leaves_session_untouched() {
    let dispatcher = library_dispatcher();
    let id = create(&dispatcher, "create_workbook", json!({"title": "Budget"})).await;

    let kind = fail(&dispatcher, "add_heading", json!({"id": id, "text": "Intro"})).await;
    assert_eq!(kind, ErrorKind::KindMismatch);
    let kind = fail(&dispatcher, "save_document", json!({"id": id, "file_path": "/tmp/x.docx"})).await;
    assert_eq!(kind, ErrorKind::KindMismatch);

    let info = call(&dispatcher, "get_session_info", json!({"id": id})).await;
    assert_eq!(info["dirty"], json!(false));
    assert_eq!(info["content"]["sheets"], json!(["Sheet1"]));
}

#[tokio::test]
async fn test_listing_keeps_creation_order() {
    let dispatcher = library_dispatcher();
    let a = create(&dispatcher, "create_document", json!({"title": "A"})).await;
    let b = create(&dispatcher, "create_document", json!({"title": "B"})).await;
    let c = create(&dispatcher, "create_document", json!({"title": "C"})).await;
    create(&dispatcher, "create_workbook", json!({"title": "Other kind"})).await;

    let ids = |response: &serde_json::Map<String, Value>| -> Vec<String> {
        response["sessions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap().to_string())
            .collect()
    };

    let listed = call(&dispatcher, "list_active_documents", Value::Null).await;
    assert_eq!(listed["count"], json!(3));
    assert_eq!(ids(&listed), vec![a.clone(), b.clone(), c.clone()]);

    call(&dispatcher, "close_session", json!({"id": b})).await;
    let listed = call(&dispatcher, "list_active_documents", Value::Null).await;
    assert_eq!(ids(&listed), vec![a, c]);
}

#[tokio::test]
async fn test_close_reports_unsaved_changes() {
    let dispatcher = library_dispatcher();
    let id = create(&dispatcher, "create_document", json!({})).await;
    call(&dispatcher, "add_paragraph", json!({"id": id, "text": "Draft"})).await;

    let closed = call(&dispatcher, "close_session", json!({"id": id})).await;
    assert_eq!(closed["unsaved_changes"], json!(true));
    assert_eq!(fail(&dispatcher, "close_session", json!({"id": id})).await, ErrorKind::SessionNotFound);
}

#[tokio::test]
async fn test_ids_are_unique() {
    let dispatcher = library_dispatcher();
    let mut ids = std::collections::HashSet::new();
    for _ in 0..20 {
        ids.insert(create(&dispatcher, "create_presentation", json!({"title": "Deck"})).await);
    }
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn test_unknown_operation_and_bad_params() {
    let dispatcher = library_dispatcher();
    assert_eq!(fail(&dispatcher, "delete_everything", json!({})).await, ErrorKind::InvalidParameters);
    // title is required for presentations
    assert_eq!(fail(&dispatcher, "create_presentation", json!({})).await, ErrorKind::InvalidParameters);
    assert_eq!(
        fail(&dispatcher, "create_workbook", json!({"title": 7})).await,
        ErrorKind::InvalidParameters
    );
}

#[tokio::test]
async fn test_server_status_tracks_sessions() {
    let dispatcher = library_dispatcher();
    let id = create(&dispatcher, "create_presentation", json!({"title": "Deck"})).await;
    create(&dispatcher, "create_workbook", json!({"title": "Budget"})).await;

    let status = call(&dispatcher, "server_status", Value::Null).await;
    assert_eq!(
        status["active_sessions"],
        json!({"presentation": 1, "document": 0, "workbook": 1})
    );
    assert_eq!(status["total_sessions"], json!(2));
    assert_eq!(status["automation_enabled"], json!(false));

    call(&dispatcher, "close_session", json!({"id": id})).await;
    let status = call(&dispatcher, "server_status", Value::Null).await;
    assert_eq!(status["total_sessions"], json!(1));
}
