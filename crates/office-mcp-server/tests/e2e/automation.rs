//! Sessions bound to a live application through a scripted runner.

use office_mcp_server::ErrorKind;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{automation_dispatcher, call, fail, Reply};

#[tokio::test]
async fn test_running_application_gets_the_session() {
    let (dispatcher, runner) = automation_dispatcher(vec![
        Reply::Output("true"),
        Reply::Output("Presentation1"),
        Reply::Output("2"),
        Reply::Output(""),
        Reply::Output(""),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.pdf");

    let created = call(&dispatcher, "create_presentation", json!({"title": "Deck"})).await;
    assert_eq!(created["backend"], json!("automation"));
    let id = created["id"].as_str().unwrap().to_string();

    let slide = call(&dispatcher, "add_slide", json!({"id": id})).await;
    assert_eq!(slide["slide_id"], json!(257));
    assert_eq!(slide["index"], json!(1));

    call(
        &dispatcher,
        "add_speaker_notes",
        json!({"id": id, "slide_id": 257, "notes": "Keep it short"}),
    )
    .await;

    let saved = call(
        &dispatcher,
        "save_presentation",
        json!({"id": id, "file_path": path.to_string_lossy(), "format": "pdf"}),
    )
    .await;
    assert_eq!(saved["format"], json!("pdf"));

    let scripts = runner.scripts();
    assert_eq!(scripts.len(), 5);
    assert!(scripts[3].contains("slide 2 of presentation"), "{}", scripts[3]);

    let info = call(&dispatcher, "get_session_info", json!({"id": id})).await;
    assert_eq!(info["dirty"], json!(false));
    assert_eq!(info["content"]["slide_ids"], json!([256, 257]));
}

#[tokio::test]
async fn test_template_slides_are_counted_on_open() {
    let (dispatcher, runner) = automation_dispatcher(vec![
        Reply::Output("true"),
        Reply::Output("Deck"),
        Reply::Output("3"),
        Reply::Output("4"),
        Reply::Output(""),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("deck.pptx");
    std::fs::write(&template, b"placeholder").unwrap();

    let created = call(
        &dispatcher,
        "create_presentation",
        json!({"title": "Deck", "template_path": template.to_string_lossy()}),
    )
    .await;
    assert_eq!(created["backend"], json!("automation"));
    let id = created["id"].as_str().unwrap().to_string();

    let slide = call(&dispatcher, "add_slide", json!({"id": id})).await;
    assert_eq!(slide["slide_id"], json!(259));
    assert_eq!(slide["index"], json!(3));

    call(
        &dispatcher,
        "add_text_to_slide",
        json!({"id": id, "slide_id": 259, "text": "Agenda"}),
    )
    .await;
    let scripts = runner.scripts();
    assert!(scripts[4].contains("slide 4 of presentation"), "{}", scripts[4]);

    let info = call(&dispatcher, "get_session_info", json!({"id": id})).await;
    assert_eq!(info["content"]["slide_ids"], json!([256, 257, 258, 259]));
}

#[tokio::test]
async fn test_template_sheets_are_listed_on_open() {
    let (dispatcher, runner) = automation_dispatcher(vec![
        Reply::Output("true"),
        Reply::Output("Budget"),
        Reply::Output("Summary\nData\n"),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("budget.xlsx");
    std::fs::write(&template, b"placeholder").unwrap();

    let created = call(
        &dispatcher,
        "create_workbook",
        json!({"title": "Budget", "template_path": template.to_string_lossy()}),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let listed = call(&dispatcher, "list_worksheets", json!({"id": id})).await;
    assert_eq!(listed["sheets"], json!(["Summary", "Data"]));

    let kind = fail(&dispatcher, "add_worksheet", json!({"id": id, "name": "summary"})).await;
    assert_eq!(kind, ErrorKind::InvalidParameters);
    assert_eq!(runner.scripts().len(), 3);
}

#[tokio::test]
async fn test_stopped_application_falls_back_to_library() {
    let (dispatcher, runner) = automation_dispatcher(vec![Reply::Output("false")]);

    let created = call(&dispatcher, "create_workbook", json!({"title": "Budget"})).await;
    assert_eq!(created["backend"], json!("library"));
    assert_eq!(runner.scripts().len(), 1);
}

#[tokio::test]
async fn test_failed_create_switches_kind_to_library() {
    let (dispatcher, runner) = automation_dispatcher(vec![
        Reply::Output("true"),
        Reply::Fail("execution error: Microsoft Word got an error: boom (-2700)"),
        Reply::Output("false"),
        Reply::Output("false"),
        Reply::Output("false"),
    ]);

    let kind = fail(&dispatcher, "create_document", json!({"title": "Memo"})).await;
    assert_eq!(kind, ErrorKind::AutomationUnavailable);
    let listed = call(&dispatcher, "list_active_documents", Value::Null).await;
    assert_eq!(listed["count"], json!(0));

    // No availability check this time
    let created = call(&dispatcher, "create_document", json!({"title": "Memo"})).await;
    assert_eq!(created["backend"], json!("library"));
    assert_eq!(runner.scripts().len(), 2);

    // Checking the applications forgets the failure
    let status = call(&dispatcher, "check_office_status", Value::Null).await;
    assert_eq!(status["automation_enabled"], json!(true));
    assert_eq!(status["document"]["running"], json!(false));
    assert_eq!(runner.scripts().len(), 5);

    // The runner has no replies left, so the availability check fails and the library is used
    let created = call(&dispatcher, "create_document", json!({"title": "Again"})).await;
    assert_eq!(created["backend"], json!("library"));
    assert_eq!(runner.scripts().len(), 6);
}

#[tokio::test]
async fn test_live_workbook_sheets() {
    let (dispatcher, runner) = automation_dispatcher(vec![
        Reply::Output("true"),
        Reply::Output("Book1"),
        Reply::Output(""),
        Reply::Output("2"),
    ]);

    let created = call(&dispatcher, "create_workbook", json!({"title": "Budget"})).await;
    let id = created["id"].as_str().unwrap().to_string();

    call(
        &dispatcher,
        "write_cell",
        json!({"id": id, "sheet_name": "Sheet1", "cell": "B2", "value": 42}),
    )
    .await;

    // Rejected before any script runs
    let kind = fail(&dispatcher, "add_worksheet", json!({"id": id, "name": "sheet1"})).await;
    assert_eq!(kind, ErrorKind::InvalidParameters);
    assert_eq!(runner.scripts().len(), 3);

    call(&dispatcher, "add_worksheet", json!({"id": id, "name": "Data"})).await;
    let listed = call(&dispatcher, "list_worksheets", json!({"id": id})).await;
    assert_eq!(listed["sheets"], json!(["Sheet1", "Data"]));
}

#[tokio::test]
async fn test_open_windows() {
    let (dispatcher, _runner) = automation_dispatcher(vec![Reply::Output("Deck.pptx\nNotes.pptx\n")]);

    let listed = call(&dispatcher, "list_open_windows", json!({"kind": "powerpoint"})).await;
    assert_eq!(listed["kind"], json!("presentation"));
    assert_eq!(listed["application"], json!("Microsoft PowerPoint"));
    assert_eq!(listed["documents"], json!(["Deck.pptx", "Notes.pptx"]));
}

#[tokio::test]
async fn test_permission_denied_reported_as_unavailable() {
    let (dispatcher, _runner) = automation_dispatcher(vec![Reply::Fail(
        "execution error: Not authorized to send Apple events to Microsoft Excel. (-1743)",
    )]);

    let kind = fail(&dispatcher, "list_open_windows", json!({"kind": "excel"})).await;
    assert_eq!(kind, ErrorKind::AutomationUnavailable);
}
