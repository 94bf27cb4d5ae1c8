//! Presentations on the library backend.

use office_mcp_core::{Placeholder, Theme};
use office_mcp_ooxml::PptxReader;
use office_mcp_server::ErrorKind;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{call, create, fail, library_dispatcher, PNG_PIXEL};

#[tokio::test]
async fn test_deck_with_image_and_notes() {
    let dispatcher = library_dispatcher();
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("pixel.png");
    std::fs::write(&image, PNG_PIXEL).unwrap();
    let path = dir.path().join("deck.pptx");

    let created = call(
        &dispatcher,
        "create_presentation",
        json!({"title": "Roadmap", "theme": "modern"}),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let slide = call(&dispatcher, "add_slide", json!({"id": id})).await;
    assert_eq!(slide["slide_id"], json!(257));
    assert_eq!(slide["layout"], json!("Title and Content"));

    call(
        &dispatcher,
        "add_text_to_slide",
        json!({"id": id, "slide_id": 257, "text": "Milestones", "placeholder": "title"}),
    )
    .await;
    call(
        &dispatcher,
        "add_text_to_slide",
        json!({"id": id, "slide_id": 257, "text": "Ship v1", "formatting": {"bold": true}}),
    )
    .await;
    let picture = call(
        &dispatcher,
        "add_image_to_slide",
        json!({"id": id, "slide_id": 257, "image_source": image.to_string_lossy()}),
    )
    .await;
    assert_eq!(picture["status"], json!("success"));
    call(
        &dispatcher,
        "add_speaker_notes",
        json!({"id": id, "slide_id": 256, "notes": "Welcome everyone"}),
    )
    .await;

    let info = call(&dispatcher, "get_session_info", json!({"id": id})).await;
    assert_eq!(info["content"]["slide_ids"], json!([256, 257]));
    assert_eq!(info["content"]["theme"], json!("modern"));

    let saved = call(
        &dispatcher,
        "save_presentation",
        json!({"presentation_id": id, "file_path": path.to_string_lossy()}),
    )
    .await;
    assert_eq!(saved["format"], json!("pptx"));

    let read = PptxReader::read_file(&path, "Roadmap", Theme::Modern).unwrap();
    assert_eq!(read.slide_count(), 2);
    let slide = &read.slides()[1];
    let title: Vec<&str> = slide.text(Placeholder::Title).iter().map(|p| p.text.as_str()).collect();
    assert_eq!(title, vec!["Milestones"]);
    assert!(read.slides()[0].has_notes());
}

#[tokio::test]
async fn test_pdf_is_not_written_by_the_library() {
    let dispatcher = library_dispatcher();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.pdf");

    let id = create(&dispatcher, "create_presentation", json!({"title": "Deck"})).await;
    let kind = fail(
        &dispatcher,
        "save_presentation",
        json!({"id": id, "file_path": path.to_string_lossy(), "format": "pdf"}),
    )
    .await;
    assert_eq!(kind, ErrorKind::UnsupportedFormat);
    assert!(!path.exists());

    let info = call(&dispatcher, "get_session_info", json!({"id": id})).await;
    assert_eq!(info["file_path"], json!(null));
}

#[tokio::test]
async fn test_bad_slide_references() {
    let dispatcher = library_dispatcher();
    let id = create(&dispatcher, "create_presentation", json!({"title": "Deck"})).await;

    let kind = fail(
        &dispatcher,
        "add_text_to_slide",
        json!({"id": id, "slide_id": 999, "text": "Lost"}),
    )
    .await;
    assert_eq!(kind, ErrorKind::InvalidParameters);

    let kind = fail(&dispatcher, "add_slide", json!({"id": id, "layout": "Three Columns"})).await;
    assert_eq!(kind, ErrorKind::InvalidParameters);

    let kind = fail(
        &dispatcher,
        "add_image_to_slide",
        json!({"id": id, "slide_id": 256, "image_source": "https://example.com/cat.png"}),
    )
    .await;
    assert_eq!(kind, ErrorKind::InvalidParameters);
}

#[tokio::test]
async fn test_resave_is_byte_identical() {
    let dispatcher = library_dispatcher();
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("one.pptx");
    let second = dir.path().join("two.pptx");

    let id = create(&dispatcher, "create_presentation", json!({"title": "Deck"})).await;
    call(&dispatcher, "add_slide", json!({"id": id, "layout": "title only"})).await;
    call(&dispatcher, "save_presentation", json!({"id": id, "file_path": first.to_string_lossy()})).await;
    call(&dispatcher, "save_presentation", json!({"id": id, "file_path": second.to_string_lossy()})).await;

    assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
}
