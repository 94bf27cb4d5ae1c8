//! Bridge facade tests.

use std::path::Path;

use office_mcp_automation::{AppStatus, AutomationError, Command, LiveDocument};
use office_mcp_core::{DocumentKind, SlideLayout};
use pretty_assertions::assert_eq;

use crate::common::{scripted_bridge, Reply};

#[tokio::test]
async fn test_status_of_running_app() {
    let (bridge, runner) = scripted_bridge(vec![Reply::Output("true"), Reply::Output("16.89")]);

    let status = bridge.status(DocumentKind::Presentation).await;
    assert_eq!(
        status,
        AppStatus {
            running: true,
            version: Some("16.89".into()),
        }
    );

    let scripts = runner.scripts();
    assert_eq!(scripts.len(), 2);
    assert!(scripts[0].contains("System Events"));
    assert!(scripts[1].starts_with("tell application \"Microsoft PowerPoint\""));
}

#[tokio::test]
async fn test_status_of_stopped_app_skips_version() {
    let (bridge, runner) = scripted_bridge(vec![Reply::Output("false")]);
    assert_eq!(bridge.status(DocumentKind::Workbook).await, AppStatus::default());
    assert_eq!(runner.scripts().len(), 1);
}

#[tokio::test]
async fn test_status_when_permission_denied() {
    let (bridge, _) = scripted_bridge(vec![Reply::Fail(
        "execution error: Not authorized to send Apple events to System Events. (-1743)",
    )]);
    assert_eq!(bridge.status(DocumentKind::Document).await, AppStatus::default());
}

#[tokio::test]
async fn test_is_running_rejects_garbage() {
    let (bridge, _) = scripted_bridge(vec![Reply::Output("maybe")]);
    let err = bridge.is_running(DocumentKind::Document).await.unwrap_err();
    assert!(matches!(err, AutomationError::UnexpectedOutput(_)));
}

#[tokio::test]
async fn test_create_returns_live_document() {
    let (bridge, runner) = scripted_bridge(vec![Reply::Output("Document1")]);
    let doc = bridge.create(DocumentKind::Document, "Minutes").await.unwrap();
    assert_eq!(
        doc,
        LiveDocument {
            kind: DocumentKind::Document,
            name: "Document1".into(),
        }
    );
    assert!(runner.scripts()[0].contains("insert text \"Minutes\" at end of text object of newDoc"));
}

#[tokio::test]
async fn test_create_without_name_fails() {
    let (bridge, _) = scripted_bridge(vec![Reply::Output("")]);
    let err = bridge.create(DocumentKind::Workbook, "Budget").await.unwrap_err();
    assert!(matches!(err, AutomationError::UnexpectedOutput(_)));
}

#[tokio::test]
async fn test_open_template() {
    let (bridge, runner) = scripted_bridge(vec![Reply::Output("Pitch.potx")]);
    let doc = bridge
        .open(DocumentKind::Presentation, Path::new("/Users/me/Pitch.potx"))
        .await
        .unwrap();
    assert_eq!(doc.name, "Pitch.potx");
    assert!(runner.scripts()[0].contains("open POSIX file \"/Users/me/Pitch.potx\""));
}

#[tokio::test]
async fn test_list_open() {
    let (bridge, _) = scripted_bridge(vec![Reply::Output("Book1\nQ3 Budget.xlsx\n")]);
    let names: Vec<_> = bridge
        .list_open(DocumentKind::Workbook)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["Book1", "Q3 Budget.xlsx"]);
}

#[tokio::test]
async fn test_add_slide_index() {
    let (bridge, _) = scripted_bridge(vec![Reply::Output("3"), Reply::Output("zero")]);
    assert_eq!(
        bridge
            .add_slide("Presentation1", SlideLayout::TitleOnly, None)
            .await
            .unwrap(),
        3
    );
    assert!(bridge
        .add_slide("Presentation1", SlideLayout::TitleOnly, None)
        .await
        .is_err());
}

#[tokio::test]
async fn test_unsupported_save_format_never_runs() {
    let (bridge, runner) = scripted_bridge(vec![]);
    let err = bridge
        .execute(&Command::Save {
            kind: DocumentKind::Presentation,
            document: "Presentation1".into(),
            path: "/tmp/deck.key".into(),
            format: "key".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AutomationError::Unsupported(_)));
    assert!(runner.scripts().is_empty());
}

#[tokio::test]
async fn test_script_failure_surfaces() {
    let (bridge, _) = scripted_bridge(vec![Reply::Fail(
        "execution error: Microsoft Word got an error: Application isn't running. (-600)",
    )]);
    let err = bridge
        .execute(&Command::AppendParagraphs {
            document: "Document1".into(),
            paragraphs: vec!["hello".into()],
            style: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AutomationError::ApplicationUnavailable(_)));
}

#[tokio::test]
async fn test_opened_document_contents() {
    let (bridge, runner) = scripted_bridge(vec![
        Reply::Output("3"),
        Reply::Output("Summary\nQ1\nQ2\n"),
        Reply::Output("three"),
    ]);

    assert_eq!(bridge.slide_count("Deck").await.unwrap(), 3);
    assert_eq!(
        bridge.worksheet_names("Budget").await.unwrap(),
        vec!["Summary", "Q1", "Q2"]
    );
    assert!(matches!(
        bridge.slide_count("Deck").await,
        Err(AutomationError::UnexpectedOutput(_))
    ));

    let scripts = runner.scripts();
    assert!(scripts[0].contains("count of slides of presentation \"Deck\""));
    assert!(scripts[1].contains("every worksheet of workbook \"Budget\""));
}
