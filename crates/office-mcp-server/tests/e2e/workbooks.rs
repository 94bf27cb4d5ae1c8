//! Workbooks on the library backend.

use office_mcp_core::{CellAddress, CellValue};
use office_mcp_ooxml::XlsxReader;
use office_mcp_server::ErrorKind;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{call, create, fail, library_dispatcher};

fn a1(s: &str) -> CellAddress {
    CellAddress::parse(s).unwrap()
}

#[tokio::test]
async fn test_budget_round_trip() {
    let dispatcher = library_dispatcher();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.xlsx");

    let id = create(&dispatcher, "create_workbook", json!({"title": "Budget"})).await;
    let range = call(
        &dispatcher,
        "write_range",
        json!({
            "workbook_id": id,
            "sheet_name": "Sheet1",
            "start_cell": "A2",
            "data": [["Q1", 10], ["Q2", 20.5]],
        }),
    )
    .await;
    assert_eq!(range["range"], json!("A2:B3"));
    assert_eq!(range["rows_written"], json!(2));

    let formula = call(
        &dispatcher,
        "add_formula",
        json!({"id": id, "sheet_name": "Sheet1", "cell": "B4", "formula": "SUM(B2:B3)"}),
    )
    .await;
    assert_eq!(formula["formula"], json!("=SUM(B2:B3)"));

    let chart = call(
        &dispatcher,
        "create_chart",
        json!({"id": id, "sheet_name": "Sheet1", "chart_type": "column", "data_range": "A2:B3"}),
    )
    .await;
    assert_eq!(chart["chart_index"], json!(0));
    assert_eq!(chart["position"], json!("E5"));

    call(&dispatcher, "save_workbook", json!({"id": id, "file_path": path.to_string_lossy()})).await;

    let read = XlsxReader::read_file(&path, "Budget").unwrap();
    let sheet = read.worksheet_by_name("Sheet1").unwrap();
    assert_eq!(sheet.value(a1("A1")), CellValue::String("Budget".into()));
    assert_eq!(sheet.value(a1("A3")), CellValue::String("Q2".into()));
    assert_eq!(sheet.value(a1("B2")), CellValue::Number(10.0));
    assert_eq!(sheet.value(a1("B3")), CellValue::Number(20.5));
}

#[tokio::test]
async fn test_out_of_range_cell_changes_nothing() {
    let dispatcher = library_dispatcher();
    let dir = tempfile::tempdir().unwrap();
    let id = create(&dispatcher, "create_workbook", json!({"title": "Budget"})).await;

    let before = dir.path().join("before.xlsx");
    call(&dispatcher, "save_workbook", json!({"id": id, "file_path": before.to_string_lossy()})).await;

    let kind = fail(
        &dispatcher,
        "write_cell",
        json!({"id": id, "sheet_name": "Sheet1", "cell": "Z9999999", "value": 1}),
    )
    .await;
    assert_eq!(kind, ErrorKind::InvalidParameters);

    let info = call(&dispatcher, "get_session_info", json!({"id": id})).await;
    assert_eq!(info["dirty"], json!(false));

    let after = dir.path().join("after.xlsx");
    call(&dispatcher, "save_workbook", json!({"id": id, "file_path": after.to_string_lossy()})).await;
    assert_eq!(std::fs::read(before).unwrap(), std::fs::read(after).unwrap());
}

#[tokio::test]
async fn test_worksheets() {
    let dispatcher = library_dispatcher();
    let id = create(&dispatcher, "create_workbook", json!({"title": "Budget"})).await;

    let added = call(&dispatcher, "add_worksheet", json!({"id": id, "name": "Data"})).await;
    assert_eq!(added["sheet_index"], json!(1));
    call(&dispatcher, "add_worksheet", json!({"id": id, "name": "Summary", "position": 0})).await;

    let listed = call(&dispatcher, "list_worksheets", json!({"workbook_id": id})).await;
    assert_eq!(listed["sheets"], json!(["Summary", "Sheet1", "Data"]));
    assert_eq!(listed["count"], json!(3));

    let kind = fail(&dispatcher, "add_worksheet", json!({"id": id, "name": "data"})).await;
    assert_eq!(kind, ErrorKind::InvalidParameters);
    let kind = fail(&dispatcher, "add_worksheet", json!({"id": id, "name": "a/b"})).await;
    assert_eq!(kind, ErrorKind::InvalidParameters);
    let kind = fail(&dispatcher, "add_worksheet", json!({"id": id, "name": "x".repeat(32)})).await;
    assert_eq!(kind, ErrorKind::InvalidParameters);
}

#[tokio::test]
async fn test_unknown_sheet_and_chart_type() {
    let dispatcher = library_dispatcher();
    let id = create(&dispatcher, "create_workbook", json!({"title": "Budget"})).await;

    let kind = fail(
        &dispatcher,
        "write_cell",
        json!({"id": id, "sheet_name": "Missing", "cell": "A1", "value": "x"}),
    )
    .await;
    assert_eq!(kind, ErrorKind::InvalidParameters);

    let kind = fail(
        &dispatcher,
        "create_chart",
        json!({"id": id, "sheet_name": "Sheet1", "chart_type": "radar", "data_range": "A1:B2"}),
    )
    .await;
    assert_eq!(kind, ErrorKind::InvalidParameters);
}

#[tokio::test]
async fn test_csv_export() {
    let dispatcher = library_dispatcher();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.csv");

    let id = create(&dispatcher, "create_workbook", json!({"title": "Budget"})).await;
    call(
        &dispatcher,
        "write_range",
        json!({"id": id, "sheet_name": "Sheet1", "start_cell": "A2", "data": [["North", 3]]}),
    )
    .await;
    let saved = call(
        &dispatcher,
        "save_workbook",
        json!({"id": id, "file_path": path.to_string_lossy(), "format": "csv"}),
    )
    .await;
    assert_eq!(saved["format"], json!("csv"));

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Budget,");
    assert_eq!(lines[1], "North,3");
}
