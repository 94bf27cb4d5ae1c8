//! CSV and plain-text export tests.

use office_mcp_core::{CellValue, Document, ListKind, TextFormat, Workbook};
use office_mcp_ooxml::{CsvExporter, TextExporter};
use pretty_assertions::assert_eq;

#[test]
fn test_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");

    let mut workbook = Workbook::new("Scores");
    let sheet = workbook.worksheet_by_name_mut("Sheet1").unwrap();
    sheet.set_value("A2", CellValue::string("say \"hi\"")).unwrap();
    sheet.set_value("B2", CellValue::Boolean(true)).unwrap();

    CsvExporter::write_file(&workbook, &path).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Scores,\n\"say \"\"hi\"\"\",TRUE\n"
    );
}

#[test]
fn test_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");

    let mut document = Document::new("Notes");
    document.add_paragraph("First line\nsecond line", None, TextFormat::default());
    document
        .add_list(vec!["milk".into(), "eggs".into()], ListKind::Bullet, None)
        .unwrap();

    TextExporter::write_file(&document, &path).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Notes\n\nFirst line\nsecond line\n\n• milk\n• eggs\n"
    );
}
