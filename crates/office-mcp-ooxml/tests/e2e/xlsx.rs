//! XLSX write/read-back tests.

use std::io::Cursor;

use office_mcp_core::{
    CellAddress, CellFormat, CellRange, CellValue, Chart, ChartType, Color, HorizontalAlignment,
    VerticalAlignment, Workbook,
};
use office_mcp_ooxml::{XlsxReader, XlsxWriter};
use pretty_assertions::assert_eq;

use crate::common::{part_names, part_text, props};

fn header_format() -> CellFormat {
    CellFormat {
        bold: true,
        font_size: Some(14),
        font_name: Some("Arial".into()),
        font_color: Some(Color::rgb(0xFF, 0xFF, 0xFF)),
        fill_color: Some(Color::rgb(0x1F, 0x4E, 0x79)),
        horizontal: Some(HorizontalAlignment::Center),
        vertical: Some(VerticalAlignment::Center),
        wrap_text: true,
        border: true,
        ..Default::default()
    }
}

fn sample_workbook() -> Workbook {
    let mut workbook = Workbook::new("Budget");
    let sheet = workbook.worksheet_by_name_mut("Sheet1").unwrap();
    sheet
        .write_rows(
            CellAddress::parse("A2").unwrap(),
            vec![vec![CellValue::string("Month"), CellValue::string("Spend")]],
            Some(header_format()),
        )
        .unwrap();
    sheet
        .write_rows(
            CellAddress::parse("A3").unwrap(),
            vec![
                vec![CellValue::string("Jan"), CellValue::Number(1200.5)],
                vec![CellValue::string("Feb"), CellValue::Number(-3.0)],
            ],
            None,
        )
        .unwrap();
    sheet.set_value("B5", CellValue::formula("SUM(B3:B4)")).unwrap();
    sheet.set_value("C5", CellValue::Boolean(false)).unwrap();
    sheet.add_chart(
        Chart::new(
            ChartType::Column,
            CellRange::parse("A2:B4").unwrap(),
            CellAddress::parse("E2").unwrap(),
        )
        .with_title("Spend"),
    );

    workbook.add_worksheet("Q2 & Q3", None).unwrap();
    workbook
        .worksheet_by_name_mut("Q2 & Q3")
        .unwrap()
        .set_value("A1", CellValue::string("  padded <text>  "))
        .unwrap();
    workbook
}

fn write(workbook: &Workbook) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    XlsxWriter::write(workbook, &props(workbook.title()), &mut buffer).unwrap();
    buffer.into_inner()
}

#[test]
fn test_package_parts() {
    let bytes = write(&sample_workbook());
    let names = part_names(&bytes);
    for part in [
        "[Content_Types].xml",
        "xl/workbook.xml",
        "xl/styles.xml",
        "xl/worksheets/sheet1.xml",
        "xl/worksheets/sheet2.xml",
        "xl/worksheets/_rels/sheet1.xml.rels",
        "xl/drawings/drawing1.xml",
        "xl/charts/chart1.xml",
    ] {
        assert!(names.iter().any(|n| n == part), "missing {part}");
    }
    assert!(!names.iter().any(|n| n == "xl/worksheets/_rels/sheet2.xml.rels"));

    let workbook_xml = part_text(&bytes, "xl/workbook.xml");
    assert!(workbook_xml.contains(r#"<sheet name="Q2 &amp; Q3" sheetId="2" r:id="rId2"/>"#));

    let chart = part_text(&bytes, "xl/charts/chart1.xml");
    assert!(chart.contains("<c:f>&apos;Sheet1&apos;!$B$3:$B$4</c:f>"));
}

#[test]
fn test_round_trip() {
    let workbook = sample_workbook();
    let read = XlsxReader::read(Cursor::new(write(&workbook)), "Budget").unwrap();

    assert_eq!(read.sheet_names(), vec!["Sheet1", "Q2 & Q3"]);
    for original in workbook.worksheets() {
        let sheet = read.worksheet_by_name(original.name()).unwrap();
        let expected: Vec<_> = original.cells().collect();
        let actual: Vec<_> = sheet.cells().collect();
        assert_eq!(actual, expected, "sheet {}", original.name());
    }

    // Charts stay in the file but are not imported
    assert!(read.worksheet_by_name("Sheet1").unwrap().charts().is_empty());
}

#[test]
fn test_write_file_and_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.xlsx");

    XlsxWriter::write_file(&sample_workbook(), &props("Budget"), &path).unwrap();
    let read = XlsxReader::read_file(&path, "Imported").unwrap();

    assert_eq!(read.title(), "Imported");
    assert_eq!(
        read.worksheet_by_name("Sheet1")
            .unwrap()
            .value(CellAddress::parse("B5").unwrap()),
        CellValue::formula("SUM(B3:B4)")
    );
}

#[test]
fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(XlsxReader::read_file(dir.path().join("nope.xlsx"), "x").is_err());
}
