//! DOCX write/read-back tests.

use std::io::Cursor;

use office_mcp_core::{Block, Color, Document, ListKind, Table, TextAlignment, TextFormat};
use office_mcp_ooxml::{DocxReader, DocxWriter};
use pretty_assertions::assert_eq;

use crate::common::{part_names, part_text, props};

fn sample_document() -> Document {
    let mut document = Document::new("Quarterly Report");
    document.add_heading("Summary", 2, None).unwrap();
    document.add_paragraph(
        "Revenue grew 12% & costs held",
        None,
        TextFormat {
            font_size: Some(12),
            font_name: Some("Arial".into()),
            bold: Some(true),
            italic: None,
            color: Some(Color::rgb(0xC0, 0x00, 0x00)),
            alignment: Some(TextAlignment::Center),
        },
    );
    document
        .add_list(vec!["North".into(), "South".into()], ListKind::Bullet, None)
        .unwrap();
    document
        .add_list(vec!["Plan".into(), "Execute".into()], ListKind::Number, None)
        .unwrap();
    document.add_table(
        Table::new(
            2,
            2,
            Some(vec![
                vec!["Region".into(), "Revenue".into()],
                vec!["North".into(), "1.2M".into()],
            ]),
            None,
        )
        .unwrap(),
    );
    document.add_paragraph("Done is better than perfect", Some("Quote".into()), TextFormat::default());
    document
}

fn write(document: &Document) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DocxWriter::write(document, &props(document.title()), &mut buffer).unwrap();
    buffer.into_inner()
}

#[test]
fn test_package_parts() {
    let bytes = write(&sample_document());
    let names = part_names(&bytes);
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "word/document.xml",
        "word/styles.xml",
        "word/numbering.xml",
        "word/_rels/document.xml.rels",
    ] {
        assert!(names.iter().any(|n| n == part), "missing {part}");
    }

    let body = part_text(&bytes, "word/document.xml");
    assert!(body.contains("Revenue grew 12% &amp; costs held"));
    assert!(body.contains(r#"<w:pStyle w:val="Heading2"/>"#));
}

#[test]
fn test_round_trip() {
    let document = sample_document();
    let read = DocxReader::read(Cursor::new(write(&document)), "Quarterly Report").unwrap();
    assert_eq!(read, document);
}

#[test]
fn test_numbered_lists_stay_separate() {
    let mut document = Document::empty("Lists");
    document
        .add_list(vec!["a".into()], ListKind::Number, None)
        .unwrap();
    document
        .add_list(vec!["b".into()], ListKind::Number, None)
        .unwrap();

    let read = DocxReader::read(Cursor::new(write(&document)), "Lists").unwrap();
    assert_eq!(read.list_count(), 2);
}

#[test]
fn test_trailing_table() {
    let mut document = Document::empty("Grid");
    document.add_table(Table::new(1, 3, None, None).unwrap());

    let bytes = write(&document);
    let body = part_text(&bytes, "word/document.xml");
    assert!(body.contains("</w:tbl><w:p/>"));

    let read = DocxReader::read(Cursor::new(bytes), "Grid").unwrap();
    match read.blocks() {
        [Block::Table(table)] => {
            assert_eq!(table.rows(), 1);
            assert_eq!(table.cols(), 3);
        }
        other => panic!("unexpected blocks: {other:?}"),
    }
}

#[test]
fn test_write_file_and_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.docx");
    let document = sample_document();

    DocxWriter::write_file(&document, &props("Quarterly Report"), &path).unwrap();
    let read = DocxReader::read_file(&path, "Imported").unwrap();

    assert_eq!(read.title(), "Imported");
    assert_eq!(read.blocks(), document.blocks());
}

#[test]
fn test_control_characters_rejected_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.docx");
    let mut document = Document::empty("Bad");
    document.add_paragraph("bell \u{7}", None, TextFormat::default());

    assert!(DocxWriter::write_file(&document, &props("Bad"), &path).is_err());
    assert!(!path.exists());
}
