//! Plain-text and CSV exports

use std::io::Write;
use std::path::Path;

use office_mcp_core::{Block, CellAddress, Document, ListKind, Workbook, Worksheet};

use crate::error::{OoxmlError, OoxmlResult};

/// CSV export of a workbook's first worksheet
///
/// CSV holds a single grid, so the other sheets, formatting and charts are
/// dropped. Formulas export their source text.
pub struct CsvExporter;

impl CsvExporter {
    /// Write the first worksheet to a CSV file
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> OoxmlResult<()> {
        let mut buffer = Vec::new();
        Self::write(workbook, &mut buffer)?;
        std::fs::write(path, buffer)?;
        Ok(())
    }

    /// Write the first worksheet to a writer
    pub fn write<W: Write>(workbook: &Workbook, writer: W) -> OoxmlResult<()> {
        let sheet = workbook
            .worksheets()
            .next()
            .ok_or_else(|| OoxmlError::InvalidContent("workbook has no worksheets".into()))?;
        Self::write_sheet(sheet, writer)
    }

    /// Write one worksheet to a writer
    pub fn write_sheet<W: Write>(worksheet: &Worksheet, writer: W) -> OoxmlResult<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        if let Some(range) = worksheet.used_range() {
            for row in range.start.row..=range.end.row {
                let mut record = Vec::new();

                for col in range.start.col..=range.end.col {
                    let value = worksheet.value(CellAddress::new(row, col));
                    record.push(value.to_display_string());
                }

                csv_writer.write_record(&record)?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// Plain-text export of a document
///
/// One line per heading or paragraph, bullets as `• ` and numbered items as
/// `1. `, table cells separated by tabs. Blocks are separated by a blank line.
pub struct TextExporter;

impl TextExporter {
    pub fn write_file<P: AsRef<Path>>(document: &Document, path: P) -> OoxmlResult<()> {
        std::fs::write(path, Self::render(document))?;
        Ok(())
    }

    pub fn render(document: &Document) -> String {
        let mut sections = Vec::with_capacity(document.blocks().len());
        for block in document.blocks() {
            let text = match block {
                Block::Heading { text, .. } | Block::Paragraph { text, .. } => text.clone(),
                Block::List { items, kind, .. } => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| match kind {
                        ListKind::Bullet => format!("• {item}"),
                        ListKind::Number => format!("{}. {item}", i + 1),
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
                Block::Table(table) => table
                    .cells()
                    .iter()
                    .map(|row| row.join("\t"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            };
            sections.push(text);
        }
        let mut out = sections.join("\n\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}
