//! XLSX (SpreadsheetML) writer and reader

mod chart;
mod reader;
mod styles;

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use office_mcp_core::{CellValue, Workbook, Worksheet};

use crate::error::{OoxmlError, OoxmlResult};
use crate::package::{
    xml_text, ContentTypes, PackageProps, PackageWriter, Relationships, REL_CORE_PROPERTIES,
    REL_OFFICE_DOCUMENT, XML_DECL,
};
use styles::XlsxStyleTable;

pub use reader::XlsxReader;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CT_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
const CT_WORKSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_DRAWING: &str = "application/vnd.openxmlformats-officedocument.drawing+xml";
const CT_CHART: &str = "application/vnd.openxmlformats-officedocument.drawingml.chart+xml";

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    ///
    /// The package is assembled in memory first, so content errors never leave
    /// a partial file behind.
    pub fn write_file<P: AsRef<Path>>(
        workbook: &Workbook,
        props: &PackageProps,
        path: P,
    ) -> OoxmlResult<()> {
        let mut buffer = Cursor::new(Vec::new());
        Self::write(workbook, props, &mut buffer)?;
        std::fs::write(path, buffer.into_inner())?;
        Ok(())
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(
        workbook: &Workbook,
        props: &PackageProps,
        writer: W,
    ) -> OoxmlResult<()> {
        // Build a workbook-wide style table.
        let style_table = XlsxStyleTable::build(workbook);

        // Render sheets up front so bad content fails before anything is written
        let mut sheets = Vec::with_capacity(workbook.sheet_count());
        let mut drawing_count = 0usize;
        let mut chart_count = 0usize;
        for sheet in workbook.worksheets() {
            let drawing = if sheet.charts().is_empty() {
                None
            } else {
                drawing_count += 1;
                let first_chart = chart_count + 1;
                chart_count += sheet.charts().len();
                Some((drawing_count, first_chart))
            };
            sheets.push((Self::worksheet_xml(sheet, &style_table, drawing.is_some())?, drawing));
        }

        let mut package = PackageWriter::new(writer);

        // Write [Content_Types].xml
        let mut types = ContentTypes::new();
        types.add("/xl/workbook.xml", CT_WORKBOOK);
        types.add("/xl/styles.xml", CT_STYLES);
        for i in 1..=workbook.sheet_count() {
            types.add(&format!("/xl/worksheets/sheet{i}.xml"), CT_WORKSHEET);
        }
        for i in 1..=drawing_count {
            types.add(&format!("/xl/drawings/drawing{i}.xml"), CT_DRAWING);
        }
        for i in 1..=chart_count {
            types.add(&format!("/xl/charts/chart{i}.xml"), CT_CHART);
        }
        package.part("[Content_Types].xml", &types.to_xml())?;

        // Write _rels/.rels
        let mut root_rels = Relationships::default();
        root_rels.add(REL_OFFICE_DOCUMENT, "xl/workbook.xml");
        root_rels.add(REL_CORE_PROPERTIES, "docProps/core.xml");
        package.part("_rels/.rels", &root_rels.to_xml())?;
        package.core_props(props)?;

        // Write xl/workbook.xml and its relationships
        package.part("xl/workbook.xml", &Self::workbook_xml(workbook)?)?;
        let mut workbook_rels = Relationships::default();
        for i in 1..=workbook.sheet_count() {
            workbook_rels.add("worksheet", &format!("worksheets/sheet{i}.xml"));
        }
        workbook_rels.add("styles", "styles.xml");
        package.part("xl/_rels/workbook.xml.rels", &workbook_rels.to_xml())?;

        // Write xl/styles.xml
        package.part("xl/styles.xml", &style_table.to_styles_xml()?)?;

        // Write worksheets, then drawings and charts for sheets that have them
        for (i, (sheet, (xml, drawing))) in workbook.worksheets().zip(sheets).enumerate() {
            package.part(&format!("xl/worksheets/sheet{}.xml", i + 1), &xml)?;

            let Some((drawing_id, first_chart)) = drawing else {
                continue;
            };
            let mut sheet_rels = Relationships::default();
            sheet_rels.add("drawing", &format!("../drawings/drawing{drawing_id}.xml"));
            package.part(
                &format!("xl/worksheets/_rels/sheet{}.xml.rels", i + 1),
                &sheet_rels.to_xml(),
            )?;

            let mut drawing_rels = Relationships::default();
            for (n, chart) in sheet.charts().iter().enumerate() {
                let chart_id = first_chart + n;
                drawing_rels.add("chart", &format!("../charts/chart{chart_id}.xml"));
                package.part(
                    &format!("xl/charts/chart{chart_id}.xml"),
                    &chart::chart_xml(sheet.name(), chart)?,
                )?;
            }
            package.part(
                &format!("xl/drawings/drawing{drawing_id}.xml"),
                &chart::drawing_xml(sheet.charts()),
            )?;
            package.part(
                &format!("xl/drawings/_rels/drawing{drawing_id}.xml.rels"),
                &drawing_rels.to_xml(),
            )?;
        }

        package.finish()
    }

    fn workbook_xml(workbook: &Workbook) -> OoxmlResult<String> {
        let mut content = format!(
            r#"{XML_DECL}
<workbook xmlns="{NS_MAIN}" xmlns:r="{NS_R}"><bookViews><workbookView/></bookViews><sheets>"#
        );
        for (i, sheet) in workbook.worksheets().enumerate() {
            content.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                xml_text(sheet.name())?,
                i + 1,
                i + 1
            ));
        }
        content.push_str("</sheets></workbook>");
        Ok(content)
    }

    fn worksheet_xml(
        sheet: &Worksheet,
        style_table: &XlsxStyleTable,
        has_drawing: bool,
    ) -> OoxmlResult<String> {
        let mut content = format!(
            r#"{XML_DECL}
<worksheet xmlns="{NS_MAIN}" xmlns:r="{NS_R}">"#
        );
        if let Some(range) = sheet.used_range() {
            content.push_str(&format!(r#"<dimension ref="{range}"/>"#));
        }
        content.push_str("<sheetData>");

        // Write cell data (sparse, row-major)
        let mut current_row: Option<u32> = None;
        for (addr, cell) in sheet.cells() {
            if current_row != Some(addr.row) {
                if current_row.is_some() {
                    content.push_str("</row>");
                }
                content.push_str(&format!("<row r=\"{}\">", addr.row + 1));
                current_row = Some(addr.row);
            }

            let xf_id = style_table.xf_id_for(cell.format.as_ref());
            let style_attr = if xf_id != 0 {
                format!(" s=\"{xf_id}\"")
            } else {
                String::new()
            };

            match &cell.value {
                CellValue::Number(n) => {
                    if !n.is_finite() {
                        return Err(OoxmlError::InvalidContent(format!(
                            "cell {addr} holds a non-finite number"
                        )));
                    }
                    content.push_str(&format!("<c r=\"{addr}\"{style_attr}><v>{n}</v></c>"));
                }
                CellValue::String(s) => {
                    content.push_str(&format!(
                        "<c r=\"{addr}\"{style_attr} t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                        xml_text(s)?
                    ));
                }
                CellValue::Boolean(b) => {
                    content.push_str(&format!(
                        "<c r=\"{addr}\"{style_attr} t=\"b\"><v>{}</v></c>",
                        u8::from(*b)
                    ));
                }
                CellValue::Formula(text) => {
                    let formula = text.strip_prefix('=').unwrap_or(text);
                    content.push_str(&format!(
                        "<c r=\"{addr}\"{style_attr}><f>{}</f></c>",
                        xml_text(formula)?
                    ));
                }
                // Style-only cell
                CellValue::Empty => content.push_str(&format!("<c r=\"{addr}\"{style_attr}/>")),
            }
        }
        if current_row.is_some() {
            content.push_str("</row>");
        }
        content.push_str("</sheetData>");

        if has_drawing {
            content.push_str(r#"<drawing r:id="rId1"/>"#);
        }
        content.push_str("</worksheet>");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use office_mcp_core::{CellAddress, CellFormat};

    #[test]
    fn test_worksheet_cells() {
        let mut workbook = Workbook::new("Report");
        let sheet = workbook.worksheet_by_name_mut("Sheet1").unwrap();
        sheet.set_value("B2", CellValue::Number(2.5)).unwrap();
        sheet.set_value("C2", CellValue::formula("SUM(A1:B2)")).unwrap();
        sheet.set_value("A3", CellValue::Boolean(true)).unwrap();

        let table = XlsxStyleTable::build(&workbook);
        let sheet = workbook.worksheet_by_name("Sheet1").unwrap();
        let xml = XlsxWriter::worksheet_xml(sheet, &table, false).unwrap();

        assert!(xml.contains(r#"<dimension ref="A1:C3"/>"#));
        assert!(xml.contains(r#"<c r="A1" s="1" t="inlineStr"><is><t xml:space="preserve">Report</t></is></c>"#));
        assert!(xml.contains(r#"<row r="2"><c r="B2"><v>2.5</v></c><c r="C2"><f>SUM(A1:B2)</f></c></row>"#));
        assert!(xml.contains(r#"<c r="A3" t="b"><v>1</v></c>"#));
    }

    #[test]
    fn test_style_only_cell_is_written() {
        let mut workbook = Workbook::empty("x");
        workbook.add_worksheet("Sheet1", None).unwrap();
        workbook
            .worksheet_by_name_mut("Sheet1")
            .unwrap()
            .set_cell(CellAddress::new(0, 0), CellValue::Empty, Some(CellFormat::bold()));
        let table = XlsxStyleTable::build(&workbook);
        let xml =
            XlsxWriter::worksheet_xml(workbook.worksheet_by_name("Sheet1").unwrap(), &table, false)
                .unwrap();
        assert!(xml.contains(r#"<c r="A1" s="1"/>"#));
    }

    #[test]
    fn test_non_finite_number_rejected() {
        let mut workbook = Workbook::new("x");
        workbook
            .worksheet_by_name_mut("Sheet1")
            .unwrap()
            .set_value("A2", CellValue::Number(f64::NAN))
            .unwrap();
        let props = PackageProps::new("x", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let err = XlsxWriter::write(&workbook, &props, Cursor::new(Vec::new())).unwrap_err();
        assert!(matches!(err, OoxmlError::InvalidContent(_)));
    }
}
