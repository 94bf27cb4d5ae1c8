//! DOCX (WordprocessingML) writer and reader

mod reader;
mod styles;

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use office_mcp_core::{Block, Document, ListKind, Table, TextAlignment, TextFormat};

use crate::error::OoxmlResult;
use crate::package::{
    xml_text, ContentTypes, PackageProps, PackageWriter, Relationships, REL_CORE_PROPERTIES,
    REL_OFFICE_DOCUMENT, XML_DECL,
};

pub use reader::DocxReader;

pub(crate) const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";

/// Text width of a Letter page with 1in margins, in twentieths of a point
const TEXT_WIDTH_TWIPS: usize = 9360;

/// Numbering instance shared by every bulleted list
const BULLET_NUM_ID: usize = 1;

/// DOCX file writer
pub struct DocxWriter;

impl DocxWriter {
    /// Write a document to a file path
    ///
    /// The package is assembled in memory first, so content errors never leave
    /// a partial file behind.
    pub fn write_file<P: AsRef<Path>>(
        document: &Document,
        props: &PackageProps,
        path: P,
    ) -> OoxmlResult<()> {
        let mut buffer = Cursor::new(Vec::new());
        Self::write(document, props, &mut buffer)?;
        std::fs::write(path, buffer.into_inner())?;
        Ok(())
    }

    /// Write a document to a writer
    pub fn write<W: Write + Seek>(
        document: &Document,
        props: &PackageProps,
        writer: W,
    ) -> OoxmlResult<()> {
        let (body, numbered_lists) = body_xml(document)?;

        let mut package = PackageWriter::new(writer);

        // Write [Content_Types].xml
        let mut types = ContentTypes::new();
        types.add("/word/document.xml", CT_DOCUMENT);
        types.add("/word/styles.xml", CT_STYLES);
        types.add("/word/numbering.xml", CT_NUMBERING);
        package.part("[Content_Types].xml", &types.to_xml())?;

        // Write _rels/.rels
        let mut root_rels = Relationships::default();
        root_rels.add(REL_OFFICE_DOCUMENT, "word/document.xml");
        root_rels.add(REL_CORE_PROPERTIES, "docProps/core.xml");
        package.part("_rels/.rels", &root_rels.to_xml())?;
        package.core_props(props)?;

        let mut doc_rels = Relationships::default();
        doc_rels.add("styles", "styles.xml");
        doc_rels.add("numbering", "numbering.xml");
        package.part("word/_rels/document.xml.rels", &doc_rels.to_xml())?;

        package.part(
            "word/document.xml",
            &format!(
                r#"{XML_DECL}
<w:document xmlns:w="{NS_W}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{body}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#
            ),
        )?;
        package.part("word/styles.xml", &styles::styles_xml())?;
        package.part("word/numbering.xml", &styles::numbering_xml(numbered_lists))?;

        package.finish()
    }
}

/// Style id for a user-facing style name (`"Heading 1"` -> `"Heading1"`)
pub(crate) fn style_id(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Body XML plus the number of numbered lists (each restarts at 1)
fn body_xml(document: &Document) -> OoxmlResult<(String, usize)> {
    let mut xml = String::new();
    let mut numbered_lists = 0usize;

    for block in document.blocks() {
        match block {
            Block::Heading { text, level, style } => {
                let style = style
                    .as_deref()
                    .map(style_id)
                    .unwrap_or_else(|| format!("Heading{level}"));
                xml.push_str(&paragraph_xml(
                    text,
                    &format!(r#"<w:pStyle w:val="{}"/>"#, xml_text(&style)?),
                    &TextFormat::default(),
                )?);
            }
            Block::Paragraph {
                text,
                style,
                format,
            } => {
                let mut p_pr = String::new();
                if let Some(style) = style {
                    p_pr.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, xml_text(&style_id(style))?));
                }
                if let Some(alignment) = format.alignment {
                    let jc = match alignment {
                        TextAlignment::Left => "left",
                        TextAlignment::Center => "center",
                        TextAlignment::Right => "right",
                        TextAlignment::Justify => "both",
                    };
                    p_pr.push_str(&format!(r#"<w:jc w:val="{jc}"/>"#));
                }
                xml.push_str(&paragraph_xml(text, &p_pr, format)?);
            }
            Block::List { items, kind, style } => {
                let num_id = match kind {
                    ListKind::Bullet => BULLET_NUM_ID,
                    ListKind::Number => {
                        numbered_lists += 1;
                        BULLET_NUM_ID + numbered_lists
                    }
                };
                let style = match (style, kind) {
                    (Some(style), _) => style_id(style),
                    (None, ListKind::Bullet) => "ListBullet".to_string(),
                    (None, ListKind::Number) => "ListNumber".to_string(),
                };
                let p_pr = format!(
                    r#"<w:pStyle w:val="{}"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="{num_id}"/></w:numPr>"#,
                    xml_text(&style)?
                );
                for item in items {
                    xml.push_str(&paragraph_xml(item, &p_pr, &TextFormat::default())?);
                }
            }
            Block::Table(table) => xml.push_str(&table_xml(table)?),
        }
    }

    // Word expects a paragraph between a trailing table and the section properties
    if matches!(document.blocks().last(), Some(Block::Table(_))) {
        xml.push_str("<w:p/>");
    }

    Ok((xml, numbered_lists))
}

fn paragraph_xml(text: &str, p_pr: &str, format: &TextFormat) -> OoxmlResult<String> {
    let p_pr = if p_pr.is_empty() {
        String::new()
    } else {
        format!("<w:pPr>{p_pr}</w:pPr>")
    };
    if text.is_empty() {
        return Ok(format!("<w:p>{p_pr}</w:p>"));
    }

    let r_pr = run_props(format)?;
    let mut runs = String::new();
    for (i, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if i > 0 {
            runs.push_str("<w:br/>");
        }
        runs.push_str(&format!(r#"<w:t xml:space="preserve">{}</w:t>"#, xml_text(line)?));
    }
    Ok(format!("<w:p>{p_pr}<w:r>{r_pr}{runs}</w:r></w:p>"))
}

fn run_props(format: &TextFormat) -> OoxmlResult<String> {
    let mut props = String::new();
    if let Some(font) = &format.font_name {
        let font = xml_text(font)?;
        props.push_str(&format!(
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#
        ));
    }
    match format.bold {
        Some(true) => props.push_str("<w:b/>"),
        Some(false) => props.push_str(r#"<w:b w:val="0"/>"#),
        None => {}
    }
    match format.italic {
        Some(true) => props.push_str("<w:i/>"),
        Some(false) => props.push_str(r#"<w:i w:val="0"/>"#),
        None => {}
    }
    if let Some(color) = format.color {
        props.push_str(&format!(r#"<w:color w:val="{}"/>"#, color.to_hex()));
    }
    if let Some(size) = format.font_size {
        // Half-points
        props.push_str(&format!(r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#, size * 2));
    }
    Ok(if props.is_empty() {
        props
    } else {
        format!("<w:rPr>{props}</w:rPr>")
    })
}

fn table_xml(table: &Table) -> OoxmlResult<String> {
    let col_width = TEXT_WIDTH_TWIPS / table.cols();
    let style = table.style().map(style_id).unwrap_or_else(|| "TableGrid".into());

    let mut xml = format!(
        r#"<w:tbl><w:tblPr><w:tblStyle w:val="{}"/><w:tblW w:w="0" w:type="auto"/><w:tblLook w:val="04A0" w:firstRow="1" w:lastRow="0" w:firstColumn="1" w:lastColumn="0" w:noHBand="0" w:noVBand="1"/></w:tblPr><w:tblGrid>"#,
        xml_text(&style)?
    );
    for _ in 0..table.cols() {
        xml.push_str(&format!(r#"<w:gridCol w:w="{col_width}"/>"#));
    }
    xml.push_str("</w:tblGrid>");

    for row in table.cells() {
        xml.push_str("<w:tr>");
        for cell in row {
            xml.push_str(&format!(
                r#"<w:tc><w:tcPr><w:tcW w:w="{col_width}" w:type="dxa"/></w:tcPr>{}</w:tc>"#,
                paragraph_xml(cell, "", &TextFormat::default())?
            ));
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    Ok(xml)
}
