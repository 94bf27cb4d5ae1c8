//! DOCX reader used to import templates

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::debug;

use office_mcp_core::{Block, Color, Document, ListKind, Table, TextAlignment, TextFormat};

use crate::error::{OoxmlError, OoxmlResult};
use crate::package::{main_part, open_archive, read_part, read_rels, targets_of_kind};

/// DOCX file reader
///
/// Recovers headings, paragraphs (with the formatting of their first run),
/// lists and tables. Headers, footers, images and fields are skipped.
pub struct DocxReader;

impl DocxReader {
    /// Read a document from a file path as a new document named `title`
    pub fn read_file<P: AsRef<Path>>(path: P, title: &str) -> OoxmlResult<Document> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file), title)
    }

    /// Read a document from a reader
    pub fn read<R: Read + Seek>(reader: R, title: &str) -> OoxmlResult<Document> {
        let mut archive = open_archive(reader)?;
        let main = main_part(&mut archive, "word/document.xml")?;
        let xml = read_part(&mut archive, &main)?
            .ok_or_else(|| OoxmlError::MissingPart(main.clone()))?;

        let rels = read_rels(&mut archive, &main)?;
        let numbering = match targets_of_kind(&rels, "numbering").first() {
            Some(part) => match read_part(&mut archive, part)? {
                Some(xml) => numbering_kinds(&xml)?,
                None => HashMap::new(),
            },
            None => HashMap::new(),
        };

        let mut document = Document::empty(title);
        for block in body_blocks(&xml, &numbering)? {
            document.push_block(block);
        }
        debug!(blocks = document.blocks().len(), "imported document template");
        Ok(document)
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.to_string()))
}

/// Toggle properties (`<w:b/>`, `<w:b w:val="0"/>`)
fn toggle(e: &BytesStart<'_>) -> bool {
    !matches!(attr_value(e, b"w:val").as_deref(), Some("0") | Some("false") | Some("off"))
}

/// List kind of every `numId` declared in `word/numbering.xml`
fn numbering_kinds(xml: &str) -> OoxmlResult<HashMap<String, ListKind>> {
    let mut reader = Reader::from_str(xml);
    let mut abstract_kinds: HashMap<String, ListKind> = HashMap::new();
    let mut num_to_abstract: Vec<(String, String)> = Vec::new();

    let mut current_abstract: Option<String> = None;
    let mut current_num: Option<String> = None;
    let mut level: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"abstractNum" => current_abstract = attr_value(&e, b"w:abstractNumId"),
                b"num" => current_num = attr_value(&e, b"w:numId"),
                b"lvl" => level = attr_value(&e, b"w:ilvl"),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"numFmt" if level.as_deref() == Some("0") => {
                    if let Some(id) = &current_abstract {
                        let kind = match attr_value(&e, b"w:val").as_deref() {
                            Some("bullet") | Some("none") | None => ListKind::Bullet,
                            Some(_) => ListKind::Number,
                        };
                        abstract_kinds.insert(id.clone(), kind);
                    }
                }
                b"abstractNumId" => {
                    if let (Some(num), Some(abs)) = (&current_num, attr_value(&e, b"w:val")) {
                        num_to_abstract.push((num.clone(), abs));
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"abstractNum" => current_abstract = None,
                b"num" => current_num = None,
                b"lvl" => level = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
    }

    Ok(num_to_abstract
        .into_iter()
        .filter_map(|(num, abs)| abstract_kinds.get(&abs).map(|kind| (num, *kind)))
        .collect())
}

/// Heading level for styles named `HeadingN` or `heading N`
fn heading_level(style: &str) -> Option<u8> {
    let rest = style
        .strip_prefix("Heading")
        .or_else(|| style.strip_prefix("heading"))?
        .trim();
    rest.parse::<u8>().ok().filter(|l| (1..=6).contains(l))
}

#[derive(Debug, Default)]
struct ParagraphState {
    style: Option<String>,
    num_id: Option<String>,
    format: TextFormat,
    text: String,
    in_ppr: bool,
    in_run: bool,
    run_has_text: bool,
    first_run_seen: bool,
}

/// An open list collecting consecutive items
struct OpenList {
    num_id: Option<String>,
    kind: ListKind,
    style: Option<String>,
    items: Vec<String>,
}

impl OpenList {
    fn into_block(self) -> Block {
        let style = self.style.filter(|s| s != "ListBullet" && s != "ListNumber");
        Block::List {
            items: self.items,
            kind: self.kind,
            style,
        }
    }
}

#[derive(Debug, Default)]
struct TableState {
    style: Option<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Vec<String>,
}

fn body_blocks(xml: &str, numbering: &HashMap<String, ListKind>) -> OoxmlResult<Vec<Block>> {
    let mut reader = Reader::from_str(xml);
    let mut blocks = Vec::new();

    let mut paragraph: Option<ParagraphState> = None;
    let mut list: Option<OpenList> = None;
    let mut table = TableState::default();
    let mut table_depth = 0usize;
    let mut in_t = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => paragraph = Some(ParagraphState::default()),
                b"pPr" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.in_ppr = true;
                    }
                }
                b"r" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.in_run = true;
                        p.run_has_text = false;
                    }
                }
                b"t" => in_t = true,
                b"tbl" => {
                    table_depth += 1;
                    if table_depth == 1 {
                        if let Some(open) = list.take() {
                            blocks.push(open.into_block());
                        }
                        table = TableState::default();
                    }
                }
                b"tc" if table_depth == 1 => table.cell.clear(),
                b"tr" if table_depth == 1 => table.row.clear(),
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                let name = e.local_name();
                if table_depth == 1 && paragraph.is_none() && name.as_ref() == b"tblStyle" {
                    table.style = attr_value(&e, b"w:val").filter(|s| s != "TableGrid");
                    continue;
                }
                let Some(p) = paragraph.as_mut() else {
                    continue;
                };
                match name.as_ref() {
                    b"pStyle" if p.in_ppr => p.style = attr_value(&e, b"w:val"),
                    b"numId" if p.in_ppr => p.num_id = attr_value(&e, b"w:val"),
                    b"jc" if p.in_ppr => {
                        p.format.alignment = match attr_value(&e, b"w:val").as_deref() {
                            Some("center") => Some(TextAlignment::Center),
                            Some("right") | Some("end") => Some(TextAlignment::Right),
                            Some("both") | Some("distribute") => Some(TextAlignment::Justify),
                            Some("left") | Some("start") => Some(TextAlignment::Left),
                            _ => None,
                        }
                    }
                    b"br" | b"cr" if p.in_run => p.text.push('\n'),
                    b"tab" if p.in_run => p.text.push('\t'),
                    // Only the first run's properties describe the paragraph
                    b"b" | b"i" | b"color" | b"sz" | b"rFonts"
                        if p.in_run && !p.first_run_seen =>
                    {
                        match name.as_ref() {
                            b"b" => p.format.bold = Some(toggle(&e)),
                            b"i" => p.format.italic = Some(toggle(&e)),
                            b"color" => {
                                p.format.color = attr_value(&e, b"w:val")
                                    .and_then(|v| Color::parse(&format!("#{v}")).ok())
                            }
                            b"sz" => {
                                p.format.font_size = attr_value(&e, b"w:val")
                                    .and_then(|v| v.parse::<u32>().ok())
                                    .map(|half_points| half_points / 2)
                            }
                            _ => p.format.font_name = attr_value(&e, b"w:ascii"),
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) if in_t => {
                if let Some(p) = paragraph.as_mut() {
                    p.text.push_str(&e.unescape().map_err(OoxmlError::Xml)?);
                    p.run_has_text = true;
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_t = false,
                b"pPr" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.in_ppr = false;
                    }
                }
                b"r" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.in_run = false;
                        if p.run_has_text {
                            p.first_run_seen = true;
                        }
                    }
                }
                b"p" => {
                    let Some(p) = paragraph.take() else {
                        continue;
                    };
                    if table_depth > 0 {
                        table.cell.push(p.text);
                    } else {
                        finish_paragraph(p, numbering, &mut list, &mut blocks);
                    }
                }
                b"tc" if table_depth == 1 => {
                    let cell = std::mem::take(&mut table.cell).join("\n");
                    table.row.push(cell);
                }
                b"tr" if table_depth == 1 => {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
                b"tbl" => {
                    table_depth = table_depth.saturating_sub(1);
                    if table_depth == 0 {
                        let TableState { style, rows, .. } = std::mem::take(&mut table);
                        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
                        if !rows.is_empty() && cols > 0 {
                            blocks.push(Block::Table(Table::new(
                                rows.len(),
                                cols,
                                Some(rows),
                                style,
                            )?));
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
    }

    if let Some(open) = list.take() {
        blocks.push(open.into_block());
    }
    Ok(blocks)
}

fn finish_paragraph(
    p: ParagraphState,
    numbering: &HashMap<String, ListKind>,
    list: &mut Option<OpenList>,
    blocks: &mut Vec<Block>,
) {
    let style = p.style.filter(|s| s != "Normal");

    let list_kind = match (style.as_deref(), &p.num_id) {
        (Some("ListBullet"), _) => Some(ListKind::Bullet),
        (Some("ListNumber"), _) => Some(ListKind::Number),
        // numId 0 switches numbering off
        (_, Some(id)) if id != "0" => Some(numbering.get(id).copied().unwrap_or(ListKind::Bullet)),
        _ => None,
    };

    if let Some(kind) = list_kind {
        if let Some(open) = list.as_mut() {
            if open.kind == kind && open.num_id == p.num_id && open.style == style {
                open.items.push(p.text);
                return;
            }
        }
        if let Some(open) = list.take() {
            blocks.push(open.into_block());
        }
        *list = Some(OpenList {
            num_id: p.num_id,
            kind,
            style,
            items: vec![p.text],
        });
        return;
    }

    if let Some(open) = list.take() {
        blocks.push(open.into_block());
    }

    if let Some(level) = style.as_deref().and_then(heading_level) {
        blocks.push(Block::Heading {
            text: p.text,
            level,
            style: None,
        });
        return;
    }

    // Spacer paragraphs carry nothing to edit
    if p.text.is_empty() && style.is_none() {
        return;
    }

    blocks.push(Block::Paragraph {
        text: p.text,
        style,
        format: p.format,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("Heading2"), Some(2));
        assert_eq!(heading_level("heading 6"), Some(6));
        assert_eq!(heading_level("Heading9"), None);
        assert_eq!(heading_level("Title"), None);
    }

    #[test]
    fn test_body_blocks() {
        let xml = r#"<w:document xmlns:w="w"><w:body>
            <w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p>
            <w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/><w:sz w:val="24"/></w:rPr><w:t xml:space="preserve">Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p>
            <w:p><w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="7"/></w:numPr></w:pPr><w:r><w:t>one</w:t></w:r></w:p>
            <w:p><w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="7"/></w:numPr></w:pPr><w:r><w:t>two</w:t></w:r></w:p>
            <w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr><w:tr><w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p></w:tc><w:tc><w:p/></w:tc></w:tr></w:tbl>
            <w:p/>
            <w:sectPr/></w:body></w:document>"#;
        let numbering = HashMap::from([("7".to_string(), ListKind::Number)]);
        let blocks = body_blocks(xml, &numbering).unwrap();

        assert_eq!(blocks.len(), 4);
        assert_eq!(
            blocks[0],
            Block::Heading {
                text: "Intro".into(),
                level: 2,
                style: None
            }
        );
        assert_eq!(
            blocks[1],
            Block::Paragraph {
                text: "Hello world".into(),
                style: None,
                format: TextFormat {
                    bold: Some(true),
                    font_size: Some(12),
                    alignment: Some(TextAlignment::Center),
                    ..Default::default()
                }
            }
        );
        assert_eq!(
            blocks[2],
            Block::List {
                items: vec!["one".into(), "two".into()],
                kind: ListKind::Number,
                style: Some("ListParagraph".into())
            }
        );
        let Block::Table(table) = &blocks[3] else {
            panic!("expected a table");
        };
        assert_eq!(table.cells(), &[vec!["a".to_string(), String::new()]]);
        assert_eq!(table.style(), None);
    }

    #[test]
    fn test_numbering_kinds() {
        let xml = r#"<w:numbering xmlns:w="w">
            <w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/></w:lvl></w:abstractNum>
            <w:abstractNum w:abstractNumId="1"><w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/></w:lvl><w:lvl w:ilvl="1"><w:numFmt w:val="bullet"/></w:lvl></w:abstractNum>
            <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
            <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
            </w:numbering>"#;
        let kinds = numbering_kinds(xml).unwrap();
        assert_eq!(kinds.get("1"), Some(&ListKind::Bullet));
        assert_eq!(kinds.get("2"), Some(&ListKind::Number));
    }
}
