//! XLSX reader used to import templates

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::debug;

use office_mcp_core::workbook::FIRST_SHEET_NAME;
use office_mcp_core::{CellAddress, CellFormat, CellValue, Workbook, Worksheet};

use super::styles::read_styles_xml;
use crate::error::{OoxmlError, OoxmlResult};
use crate::package::{main_part, open_archive, read_part, read_rels, targets_of_kind};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this form for characters XML cannot carry directly, such as
/// `_x000d_` for a carriage return and `_x005f_` for a literal underscore.
fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// XLSX file reader
///
/// Recovers sheet order and names, cell values (formulas keep their text)
/// and cell formatting. Charts and other drawings are not imported.
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path as a new workbook named `title`
    pub fn read_file<P: AsRef<Path>>(path: P, title: &str) -> OoxmlResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file), title)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R, title: &str) -> OoxmlResult<Workbook> {
        let mut archive = open_archive(reader)?;
        let main = main_part(&mut archive, "xl/workbook.xml")?;
        let workbook_xml = read_part(&mut archive, &main)?
            .ok_or_else(|| OoxmlError::MissingPart(main.clone()))?;
        let rels = read_rels(&mut archive, &main)?;

        // Read shared strings and styles (both optional)
        let shared_strings = match targets_of_kind(&rels, "sharedStrings").first() {
            Some(part) => match read_part(&mut archive, part)? {
                Some(xml) => read_shared_strings(&xml)?,
                None => Vec::new(),
            },
            None => Vec::new(),
        };
        let formats = match targets_of_kind(&rels, "styles").first() {
            Some(part) => match read_part(&mut archive, part)? {
                Some(xml) => read_styles_xml(&xml)?,
                None => Vec::new(),
            },
            None => Vec::new(),
        };

        let mut workbook = Workbook::empty(title);
        for (name, rid) in read_sheet_list(&workbook_xml)? {
            let Some(rel) = rels.get(&rid) else {
                continue;
            };
            let Some(xml) = read_part(&mut archive, &rel.target)? else {
                continue;
            };
            let mut worksheet = Worksheet::new(name);
            read_worksheet(&xml, &mut worksheet, &shared_strings, &formats)?;
            workbook.push_worksheet(worksheet)?;
        }

        // Ensure at least one sheet exists
        if workbook.sheet_count() == 0 {
            workbook.add_worksheet(FIRST_SHEET_NAME, None)?;
        }

        debug!(sheets = workbook.sheet_count(), "imported workbook template");
        Ok(workbook)
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.to_string()))
}

/// Sheet names and relationship ids from `xl/workbook.xml`
fn read_sheet_list(xml: &str) -> OoxmlResult<Vec<(String, String)>> {
    let mut reader = Reader::from_str(xml);
    let mut sheets = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                if let (Some(name), Some(rid)) = (attr_value(&e, b"name"), attr_value(&e, b"r:id")) {
                    sheets.push((name, rid));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
    }
    Ok(sheets)
}

/// Read the shared strings table
fn read_shared_strings(xml: &str) -> OoxmlResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    // Phonetic runs repeat the text and must not be appended
    let mut in_rph = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_rph = true,
                b"t" if in_si && !in_rph => in_t = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if in_si && e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(decode_excel_escapes(&current));
                    in_si = false;
                }
                b"rPh" => in_rph = false,
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_t => current.push_str(&e.unescape().map_err(OoxmlError::Xml)?),
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
    }
    Ok(strings)
}

#[derive(Debug, Default)]
struct PendingCell {
    reference: String,
    cell_type: Option<String>,
    style: usize,
    value: Option<String>,
    formula: Option<String>,
}

/// Read a worksheet's cells
fn read_worksheet(
    xml: &str,
    worksheet: &mut Worksheet,
    shared_strings: &[String],
    formats: &[CellFormat],
) -> OoxmlResult<()> {
    let mut reader = Reader::from_str(xml);

    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_formula = false;
    let mut in_inline_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"c" => cell = Some(pending_cell(&e)),
                b"v" => in_value = true,
                b"f" => in_formula = true,
                b"t" if cell.is_some() => in_inline_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"c" => {
                process_cell(worksheet, pending_cell(&e), shared_strings, formats)?;
            }
            Ok(Event::Text(e)) => {
                if let Some(cell) = cell.as_mut() {
                    let text = e.unescape().map_err(OoxmlError::Xml)?;
                    if in_value {
                        cell.value.get_or_insert_with(String::new).push_str(&text);
                    } else if in_formula {
                        cell.formula.get_or_insert_with(String::new).push_str(&text);
                    } else if in_inline_text {
                        cell.value.get_or_insert_with(String::new).push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some(pending) = cell.take() {
                        process_cell(worksheet, pending, shared_strings, formats)?;
                    }
                }
                b"v" => in_value = false,
                b"f" => in_formula = false,
                b"t" => in_inline_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
    }
    Ok(())
}

fn pending_cell(e: &BytesStart<'_>) -> PendingCell {
    PendingCell {
        reference: attr_value(e, b"r").unwrap_or_default(),
        cell_type: attr_value(e, b"t"),
        style: attr_value(e, b"s")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        ..Default::default()
    }
}

fn process_cell(
    worksheet: &mut Worksheet,
    cell: PendingCell,
    shared_strings: &[String],
    formats: &[CellFormat],
) -> OoxmlResult<()> {
    let addr = CellAddress::parse(&cell.reference).map_err(|e| {
        OoxmlError::InvalidFormat(format!("Invalid cell reference '{}': {e}", cell.reference))
    })?;

    let value = if let Some(formula) = cell.formula.filter(|f| !f.is_empty()) {
        // Cached results are dropped; the formula is the source of truth
        CellValue::formula(formula)
    } else if let Some(value) = cell.value {
        match cell.cell_type.as_deref() {
            // Shared string
            Some("s") => {
                let idx: usize = value.trim().parse().map_err(|_| {
                    OoxmlError::InvalidFormat(format!("Invalid shared string index: {value}"))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    OoxmlError::InvalidFormat(format!("Shared string index {idx} out of bounds"))
                })?;
                CellValue::String(s.clone())
            }
            Some("b") => CellValue::Boolean(value == "1" || value.eq_ignore_ascii_case("true")),
            Some("inlineStr") | Some("str") => CellValue::String(decode_excel_escapes(&value)),
            None | Some("n") => match value.parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::String(value),
            },
            // Errors and unknown types keep their text
            Some(_) => CellValue::String(value),
        }
    } else {
        CellValue::Empty
    };

    let format = formats.get(cell.style).filter(|_| cell.style != 0).cloned();
    worksheet.set_cell(addr, value, format);
    Ok(())
}
