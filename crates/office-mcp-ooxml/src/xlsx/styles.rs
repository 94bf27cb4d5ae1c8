//! `xl/styles.xml` read/write helpers

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use office_mcp_core::{CellFormat, Color, HorizontalAlignment, VerticalAlignment, Workbook};

use crate::error::{OoxmlError, OoxmlResult};
use crate::package::{xml_text, XML_DECL};

const DEFAULT_FONT_NAME: &str = "Calibri";
const DEFAULT_FONT_SIZE: u32 = 11;

// === Writing ===

/// Workbook-wide, deduplicated cell formats; the index is the `cellXfs` id
#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    formats: Vec<CellFormat>,
    ids: HashMap<CellFormat, u32>,
}

/// Font part of a cell format, deduplicated separately from fills and borders
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FontKey {
    bold: bool,
    italic: bool,
    size: u32,
    name: String,
    color: Option<Color>,
}

impl FontKey {
    fn of(format: &CellFormat) -> Self {
        Self {
            bold: format.bold,
            italic: format.italic,
            size: format.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            name: format
                .font_name
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT_NAME.to_string()),
            color: format.font_color,
        }
    }
}

impl XlsxStyleTable {
    pub(crate) fn build(workbook: &Workbook) -> Self {
        // Index 0 is always the default format
        let mut formats = vec![CellFormat::default()];
        let mut ids = HashMap::from([(CellFormat::default(), 0u32)]);

        for sheet in workbook.worksheets() {
            for (_, cell) in sheet.cells() {
                let Some(format) = &cell.format else {
                    continue;
                };
                if !ids.contains_key(format) {
                    ids.insert(format.clone(), formats.len() as u32);
                    formats.push(format.clone());
                }
            }
        }

        Self { formats, ids }
    }

    pub(crate) fn xf_id_for(&self, format: Option<&CellFormat>) -> u32 {
        format.and_then(|f| self.ids.get(f).copied()).unwrap_or(0)
    }

    pub(crate) fn to_styles_xml(&self) -> OoxmlResult<String> {
        let mut font_ids: HashMap<FontKey, u32> = HashMap::new();
        let mut fonts: Vec<FontKey> = Vec::new();
        let default_font = FontKey::of(&CellFormat::default());
        font_ids.insert(default_font.clone(), 0);
        fonts.push(default_font);

        // Excel requires the first two fills to be none and gray125
        let mut fill_ids: HashMap<Color, u32> = HashMap::new();
        let mut fills: Vec<Color> = Vec::new();

        let mut xfs = String::new();
        for format in &self.formats {
            let font = FontKey::of(format);
            let font_id = match font_ids.get(&font) {
                Some(&id) => id,
                None => {
                    let id = fonts.len() as u32;
                    fonts.push(font.clone());
                    font_ids.insert(font, id);
                    id
                }
            };

            let fill_id = match format.fill_color {
                None => 0,
                Some(color) => match fill_ids.get(&color) {
                    Some(&id) => id,
                    None => {
                        let id = fills.len() as u32 + 2;
                        fills.push(color);
                        fill_ids.insert(color, id);
                        id
                    }
                },
            };
            let border_id = u32::from(format.border);

            xfs.push_str(&write_xf(format, font_id, fill_id, border_id));
        }

        let mut xml = format!(
            r#"{XML_DECL}
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#
        );

        xml.push_str(&format!("<fonts count=\"{}\">", fonts.len()));
        for font in &fonts {
            xml.push_str(&write_font(font)?);
        }
        xml.push_str("</fonts>");

        xml.push_str(&format!("<fills count=\"{}\">", fills.len() + 2));
        xml.push_str(r#"<fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill>"#);
        for color in &fills {
            xml.push_str(&format!(
                r#"<fill><patternFill patternType="solid"><fgColor rgb="FF{}"/><bgColor indexed="64"/></patternFill></fill>"#,
                color.to_hex()
            ));
        }
        xml.push_str("</fills>");

        // Border 0 is none, border 1 is thin on every edge
        xml.push_str(r#"<borders count="2"><border><left/><right/><top/><bottom/><diagonal/></border><border><left style="thin"><color indexed="64"/></left><right style="thin"><color indexed="64"/></right><top style="thin"><color indexed="64"/></top><bottom style="thin"><color indexed="64"/></bottom><diagonal/></border></borders>"#);

        xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);
        xml.push_str(&format!("<cellXfs count=\"{}\">{xfs}</cellXfs>", self.formats.len()));
        xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles><dxfs count="0"/><tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/></styleSheet>"#);
        Ok(xml)
    }
}

fn write_font(font: &FontKey) -> OoxmlResult<String> {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    match font.color {
        Some(color) => s.push_str(&format!("<color rgb=\"FF{}\"/>", color.to_hex())),
        None => s.push_str("<color theme=\"1\"/>"),
    }
    s.push_str(&format!("<name val=\"{}\"/>", xml_text(&font.name)?));
    s.push_str("<family val=\"2\"/></font>");
    Ok(s)
}

fn write_xf(format: &CellFormat, font_id: u32, fill_id: u32, border_id: u32) -> String {
    let mut attrs = format!(r#"numFmtId="0" fontId="{font_id}" fillId="{fill_id}" borderId="{border_id}" xfId="0""#);
    if font_id != 0 {
        attrs.push_str(r#" applyFont="1""#);
    }
    if fill_id != 0 {
        attrs.push_str(r#" applyFill="1""#);
    }
    if border_id != 0 {
        attrs.push_str(r#" applyBorder="1""#);
    }
    if !format.has_alignment() {
        return format!("<xf {attrs}/>");
    }

    attrs.push_str(r#" applyAlignment="1""#);
    let mut alignment = String::from("<alignment");
    if let Some(h) = format.horizontal {
        alignment.push_str(&format!(" horizontal=\"{}\"", h.as_str()));
    }
    if let Some(v) = format.vertical {
        alignment.push_str(&format!(" vertical=\"{}\"", v.as_str()));
    }
    if format.wrap_text {
        alignment.push_str(" wrapText=\"1\"");
    }
    alignment.push_str("/>");
    format!("<xf {attrs}>{alignment}</xf>")
}

// === Reading ===

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.to_string()))
}

/// `FFRRGGBB` or `RRGGBB` from an `rgb` attribute
fn parse_rgb(e: &BytesStart<'_>) -> Option<Color> {
    let rgb = attr_value(e, b"rgb")?;
    let hex = if rgb.len() == 8 { rgb.get(2..)? } else { rgb.as_str() };
    Color::parse(&format!("#{hex}")).ok()
}

#[derive(Debug, Default, Clone)]
struct ParsedFont {
    bold: bool,
    italic: bool,
    size: Option<u32>,
    name: Option<String>,
    color: Option<Color>,
}

/// Parse `xl/styles.xml` into one [`CellFormat`] per `cellXfs` entry
///
/// Properties equal to the workbook defaults are dropped so a saved and
/// re-read format compares equal to the original.
pub(crate) fn read_styles_xml(xml: &str) -> OoxmlResult<Vec<CellFormat>> {
    let mut reader = Reader::from_str(xml);

    let mut fonts: Vec<ParsedFont> = Vec::new();
    let mut fills: Vec<Option<Color>> = Vec::new();
    let mut borders: Vec<bool> = Vec::new();
    let mut formats: Vec<CellFormat> = Vec::new();

    let mut in_fonts = false;
    let mut in_fills = false;
    let mut in_borders = false;
    let mut in_cell_xfs = false;
    let mut font = ParsedFont::default();
    let mut fill: Option<Color> = None;
    let mut solid = false;
    let mut border = false;
    let mut xf: Option<CellFormat> = None;

    loop {
        let event = reader.read_event().map_err(OoxmlError::Xml)?;
        let (e, is_empty) = match &event {
            Event::Start(e) => (Some(e), false),
            Event::Empty(e) => (Some(e), true),
            Event::End(end) => {
                match end.local_name().as_ref() {
                    b"fonts" => in_fonts = false,
                    b"fills" => in_fills = false,
                    b"borders" => in_borders = false,
                    b"cellXfs" => in_cell_xfs = false,
                    b"font" if in_fonts => fonts.push(std::mem::take(&mut font)),
                    b"fill" if in_fills => {
                        fills.push(if solid { fill.take() } else { None });
                        fill = None;
                        solid = false;
                    }
                    b"border" if in_borders => borders.push(std::mem::take(&mut border)),
                    b"xf" if in_cell_xfs => formats.extend(xf.take()),
                    _ => {}
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };
        let Some(e) = e else { continue };

        match e.local_name().as_ref() {
            b"fonts" => in_fonts = !is_empty,
            b"fills" => in_fills = !is_empty,
            b"borders" => in_borders = !is_empty,
            b"cellXfs" => in_cell_xfs = !is_empty,
            b"font" if in_fonts => {
                font = ParsedFont::default();
                if is_empty {
                    fonts.push(ParsedFont::default());
                }
            }
            b"b" if in_fonts => font.bold = attr_value(e, b"val").as_deref() != Some("0"),
            b"i" if in_fonts => font.italic = attr_value(e, b"val").as_deref() != Some("0"),
            b"sz" if in_fonts => {
                font.size = attr_value(e, b"val")
                    .and_then(|v| v.parse::<f64>().ok())
                    .map(|v| v.round() as u32)
            }
            b"name" if in_fonts => font.name = attr_value(e, b"val"),
            b"color" if in_fonts => font.color = parse_rgb(e),
            b"patternFill" if in_fills => {
                solid = attr_value(e, b"patternType").as_deref() == Some("solid");
            }
            b"fill" if in_fills && is_empty => fills.push(None),
            b"fgColor" if in_fills => fill = parse_rgb(e),
            b"border" if in_borders => {
                border = false;
                if is_empty {
                    borders.push(false);
                }
            }
            b"left" | b"right" | b"top" | b"bottom" if in_borders => {
                border |= attr_value(e, b"style").is_some();
            }
            b"xf" if in_cell_xfs => {
                let index = |key: &[u8]| {
                    attr_value(e, key)
                        .and_then(|v| v.parse::<usize>().ok())
                        .unwrap_or(0)
                };
                let mut format = CellFormat::default();
                if let Some(f) = fonts.get(index(b"fontId")) {
                    format.bold = f.bold;
                    format.italic = f.italic;
                    format.font_size = f.size.filter(|&s| s != DEFAULT_FONT_SIZE);
                    format.font_name = f.name.clone().filter(|n| n != DEFAULT_FONT_NAME);
                    format.font_color = f.color;
                }
                format.fill_color = fills.get(index(b"fillId")).copied().flatten();
                format.border = borders.get(index(b"borderId")).copied().unwrap_or(false);
                if is_empty {
                    formats.push(format);
                } else {
                    xf = Some(format);
                }
            }
            b"alignment" if in_cell_xfs => {
                if let Some(format) = xf.as_mut() {
                    format.horizontal = attr_value(e, b"horizontal")
                        .and_then(|v| v.parse::<HorizontalAlignment>().ok());
                    format.vertical = attr_value(e, b"vertical")
                        .and_then(|v| v.parse::<VerticalAlignment>().ok());
                    format.wrap_text = matches!(attr_value(e, b"wrapText").as_deref(), Some("1") | Some("true"));
                }
            }
            _ => {}
        }
    }

    Ok(formats)
}
