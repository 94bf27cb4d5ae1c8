//! Zip packaging, relationships and document properties shared by all formats

use std::collections::HashMap;
use std::io::{BufReader, Read, Seek, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::write::SimpleFileOptions;

use crate::error::{OoxmlError, OoxmlResult};

pub(crate) const XML_DECL: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(crate) const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub(crate) const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(crate) const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub(crate) const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";

/// Metadata written to `docProps/core.xml`
///
/// The timestamp is supplied by the caller so saving the same content twice
/// produces the same bytes.
#[derive(Debug, Clone)]
pub struct PackageProps {
    pub title: String,
    pub created: DateTime<Utc>,
}

impl PackageProps {
    pub fn new<S: Into<String>>(title: S, created: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            created,
        }
    }

    pub(crate) fn core_xml(&self) -> OoxmlResult<String> {
        let stamp = self.created.to_rfc3339_opts(SecondsFormat::Secs, true);
        Ok(format!(
            r#"{XML_DECL}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{title}</dc:title><dc:creator>office-mcp</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified></cp:coreProperties>"#,
            title = xml_text(&self.title)?,
        ))
    }
}

/// Thin wrapper over [`zip::ZipWriter`] writing parts with fixed timestamps
pub(crate) struct PackageWriter<W: Write + Seek> {
    zip: zip::ZipWriter<W>,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> PackageWriter<W> {
    pub fn new(writer: W) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());
        Self {
            zip: zip::ZipWriter::new(writer),
            options,
        }
    }

    /// Write an XML (or other text) part
    pub fn part(&mut self, name: &str, content: &str) -> OoxmlResult<()> {
        self.binary_part(name, content.as_bytes())
    }

    pub fn binary_part(&mut self, name: &str, bytes: &[u8]) -> OoxmlResult<()> {
        self.zip.start_file(name, self.options.clone())?;
        self.zip.write_all(bytes)?;
        Ok(())
    }

    /// Write `docProps/core.xml`
    pub fn core_props(&mut self, props: &PackageProps) -> OoxmlResult<()> {
        let xml = props.core_xml()?;
        self.part("docProps/core.xml", &xml)
    }

    pub fn finish(mut self) -> OoxmlResult<()> {
        self.zip.finish()?;
        Ok(())
    }
}

/// Builds a `.rels` part
#[derive(Debug, Default)]
pub(crate) struct Relationships {
    entries: Vec<(String, String, String)>,
}

impl Relationships {
    /// Add a relationship; `kind` is the suffix after the officeDocument base URI
    /// unless it is already absolute. Returns the new id.
    pub fn add(&mut self, kind: &str, target: &str) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        let kind = if kind.starts_with("http") {
            kind.to_string()
        } else {
            format!("{REL_BASE}/{kind}")
        };
        self.entries.push((id.clone(), kind, target.to_string()));
        id
    }

    pub fn to_xml(&self) -> String {
        let mut xml = format!(
            r#"{XML_DECL}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#
        );
        for (id, kind, target) in &self.entries {
            xml.push_str(&format!(
                r#"<Relationship Id="{id}" Type="{kind}" Target="{target}"/>"#
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Builds `[Content_Types].xml`
#[derive(Debug, Default)]
pub(crate) struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub fn new() -> Self {
        let mut types = Self::default();
        types.add_default("rels", CT_RELS);
        types.add_default("xml", "application/xml");
        types.add("/docProps/core.xml", CT_CORE);
        types
    }

    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        if !self.defaults.iter().any(|(ext, _)| ext == extension) {
            self.defaults
                .push((extension.to_string(), content_type.to_string()));
        }
    }

    pub fn add(&mut self, part: &str, content_type: &str) {
        self.overrides.push((part.to_string(), content_type.to_string()));
    }

    pub fn to_xml(&self) -> String {
        let mut xml = format!(
            r#"{XML_DECL}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#
        );
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(r#"<Default Extension="{ext}" ContentType="{ct}"/>"#));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(r#"<Override PartName="{part}" ContentType="{ct}"/>"#));
        }
        xml.push_str("</Types>");
        xml
    }
}

/// Escape text for an XML element or attribute, rejecting characters XML 1.0 cannot hold
pub(crate) fn xml_text(s: &str) -> OoxmlResult<String> {
    if let Some(c) = s
        .chars()
        .find(|&c| (c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')) || c == '\u{FFFE}' || c == '\u{FFFF}')
    {
        let preview: String = s.chars().take(40).collect();
        return Err(OoxmlError::InvalidContent(format!(
            "text {preview:?} contains character U+{:04X}, which cannot be stored in XML",
            c as u32
        )));
    }
    Ok(quick_xml::escape::escape(s).into_owned())
}

/// Read a part into a string; `None` when the package lacks it
pub(crate) fn read_part<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> OoxmlResult<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(f) => f,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

/// Read a part's bytes; `None` when the package lacks it
pub(crate) fn read_binary_part<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> OoxmlResult<Option<Vec<u8>>> {
    let mut file = match archive.by_name(name) {
        Ok(f) => f,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

/// One relationship read back from a `.rels` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rel {
    /// Last segment of the relationship type URI (`slide`, `image`, ...)
    pub kind: String,
    /// Absolute part name of the target
    pub target: String,
}

/// Read the relationships of `part`, keyed by id
pub(crate) fn read_rels<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    part: &str,
) -> OoxmlResult<HashMap<String, Rel>> {
    let (dir, file) = match part.rfind('/') {
        Some(idx) => (&part[..idx], &part[idx + 1..]),
        None => ("", part),
    };
    let rels_name = if dir.is_empty() {
        format!("_rels/{file}.rels")
    } else {
        format!("{dir}/_rels/{file}.rels")
    };

    let mut rels = HashMap::new();
    let file = match archive.by_name(&rels_name) {
        Ok(f) => f,
        Err(_) => return Ok(rels), // No relationships is valid
    };

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);
    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                let mut kind = String::new();
                let mut external = false;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = attr.unescape_value().ok().map(|s| s.to_string()),
                        b"Target" => target = attr.unescape_value().ok().map(|s| s.to_string()),
                        b"Type" => {
                            let value = attr.unescape_value().map(|s| s.to_string()).unwrap_or_default();
                            kind = value.rsplit('/').next().unwrap_or_default().to_string();
                        }
                        b"TargetMode" => external = attr.value.as_ref() == b"External",
                        _ => {}
                    }
                }
                if let (Some(id), Some(target), false) = (id, target, external) {
                    let target = resolve_target(dir, &target);
                    rels.insert(id, Rel { kind, target });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(rels)
}

/// Resolve a relationship target against the directory of its source part
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Open a package and check it carries a content-types part
pub(crate) fn open_archive<R: Read + Seek>(reader: R) -> OoxmlResult<zip::ZipArchive<R>> {
    let mut archive = zip::ZipArchive::new(reader)?;
    if archive.by_name("[Content_Types].xml").is_err() {
        return Err(OoxmlError::InvalidFormat(
            "Missing [Content_Types].xml".into(),
        ));
    }
    Ok(archive)
}

/// Find the main part the root relationships point at
pub(crate) fn main_part<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    fallback: &str,
) -> OoxmlResult<String> {
    let rels = read_rels(archive, "")?;
    Ok(rels
        .into_values()
        .find(|rel| rel.kind == "officeDocument")
        .map(|rel| rel.target)
        .unwrap_or_else(|| fallback.to_string()))
}

/// Targets of the given relationship kind, ordered by relationship id number
pub(crate) fn targets_of_kind(rels: &HashMap<String, Rel>, kind: &str) -> Vec<String> {
    let mut found: Vec<(u32, &Rel)> = rels
        .iter()
        .filter(|(_, rel)| rel.kind == kind)
        .map(|(id, rel)| {
            let n = id.trim_start_matches(|c: char| !c.is_ascii_digit()).parse().unwrap_or(u32::MAX);
            (n, rel)
        })
        .collect();
    found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.target.cmp(&b.1.target)));
    found.into_iter().map(|(_, rel)| rel.target.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_text_escapes() {
        assert_eq!(xml_text("a < b & \"c\"").unwrap(), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(xml_text("tab\there\nline").unwrap(), "tab\there\nline");
    }

    #[test]
    fn test_xml_text_rejects_control_chars() {
        let err = xml_text("bad\u{1}value").unwrap_err();
        assert!(matches!(err, OoxmlError::InvalidContent(ref m) if m.contains("U+0001")));
        assert!(xml_text("\u{FFFF}").is_err());
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("ppt/slides", "../slideLayouts/slideLayout1.xml"), "ppt/slideLayouts/slideLayout1.xml");
        assert_eq!(resolve_target("xl", "worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(resolve_target("xl", "/xl/worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
    }

    #[test]
    fn test_relationship_ids_are_sequential() {
        let mut rels = Relationships::default();
        assert_eq!(rels.add("slideLayout", "../slideLayouts/slideLayout1.xml"), "rId1");
        assert_eq!(rels.add(REL_CORE_PROPERTIES, "docProps/core.xml"), "rId2");
        let xml = rels.to_xml();
        assert!(xml.contains(&format!("Type=\"{REL_BASE}/slideLayout\"")));
        assert!(xml.contains(&format!("Type=\"{REL_CORE_PROPERTIES}\"")));
    }
}
