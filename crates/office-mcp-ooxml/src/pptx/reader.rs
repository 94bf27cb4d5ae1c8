//! PPTX reader used to import templates

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::debug;

use office_mcp_core::{
    ImageData, ImageFormat, Picture, Placeholder, Presentation, SlideLayout, TextFormat, Theme,
};

use crate::error::{OoxmlError, OoxmlResult};
use crate::package::{main_part, open_archive, read_binary_part, read_part, read_rels};

/// Text and pictures recovered from one slide part
#[derive(Debug, Default)]
struct SlideContent {
    texts: Vec<(Placeholder, Vec<String>)>,
    pictures: Vec<PictureRef>,
}

#[derive(Debug, Default)]
struct PictureRef {
    rid: String,
    name: String,
    frame: [i64; 4],
}

/// PPTX file reader
///
/// Recovers slide order, layouts, placeholder text, pictures and speaker
/// notes. Everything else in the package (animations, custom shapes, master
/// decoration) is not carried over.
pub struct PptxReader;

impl PptxReader {
    /// Read a deck from a file path as a new presentation named `title`
    pub fn read_file<P: AsRef<Path>>(path: P, title: &str, theme: Theme) -> OoxmlResult<Presentation> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file), title, theme)
    }

    /// Read a deck from a reader
    pub fn read<R: Read + Seek>(reader: R, title: &str, theme: Theme) -> OoxmlResult<Presentation> {
        let mut archive = open_archive(reader)?;
        let main = main_part(&mut archive, "ppt/presentation.xml")?;
        let pres_xml = read_part(&mut archive, &main)?
            .ok_or_else(|| OoxmlError::MissingPart(main.clone()))?;
        let pres_rels = read_rels(&mut archive, &main)?;

        let mut presentation = Presentation::empty(title, theme);
        for rid in slide_rids(&pres_xml)? {
            let Some(rel) = pres_rels.get(&rid) else {
                continue;
            };
            let slide_part = rel.target.clone();
            let Some(slide_xml) = read_part(&mut archive, &slide_part)? else {
                continue;
            };
            let slide_rels = read_rels(&mut archive, &slide_part)?;

            let mut layout = SlideLayout::TitleAndContent;
            let mut notes = Vec::new();
            for rel in slide_rels.values() {
                match rel.kind.as_str() {
                    "slideLayout" => {
                        if let Some(xml) = read_part(&mut archive, &rel.target)? {
                            layout = layout_type(&xml)?.unwrap_or(layout);
                        }
                    }
                    "notesSlide" => {
                        if let Some(xml) = read_part(&mut archive, &rel.target)? {
                            notes = notes_text(&xml)?;
                        }
                    }
                    _ => {}
                }
            }

            let content = slide_content(&slide_xml)?;
            let (id, _) = presentation.add_slide(layout, None)?;
            let slide = presentation.slide_mut(id)?;
            for (placeholder, paragraphs) in content.texts {
                for paragraph in paragraphs {
                    slide.add_text(placeholder, &paragraph, TextFormat::default());
                }
            }
            if !notes.is_empty() {
                slide.add_notes(&notes.join("\n"));
            }
            for picture in content.pictures {
                let Some(rel) = slide_rels.get(&picture.rid) else {
                    continue;
                };
                let Some(bytes) = read_binary_part(&mut archive, &rel.target)? else {
                    continue;
                };
                let Some(format) = ImageFormat::sniff(&bytes) else {
                    debug!(part = %rel.target, "skipping picture in unsupported format");
                    continue;
                };
                let [x, y, cx, cy] = picture.frame;
                slide.add_picture(Picture {
                    image: ImageData {
                        bytes,
                        format,
                        name: picture.name,
                    },
                    x,
                    y,
                    cx,
                    cy,
                });
            }
        }

        debug!(slides = presentation.slide_count(), "imported presentation template");
        Ok(presentation)
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.to_string()))
}

/// Relationship ids of `p:sldId` entries in deck order
fn slide_rids(xml: &str) -> OoxmlResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut rids = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sldId" => {
                if let Some(rid) = attr_value(&e, b"r:id") {
                    rids.push(rid);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
    }
    Ok(rids)
}

/// Layout type from a `p:sldLayout` root element
fn layout_type(xml: &str) -> OoxmlResult<Option<SlideLayout>> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"sldLayout" => {
                return Ok(attr_value(&e, b"type").and_then(|t| SlideLayout::from_ooxml_type(&t)));
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
    }
}

fn placeholder_for(ph_type: Option<&str>) -> Option<Placeholder> {
    match ph_type {
        Some("title") | Some("ctrTitle") => Some(Placeholder::Title),
        Some("subTitle") => Some(Placeholder::Subtitle),
        Some("body") | Some("obj") | None => Some(Placeholder::Content),
        // Dates, footers, slide numbers and pictures carry no caller text
        _ => None,
    }
}

/// Paragraph texts of each text shape plus the pictures on a slide
fn slide_content(xml: &str) -> OoxmlResult<SlideContent> {
    let mut reader = Reader::from_str(xml);
    let mut content = SlideContent::default();

    let mut in_sp = false;
    let mut in_pic = false;
    let mut in_t = false;
    let mut role: Option<Placeholder> = Some(Placeholder::Content);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut picture = PictureRef::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sp" => {
                    in_sp = true;
                    role = Some(Placeholder::Content);
                    paragraphs.clear();
                }
                b"pic" => {
                    in_pic = true;
                    picture = PictureRef::default();
                }
                b"p" if in_sp => current.clear(),
                b"t" if in_sp => in_t = true,
                b"cNvPr" if in_pic => picture.name = attr_value(&e, b"descr").unwrap_or_default(),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"ph" if in_sp => role = placeholder_for(attr_value(&e, b"type").as_deref()),
                b"br" if in_sp => current.push('\n'),
                b"cNvPr" if in_pic => picture.name = attr_value(&e, b"descr").unwrap_or_default(),
                b"blip" if in_pic => picture.rid = attr_value(&e, b"r:embed").unwrap_or_default(),
                b"off" if in_pic => {
                    picture.frame[0] = attr_value(&e, b"x").and_then(|v| v.parse().ok()).unwrap_or(0);
                    picture.frame[1] = attr_value(&e, b"y").and_then(|v| v.parse().ok()).unwrap_or(0);
                }
                b"ext" if in_pic => {
                    if let (Some(cx), Some(cy)) = (attr_value(&e, b"cx"), attr_value(&e, b"cy")) {
                        picture.frame[2] = cx.parse().unwrap_or(0);
                        picture.frame[3] = cy.parse().unwrap_or(0);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_t => {
                let text = e.unescape().map_err(OoxmlError::Xml)?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_t = false,
                b"p" if in_sp => paragraphs.push(std::mem::take(&mut current)),
                b"sp" => {
                    in_sp = false;
                    // Drop trailing empty paragraphs PowerPoint leaves in placeholders
                    while paragraphs.last().is_some_and(|p| p.is_empty()) {
                        paragraphs.pop();
                    }
                    if let Some(role) = role {
                        if !paragraphs.is_empty() {
                            content.texts.push((role, std::mem::take(&mut paragraphs)));
                        }
                    }
                }
                b"pic" => {
                    in_pic = false;
                    if !picture.rid.is_empty() && picture.frame[2] > 0 && picture.frame[3] > 0 {
                        content.pictures.push(std::mem::take(&mut picture));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
    }
    Ok(content)
}

/// Paragraphs of the body placeholder on a notes slide
fn notes_text(xml: &str) -> OoxmlResult<Vec<String>> {
    let content = slide_content(xml)?;
    Ok(content
        .texts
        .into_iter()
        .filter(|(role, _)| *role == Placeholder::Content)
        .flat_map(|(_, paragraphs)| paragraphs)
        .collect())
}
