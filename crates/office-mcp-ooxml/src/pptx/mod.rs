//! PPTX (PresentationML) writer and reader

mod parts;
mod reader;

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use office_mcp_core::{Placeholder, Presentation, Slide, SlideLayout, TextAlignment, TextFormat, TextParagraph};

use crate::error::OoxmlResult;
use crate::package::{
    xml_text, ContentTypes, PackageProps, PackageWriter, Relationships, REL_CORE_PROPERTIES,
    REL_OFFICE_DOCUMENT, XML_DECL,
};
use parts::{NS_A, NS_P, NS_R, SP_TREE_HEADER};

pub use reader::PptxReader;

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_PRES_PROPS: &str = "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_NOTES_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml";
const CT_NOTES_SLIDE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";

/// PPTX file writer
pub struct PptxWriter;

impl PptxWriter {
    /// Write a presentation to a file path
    ///
    /// The package is assembled in memory first, so content errors never leave
    /// a partial file behind.
    pub fn write_file<P: AsRef<Path>>(
        presentation: &Presentation,
        props: &PackageProps,
        path: P,
    ) -> OoxmlResult<()> {
        let mut buffer = Cursor::new(Vec::new());
        Self::write(presentation, props, &mut buffer)?;
        std::fs::write(path, buffer.into_inner())?;
        Ok(())
    }

    /// Write a presentation to a writer
    pub fn write<W: Write + Seek>(
        presentation: &Presentation,
        props: &PackageProps,
        writer: W,
    ) -> OoxmlResult<()> {
        let slides = presentation.slides();
        let has_notes = slides.iter().any(Slide::has_notes);
        let mut types = ContentTypes::new();
        let mut package = PackageWriter::new(writer);

        // Slides first: they carry all caller text, so a bad character fails early
        let mut media_count = 0usize;
        let mut notes_count = 0usize;
        let mut slide_parts = Vec::with_capacity(slides.len());
        for (i, slide) in slides.iter().enumerate() {
            let n = i + 1;
            let mut rels = Relationships::default();
            let layout_index = SlideLayout::ALL
                .iter()
                .position(|l| *l == slide.layout())
                .unwrap_or(0);
            rels.add(
                "slideLayout",
                &format!("../slideLayouts/slideLayout{}.xml", layout_index + 1),
            );

            let notes = if slide.has_notes() {
                notes_count += 1;
                rels.add("notesSlide", &format!("../notesSlides/notesSlide{notes_count}.xml"));
                Some((notes_count, notes_slide_xml(slide)?))
            } else {
                None
            };

            let mut image_rids = Vec::new();
            let mut media = Vec::new();
            for picture in slide.pictures() {
                media_count += 1;
                let file = format!("image{media_count}.{}", picture.image.format.extension());
                types.add_default(picture.image.format.extension(), picture.image.format.content_type());
                image_rids.push(rels.add("image", &format!("../media/{file}")));
                media.push((format!("ppt/media/{file}"), &picture.image.bytes));
            }

            let xml = slide_xml(slide, &image_rids)?;
            types.add(&format!("/ppt/slides/slide{n}.xml"), CT_SLIDE);
            slide_parts.push((n, xml, rels, notes, media));
        }

        // presentation.xml and its relationships
        let mut pres_rels = Relationships::default();
        let master_rid = pres_rels.add("slideMaster", "slideMasters/slideMaster1.xml");
        pres_rels.add("theme", "theme/theme1.xml");
        pres_rels.add("presProps", "presProps.xml");
        let mut slide_ids = String::new();
        for (slide, (n, ..)) in slides.iter().zip(&slide_parts) {
            let rid = pres_rels.add("slide", &format!("slides/slide{n}.xml"));
            slide_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="{rid}"/>"#, slide.id()));
        }
        let notes_master = if has_notes {
            let rid = pres_rels.add("notesMaster", "notesMasters/notesMaster1.xml");
            format!(r#"<p:notesMasterIdLst><p:notesMasterId r:id="{rid}"/></p:notesMasterIdLst>"#)
        } else {
            String::new()
        };
        let slide_id_list = if slide_ids.is_empty() {
            String::new()
        } else {
            format!("<p:sldIdLst>{slide_ids}</p:sldIdLst>")
        };
        let presentation_xml = format!(
            r#"{XML_DECL}
<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="{master_rid}"/></p:sldMasterIdLst>{notes_master}{slide_id_list}{sizes}</p:presentation>"#,
            sizes = parts::slide_size_xml(),
        );

        types.add("/ppt/presentation.xml", CT_PRESENTATION);
        types.add("/ppt/presProps.xml", CT_PRES_PROPS);
        types.add("/ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER);
        for i in 0..SlideLayout::ALL.len() {
            types.add(&format!("/ppt/slideLayouts/slideLayout{}.xml", i + 1), CT_SLIDE_LAYOUT);
        }
        types.add("/ppt/theme/theme1.xml", CT_THEME);
        if has_notes {
            types.add("/ppt/theme/theme2.xml", CT_THEME);
            types.add("/ppt/notesMasters/notesMaster1.xml", CT_NOTES_MASTER);
            for i in 0..notes_count {
                types.add(&format!("/ppt/notesSlides/notesSlide{}.xml", i + 1), CT_NOTES_SLIDE);
            }
        }

        // Write [Content_Types].xml
        package.part("[Content_Types].xml", &types.to_xml())?;

        // Write _rels/.rels
        let mut root_rels = Relationships::default();
        root_rels.add(REL_OFFICE_DOCUMENT, "ppt/presentation.xml");
        root_rels.add(REL_CORE_PROPERTIES, "docProps/core.xml");
        package.part("_rels/.rels", &root_rels.to_xml())?;
        package.core_props(props)?;

        package.part("ppt/presentation.xml", &presentation_xml)?;
        package.part("ppt/_rels/presentation.xml.rels", &pres_rels.to_xml())?;
        package.part(
            "ppt/presProps.xml",
            &format!(r#"{XML_DECL}
<p:presentationPr xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"/>"#),
        )?;

        // Master, layouts and theme
        package.part("ppt/slideMasters/slideMaster1.xml", &parts::slide_master_xml())?;
        let mut master_rels = Relationships::default();
        for i in 0..SlideLayout::ALL.len() {
            master_rels.add("slideLayout", &format!("../slideLayouts/slideLayout{}.xml", i + 1));
        }
        master_rels.add("theme", "../theme/theme1.xml");
        package.part(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &master_rels.to_xml(),
        )?;
        for (i, layout) in SlideLayout::ALL.iter().enumerate() {
            package.part(
                &format!("ppt/slideLayouts/slideLayout{}.xml", i + 1),
                &parts::slide_layout_xml(*layout),
            )?;
            let mut layout_rels = Relationships::default();
            layout_rels.add("slideMaster", "../slideMasters/slideMaster1.xml");
            package.part(
                &format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
                &layout_rels.to_xml(),
            )?;
        }
        let theme_xml = parts::theme_xml(presentation.theme());
        package.part("ppt/theme/theme1.xml", &theme_xml)?;

        if has_notes {
            package.part("ppt/theme/theme2.xml", &theme_xml)?;
            package.part("ppt/notesMasters/notesMaster1.xml", &parts::notes_master_xml())?;
            let mut rels = Relationships::default();
            rels.add("theme", "../theme/theme2.xml");
            package.part("ppt/notesMasters/_rels/notesMaster1.xml.rels", &rels.to_xml())?;
        }

        // Slides, notes and media
        for (n, xml, rels, notes, media) in slide_parts {
            package.part(&format!("ppt/slides/slide{n}.xml"), &xml)?;
            package.part(&format!("ppt/slides/_rels/slide{n}.xml.rels"), &rels.to_xml())?;
            if let Some((notes_n, notes_xml)) = notes {
                package.part(&format!("ppt/notesSlides/notesSlide{notes_n}.xml"), &notes_xml)?;
                let mut notes_rels = Relationships::default();
                notes_rels.add("notesMaster", "../notesMasters/notesMaster1.xml");
                notes_rels.add("slide", &format!("../slides/slide{n}.xml"));
                package.part(
                    &format!("ppt/notesSlides/_rels/notesSlide{notes_n}.xml.rels"),
                    &notes_rels.to_xml(),
                )?;
            }
            for (name, bytes) in media {
                package.binary_part(&name, bytes)?;
            }
        }

        package.finish()
    }
}

fn slide_xml(slide: &Slide, image_rids: &[String]) -> OoxmlResult<String> {
    let mut shapes = String::new();
    let mut shape_id = 2u32;

    for placeholder in [Placeholder::Title, Placeholder::Subtitle, Placeholder::Content] {
        let paragraphs = slide.text(placeholder);
        if paragraphs.is_empty() {
            continue;
        }
        let ph = match (placeholder, slide.layout()) {
            (Placeholder::Title, SlideLayout::TitleSlide) => r#"<p:ph type="ctrTitle"/>"#,
            (Placeholder::Title, _) => r#"<p:ph type="title"/>"#,
            (Placeholder::Subtitle, _) => r#"<p:ph type="subTitle" idx="1"/>"#,
            (Placeholder::Content, _) => r#"<p:ph idx="2"/>"#,
        };
        let (x, y, cx, cy) = parts::placeholder_frame(slide.layout(), placeholder);
        let label = match placeholder {
            Placeholder::Title => "Title",
            Placeholder::Subtitle => "Subtitle",
            Placeholder::Content => "Content Placeholder",
        };
        shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{shape_id}" name="{label} {shape_id}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{ph}</p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm></p:spPr><p:txBody><a:bodyPr><a:normAutofit/></a:bodyPr><a:lstStyle/>{body}</p:txBody></p:sp>"#,
            body = paragraphs_xml(paragraphs)?,
        ));
        shape_id += 1;
    }

    for (picture, rid) in slide.pictures().iter().zip(image_rids) {
        shapes.push_str(&format!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{shape_id}" name="Picture {shape_id}" descr="{descr}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{rid}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
            descr = xml_text(&picture.image.name)?,
            x = picture.x,
            y = picture.y,
            cx = picture.cx,
            cy = picture.cy,
        ));
        shape_id += 1;
    }

    Ok(format!(
        r#"{XML_DECL}
<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:spTree>{SP_TREE_HEADER}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    ))
}

fn notes_slide_xml(slide: &Slide) -> OoxmlResult<String> {
    let paragraphs: Vec<TextParagraph> = slide
        .notes()
        .iter()
        .map(|text| TextParagraph {
            text: text.clone(),
            format: TextFormat::default(),
        })
        .collect();
    Ok(format!(
        r#"{XML_DECL}
<p:notes xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:spTree>{SP_TREE_HEADER}<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody></p:sp></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>"#,
        body = paragraphs_xml(&paragraphs)?,
    ))
}

/// DrawingML paragraphs; embedded newlines start new paragraphs with the same format
fn paragraphs_xml(paragraphs: &[TextParagraph]) -> OoxmlResult<String> {
    let mut xml = String::new();
    for paragraph in paragraphs {
        let p_pr = paragraph_props(&paragraph.format);
        let r_pr = run_props(&paragraph.format)?;
        for line in paragraph.text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                xml.push_str(&format!(r#"<a:p>{p_pr}<a:endParaRPr lang="en-US"/></a:p>"#));
            } else {
                xml.push_str(&format!(
                    "<a:p>{p_pr}<a:r>{r_pr}<a:t>{}</a:t></a:r></a:p>",
                    xml_text(line)?
                ));
            }
        }
    }
    Ok(xml)
}

fn paragraph_props(format: &TextFormat) -> String {
    match format.alignment {
        Some(alignment) => {
            let algn = match alignment {
                TextAlignment::Left => "l",
                TextAlignment::Center => "ctr",
                TextAlignment::Right => "r",
                TextAlignment::Justify => "just",
            };
            format!(r#"<a:pPr algn="{algn}"/>"#)
        }
        None => String::new(),
    }
}

fn run_props(format: &TextFormat) -> OoxmlResult<String> {
    let mut attrs = String::from(r#" lang="en-US""#);
    if let Some(size) = format.font_size {
        attrs.push_str(&format!(r#" sz="{}""#, size * 100));
    }
    if let Some(bold) = format.bold {
        attrs.push_str(if bold { r#" b="1""# } else { r#" b="0""# });
    }
    if let Some(italic) = format.italic {
        attrs.push_str(if italic { r#" i="1""# } else { r#" i="0""# });
    }

    let mut children = String::new();
    if let Some(color) = format.color {
        children.push_str(&format!(
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            color.to_hex()
        ));
    }
    if let Some(font) = &format.font_name {
        children.push_str(&format!(r#"<a:latin typeface="{}"/>"#, xml_text(font)?));
    }

    Ok(if children.is_empty() {
        format!("<a:rPr{attrs} dirty=\"0\"/>")
    } else {
        format!("<a:rPr{attrs} dirty=\"0\">{children}</a:rPr>")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use office_mcp_core::{Color, Theme};

    fn props() -> PackageProps {
        PackageProps::new("Deck", chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_run_props() {
        let format = TextFormat {
            font_size: Some(24),
            bold: Some(true),
            color: Some(Color::rgb(255, 0, 0)),
            font_name: Some("Arial".into()),
            ..Default::default()
        };
        assert_eq!(
            run_props(&format).unwrap(),
            r#"<a:rPr lang="en-US" sz="2400" b="1" dirty="0"><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill><a:latin typeface="Arial"/></a:rPr>"#
        );
    }

    #[test]
    fn test_multiline_text_splits_paragraphs() {
        let xml = paragraphs_xml(&[TextParagraph {
            text: "one\r\n\ntwo".into(),
            format: TextFormat::default(),
        }])
        .unwrap();
        assert_eq!(xml.matches("<a:p>").count(), 3);
        assert!(xml.contains("<a:t>one</a:t>"));
        assert!(xml.contains("<a:endParaRPr"));
    }

    #[test]
    fn test_write_is_deterministic() {
        let mut deck = Presentation::new("Deck", Theme::Classic);
        let (id, _) = deck.add_slide(SlideLayout::TitleAndContent, None).unwrap();
        deck.slide_mut(id).unwrap().add_notes("remember this");

        let mut first = Cursor::new(Vec::new());
        PptxWriter::write(&deck, &props(), &mut first).unwrap();
        let mut second = Cursor::new(Vec::new());
        PptxWriter::write(&deck, &props(), &mut second).unwrap();
        assert_eq!(first.into_inner(), second.into_inner());
    }

    #[test]
    fn test_bad_character_leaves_no_file() {
        let mut deck = Presentation::new("Deck", Theme::Default);
        let (id, _) = deck.add_slide(SlideLayout::TitleAndContent, None).unwrap();
        deck.slide_mut(id)
            .unwrap()
            .add_text(Placeholder::Content, "bell\u{7}", TextFormat::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let err = PptxWriter::write_file(&deck, &props(), &path).unwrap_err();
        assert!(matches!(err, crate::OoxmlError::InvalidContent(_)));
        assert!(!path.exists());
    }
}
