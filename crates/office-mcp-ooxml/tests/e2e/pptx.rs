//! PPTX write/read-back tests.

use std::io::Cursor;

use office_mcp_core::{
    Color, ImageData, ImageFormat, Picture, Placeholder, Presentation, SlideLayout, TextFormat,
    Theme,
};
use office_mcp_ooxml::{PptxReader, PptxWriter};
use pretty_assertions::assert_eq;

use crate::common::{part_names, part_text, props, PNG_PIXEL};

fn sample_deck() -> Presentation {
    let mut deck = Presentation::new("Roadmap", Theme::Corporate);

    let (id, _) = deck.add_slide(SlideLayout::TitleAndContent, None).unwrap();
    let slide = deck.slide_mut(id).unwrap();
    let bold = TextFormat {
        bold: Some(true),
        color: Some(Color::rgb(0x1F, 0x4E, 0x79)),
        ..Default::default()
    };
    slide.add_text(Placeholder::Title, "Goals & Risks", bold);
    slide.add_text(Placeholder::Content, "Ship <v2>", TextFormat::default());
    slide.add_text(Placeholder::Content, "Hire two engineers", TextFormat::default());
    slide.add_notes("Open with the customer story");

    let image = ImageData {
        bytes: PNG_PIXEL.to_vec(),
        format: ImageFormat::Png,
        name: "logo.png".into(),
    };
    slide.add_picture(Picture::new(image, (1.0, 1.5), (2.0, 1.0)).unwrap());

    deck.add_slide(SlideLayout::SectionHeader, None).unwrap();
    deck
}

fn write(deck: &Presentation) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    PptxWriter::write(deck, &props(deck.title()), &mut buffer).unwrap();
    buffer.into_inner()
}

#[test]
fn test_package_parts() {
    let bytes = write(&sample_deck());
    let names = part_names(&bytes);

    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "ppt/presentation.xml",
        "ppt/slides/slide1.xml",
        "ppt/slides/slide2.xml",
        "ppt/slides/slide3.xml",
        "ppt/media/image1.png",
        "ppt/notesSlides/notesSlide1.xml",
    ] {
        assert!(names.iter().any(|n| n == part), "missing {part}");
    }

    let core = part_text(&bytes, "docProps/core.xml");
    assert!(core.contains("<dc:title>Roadmap</dc:title>"));
}

#[test]
fn test_round_trip() {
    let deck = sample_deck();
    let read = PptxReader::read(Cursor::new(write(&deck)), "Roadmap", Theme::Corporate).unwrap();

    assert_eq!(read.slide_count(), 3);
    let layouts: Vec<_> = read.slides().iter().map(|s| s.layout()).collect();
    assert_eq!(
        layouts,
        vec![
            SlideLayout::TitleSlide,
            SlideLayout::TitleAndContent,
            SlideLayout::SectionHeader
        ]
    );

    let texts = |slide: usize, placeholder| -> Vec<String> {
        read.slides()[slide]
            .text(placeholder)
            .iter()
            .map(|p| p.text.clone())
            .collect()
    };
    assert_eq!(texts(0, Placeholder::Title), vec!["Roadmap"]);
    assert_eq!(texts(1, Placeholder::Title), vec!["Goals & Risks"]);
    assert_eq!(
        texts(1, Placeholder::Content),
        vec!["Ship <v2>", "Hire two engineers"]
    );
    assert_eq!(read.slides()[1].notes(), ["Open with the customer story".to_string()]);
    assert!(!read.slides()[2].has_notes());

    let original = &deck.slides()[1].pictures()[0];
    let picture = &read.slides()[1].pictures()[0];
    assert_eq!(picture, original);
}

#[test]
fn test_multiline_text_reads_back_as_paragraphs() {
    let mut deck = Presentation::new("Lines", Theme::Default);
    let (id, _) = deck.add_slide(SlideLayout::TitleAndContent, None).unwrap();
    deck.slide_mut(id)
        .unwrap()
        .add_text(Placeholder::Content, "one\ntwo", TextFormat::default());

    let read = PptxReader::read(Cursor::new(write(&deck)), "Lines", Theme::Default).unwrap();
    let content: Vec<_> = read.slides()[1]
        .text(Placeholder::Content)
        .iter()
        .map(|p| p.text.as_str())
        .collect();
    assert_eq!(content, vec!["one", "two"]);
}

#[test]
fn test_write_file_and_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.pptx");
    let deck = sample_deck();

    PptxWriter::write_file(&deck, &props("Roadmap"), &path).unwrap();
    let read = PptxReader::read_file(&path, "Copy", Theme::Modern).unwrap();

    assert_eq!(read.title(), "Copy");
    assert_eq!(read.theme(), Theme::Modern);
    assert_eq!(read.slide_count(), deck.slide_count());
}

#[test]
fn test_output_is_deterministic() {
    let deck = sample_deck();
    assert_eq!(write(&deck), write(&deck));
}

#[test]
fn test_read_rejects_non_zip() {
    let result = PptxReader::read(Cursor::new(b"not a zip".to_vec()), "x", Theme::Default);
    assert!(result.is_err());
}
