//! Slide deck model

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::style::{Color, TextFormat};
use crate::EMU_PER_INCH;

/// First slide id handed out; PresentationML reserves everything below 256
pub const FIRST_SLIDE_ID: u32 = 256;

/// Largest picture offset or extent accepted, in inches
pub const MAX_PICTURE_INCHES: f64 = 56.0;

/// Slide width in EMU (10in, 4:3)
pub const SLIDE_WIDTH_EMU: i64 = 9_144_000;

/// Slide height in EMU (7.5in, 4:3)
pub const SLIDE_HEIGHT_EMU: i64 = 6_858_000;

/// Visual theme of a presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Default,
    Modern,
    Classic,
    Minimal,
    Corporate,
}

/// Colors and fonts a theme contributes to the saved deck
#[derive(Debug, Clone, Copy)]
pub struct ThemePalette {
    pub dark: Color,
    pub light: Color,
    pub accents: [Color; 6],
    pub major_font: &'static str,
    pub minor_font: &'static str,
}

impl Theme {
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Modern => "modern",
            Theme::Classic => "classic",
            Theme::Minimal => "minimal",
            Theme::Corporate => "corporate",
        }
    }

    pub fn palette(&self) -> ThemePalette {
        match self {
            Theme::Default => ThemePalette {
                dark: Color::rgb(0x44, 0x54, 0x6A),
                light: Color::rgb(0xE7, 0xE6, 0xE6),
                accents: [
                    Color::rgb(0x44, 0x72, 0xC4),
                    Color::rgb(0xED, 0x7D, 0x31),
                    Color::rgb(0xA5, 0xA5, 0xA5),
                    Color::rgb(0xFF, 0xC0, 0x00),
                    Color::rgb(0x5B, 0x9B, 0xD5),
                    Color::rgb(0x70, 0xAD, 0x47),
                ],
                major_font: "Calibri Light",
                minor_font: "Calibri",
            },
            Theme::Modern => ThemePalette {
                dark: Color::rgb(0x21, 0x21, 0x21),
                light: Color::rgb(0xF5, 0xF5, 0xF5),
                accents: [
                    Color::rgb(0x00, 0x96, 0x88),
                    Color::rgb(0xFF, 0x57, 0x22),
                    Color::rgb(0x3F, 0x51, 0xB5),
                    Color::rgb(0xFF, 0xC1, 0x07),
                    Color::rgb(0x9C, 0x27, 0xB0),
                    Color::rgb(0x8B, 0xC3, 0x4A),
                ],
                major_font: "Segoe UI Light",
                minor_font: "Segoe UI",
            },
            Theme::Classic => ThemePalette {
                dark: Color::rgb(0x1F, 0x38, 0x64),
                light: Color::rgb(0xEE, 0xEC, 0xE1),
                accents: [
                    Color::rgb(0x4F, 0x81, 0xBD),
                    Color::rgb(0xC0, 0x50, 0x4D),
                    Color::rgb(0x9B, 0xBB, 0x59),
                    Color::rgb(0x80, 0x64, 0xA2),
                    Color::rgb(0x4B, 0xAC, 0xC6),
                    Color::rgb(0xF7, 0x96, 0x46),
                ],
                major_font: "Times New Roman",
                minor_font: "Georgia",
            },
            Theme::Minimal => ThemePalette {
                dark: Color::rgb(0x00, 0x00, 0x00),
                light: Color::rgb(0xFF, 0xFF, 0xFF),
                accents: [
                    Color::rgb(0x59, 0x59, 0x59),
                    Color::rgb(0x7F, 0x7F, 0x7F),
                    Color::rgb(0xA6, 0xA6, 0xA6),
                    Color::rgb(0x26, 0x26, 0x26),
                    Color::rgb(0xBF, 0xBF, 0xBF),
                    Color::rgb(0x40, 0x40, 0x40),
                ],
                major_font: "Helvetica Neue",
                minor_font: "Helvetica Neue",
            },
            Theme::Corporate => ThemePalette {
                dark: Color::rgb(0x00, 0x2B, 0x5C),
                light: Color::rgb(0xE8, 0xED, 0xF2),
                accents: [
                    Color::rgb(0x00, 0x5B, 0xAC),
                    Color::rgb(0x7A, 0x8B, 0x99),
                    Color::rgb(0x00, 0xA3, 0xE0),
                    Color::rgb(0xF2, 0xA9, 0x00),
                    Color::rgb(0x6C, 0x8E, 0xBF),
                    Color::rgb(0x2E, 0x8B, 0x57),
                ],
                major_font: "Arial",
                minor_font: "Arial",
            },
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(Theme::Default),
            "modern" => Ok(Theme::Modern),
            "classic" => Ok(Theme::Classic),
            "minimal" => Ok(Theme::Minimal),
            "corporate" => Ok(Theme::Corporate),
            _ => Err(Error::UnknownVariant {
                what: "theme",
                value: s.to_string(),
                expected: "default, modern, classic, minimal, corporate",
            }),
        }
    }
}

/// Standard slide layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlideLayout {
    TitleSlide,
    TitleAndContent,
    SectionHeader,
    TwoContent,
    Comparison,
    TitleOnly,
    Blank,
    ContentWithCaption,
    PictureWithCaption,
}

impl SlideLayout {
    pub const ALL: [SlideLayout; 9] = [
        SlideLayout::TitleSlide,
        SlideLayout::TitleAndContent,
        SlideLayout::SectionHeader,
        SlideLayout::TwoContent,
        SlideLayout::Comparison,
        SlideLayout::TitleOnly,
        SlideLayout::Blank,
        SlideLayout::ContentWithCaption,
        SlideLayout::PictureWithCaption,
    ];

    /// Display name, as PowerPoint shows it
    pub fn name(&self) -> &'static str {
        match self {
            SlideLayout::TitleSlide => "Title Slide",
            SlideLayout::TitleAndContent => "Title and Content",
            SlideLayout::SectionHeader => "Section Header",
            SlideLayout::TwoContent => "Two Content",
            SlideLayout::Comparison => "Comparison",
            SlideLayout::TitleOnly => "Title Only",
            SlideLayout::Blank => "Blank",
            SlideLayout::ContentWithCaption => "Content with Caption",
            SlideLayout::PictureWithCaption => "Picture with Caption",
        }
    }

    /// `ST_SlideLayoutType` value
    pub fn ooxml_type(&self) -> &'static str {
        match self {
            SlideLayout::TitleSlide => "title",
            SlideLayout::TitleAndContent => "obj",
            SlideLayout::SectionHeader => "secHead",
            SlideLayout::TwoContent => "twoObj",
            SlideLayout::Comparison => "twoTxTwoObj",
            SlideLayout::TitleOnly => "titleOnly",
            SlideLayout::Blank => "blank",
            SlideLayout::ContentWithCaption => "objTx",
            SlideLayout::PictureWithCaption => "picTx",
        }
    }

    /// Layout for an `ST_SlideLayoutType` value read back from a file
    pub fn from_ooxml_type(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.ooxml_type() == value)
    }
}

impl fmt::Display for SlideLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SlideLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|layout| {
                let candidate: String = layout
                    .name()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                candidate == wanted
            })
            .ok_or_else(|| Error::UnknownVariant {
                what: "slide layout",
                value: s.to_string(),
                expected: "Title Slide, Title and Content, Section Header, Two Content, \
                           Comparison, Title Only, Blank, Content with Caption, \
                           Picture with Caption",
            })
    }
}

/// Text placeholders a slide exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Title,
    Subtitle,
    Content,
}

impl Placeholder {
    pub fn name(&self) -> &'static str {
        match self {
            Placeholder::Title => "title",
            Placeholder::Subtitle => "subtitle",
            Placeholder::Content => "content",
        }
    }
}

impl FromStr for Placeholder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Placeholder::Title),
            "subtitle" => Ok(Placeholder::Subtitle),
            "content" | "body" => Ok(Placeholder::Content),
            _ => Err(Error::UnknownVariant {
                what: "placeholder",
                value: s.to_string(),
                expected: "title, content, subtitle",
            }),
        }
    }
}

/// One paragraph of slide text
#[derive(Debug, Clone, PartialEq)]
pub struct TextParagraph {
    pub text: String,
    pub format: TextFormat,
}

/// Image encodings that can be embedded in a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// Format from the leading magic bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(b"GIF8") {
            Some(ImageFormat::Gif)
        } else {
            None
        }
    }

    /// Extension used for the media part
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
        }
    }
}

/// Image bytes held in memory until the deck is saved
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    /// File name the image was loaded from, used as the picture's description
    pub name: String,
}

impl ImageData {
    /// Load a local image file
    ///
    /// The format is taken from the file contents and must agree with a
    /// recognized extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let by_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
            .ok_or_else(|| {
                Error::UnsupportedImage(format!(
                    "{}: expected a .png, .jpg, .jpeg or .gif file",
                    path.display()
                ))
            })?;

        let bytes = std::fs::read(path)?;
        let format = ImageFormat::sniff(&bytes).ok_or_else(|| {
            Error::UnsupportedImage(format!("{}: not a PNG, JPEG or GIF image", path.display()))
        })?;
        if format != by_ext {
            return Err(Error::UnsupportedImage(format!(
                "{}: contents are {} but the extension says {}",
                path.display(),
                format.extension(),
                by_ext.extension()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            bytes,
            format,
            name,
        })
    }
}

/// A picture placed on a slide; geometry is in EMU
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    pub image: ImageData,
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Picture {
    /// Place an image using positions and sizes in inches
    pub fn new(image: ImageData, position: (f64, f64), size: (f64, f64)) -> Result<Self> {
        let check = |what: &str, v: f64, allow_zero: bool| -> Result<i64> {
            let lower_ok = if allow_zero { v >= 0.0 } else { v > 0.0 };
            if !v.is_finite() || !lower_ok || v > MAX_PICTURE_INCHES {
                return Err(Error::invalid(format!(
                    "{what} {v} must be within {}..={MAX_PICTURE_INCHES} inches",
                    if allow_zero { "0" } else { ">0" }
                )));
            }
            Ok((v * EMU_PER_INCH as f64).round() as i64)
        };
        Ok(Self {
            x: check("x", position.0, true)?,
            y: check("y", position.1, true)?,
            cx: check("width", size.0, false)?,
            cy: check("height", size.1, false)?,
            image,
        })
    }
}

/// A single slide
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    id: u32,
    layout: SlideLayout,
    title: Vec<TextParagraph>,
    subtitle: Vec<TextParagraph>,
    content: Vec<TextParagraph>,
    pictures: Vec<Picture>,
    notes: Vec<String>,
}

impl Slide {
    fn new(id: u32, layout: SlideLayout) -> Self {
        Self {
            id,
            layout,
            title: Vec::new(),
            subtitle: Vec::new(),
            content: Vec::new(),
            pictures: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn layout(&self) -> SlideLayout {
        self.layout
    }

    /// Append a paragraph to a placeholder
    pub fn add_text(&mut self, placeholder: Placeholder, text: &str, format: TextFormat) {
        let paragraph = TextParagraph {
            text: text.to_string(),
            format,
        };
        match placeholder {
            Placeholder::Title => self.title.push(paragraph),
            Placeholder::Subtitle => self.subtitle.push(paragraph),
            Placeholder::Content => self.content.push(paragraph),
        }
    }

    /// Paragraphs held by a placeholder
    pub fn text(&self, placeholder: Placeholder) -> &[TextParagraph] {
        match placeholder {
            Placeholder::Title => &self.title,
            Placeholder::Subtitle => &self.subtitle,
            Placeholder::Content => &self.content,
        }
    }

    pub fn add_picture(&mut self, picture: Picture) {
        self.pictures.push(picture);
    }

    pub fn pictures(&self) -> &[Picture] {
        &self.pictures
    }

    /// Append speaker notes; successive calls become separate paragraphs
    pub fn add_notes(&mut self, notes: &str) {
        self.notes.push(notes.to_string());
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }
}

/// A slide deck
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    title: String,
    theme: Theme,
    slides: Vec<Slide>,
    next_slide_id: u32,
}

impl Presentation {
    /// Create a deck whose first slide is a title slide showing `title`
    pub fn new(title: &str, theme: Theme) -> Self {
        let mut presentation = Self::empty(title, theme);
        let id = presentation.push_slide(SlideLayout::TitleSlide);
        if let Some(slide) = presentation.slides.iter_mut().find(|s| s.id == id) {
            slide.add_text(Placeholder::Title, title, TextFormat::default());
        }
        presentation
    }

    /// Create a deck with no slides
    pub fn empty(title: &str, theme: Theme) -> Self {
        Self {
            title: title.to_string(),
            theme,
            slides: Vec::new(),
            next_slide_id: FIRST_SLIDE_ID,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn push_slide(&mut self, layout: SlideLayout) -> u32 {
        let id = self.next_slide_id;
        self.next_slide_id += 1;
        self.slides.push(Slide::new(id, layout));
        id
    }

    /// Add a slide at the end, or at a 0-based position
    ///
    /// Returns the new slide's id and its index.
    pub fn add_slide(&mut self, layout: SlideLayout, position: Option<usize>) -> Result<(u32, usize)> {
        let index = position.unwrap_or(self.slides.len());
        if index > self.slides.len() {
            return Err(Error::SlideOutOfBounds(index, self.slides.len()));
        }
        let id = self.next_slide_id;
        self.next_slide_id += 1;
        self.slides.insert(index, Slide::new(id, layout));
        Ok((id, index))
    }

    /// Current 0-based index of a slide
    pub fn slide_index(&self, id: u32) -> Result<usize> {
        self.slides
            .iter()
            .position(|s| s.id == id)
            .ok_or(Error::SlideNotFound(id))
    }

    pub fn slide(&self, id: u32) -> Result<&Slide> {
        self.slides
            .iter()
            .find(|s| s.id == id)
            .ok_or(Error::SlideNotFound(id))
    }

    pub fn slide_mut(&mut self, id: u32) -> Result<&mut Slide> {
        self.slides
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(Error::SlideNotFound(id))
    }
}
