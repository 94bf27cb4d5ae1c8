//! Text and cell formatting

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})$").expect("valid regex")
});

/// Smallest font size accepted, in points
pub const MIN_FONT_SIZE: u32 = 8;

/// Largest font size accepted, in points
pub const MAX_FONT_SIZE: u32 = 72;

/// Longest font name accepted
pub const MAX_FONT_NAME_LEN: usize = 100;

/// An RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`
    pub fn parse(s: &str) -> Result<Self> {
        let caps = HEX_COLOR
            .captures(s.trim())
            .ok_or_else(|| Error::InvalidColor(s.to_string()))?;
        let channel = |i: usize| {
            u8::from_str_radix(&caps[i], 16).map_err(|_| Error::InvalidColor(s.to_string()))
        };
        Ok(Self::rgb(channel(1)?, channel(2)?, channel(3)?))
    }

    /// Uppercase hex without the `#`, the form OOXML attributes use
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Paragraph alignment for slide text and document paragraphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextAlignment {
    Left,
    Center,
    Right,
    Justify,
}

impl FromStr for TextAlignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(TextAlignment::Left),
            "center" | "centre" => Ok(TextAlignment::Center),
            "right" => Ok(TextAlignment::Right),
            "justify" | "justified" => Ok(TextAlignment::Justify),
            _ => Err(Error::UnknownVariant {
                what: "alignment",
                value: s.to_string(),
                expected: "left, center, right, justify",
            }),
        }
    }
}

/// Character and paragraph formatting applied to a run of text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFormat {
    /// Font size in points
    pub font_size: Option<u32>,
    pub font_name: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<Color>,
    pub alignment: Option<TextAlignment>,
}

impl TextFormat {
    /// Check a font size against the accepted range
    pub fn check_font_size(size: u32) -> Result<u32> {
        if (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
            Ok(size)
        } else {
            Err(Error::invalid(format!(
                "font size {size} outside {MIN_FONT_SIZE}..={MAX_FONT_SIZE}"
            )))
        }
    }

    /// Check a font name is non-empty and not absurdly long
    pub fn check_font_name(name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid("font name cannot be empty"));
        }
        if name.chars().count() > MAX_FONT_NAME_LEN {
            return Err(Error::invalid(format!(
                "font name longer than {MAX_FONT_NAME_LEN} characters"
            )));
        }
        Ok(name.to_string())
    }

    /// True when no property is set
    pub fn is_plain(&self) -> bool {
        *self == TextFormat::default()
    }
}

/// Horizontal alignment options for cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAlignment {
    General,
    Left,
    Center,
    Right,
    Justify,
}

impl HorizontalAlignment {
    /// Attribute value in SpreadsheetML
    pub fn as_str(&self) -> &'static str {
        match self {
            HorizontalAlignment::General => "general",
            HorizontalAlignment::Left => "left",
            HorizontalAlignment::Center => "center",
            HorizontalAlignment::Right => "right",
            HorizontalAlignment::Justify => "justify",
        }
    }
}

impl FromStr for HorizontalAlignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(HorizontalAlignment::General),
            "left" => Ok(HorizontalAlignment::Left),
            "center" | "centre" => Ok(HorizontalAlignment::Center),
            "right" => Ok(HorizontalAlignment::Right),
            "justify" => Ok(HorizontalAlignment::Justify),
            _ => Err(Error::UnknownVariant {
                what: "horizontal alignment",
                value: s.to_string(),
                expected: "general, left, center, right, justify",
            }),
        }
    }
}

/// Vertical alignment options for cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
}

impl VerticalAlignment {
    /// Attribute value in SpreadsheetML
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalAlignment::Top => "top",
            VerticalAlignment::Center => "center",
            VerticalAlignment::Bottom => "bottom",
        }
    }
}

impl FromStr for VerticalAlignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(VerticalAlignment::Top),
            "center" | "middle" => Ok(VerticalAlignment::Center),
            "bottom" => Ok(VerticalAlignment::Bottom),
            _ => Err(Error::UnknownVariant {
                what: "vertical alignment",
                value: s.to_string(),
                expected: "top, center, bottom",
            }),
        }
    }
}

/// Formatting applied to a worksheet cell
///
/// Equal formats share one entry in the saved style table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CellFormat {
    pub bold: bool,
    pub italic: bool,
    /// Font size in points
    pub font_size: Option<u32>,
    pub font_name: Option<String>,
    pub font_color: Option<Color>,
    pub fill_color: Option<Color>,
    pub horizontal: Option<HorizontalAlignment>,
    pub vertical: Option<VerticalAlignment>,
    pub wrap_text: bool,
    /// Thin border on all four edges
    pub border: bool,
}

impl CellFormat {
    /// Bold text and nothing else
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Default::default()
        }
    }

    /// True when the format changes the font
    pub fn has_font(&self) -> bool {
        self.bold
            || self.italic
            || self.font_size.is_some()
            || self.font_name.is_some()
            || self.font_color.is_some()
    }

    /// True when the format changes alignment or wrapping
    pub fn has_alignment(&self) -> bool {
        self.horizontal.is_some() || self.vertical.is_some() || self.wrap_text
    }

    /// True when no property is set
    pub fn is_plain(&self) -> bool {
        *self == CellFormat::default()
    }
}
