//! Document kinds

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The three kinds of document a session can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DocumentKind {
    /// Slide deck
    Presentation,
    /// Word-processing document
    Document,
    /// Spreadsheet
    Workbook,
}

impl DocumentKind {
    /// All kinds, in the order they are reported
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Presentation,
        DocumentKind::Document,
        DocumentKind::Workbook,
    ];

    /// Lowercase name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Presentation => "presentation",
            DocumentKind::Document => "document",
            DocumentKind::Workbook => "workbook",
        }
    }

    /// The format a save defaults to
    pub fn native_format(&self) -> &'static str {
        match self {
            DocumentKind::Presentation => "pptx",
            DocumentKind::Document => "docx",
            DocumentKind::Workbook => "xlsx",
        }
    }

    /// File extensions accepted as templates
    pub fn template_extensions(&self) -> &'static [&'static str] {
        match self {
            DocumentKind::Presentation => &["pptx", "potx"],
            DocumentKind::Document => &["docx", "dotx"],
            DocumentKind::Workbook => &["xlsx", "xltx"],
        }
    }

    /// Name of the desktop application that edits this kind
    pub fn application_name(&self) -> &'static str {
        match self {
            DocumentKind::Presentation => "Microsoft PowerPoint",
            DocumentKind::Document => "Microsoft Word",
            DocumentKind::Workbook => "Microsoft Excel",
        }
    }

    /// Kind whose template extension matches the given file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.template_extensions().contains(&ext.as_str()))
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "presentation" | "powerpoint" => Ok(DocumentKind::Presentation),
            "document" | "word" => Ok(DocumentKind::Document),
            "workbook" | "excel" => Ok(DocumentKind::Workbook),
            _ => Err(Error::UnknownVariant {
                what: "document kind",
                value: s.to_string(),
                expected: "presentation, document, workbook",
            }),
        }
    }
}
