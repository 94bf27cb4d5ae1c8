//! Typed commands for the live Office applications
//!
//! Every command names its target application through a [`DocumentKind`] and,
//! once a document exists, the document's name as the application reports it.

use std::path::PathBuf;

use serde::Serialize;

use office_mcp_core::{
    CellAddress, CellRange, CellValue, ChartType, DocumentKind, Placeholder, SlideLayout,
};

/// Points per inch, the unit Office's scripting dictionaries measure in
pub const POINTS_PER_INCH: f64 = 72.0;

/// A document open in a live application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveDocument {
    pub kind: DocumentKind,
    pub name: String,
}

/// Save formats the live applications can write, native format first
pub fn save_formats(kind: DocumentKind) -> &'static [&'static str] {
    match kind {
        DocumentKind::Presentation => &["pptx", "pdf", "ppt"],
        DocumentKind::Document => &["docx", "pdf", "doc", "rtf", "txt"],
        DocumentKind::Workbook => &["xlsx", "pdf", "csv", "xls"],
    }
}

/// Commands the bridge can send to a live application.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Whether the application has a running process
    IsRunning { kind: DocumentKind },

    /// Application version string
    Version { kind: DocumentKind },

    /// Names of the open documents
    ListOpen { kind: DocumentKind },

    /// Create a new document carrying the title. Returns the document name.
    Create { kind: DocumentKind, title: String },

    /// Open a file (template or existing document). Returns the document name.
    Open { kind: DocumentKind, path: PathBuf },

    /// Insert a slide at a 0-based position, or append. Returns its 1-based index.
    AddSlide {
        presentation: String,
        layout: SlideLayout,
        position: Option<usize>,
    },

    /// Number of slides in a presentation
    CountSlides { presentation: String },

    /// Sheet names of a workbook, in order
    ListWorksheets { workbook: String },

    /// Append a paragraph to a slide placeholder; `slide` is 1-based
    AppendSlideText {
        presentation: String,
        slide: usize,
        placeholder: Placeholder,
        text: String,
    },

    /// Place a picture; geometry in inches
    AddPicture {
        presentation: String,
        slide: usize,
        path: PathBuf,
        position: (f64, f64),
        size: (f64, f64),
    },

    /// Append a paragraph to a slide's speaker notes
    AppendSpeakerNotes {
        presentation: String,
        slide: usize,
        notes: String,
    },

    /// Append paragraphs, each with an optional named style
    AppendParagraphs {
        document: String,
        paragraphs: Vec<String>,
        style: Option<String>,
    },

    /// Append a table filled row by row
    AddTable {
        document: String,
        rows: usize,
        cols: usize,
        data: Vec<Vec<String>>,
    },

    /// Add a worksheet at a 0-based position, or append
    AddWorksheet {
        workbook: String,
        name: String,
        position: Option<usize>,
    },

    /// Write values (and formulas) into a block starting at `start`
    SetCells {
        workbook: String,
        sheet: String,
        start: CellAddress,
        rows: Vec<Vec<CellValue>>,
    },

    AddChart {
        workbook: String,
        sheet: String,
        chart_type: ChartType,
        data_range: CellRange,
        title: Option<String>,
        anchor: CellAddress,
    },

    /// Save a document under a path in one of [`save_formats`]
    Save {
        kind: DocumentKind,
        document: String,
        path: PathBuf,
        format: String,
    },
}

impl Command {
    /// The application the command is sent to
    pub fn kind(&self) -> DocumentKind {
        match self {
            Command::IsRunning { kind }
            | Command::Version { kind }
            | Command::ListOpen { kind }
            | Command::Create { kind, .. }
            | Command::Open { kind, .. }
            | Command::Save { kind, .. } => *kind,
            Command::CountSlides { .. }
            | Command::AddSlide { .. }
            | Command::AppendSlideText { .. }
            | Command::AddPicture { .. }
            | Command::AppendSpeakerNotes { .. } => DocumentKind::Presentation,
            Command::AppendParagraphs { .. } | Command::AddTable { .. } => DocumentKind::Document,
            Command::ListWorksheets { .. }
            | Command::AddWorksheet { .. }
            | Command::SetCells { .. }
            | Command::AddChart { .. } => DocumentKind::Workbook,
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::IsRunning { .. } => "is_running",
            Command::Version { .. } => "version",
            Command::ListOpen { .. } => "list_open",
            Command::Create { .. } => "create",
            Command::Open { .. } => "open",
            Command::CountSlides { .. } => "count_slides",
            Command::AddSlide { .. } => "add_slide",
            Command::AppendSlideText { .. } => "append_slide_text",
            Command::AddPicture { .. } => "add_picture",
            Command::AppendSpeakerNotes { .. } => "append_speaker_notes",
            Command::AppendParagraphs { .. } => "append_paragraphs",
            Command::AddTable { .. } => "add_table",
            Command::ListWorksheets { .. } => "list_worksheets",
            Command::AddWorksheet { .. } => "add_worksheet",
            Command::SetCells { .. } => "set_cells",
            Command::AddChart { .. } => "add_chart",
            Command::Save { .. } => "save",
        }
    }
}
