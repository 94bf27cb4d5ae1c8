//! Session data: which backend holds a document, and its bookkeeping

use std::fmt;

use office_mcp_automation::LiveDocument;
use office_mcp_core::presentation::FIRST_SLIDE_ID;
use office_mcp_core::workbook::FIRST_SHEET_NAME;
use office_mcp_core::{Document, DocumentKind, Presentation, Workbook};
use serde::Serialize;
use serde_json::{json, Value};

/// Which adapter owns a session's document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process object model saved through the OOXML writers
    Library,
    /// Document open in a live Office application
    Automation,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Library => "library",
            Backend::Automation => "automation",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document living in an Office application
///
/// The application addresses slides by position and knows nothing of our
/// slide ids, so the ids handed to clients are tracked here in slide order.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveHandle {
    pub document: LiveDocument,
    pub slide_ids: Vec<u32>,
    pub next_slide_id: u32,
    pub sheets: Vec<String>,
}

impl LiveHandle {
    /// Handle for a document the application created from scratch
    ///
    /// New presentations start with one title slide and new workbooks with
    /// `Sheet1`, matching what the creation script leaves behind.
    pub fn created(document: LiveDocument) -> Self {
        let mut handle = Self::opened(document);
        match handle.document.kind {
            DocumentKind::Presentation => {
                handle.push_slide_at(0);
            }
            DocumentKind::Workbook => handle.sheets.push(FIRST_SHEET_NAME.to_string()),
            DocumentKind::Document => {}
        }
        handle
    }

    /// Handle for a file the application opened, before its slides or sheets
    /// are recorded
    pub fn opened(document: LiveDocument) -> Self {
        Self {
            document,
            slide_ids: Vec::new(),
            next_slide_id: FIRST_SLIDE_ID,
            sheets: Vec::new(),
        }
    }

    /// Record a slide at a 0-based index and return its id
    pub fn push_slide_at(&mut self, index: usize) -> u32 {
        let id = self.next_slide_id;
        self.next_slide_id += 1;
        let index = index.min(self.slide_ids.len());
        self.slide_ids.insert(index, id);
        id
    }

    /// 1-based position the application uses for a slide id
    pub fn slide_number(&self, id: u32) -> Option<usize> {
        self.slide_ids.iter().position(|s| *s == id).map(|i| i + 1)
    }
}

/// The exclusively owned document behind a session
#[derive(Debug)]
pub enum DocumentHandle {
    Presentation(Presentation),
    Document(Document),
    Workbook(Workbook),
    Live(LiveHandle),
}

impl DocumentHandle {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentHandle::Presentation(_) => DocumentKind::Presentation,
            DocumentHandle::Document(_) => DocumentKind::Document,
            DocumentHandle::Workbook(_) => DocumentKind::Workbook,
            DocumentHandle::Live(live) => live.document.kind,
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            DocumentHandle::Live(_) => Backend::Automation,
            _ => Backend::Library,
        }
    }

    /// Content counts reported by `get_session_info`
    pub fn summary(&self) -> Value {
        match self {
            DocumentHandle::Presentation(p) => json!({
                "slide_count": p.slide_count(),
                "slide_ids": p.slides().iter().map(|s| s.id()).collect::<Vec<_>>(),
                "theme": p.theme().name(),
            }),
            DocumentHandle::Document(d) => json!({
                "headings": d.heading_count(),
                "paragraphs": d.paragraph_count(),
                "lists": d.list_count(),
                "tables": d.table_count(),
            }),
            DocumentHandle::Workbook(w) => json!({
                "sheet_count": w.sheet_count(),
                "sheets": w.sheet_names(),
            }),
            DocumentHandle::Live(live) => match live.document.kind {
                DocumentKind::Presentation => json!({
                    "application_document": live.document.name,
                    "slide_ids": live.slide_ids,
                }),
                DocumentKind::Workbook => json!({
                    "application_document": live.document.name,
                    "sheets": live.sheets,
                }),
                DocumentKind::Document => json!({
                    "application_document": live.document.name,
                }),
            },
        }
    }
}

/// Everything known about a session without locking its document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionMetadata {
    pub id: String,
    pub kind: DocumentKind,
    pub backend: Backend,
    pub title: String,
    /// RFC 3339, UTC
    pub created_at: String,
    pub file_path: Option<String>,
    pub dirty: bool,
}
