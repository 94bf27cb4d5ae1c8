//! Live-application backend
//!
//! Mutations become [`Command`]s for the application that owns the document.
//! Text and cell formatting are not forwarded; the applications apply their
//! own defaults.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use office_mcp_automation::{
    save_formats, AppStatus, AutomationBridge, AutomationResult, Command, LiveDocument,
};
use office_mcp_core::{DocumentKind, ListKind};
use serde_json::json;
use tracing::{debug, warn};

use super::{summary, Summary};
use crate::error::{OfficeError, OfficeResult};
use crate::operation::{CreateRequest, Mutation, SaveTarget};
use crate::session::LiveHandle;

/// Drives live documents through an [`AutomationBridge`]
///
/// A kind whose creation failed is marked unavailable so later creations
/// go to the library backend; [`AutomationAdapter::status`] clears the mark.
#[derive(Debug)]
pub struct AutomationAdapter {
    bridge: AutomationBridge,
    unavailable: Mutex<HashSet<DocumentKind>>,
}

impl AutomationAdapter {
    pub fn new(bridge: AutomationBridge) -> Self {
        Self {
            bridge,
            unavailable: Mutex::new(HashSet::new()),
        }
    }

    /// Whether new sessions of this kind should go to the live application
    pub async fn is_available(&self, kind: DocumentKind) -> bool {
        if self.is_marked(kind) {
            return false;
        }
        match self.bridge.is_running(kind).await {
            Ok(running) => running,
            Err(e) => {
                debug!(app = %kind, error = %e, "automation availability check failed");
                false
            }
        }
    }

    /// Ask the application again and forget any earlier failure
    pub async fn status(&self, kind: DocumentKind) -> AppStatus {
        if let Ok(mut marked) = self.unavailable.lock() {
            marked.remove(&kind);
        }
        self.bridge.status(kind).await
    }

    pub async fn list_open(&self, kind: DocumentKind) -> OfficeResult<Vec<LiveDocument>> {
        Ok(self.bridge.list_open(kind).await?)
    }

    fn is_marked(&self, kind: DocumentKind) -> bool {
        self.unavailable
            .lock()
            .map(|marked| marked.contains(&kind))
            .unwrap_or(true)
    }

    fn mark_unavailable(&self, kind: DocumentKind) {
        if let Ok(mut marked) = self.unavailable.lock() {
            marked.insert(kind);
        }
    }

    /// Create the document in the application, or open the template there
    pub async fn create(&self, request: &CreateRequest) -> OfficeResult<LiveHandle> {
        let result = match &request.template {
            Some(path) => self.open(request.kind, path).await,
            None => self
                .bridge
                .create(request.kind, &request.title)
                .await
                .map(LiveHandle::created),
        };
        result.map_err(|e| {
            warn!(app = %request.kind, error = %e, "automation create failed; using the library backend from now on");
            self.mark_unavailable(request.kind);
            e.into()
        })
    }

    /// Open a file and record the slides or sheets it already has
    async fn open(&self, kind: DocumentKind, path: &Path) -> AutomationResult<LiveHandle> {
        let mut live = LiveHandle::opened(self.bridge.open(kind, path).await?);
        match kind {
            DocumentKind::Presentation => {
                let count = self.bridge.slide_count(&live.document.name).await?;
                for index in 0..count {
                    live.push_slide_at(index);
                }
            }
            DocumentKind::Workbook => {
                live.sheets = self.bridge.worksheet_names(&live.document.name).await?;
            }
            DocumentKind::Document => {}
        }
        Ok(live)
    }

    pub async fn apply(&self, live: &mut LiveHandle, mutation: Mutation) -> OfficeResult<Summary> {
        let name = live.document.name.clone();
        let command = match mutation {
            Mutation::AddSlide { layout, position } => {
                let number = self.bridge.add_slide(&name, layout, position).await?;
                let slide_id = live.push_slide_at(number - 1);
                return Ok(summary(json!({ "slide_id": slide_id, "index": number - 1 })));
            }
            Mutation::AddWorksheet { name: sheet, position } => {
                if live.sheets.iter().any(|s| s.eq_ignore_ascii_case(&sheet)) {
                    return Err(OfficeError::invalid(
                        "name",
                        format!("a worksheet named '{sheet}' already exists"),
                    ));
                }
                let number = self.bridge.add_worksheet(&name, &sheet, position).await?;
                let index = (number - 1).min(live.sheets.len());
                live.sheets.insert(index, sheet);
                return Ok(summary(json!({ "sheet_index": number - 1 })));
            }
            Mutation::AddSlideText {
                slide_id,
                placeholder,
                text,
                ..
            } => Command::AppendSlideText {
                presentation: name,
                slide: slide_number(live, slide_id)?,
                placeholder,
                text,
            },
            Mutation::AddPicture {
                slide_id,
                path,
                position,
                size,
            } => Command::AddPicture {
                presentation: name,
                slide: slide_number(live, slide_id)?,
                path,
                position,
                size,
            },
            Mutation::AddNotes { slide_id, notes } => Command::AppendSpeakerNotes {
                presentation: name,
                slide: slide_number(live, slide_id)?,
                notes,
            },
            Mutation::AddHeading { text, level, style } => Command::AppendParagraphs {
                document: name,
                paragraphs: vec![text],
                style: Some(style.unwrap_or_else(|| format!("Heading {level}"))),
            },
            Mutation::AddParagraph { text, style, .. } => Command::AppendParagraphs {
                document: name,
                paragraphs: vec![text],
                style,
            },
            Mutation::AddList { items, kind, style } => Command::AppendParagraphs {
                document: name,
                paragraphs: items,
                style: Some(style.unwrap_or_else(|| list_style(kind).to_string())),
            },
            Mutation::AddTable {
                rows, cols, data, ..
            } => Command::AddTable {
                document: name,
                rows,
                cols,
                data,
            },
            Mutation::WriteCell {
                sheet, cell, value, ..
            } => Command::SetCells {
                workbook: name,
                sheet,
                start: cell,
                rows: vec![vec![value]],
            },
            Mutation::WriteRange {
                sheet, origin, rows, ..
            } => Command::SetCells {
                workbook: name,
                sheet,
                start: origin,
                rows,
            },
            Mutation::AddFormula {
                sheet,
                cell,
                formula,
            } => Command::SetCells {
                workbook: name,
                sheet,
                start: cell,
                rows: vec![vec![formula]],
            },
            Mutation::AddChart {
                sheet,
                chart_type,
                data_range,
                title,
                position,
            } => Command::AddChart {
                workbook: name,
                sheet,
                chart_type,
                data_range,
                title,
                anchor: position,
            },
        };
        self.bridge.execute(&command).await?;
        Ok(Summary::new())
    }

    pub async fn save(&self, live: &LiveHandle, target: &SaveTarget) -> OfficeResult<()> {
        let command = Command::Save {
            kind: live.document.kind,
            document: live.document.name.clone(),
            path: target.path.clone(),
            format: target.format.clone(),
        };
        self.bridge.execute(&command).await?;
        Ok(())
    }
}

/// Save formats the live applications write for a kind
pub fn supported_formats(kind: DocumentKind) -> &'static [&'static str] {
    save_formats(kind)
}

fn slide_number(live: &LiveHandle, slide_id: u32) -> OfficeResult<usize> {
    live.slide_number(slide_id)
        .ok_or_else(|| OfficeError::invalid("slide_id", format!("Slide not found: {slide_id}")))
}

fn list_style(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Bullet => "List Bullet",
        ListKind::Number => "List Number",
    }
}
