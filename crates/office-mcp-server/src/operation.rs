//! Operations and their validation
//!
//! An [`Operation`] is a decoded tool call. Validation turns its raw
//! parameters into a typed [`Mutation`], [`CreateRequest`] or [`SaveTarget`],
//! collecting every offending field instead of stopping at the first.

use std::fmt;
use std::path::{Path, PathBuf};

use office_mcp_core::{
    CellAddress, CellFormat, CellRange, CellValue, ChartType, Color, DocumentKind,
    HorizontalAlignment, ListKind, Placeholder, SlideLayout, TextAlignment, TextFormat, Theme,
    VerticalAlignment, DEFAULT_DOCUMENT_TITLE, MAX_SHEET_NAME_LEN,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::backend::{summary, Summary};
use crate::error::{OfficeError, OfficeResult};
use crate::params::*;

/// Layout used when `add_slide` names none
pub const DEFAULT_LAYOUT: SlideLayout = SlideLayout::TitleAndContent;

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_TEXT_LEN: usize = 10_000;

/// Picture geometry defaults, in inches
pub const DEFAULT_IMAGE_POSITION: (f64, f64) = (1.0, 1.0);
pub const DEFAULT_IMAGE_SIZE: (f64, f64) = (4.0, 3.0);
pub const MIN_IMAGE_SIZE: f64 = 0.1;

/// Anchor cell used when `create_chart` names none
pub const DEFAULT_CHART_POSITION: &str = "E5";

const SHEET_NAME_FORBIDDEN: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
const MAX_PICTURE_INCHES: f64 = office_mcp_core::presentation::MAX_PICTURE_INCHES;
const MAX_TABLE_ROWS: usize = office_mcp_core::document::MAX_TABLE_ROWS;
const MAX_TABLE_COLS: usize = office_mcp_core::document::MAX_TABLE_COLS;

/// A decoded tool call
#[derive(Debug, Clone)]
pub enum Operation {
    CreatePresentation(CreatePresentationParams),
    CreateDocument(CreateDocumentParams),
    CreateWorkbook(CreateWorkbookParams),
    AddSlide(AddSlideParams),
    AddTextToSlide(AddTextToSlideParams),
    AddImageToSlide(AddImageToSlideParams),
    AddSpeakerNotes(AddSpeakerNotesParams),
    AddHeading(AddHeadingParams),
    AddParagraph(AddParagraphParams),
    AddList(AddListParams),
    AddTable(AddTableParams),
    AddWorksheet(AddWorksheetParams),
    WriteCell(WriteCellParams),
    WriteRange(WriteRangeParams),
    AddFormula(AddFormulaParams),
    CreateChart(CreateChartParams),
    Save(DocumentKind, SaveParams),
    ListActive(DocumentKind),
    GetSessionInfo(SessionParams),
    CloseSession(SessionParams),
    ListWorksheets(SessionParams),
    ListOpenWindows(ListOpenWindowsParams),
    ListTemplates,
    ServerStatus,
    CheckOfficeStatus,
}

impl Operation {
    /// Every operation name [`Operation::decode`] accepts
    pub const NAMES: [&'static str; 29] = [
        "create_presentation",
        "create_document",
        "create_workbook",
        "add_slide",
        "add_text_to_slide",
        "add_image_to_slide",
        "add_speaker_notes",
        "add_heading",
        "add_paragraph",
        "add_list",
        "add_table",
        "add_worksheet",
        "write_cell",
        "write_range",
        "add_formula",
        "create_chart",
        "save_presentation",
        "save_document",
        "save_workbook",
        "list_active_presentations",
        "list_active_documents",
        "list_active_workbooks",
        "get_session_info",
        "close_session",
        "list_worksheets",
        "list_open_windows",
        "list_templates",
        "server_status",
        "check_office_status",
    ];

    /// Decode an operation name and its JSON parameter mapping
    pub fn decode(name: &str, params: Value) -> OfficeResult<Self> {
        use DocumentKind::*;

        let op = match name {
            "create_presentation" => Operation::CreatePresentation(parse(params)?),
            "create_document" => Operation::CreateDocument(parse(params)?),
            "create_workbook" => Operation::CreateWorkbook(parse(params)?),
            "add_slide" => Operation::AddSlide(parse(params)?),
            "add_text_to_slide" => Operation::AddTextToSlide(parse(params)?),
            "add_image_to_slide" => Operation::AddImageToSlide(parse(params)?),
            "add_speaker_notes" => Operation::AddSpeakerNotes(parse(params)?),
            "add_heading" => Operation::AddHeading(parse(params)?),
            "add_paragraph" => Operation::AddParagraph(parse(params)?),
            "add_list" => Operation::AddList(parse(params)?),
            "add_table" => Operation::AddTable(parse(params)?),
            "add_worksheet" => Operation::AddWorksheet(parse(params)?),
            "write_cell" => Operation::WriteCell(parse(params)?),
            "write_range" => Operation::WriteRange(parse(params)?),
            "add_formula" => Operation::AddFormula(parse(params)?),
            "create_chart" => Operation::CreateChart(parse(params)?),
            "save_presentation" => Operation::Save(Presentation, parse(params)?),
            "save_document" => Operation::Save(Document, parse(params)?),
            "save_workbook" => Operation::Save(Workbook, parse(params)?),
            "list_active_presentations" => Operation::ListActive(Presentation),
            "list_active_documents" => Operation::ListActive(Document),
            "list_active_workbooks" => Operation::ListActive(Workbook),
            "get_session_info" => Operation::GetSessionInfo(parse(params)?),
            "close_session" => Operation::CloseSession(parse(params)?),
            "list_worksheets" => Operation::ListWorksheets(parse(params)?),
            "list_open_windows" => Operation::ListOpenWindows(parse(params)?),
            "list_templates" => Operation::ListTemplates,
            "server_status" => Operation::ServerStatus,
            "check_office_status" => Operation::CheckOfficeStatus,
            other => {
                return Err(OfficeError::invalid(
                    "operation",
                    format!("unknown operation '{other}'"),
                ))
            }
        };
        Ok(op)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreatePresentation(_) => "create_presentation",
            Operation::CreateDocument(_) => "create_document",
            Operation::CreateWorkbook(_) => "create_workbook",
            Operation::AddSlide(_) => "add_slide",
            Operation::AddTextToSlide(_) => "add_text_to_slide",
            Operation::AddImageToSlide(_) => "add_image_to_slide",
            Operation::AddSpeakerNotes(_) => "add_speaker_notes",
            Operation::AddHeading(_) => "add_heading",
            Operation::AddParagraph(_) => "add_paragraph",
            Operation::AddList(_) => "add_list",
            Operation::AddTable(_) => "add_table",
            Operation::AddWorksheet(_) => "add_worksheet",
            Operation::WriteCell(_) => "write_cell",
            Operation::WriteRange(_) => "write_range",
            Operation::AddFormula(_) => "add_formula",
            Operation::CreateChart(_) => "create_chart",
            Operation::Save(DocumentKind::Presentation, _) => "save_presentation",
            Operation::Save(DocumentKind::Document, _) => "save_document",
            Operation::Save(DocumentKind::Workbook, _) => "save_workbook",
            Operation::ListActive(DocumentKind::Presentation) => "list_active_presentations",
            Operation::ListActive(DocumentKind::Document) => "list_active_documents",
            Operation::ListActive(DocumentKind::Workbook) => "list_active_workbooks",
            Operation::GetSessionInfo(_) => "get_session_info",
            Operation::CloseSession(_) => "close_session",
            Operation::ListWorksheets(_) => "list_worksheets",
            Operation::ListOpenWindows(_) => "list_open_windows",
            Operation::ListTemplates => "list_templates",
            Operation::ServerStatus => "server_status",
            Operation::CheckOfficeStatus => "check_office_status",
        }
    }

    /// The session the operation targets, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Operation::AddSlide(p) => Some(&p.id),
            Operation::AddTextToSlide(p) => Some(&p.id),
            Operation::AddImageToSlide(p) => Some(&p.id),
            Operation::AddSpeakerNotes(p) => Some(&p.id),
            Operation::AddHeading(p) => Some(&p.id),
            Operation::AddParagraph(p) => Some(&p.id),
            Operation::AddList(p) => Some(&p.id),
            Operation::AddTable(p) => Some(&p.id),
            Operation::AddWorksheet(p) => Some(&p.id),
            Operation::WriteCell(p) => Some(&p.id),
            Operation::WriteRange(p) => Some(&p.id),
            Operation::AddFormula(p) => Some(&p.id),
            Operation::CreateChart(p) => Some(&p.id),
            Operation::Save(_, p) => Some(&p.id),
            Operation::GetSessionInfo(p)
            | Operation::CloseSession(p)
            | Operation::ListWorksheets(p) => Some(&p.id),
            _ => None,
        }
    }
}

fn parse<T: DeserializeOwned>(params: Value) -> OfficeResult<T> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| OfficeError::invalid("params", e))
}

/// Collects `field: reason` failures across a whole parameter set
#[derive(Debug, Default)]
struct Checks {
    errors: Vec<String>,
}

impl Checks {
    fn check<T, E: fmt::Display>(&mut self, field: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.fail(field, e);
                None
            }
        }
    }

    fn fail(&mut self, field: &str, reason: impl fmt::Display) {
        self.errors.push(format!("{field}: {reason}"));
    }

    fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> OfficeResult<T> {
        if !self.errors.is_empty() {
            return Err(OfficeError::InvalidParameters(self.errors));
        }
        build().ok_or_else(|| OfficeError::internal("validation accepted incomplete parameters"))
    }
}

fn text(value: &str, max: usize) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("cannot be empty".into())
    } else if value.chars().count() > max {
        Err(format!("longer than {max} characters"))
    } else {
        Ok(value.to_string())
    }
}

fn non_empty(value: &str) -> Result<String, String> {
    text(value, usize::MAX)
}

fn sheet_name(name: &str) -> Result<String, String> {
    if name.trim().is_empty() {
        return Err("cannot be empty".into());
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(format!("longer than {MAX_SHEET_NAME_LEN} characters"));
    }
    if let Some(c) = name.chars().find(|c| SHEET_NAME_FORBIDDEN.contains(c)) {
        return Err(format!("cannot contain '{c}'"));
    }
    Ok(name.to_string())
}

/// Optional named style; blank means none
fn style(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn text_format(checks: &mut Checks, formatting: Option<&TextFormatting>) -> TextFormat {
    let Some(f) = formatting else {
        return TextFormat::default();
    };
    TextFormat {
        font_size: f
            .font_size
            .and_then(|s| checks.check("formatting.font_size", TextFormat::check_font_size(s))),
        font_name: f
            .font_name
            .as_deref()
            .and_then(|n| checks.check("formatting.font_name", TextFormat::check_font_name(n))),
        bold: f.bold,
        italic: f.italic,
        color: f
            .color
            .as_deref()
            .and_then(|c| checks.check("formatting.color", Color::parse(c))),
        alignment: f
            .alignment
            .as_deref()
            .and_then(|a| checks.check("formatting.alignment", a.parse::<TextAlignment>())),
    }
}

fn cell_format(checks: &mut Checks, formatting: Option<&CellFormatting>) -> Option<CellFormat> {
    let f = formatting?;
    let format = CellFormat {
        bold: f.bold.unwrap_or(false),
        italic: f.italic.unwrap_or(false),
        font_size: f
            .font_size
            .and_then(|s| checks.check("formatting.font_size", TextFormat::check_font_size(s))),
        font_name: f
            .font_name
            .as_deref()
            .and_then(|n| checks.check("formatting.font_name", TextFormat::check_font_name(n))),
        font_color: f
            .font_color
            .as_deref()
            .and_then(|c| checks.check("formatting.font_color", Color::parse(c))),
        fill_color: f
            .background_color
            .as_deref()
            .and_then(|c| checks.check("formatting.background_color", Color::parse(c))),
        horizontal: f.horizontal_alignment.as_deref().and_then(|a| {
            checks.check(
                "formatting.horizontal_alignment",
                a.parse::<HorizontalAlignment>(),
            )
        }),
        vertical: f.vertical_alignment.as_deref().and_then(|a| {
            checks.check("formatting.vertical_alignment", a.parse::<VerticalAlignment>())
        }),
        wrap_text: f.wrap_text.unwrap_or(false),
        border: f.border.unwrap_or(false),
    };
    Some(format)
}

/// A JSON value as a cell value; strings starting with `=` are formulas
pub fn cell_value(value: &Value) -> Result<CellValue, String> {
    match value {
        Value::Null => Ok(CellValue::Empty),
        Value::Bool(b) => Ok(CellValue::Boolean(*b)),
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .map(CellValue::Number)
            .ok_or_else(|| format!("{n} is not a finite number")),
        Value::String(s) if s.starts_with('=') => Ok(CellValue::formula(s)),
        Value::String(s) => Ok(CellValue::string(s.clone())),
        _ => Err("must be a string, number, boolean or null".into()),
    }
}

fn cell_text(value: &Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        _ => Err("must be a string, number, boolean or null".into()),
    }
}

fn inches(value: f64, min: f64) -> Result<f64, String> {
    if value.is_finite() && value >= min && value <= MAX_PICTURE_INCHES {
        Ok(value)
    } else {
        Err(format!("must be within {min}..={MAX_PICTURE_INCHES} inches"))
    }
}

fn image_path(source: &str) -> Result<PathBuf, String> {
    let source = source.trim();
    if source.is_empty() {
        return Err("cannot be empty".into());
    }
    if source.contains("://") {
        return Err("URLs are not supported; pass a local file path".into());
    }
    let path = PathBuf::from(source);
    let known = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(office_mcp_core::ImageFormat::from_extension)
        .is_some();
    if !known {
        return Err("expected a .png, .jpg, .jpeg or .gif file".into());
    }
    if !path.is_file() {
        return Err(format!("{source} does not exist"));
    }
    Ok(path)
}

fn template_path(kind: DocumentKind, value: &Option<String>) -> Result<Option<PathBuf>, String> {
    let Some(raw) = value.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let path = PathBuf::from(raw);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !kind.template_extensions().contains(&ext.as_str()) {
        return Err(format!(
            "a {kind} template must be a .{} file",
            kind.template_extensions().join(" or .")
        ));
    }
    if !path.is_file() {
        return Err(format!("{raw} does not exist"));
    }
    Ok(Some(path))
}

/// What a creation call builds
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub kind: DocumentKind,
    pub title: String,
    pub theme: Theme,
    pub template: Option<PathBuf>,
}

impl CreatePresentationParams {
    pub fn validate(&self) -> OfficeResult<CreateRequest> {
        let mut checks = Checks::default();
        let title = checks.check("title", text(&self.title, MAX_TITLE_LEN));
        let theme = match &self.theme {
            Some(theme) => checks.check("theme", theme.parse::<Theme>()),
            None => Some(Theme::Default),
        };
        let template = checks.check(
            "template_path",
            template_path(DocumentKind::Presentation, &self.template_path),
        );
        checks.finish(|| {
            Some(CreateRequest {
                kind: DocumentKind::Presentation,
                title: title?,
                theme: theme?,
                template: template?,
            })
        })
    }
}

impl CreateDocumentParams {
    pub fn validate(&self) -> OfficeResult<CreateRequest> {
        let mut checks = Checks::default();
        let title = match &self.title {
            Some(title) => checks.check("title", text(title, MAX_TITLE_LEN)),
            None => Some(DEFAULT_DOCUMENT_TITLE.to_string()),
        };
        let template = checks.check(
            "template_path",
            template_path(DocumentKind::Document, &self.template_path),
        );
        checks.finish(|| {
            Some(CreateRequest {
                kind: DocumentKind::Document,
                title: title?,
                theme: Theme::Default,
                template: template?,
            })
        })
    }
}

impl CreateWorkbookParams {
    pub fn validate(&self) -> OfficeResult<CreateRequest> {
        let mut checks = Checks::default();
        let title = checks.check("title", text(&self.title, MAX_TITLE_LEN));
        let template = checks.check(
            "template_path",
            template_path(DocumentKind::Workbook, &self.template_path),
        );
        checks.finish(|| {
            Some(CreateRequest {
                kind: DocumentKind::Workbook,
                title: title?,
                theme: Theme::Default,
                template: template?,
            })
        })
    }
}

/// A validated content change
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddSlide {
        layout: SlideLayout,
        position: Option<usize>,
    },
    AddSlideText {
        slide_id: u32,
        placeholder: Placeholder,
        text: String,
        format: TextFormat,
    },
    AddPicture {
        slide_id: u32,
        path: PathBuf,
        /// Inches
        position: (f64, f64),
        /// Inches
        size: (f64, f64),
    },
    AddNotes {
        slide_id: u32,
        notes: String,
    },
    AddHeading {
        text: String,
        level: u8,
        style: Option<String>,
    },
    AddParagraph {
        text: String,
        style: Option<String>,
        format: TextFormat,
    },
    AddList {
        items: Vec<String>,
        kind: ListKind,
        style: Option<String>,
    },
    AddTable {
        rows: usize,
        cols: usize,
        data: Vec<Vec<String>>,
        style: Option<String>,
    },
    AddWorksheet {
        name: String,
        position: Option<usize>,
    },
    WriteCell {
        sheet: String,
        cell: CellAddress,
        value: CellValue,
        format: Option<CellFormat>,
    },
    WriteRange {
        sheet: String,
        origin: CellAddress,
        rows: Vec<Vec<CellValue>>,
        format: Option<CellFormat>,
    },
    AddFormula {
        sheet: String,
        cell: CellAddress,
        formula: CellValue,
    },
    AddChart {
        sheet: String,
        chart_type: ChartType,
        data_range: CellRange,
        title: Option<String>,
        position: CellAddress,
    },
}

impl Mutation {
    /// The document kind the mutation applies to
    pub fn kind(&self) -> DocumentKind {
        match self {
            Mutation::AddSlide { .. }
            | Mutation::AddSlideText { .. }
            | Mutation::AddPicture { .. }
            | Mutation::AddNotes { .. } => DocumentKind::Presentation,
            Mutation::AddHeading { .. }
            | Mutation::AddParagraph { .. }
            | Mutation::AddList { .. }
            | Mutation::AddTable { .. } => DocumentKind::Document,
            Mutation::AddWorksheet { .. }
            | Mutation::WriteCell { .. }
            | Mutation::WriteRange { .. }
            | Mutation::AddFormula { .. }
            | Mutation::AddChart { .. } => DocumentKind::Workbook,
        }
    }

    /// The confirmation fields every backend reports for this change
    pub fn describe(&self) -> Summary {
        let value = match self {
            Mutation::AddSlide { layout, .. } => json!({ "layout": layout.name() }),
            Mutation::AddSlideText {
                slide_id,
                placeholder,
                ..
            } => json!({ "slide_id": slide_id, "placeholder": placeholder.name() }),
            Mutation::AddPicture { slide_id, path, .. } => {
                json!({ "slide_id": slide_id, "image": path.to_string_lossy() })
            }
            Mutation::AddNotes { slide_id, .. } => json!({ "slide_id": slide_id }),
            Mutation::AddHeading { level, .. } => json!({ "level": level }),
            Mutation::AddParagraph { .. } => json!({}),
            Mutation::AddList { items, kind, .. } => {
                json!({ "list_type": kind.name(), "items": items.len() })
            }
            Mutation::AddTable { rows, cols, .. } => json!({ "rows": rows, "columns": cols }),
            Mutation::AddWorksheet { name, .. } => json!({ "sheet_name": name }),
            Mutation::WriteCell { sheet, cell, .. } => {
                json!({ "sheet_name": sheet, "cell": cell.to_a1_string() })
            }
            Mutation::WriteRange {
                sheet,
                origin,
                rows,
                ..
            } => json!({
                "sheet_name": sheet,
                "start_cell": origin.to_a1_string(),
                "rows_written": rows.len(),
            }),
            Mutation::AddFormula {
                sheet,
                cell,
                formula,
            } => json!({
                "sheet_name": sheet,
                "cell": cell.to_a1_string(),
                "formula": formula.to_display_string(),
            }),
            Mutation::AddChart {
                sheet,
                chart_type,
                data_range,
                position,
                ..
            } => json!({
                "sheet_name": sheet,
                "chart_type": chart_type.name(),
                "data_range": data_range.to_a1_string(),
                "position": position.to_a1_string(),
            }),
        };
        summary(value)
    }
}

impl AddSlideParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        let layout = match &self.layout {
            Some(layout) => checks.check("layout", layout.parse::<SlideLayout>()),
            None => Some(DEFAULT_LAYOUT),
        };
        checks.finish(|| {
            Some(Mutation::AddSlide {
                layout: layout?,
                position: self.position,
            })
        })
    }
}

impl AddTextToSlideParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        let text = checks.check("text", text(&self.text, MAX_TEXT_LEN));
        let placeholder = match &self.placeholder {
            Some(p) => checks.check("placeholder", p.parse::<Placeholder>()),
            None => Some(Placeholder::Content),
        };
        let format = text_format(&mut checks, self.formatting.as_ref());
        checks.finish(|| {
            Some(Mutation::AddSlideText {
                slide_id: self.slide_id,
                placeholder: placeholder?,
                text: text?,
                format,
            })
        })
    }
}

impl AddImageToSlideParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        let path = checks.check("image_source", image_path(&self.image_source));
        let (x, y) = self
            .position
            .map(|p| (p.x, p.y))
            .unwrap_or(DEFAULT_IMAGE_POSITION);
        let (width, height) = self
            .size
            .map(|s| (s.width, s.height))
            .unwrap_or(DEFAULT_IMAGE_SIZE);
        let x = checks.check("position.x", inches(x, 0.0));
        let y = checks.check("position.y", inches(y, 0.0));
        let width = checks.check("size.width", inches(width, MIN_IMAGE_SIZE));
        let height = checks.check("size.height", inches(height, MIN_IMAGE_SIZE));
        checks.finish(|| {
            Some(Mutation::AddPicture {
                slide_id: self.slide_id,
                path: path?,
                position: (x?, y?),
                size: (width?, height?),
            })
        })
    }
}

impl AddSpeakerNotesParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        let notes = checks.check("notes", text(&self.notes, MAX_TEXT_LEN));
        checks.finish(|| {
            Some(Mutation::AddNotes {
                slide_id: self.slide_id,
                notes: notes?,
            })
        })
    }
}

impl AddHeadingParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        let text = checks.check("text", text(&self.text, MAX_TEXT_LEN));
        let level = self.level.unwrap_or(1);
        let level = if office_mcp_core::document::HEADING_LEVELS.contains(&level) {
            Some(level)
        } else {
            checks.fail("level", "must be within 1..=6");
            None
        };
        checks.finish(|| {
            Some(Mutation::AddHeading {
                text: text?,
                level: level?,
                style: style(&self.style),
            })
        })
    }
}

impl AddParagraphParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        let text = checks.check("text", text(&self.text, MAX_TEXT_LEN));
        let format = text_format(&mut checks, self.formatting.as_ref());
        checks.finish(|| {
            Some(Mutation::AddParagraph {
                text: text?,
                style: style(&self.style),
                format,
            })
        })
    }
}

impl AddListParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        if self.items.is_empty() {
            checks.fail("items", "needs at least one item");
        }
        for (i, item) in self.items.iter().enumerate() {
            checks.check(&format!("items[{i}]"), text(item, MAX_TEXT_LEN));
        }
        let kind = match &self.list_type {
            Some(kind) => checks.check("list_type", kind.parse::<ListKind>()),
            None => Some(ListKind::Bullet),
        };
        checks.finish(|| {
            Some(Mutation::AddList {
                items: self.items.clone(),
                kind: kind?,
                style: style(&self.style),
            })
        })
    }
}

impl AddTableParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        if !(1..=MAX_TABLE_ROWS).contains(&self.rows) {
            checks.fail("rows", format!("must be within 1..={MAX_TABLE_ROWS}"));
        }
        if !(1..=MAX_TABLE_COLS).contains(&self.columns) {
            checks.fail("columns", format!("must be within 1..={MAX_TABLE_COLS}"));
        }

        let mut data = Vec::new();
        let rows = self.data.as_deref().unwrap_or_default();
        if rows.len() > self.rows {
            checks.fail(
                "data",
                format!("has {} rows but the table has {}", rows.len(), self.rows),
            );
        }
        for (r, row) in rows.iter().enumerate() {
            if row.len() > self.columns {
                checks.fail(
                    &format!("data[{r}]"),
                    format!("has {} cells but the table has {} columns", row.len(), self.columns),
                );
            }
            let mut cells = Vec::with_capacity(row.len());
            for (c, value) in row.iter().enumerate() {
                if let Some(text) = checks.check(&format!("data[{r}][{c}]"), cell_text(value)) {
                    cells.push(text);
                }
            }
            data.push(cells);
        }

        checks.finish(|| {
            Some(Mutation::AddTable {
                rows: self.rows,
                cols: self.columns,
                data,
                style: style(&self.style),
            })
        })
    }
}

impl AddWorksheetParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        let name = checks.check("name", sheet_name(&self.name));
        checks.finish(|| {
            Some(Mutation::AddWorksheet {
                name: name?,
                position: self.position,
            })
        })
    }
}

impl WriteCellParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        let sheet = checks.check("sheet_name", non_empty(&self.sheet_name));
        let cell = checks.check("cell", CellAddress::parse(&self.cell));
        let value = checks.check("value", cell_value(&self.value));
        let format = cell_format(&mut checks, self.formatting.as_ref());
        checks.finish(|| {
            Some(Mutation::WriteCell {
                sheet: sheet?,
                cell: cell?,
                value: value?,
                format,
            })
        })
    }
}

impl WriteRangeParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        let sheet = checks.check("sheet_name", non_empty(&self.sheet_name));
        let origin = checks.check("start_cell", CellAddress::parse(&self.start_cell));
        if self.data.is_empty() || self.data.iter().all(Vec::is_empty) {
            checks.fail("data", "needs at least one value");
        }

        let mut rows = Vec::with_capacity(self.data.len());
        for (r, row) in self.data.iter().enumerate() {
            let mut values = Vec::with_capacity(row.len());
            for (c, value) in row.iter().enumerate() {
                if let Some(value) = checks.check(&format!("data[{r}][{c}]"), cell_value(value)) {
                    values.push(value);
                }
            }
            rows.push(values);
        }

        // The whole block has to fit on the grid
        if let Some(origin) = origin {
            let height = self.data.len() as u32;
            let width = self.data.iter().map(Vec::len).max().unwrap_or(0) as u32;
            if height > 0 && width > 0 {
                checks.check("data", CellRange::from_origin(origin, height, width));
            }
        }

        let format = cell_format(&mut checks, self.formatting.as_ref());
        checks.finish(|| {
            Some(Mutation::WriteRange {
                sheet: sheet?,
                origin: origin?,
                rows,
                format,
            })
        })
    }
}

impl AddFormulaParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        let sheet = checks.check("sheet_name", non_empty(&self.sheet_name));
        let cell = checks.check("cell", CellAddress::parse(&self.cell));
        let formula = self.formula.trim();
        if formula.is_empty() || formula == "=" {
            checks.fail("formula", "cannot be empty");
        }
        checks.finish(|| {
            Some(Mutation::AddFormula {
                sheet: sheet?,
                cell: cell?,
                formula: CellValue::formula(formula),
            })
        })
    }
}

impl CreateChartParams {
    pub fn validate(&self) -> OfficeResult<Mutation> {
        let mut checks = Checks::default();
        let sheet = checks.check("sheet_name", non_empty(&self.sheet_name));
        let chart_type = checks.check("chart_type", self.chart_type.parse::<ChartType>());
        let data_range = checks.check("data_range", CellRange::parse(&self.data_range));
        let position = checks.check(
            "position",
            CellAddress::parse(self.position.as_deref().unwrap_or(DEFAULT_CHART_POSITION)),
        );
        let title = match &self.chart_title {
            Some(title) if !title.trim().is_empty() => {
                checks.check("chart_title", text(title, MAX_TITLE_LEN))
            }
            _ => None,
        };
        checks.finish(|| {
            Some(Mutation::AddChart {
                sheet: sheet?,
                chart_type: chart_type?,
                data_range: data_range?,
                title,
                position: position?,
            })
        })
    }
}

/// Where and how a save writes
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTarget {
    pub path: PathBuf,
    /// The path as reported back to the client
    pub file_path: String,
    pub format: String,
}

impl SaveParams {
    /// Check the path and format against the formats the session's backend writes
    ///
    /// A path without an extension gets the format's; any other extension must
    /// name the format.
    pub fn validate(&self, kind: DocumentKind, supported: &[&str]) -> OfficeResult<SaveTarget> {
        let raw = self.file_path.trim();
        if raw.is_empty() {
            return Err(OfficeError::invalid("file_path", "cannot be empty"));
        }
        let format = self
            .format
            .as_deref()
            .map(|f| f.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| kind.native_format().to_string());
        if !supported.contains(&format.as_str()) {
            return Err(OfficeError::unsupported_format(kind, &format, supported));
        }

        let mut path = PathBuf::from(raw);
        match Path::new(raw).extension().map(|e| e.to_string_lossy()) {
            None => {
                path.set_extension(&format);
            }
            Some(ext) if ext.eq_ignore_ascii_case(&format) => {}
            Some(ext) => {
                return Err(OfficeError::invalid(
                    "file_path",
                    format!("extension .{ext} does not match the {format} format"),
                ));
            }
        }
        Ok(SaveTarget {
            file_path: path.to_string_lossy().into_owned(),
            path,
            format,
        })
    }
}
