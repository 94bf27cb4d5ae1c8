//! Tool parameter types
//!
//! These are exactly what clients send. Nothing here is validated beyond its
//! JSON shape; see [`crate::operation`] for the rules.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePresentationParams {
    /// Presentation title, also placed on the first slide
    pub title: String,
    /// One of default, modern, classic, minimal, corporate
    #[serde(default)]
    pub theme: Option<String>,
    /// Local .pptx or .potx file to start from
    #[serde(default)]
    pub template_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateDocumentParams {
    /// Document title; anything but "New Document" becomes the first heading
    #[serde(default)]
    pub title: Option<String>,
    /// Local .docx or .dotx file to start from
    #[serde(default)]
    pub template_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateWorkbookParams {
    /// Workbook title, written in bold to Sheet1!A1
    pub title: String,
    /// Local .xlsx or .xltx file to start from
    #[serde(default)]
    pub template_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddSlideParams {
    #[serde(alias = "presentation_id")]
    pub id: String,
    /// Standard layout name, "Title and Content" when omitted
    #[serde(default)]
    pub layout: Option<String>,
    /// 0-based insert position; appends when omitted
    #[serde(default)]
    pub position: Option<usize>,
}

/// Character and paragraph formatting
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TextFormatting {
    /// Points, 8 to 72
    #[serde(default)]
    pub font_size: Option<u32>,
    #[serde(default)]
    pub font_name: Option<String>,
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    /// `#RRGGBB`
    #[serde(default)]
    pub color: Option<String>,
    /// left, center, right or justify
    #[serde(default)]
    pub alignment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddTextToSlideParams {
    #[serde(alias = "presentation_id")]
    pub id: String,
    pub slide_id: u32,
    pub text: String,
    /// title, subtitle or content (the default)
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub formatting: Option<TextFormatting>,
}

/// Offset from the slide's top-left corner, in inches
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct ImagePosition {
    pub x: f64,
    pub y: f64,
}

/// Picture extent, in inches
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddImageToSlideParams {
    #[serde(alias = "presentation_id")]
    pub id: String,
    pub slide_id: u32,
    /// Path of a local PNG, JPEG or GIF file
    pub image_source: String,
    #[serde(default)]
    pub position: Option<ImagePosition>,
    #[serde(default)]
    pub size: Option<ImageSize>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddSpeakerNotesParams {
    #[serde(alias = "presentation_id")]
    pub id: String,
    pub slide_id: u32,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddHeadingParams {
    #[serde(alias = "document_id")]
    pub id: String,
    pub text: String,
    /// 1 to 6, default 1
    #[serde(default)]
    pub level: Option<u8>,
    /// Named paragraph style overriding "Heading N"
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddParagraphParams {
    #[serde(alias = "document_id")]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub formatting: Option<TextFormatting>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddListParams {
    #[serde(alias = "document_id")]
    pub id: String,
    pub items: Vec<String>,
    /// bullet (the default) or number
    #[serde(default)]
    pub list_type: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddTableParams {
    #[serde(alias = "document_id")]
    pub id: String,
    pub rows: usize,
    pub columns: usize,
    /// Row-major cell values; shorter than the table is fine
    #[serde(default)]
    pub data: Option<Vec<Vec<Value>>>,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddWorksheetParams {
    #[serde(alias = "workbook_id")]
    pub id: String,
    pub name: String,
    /// 0-based insert position; appends when omitted
    #[serde(default)]
    pub position: Option<usize>,
}

/// Cell formatting
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CellFormatting {
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    /// Points, 8 to 72
    #[serde(default)]
    pub font_size: Option<u32>,
    #[serde(default)]
    pub font_name: Option<String>,
    /// `#RRGGBB`
    #[serde(default)]
    pub font_color: Option<String>,
    /// `#RRGGBB` fill
    #[serde(default, alias = "fill_color")]
    pub background_color: Option<String>,
    /// general, left, center, right or justify
    #[serde(default, alias = "alignment")]
    pub horizontal_alignment: Option<String>,
    /// top, center or bottom
    #[serde(default)]
    pub vertical_alignment: Option<String>,
    #[serde(default)]
    pub wrap_text: Option<bool>,
    /// Thin border around the cell
    #[serde(default)]
    pub border: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteCellParams {
    #[serde(alias = "workbook_id")]
    pub id: String,
    pub sheet_name: String,
    /// A1-style address
    pub cell: String,
    /// String, number, boolean or null; strings starting with `=` are formulas
    pub value: Value,
    #[serde(default)]
    pub formatting: Option<CellFormatting>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteRangeParams {
    #[serde(alias = "workbook_id")]
    pub id: String,
    pub sheet_name: String,
    pub start_cell: String,
    /// Rows of values written from `start_cell` rightwards and down
    pub data: Vec<Vec<Value>>,
    #[serde(default)]
    pub formatting: Option<CellFormatting>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddFormulaParams {
    #[serde(alias = "workbook_id")]
    pub id: String,
    pub sheet_name: String,
    pub cell: String,
    /// Formula text; the leading `=` is optional
    pub formula: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateChartParams {
    #[serde(alias = "workbook_id")]
    pub id: String,
    pub sheet_name: String,
    /// bar, column, line or pie
    pub chart_type: String,
    /// Source block such as `A1:C10`
    pub data_range: String,
    #[serde(default)]
    pub chart_title: Option<String>,
    /// Top-left anchor cell, default `E5`
    #[serde(default)]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SaveParams {
    #[serde(alias = "presentation_id", alias = "document_id", alias = "workbook_id")]
    pub id: String,
    pub file_path: String,
    /// Defaults to the kind's native format (pptx, docx, xlsx)
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SessionParams {
    #[serde(alias = "presentation_id", alias = "document_id", alias = "workbook_id")]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListOpenWindowsParams {
    /// presentation, document or workbook
    pub kind: String,
}
