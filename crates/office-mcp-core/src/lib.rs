//! # office-mcp-core
//!
//! In-memory object models for the three document kinds office-mcp edits.
//!
//! - [`Presentation`] - slide decks with placeholders, pictures and speaker notes
//! - [`Document`] - word-processing documents built from headings, paragraphs, lists and tables
//! - [`Workbook`] - spreadsheets with formatted cells, formulas and charts
//!
//! The models only hold content. Persisting them is the job of `office-mcp-ooxml`.
//!
//! ## Example
//!
//! ```rust
//! use office_mcp_core::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::new("Budget");
//! let sheet = workbook.worksheet_by_name_mut("Sheet1").unwrap();
//! sheet.set_value("B2", CellValue::Number(42.0)).unwrap();
//! assert_eq!(sheet.cell_count(), 2);
//! ```

pub mod cell;
pub mod chart;
pub mod document;
pub mod error;
pub mod kind;
pub mod presentation;
pub mod style;
pub mod workbook;

pub use cell::{CellAddress, CellRange, CellValue};
pub use chart::{Chart, ChartAnchor, ChartType, SeriesSource};
pub use document::{Block, Document, ListKind, Table, DEFAULT_DOCUMENT_TITLE};
pub use error::{Error, Result};
pub use kind::DocumentKind;
pub use presentation::{
    ImageData, ImageFormat, Picture, Placeholder, Presentation, Slide, SlideLayout,
    TextParagraph, Theme, ThemePalette,
};
pub use style::{
    CellFormat, Color, HorizontalAlignment, TextAlignment, TextFormat, VerticalAlignment,
};
pub use workbook::{Cell, Workbook, Worksheet};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// English Metric Units per inch, the unit DrawingML positions are stored in
pub const EMU_PER_INCH: i64 = 914_400;
