//! Error types for office-mcp-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the object models
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row number outside the worksheet grid (1-based for display)
    #[error("Row {0} out of bounds (max: {1})")]
    RowOutOfBounds(u64, u32),

    /// Column outside the worksheet grid (1-based for display)
    #[error("Column {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u64, u16),

    /// Sheet insert position past the end of the sheet list
    #[error("Sheet position {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// No slide carries this id
    #[error("Slide not found: {0}")]
    SlideNotFound(u32),

    /// Slide insert position past the end of the deck
    #[error("Slide position {0} out of bounds (count: {1})")]
    SlideOutOfBounds(usize, usize),

    /// A color that is not `#RRGGBB`
    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    /// A keyword outside its recognized set (layouts, themes, chart types, ...)
    #[error("Unknown {what} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        what: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Picture file that cannot be embedded
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    /// A value outside what the model accepts (sizes, lengths, counts)
    #[error("{0}")]
    InvalidValue(String),

    /// IO error while loading external content
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an "invalid value" error with a message
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Error::InvalidValue(msg.into())
    }

    /// Whether the error describes caller input rather than an environment failure
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}
