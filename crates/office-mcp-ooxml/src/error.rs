//! OOXML error types

use thiserror::Error;

/// Result type for OOXML operations
pub type OoxmlResult<T> = std::result::Result<T, OoxmlError>;

/// Errors that can occur while reading or writing Office Open XML packages
#[derive(Debug, Error)]
pub enum OoxmlError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Content the target format cannot represent
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// Invalid file format
    #[error("Invalid package format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] office_mcp_core::Error),
}
