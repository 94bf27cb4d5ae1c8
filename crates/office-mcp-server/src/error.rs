//! Error taxonomy reported to clients

use std::fmt;

use office_mcp_automation::AutomationError;
use office_mcp_core::DocumentKind;
use office_mcp_ooxml::OoxmlError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Result type alias using [`OfficeError`]
pub type OfficeResult<T> = std::result::Result<T, OfficeError>;

/// Machine-readable error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    SessionNotFound,
    KindMismatch,
    InvalidParameters,
    InvalidContent,
    UnsupportedFormat,
    #[serde(rename = "IOError")]
    IoError,
    AutomationUnavailable,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SessionNotFound => "SessionNotFound",
            ErrorKind::KindMismatch => "KindMismatch",
            ErrorKind::InvalidParameters => "InvalidParameters",
            ErrorKind::InvalidContent => "InvalidContent",
            ErrorKind::UnsupportedFormat => "UnsupportedFormat",
            ErrorKind::IoError => "IOError",
            ErrorKind::AutomationUnavailable => "AutomationUnavailable",
            ErrorKind::InternalError => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the dispatcher
#[derive(Debug, Error)]
pub enum OfficeError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session {id} is a {actual}, not a {expected}")]
    KindMismatch {
        id: String,
        expected: DocumentKind,
        actual: DocumentKind,
    },

    /// One `field: reason` entry per offending field
    #[error("Invalid parameters: {}", .0.join("; "))]
    InvalidParameters(Vec<String>),

    /// Content the file format cannot hold, reported by the writer
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Automation unavailable: {0}")]
    AutomationUnavailable(String),

    /// Full detail is logged; clients only see [`OfficeError::public_message`]
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OfficeError {
    /// A single-field parameter error
    pub fn invalid(field: &str, reason: impl fmt::Display) -> Self {
        OfficeError::InvalidParameters(vec![format!("{field}: {reason}")])
    }

    pub fn unsupported_format(kind: DocumentKind, format: &str, supported: &[&str]) -> Self {
        OfficeError::UnsupportedFormat(format!(
            "{kind} cannot be saved as '{format}' (supported: {})",
            supported.join(", ")
        ))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        OfficeError::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            OfficeError::SessionNotFound(_) => ErrorKind::SessionNotFound,
            OfficeError::KindMismatch { .. } => ErrorKind::KindMismatch,
            OfficeError::InvalidParameters(_) => ErrorKind::InvalidParameters,
            OfficeError::InvalidContent(_) => ErrorKind::InvalidContent,
            OfficeError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            OfficeError::Io(_) => ErrorKind::IoError,
            OfficeError::AutomationUnavailable(_) => ErrorKind::AutomationUnavailable,
            OfficeError::Internal(_) => ErrorKind::InternalError,
        }
    }

    /// Message safe to hand to a client
    pub fn public_message(&self) -> String {
        match self {
            OfficeError::Internal(_) => "Internal error; see server log for details".to_string(),
            other => other.to_string(),
        }
    }

    /// The `{kind, message}` payload sent with every error
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "kind": self.kind(),
            "message": self.public_message(),
        })
    }
}

impl From<office_mcp_core::Error> for OfficeError {
    fn from(err: office_mcp_core::Error) -> Self {
        match err {
            office_mcp_core::Error::Io(e) => OfficeError::Io(e),
            other => OfficeError::InvalidParameters(vec![other.to_string()]),
        }
    }
}

impl From<OoxmlError> for OfficeError {
    fn from(err: OoxmlError) -> Self {
        match err {
            OoxmlError::Io(e) => OfficeError::Io(e),
            OoxmlError::InvalidContent(msg) => OfficeError::InvalidContent(msg),
            OoxmlError::Core(e) => e.into(),
            e @ (OoxmlError::InvalidFormat(_) | OoxmlError::MissingPart(_)) => {
                OfficeError::InvalidContent(e.to_string())
            }
            e => OfficeError::Internal(e.to_string()),
        }
    }
}

impl From<AutomationError> for OfficeError {
    fn from(err: AutomationError) -> Self {
        match err {
            AutomationError::Unsupported(msg) => OfficeError::UnsupportedFormat(msg),
            e => OfficeError::AutomationUnavailable(e.to_string()),
        }
    }
}

impl From<OfficeError> for rmcp::ErrorData {
    fn from(err: OfficeError) -> Self {
        let data = Some(err.to_json());
        let message = err.public_message();
        match err.kind() {
            ErrorKind::SessionNotFound => rmcp::ErrorData::resource_not_found(message, data),
            ErrorKind::KindMismatch
            | ErrorKind::InvalidParameters
            | ErrorKind::InvalidContent
            | ErrorKind::UnsupportedFormat => rmcp::ErrorData::invalid_params(message, data),
            ErrorKind::IoError | ErrorKind::AutomationUnavailable | ErrorKind::InternalError => {
                rmcp::ErrorData::internal_error(message, data)
            }
        }
    }
}
