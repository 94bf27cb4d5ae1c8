//! # office-mcp-ooxml
//!
//! Office Open XML writers (PPTX, DOCX, XLSX) and the readers used to import
//! templates, plus plain-text and CSV exports.

pub mod docx;
pub mod error;
pub mod export;
pub mod pptx;
pub mod xlsx;

mod package;

pub use docx::{DocxReader, DocxWriter};
pub use error::{OoxmlError, OoxmlResult};
pub use export::{CsvExporter, TextExporter};
pub use package::PackageProps;
pub use pptx::{PptxReader, PptxWriter};
pub use xlsx::{XlsxReader, XlsxWriter};
