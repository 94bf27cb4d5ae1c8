//! In-process backend: core object models saved by the OOXML writers

use office_mcp_core::{
    Chart, Document, DocumentKind, ImageData, Picture, Presentation, Table, Workbook,
};
use office_mcp_ooxml::{
    CsvExporter, DocxReader, DocxWriter, OoxmlError, PackageProps, PptxReader, PptxWriter,
    TextExporter, XlsxReader, XlsxWriter,
};
use serde_json::json;

use super::{summary, Summary};
use crate::error::{OfficeError, OfficeResult};
use crate::operation::{CreateRequest, Mutation, SaveTarget};
use crate::session::DocumentHandle;

/// One document kind handled by the library backend
pub trait FormatAdapter: Sized {
    const KIND: DocumentKind;

    /// Save formats, native format first
    const FORMATS: &'static [&'static str];

    /// Build a fresh document, or import its template
    fn create(request: &CreateRequest) -> OfficeResult<Self>;

    /// Apply a change; returns the adapter's own confirmation fields
    fn apply(&mut self, mutation: Mutation) -> OfficeResult<Summary>;

    /// Write the document; `target.format` is one of [`Self::FORMATS`]
    fn save(&self, target: &SaveTarget, props: &PackageProps) -> OfficeResult<()>;
}

impl FormatAdapter for Presentation {
    const KIND: DocumentKind = DocumentKind::Presentation;
    const FORMATS: &'static [&'static str] = &["pptx"];

    fn create(request: &CreateRequest) -> OfficeResult<Self> {
        match &request.template {
            Some(path) => {
                PptxReader::read_file(path, &request.title, request.theme).map_err(template_error)
            }
            None => Ok(Presentation::new(&request.title, request.theme)),
        }
    }

    fn apply(&mut self, mutation: Mutation) -> OfficeResult<Summary> {
        match mutation {
            Mutation::AddSlide { layout, position } => {
                let (slide_id, index) = self.add_slide(layout, position)?;
                Ok(summary(json!({ "slide_id": slide_id, "index": index })))
            }
            Mutation::AddSlideText {
                slide_id,
                placeholder,
                text,
                format,
            } => {
                self.slide_mut(slide_id)?.add_text(placeholder, &text, format);
                Ok(Summary::new())
            }
            Mutation::AddPicture {
                slide_id,
                path,
                position,
                size,
            } => {
                // Missing slides fail before the image is read
                self.slide(slide_id)?;
                let picture = Picture::new(ImageData::load(&path)?, position, size)?;
                self.slide_mut(slide_id)?.add_picture(picture);
                Ok(Summary::new())
            }
            Mutation::AddNotes { slide_id, notes } => {
                self.slide_mut(slide_id)?.add_notes(&notes);
                Ok(Summary::new())
            }
            other => Err(wrong_kind(Self::KIND, &other)),
        }
    }

    fn save(&self, target: &SaveTarget, props: &PackageProps) -> OfficeResult<()> {
        match target.format.as_str() {
            "pptx" => PptxWriter::write_file(self, props, &target.path)?,
            other => return Err(OfficeError::unsupported_format(Self::KIND, other, Self::FORMATS)),
        }
        Ok(())
    }
}

impl FormatAdapter for Document {
    const KIND: DocumentKind = DocumentKind::Document;
    const FORMATS: &'static [&'static str] = &["docx", "txt"];

    fn create(request: &CreateRequest) -> OfficeResult<Self> {
        match &request.template {
            Some(path) => DocxReader::read_file(path, &request.title).map_err(template_error),
            None => Ok(Document::new(&request.title)),
        }
    }

    fn apply(&mut self, mutation: Mutation) -> OfficeResult<Summary> {
        let index = match mutation {
            Mutation::AddHeading { text, level, style } => self.add_heading(&text, level, style)?,
            Mutation::AddParagraph {
                text,
                style,
                format,
            } => self.add_paragraph(&text, style, format),
            Mutation::AddList { items, kind, style } => self.add_list(items, kind, style)?,
            Mutation::AddTable {
                rows,
                cols,
                data,
                style,
            } => self.add_table(Table::new(rows, cols, Some(data), style)?),
            other => return Err(wrong_kind(Self::KIND, &other)),
        };
        Ok(summary(json!({ "index": index })))
    }

    fn save(&self, target: &SaveTarget, props: &PackageProps) -> OfficeResult<()> {
        match target.format.as_str() {
            "docx" => DocxWriter::write_file(self, props, &target.path)?,
            "txt" => TextExporter::write_file(self, &target.path)?,
            other => return Err(OfficeError::unsupported_format(Self::KIND, other, Self::FORMATS)),
        }
        Ok(())
    }
}

impl FormatAdapter for Workbook {
    const KIND: DocumentKind = DocumentKind::Workbook;
    const FORMATS: &'static [&'static str] = &["xlsx", "csv"];

    fn create(request: &CreateRequest) -> OfficeResult<Self> {
        match &request.template {
            Some(path) => XlsxReader::read_file(path, &request.title).map_err(template_error),
            None => Ok(Workbook::new(&request.title)),
        }
    }

    fn apply(&mut self, mutation: Mutation) -> OfficeResult<Summary> {
        match mutation {
            Mutation::AddWorksheet { name, position } => {
                let index = self.add_worksheet(&name, position)?;
                Ok(summary(json!({ "sheet_index": index })))
            }
            Mutation::WriteCell {
                sheet,
                cell,
                value,
                format,
            } => {
                self.worksheet_by_name_mut(&sheet)?
                    .set_cell(cell, value, format);
                Ok(Summary::new())
            }
            Mutation::WriteRange {
                sheet,
                origin,
                rows,
                format,
            } => {
                let range = self
                    .worksheet_by_name_mut(&sheet)?
                    .write_rows(origin, rows, format)?;
                Ok(summary(json!({ "range": range.to_a1_string() })))
            }
            Mutation::AddFormula {
                sheet,
                cell,
                formula,
            } => {
                self.worksheet_by_name_mut(&sheet)?
                    .set_cell(cell, formula, None);
                Ok(Summary::new())
            }
            Mutation::AddChart {
                sheet,
                chart_type,
                data_range,
                title,
                position,
            } => {
                let mut chart = Chart::new(chart_type, data_range, position);
                if let Some(title) = title {
                    chart = chart.with_title(title);
                }
                let index = self.worksheet_by_name_mut(&sheet)?.add_chart(chart);
                Ok(summary(json!({ "chart_index": index })))
            }
            other => Err(wrong_kind(Self::KIND, &other)),
        }
    }

    fn save(&self, target: &SaveTarget, props: &PackageProps) -> OfficeResult<()> {
        match target.format.as_str() {
            "xlsx" => XlsxWriter::write_file(self, props, &target.path)?,
            "csv" => CsvExporter::write_file(self, &target.path)?,
            other => return Err(OfficeError::unsupported_format(Self::KIND, other, Self::FORMATS)),
        }
        Ok(())
    }
}

/// A template that exists but cannot be imported is the caller's problem
fn template_error(err: OoxmlError) -> OfficeError {
    match err {
        OoxmlError::Io(e) => OfficeError::Io(e),
        e => OfficeError::invalid("template_path", e),
    }
}

fn wrong_kind(kind: DocumentKind, mutation: &Mutation) -> OfficeError {
    OfficeError::internal(format!(
        "{} change routed to a {kind}",
        mutation.kind()
    ))
}

/// Save formats the library backend writes for a kind
pub fn supported_formats(kind: DocumentKind) -> &'static [&'static str] {
    match kind {
        DocumentKind::Presentation => Presentation::FORMATS,
        DocumentKind::Document => Document::FORMATS,
        DocumentKind::Workbook => Workbook::FORMATS,
    }
}

/// Build the handle for a new library session
pub fn create(request: &CreateRequest) -> OfficeResult<DocumentHandle> {
    Ok(match request.kind {
        DocumentKind::Presentation => DocumentHandle::Presentation(Presentation::create(request)?),
        DocumentKind::Document => DocumentHandle::Document(Document::create(request)?),
        DocumentKind::Workbook => DocumentHandle::Workbook(Workbook::create(request)?),
    })
}

pub fn apply(handle: &mut DocumentHandle, mutation: Mutation) -> OfficeResult<Summary> {
    match handle {
        DocumentHandle::Presentation(p) => p.apply(mutation),
        DocumentHandle::Document(d) => d.apply(mutation),
        DocumentHandle::Workbook(w) => w.apply(mutation),
        DocumentHandle::Live(_) => Err(OfficeError::internal(
            "live document routed to the library backend",
        )),
    }
}

pub fn save(handle: &DocumentHandle, target: &SaveTarget, props: &PackageProps) -> OfficeResult<()> {
    match handle {
        DocumentHandle::Presentation(p) => p.save(target, props),
        DocumentHandle::Document(d) => d.save(target, props),
        DocumentHandle::Workbook(w) => w.save(target, props),
        DocumentHandle::Live(_) => Err(OfficeError::internal(
            "live document routed to the library backend",
        )),
    }
}
