//! AppleScript rendering for [`Command`]s

use std::path::Path;

use office_mcp_core::{CellAddress, CellValue, ChartType, DocumentKind, Placeholder, SlideLayout};

use crate::command::{Command, POINTS_PER_INCH};
use crate::error::{AutomationError, AutomationResult};

/// Default size of a chart object, in points
const CHART_WIDTH_PT: u32 = 480;
const CHART_HEIGHT_PT: u32 = 288;

/// Quote a string as an AppleScript literal
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn posix_file(path: &Path) -> String {
    format!("POSIX file {}", quote(&path.to_string_lossy()))
}

/// Scripting class of a kind's documents
fn document_class(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Presentation => "presentation",
        DocumentKind::Document => "document",
        DocumentKind::Workbook => "workbook",
    }
}

/// The `active ...` property naming the frontmost document
fn active_document(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Presentation => "active presentation",
        DocumentKind::Document => "active document",
        DocumentKind::Workbook => "active workbook",
    }
}

fn layout_constant(layout: SlideLayout) -> &'static str {
    match layout {
        SlideLayout::TitleSlide => "slide layout title",
        SlideLayout::TitleAndContent => "slide layout object",
        SlideLayout::SectionHeader => "slide layout section header",
        SlideLayout::TwoContent => "slide layout two objects",
        SlideLayout::Comparison => "slide layout comparison",
        SlideLayout::TitleOnly => "slide layout title only",
        SlideLayout::Blank => "slide layout blank",
        SlideLayout::ContentWithCaption => "slide layout content with caption",
        SlideLayout::PictureWithCaption => "slide layout picture with caption",
    }
}

fn chart_constant(chart_type: ChartType) -> &'static str {
    match chart_type {
        ChartType::Bar => "bar clustered",
        ChartType::Column => "column clustered",
        ChartType::Line => "line chart",
        ChartType::Pie => "pie chart",
    }
}

/// The `save` statement for a document reference, per application
fn save_statement(kind: DocumentKind, target: &str, path: &Path, format: &str) -> AutomationResult<String> {
    let file = quote(&path.to_string_lossy());
    let statement = match (kind, format) {
        (DocumentKind::Presentation, "pptx") => {
            format!("save {target} in {file} as save as Open XML presentation")
        }
        (DocumentKind::Presentation, "pdf") => format!("save {target} in {file} as save as PDF"),
        (DocumentKind::Presentation, "ppt") => {
            format!("save {target} in {file} as save as presentation")
        }
        (DocumentKind::Document, "docx") => {
            format!("save as {target} file name {file} file format format document")
        }
        (DocumentKind::Document, "pdf") => {
            format!("save as {target} file name {file} file format format PDF")
        }
        (DocumentKind::Document, "doc") => {
            format!("save as {target} file name {file} file format format document97")
        }
        (DocumentKind::Document, "rtf") => {
            format!("save as {target} file name {file} file format format rtf")
        }
        (DocumentKind::Document, "txt") => {
            format!("save as {target} file name {file} file format format text")
        }
        (DocumentKind::Workbook, "xlsx") => {
            format!("save workbook as {target} filename {file} file format workbook normal file format")
        }
        (DocumentKind::Workbook, "pdf") => {
            format!("save workbook as {target} filename {file} file format PDF file format")
        }
        (DocumentKind::Workbook, "csv") => {
            format!("save workbook as {target} filename {file} file format CSV file format")
        }
        (DocumentKind::Workbook, "xls") => {
            format!("save workbook as {target} filename {file} file format Excel98to2004 file format")
        }
        _ => {
            return Err(AutomationError::Unsupported(format!(
                "{} cannot save as '{format}'",
                kind.application_name()
            )))
        }
    };
    Ok(statement)
}

fn cell_value_literal(value: &CellValue) -> String {
    match value {
        CellValue::Empty => quote(""),
        CellValue::Boolean(b) => b.to_string(),
        CellValue::Number(n) => n.to_string(),
        CellValue::String(s) => quote(s),
        CellValue::Formula(f) => quote(f),
    }
}

/// Lines appending `text` as a new paragraph of a text range; an empty
/// range takes the text as its first paragraph
fn append_paragraph(target: &str, text: &str) -> Vec<String> {
    vec![
        format!("set theRange to {target}"),
        "if content of theRange is \"\" then".into(),
        format!("    set content of theRange to {}", quote(text)),
        "else".into(),
        format!(
            "    set content of theRange to (content of theRange) & return & {}",
            quote(text)
        ),
        "end if".into(),
    ]
}

/// Wrap body lines in a `tell application` block
fn tell(kind: DocumentKind, lines: &[String]) -> String {
    let mut script = format!("tell application {}\n", quote(kind.application_name()));
    for line in lines {
        script.push_str("    ");
        script.push_str(line);
        script.push('\n');
    }
    script.push_str("end tell");
    script
}

/// Render a command as a complete AppleScript program
pub fn render(command: &Command) -> AutomationResult<String> {
    let script = match command {
        Command::IsRunning { kind } => format!(
            "tell application \"System Events\"\n    return (name of processes) contains {}\nend tell",
            quote(kind.application_name())
        ),

        Command::Version { kind } => tell(*kind, &["return version".into()]),

        Command::ListOpen { kind } => tell(
            *kind,
            &[
                "set AppleScript's text item delimiters to linefeed".into(),
                format!("return (name of every {}) as text", document_class(*kind)),
            ],
        ),

        Command::Create { kind, title } => {
            let mut lines = vec![
                "activate".to_string(),
                format!("set newDoc to make new {}", document_class(*kind)),
            ];
            match kind {
                DocumentKind::Presentation => {
                    lines.push(format!(
                        "set firstSlide to make new slide at end of newDoc with properties {{layout:{}}}",
                        layout_constant(SlideLayout::TitleSlide)
                    ));
                    lines.push(format!(
                        "set content of text range of text frame of shape 1 of firstSlide to {}",
                        quote(title)
                    ));
                }
                DocumentKind::Document => {
                    lines.push(format!(
                        "insert text {} at end of text object of newDoc",
                        quote(title)
                    ));
                    lines.push("set style of paragraph 1 of newDoc to \"Heading 1\"".into());
                }
                DocumentKind::Workbook => {
                    lines.push(format!(
                        "set value of range \"A1\" of worksheet 1 of newDoc to {}",
                        quote(title)
                    ));
                    lines.push(
                        "set bold of font object of range \"A1\" of worksheet 1 of newDoc to true"
                            .into(),
                    );
                }
            }
            lines.push("return name of newDoc".into());
            tell(*kind, &lines)
        }

        Command::Open { kind, path } => tell(
            *kind,
            &[
                "activate".into(),
                format!("open {}", posix_file(path)),
                format!("return name of {}", active_document(*kind)),
            ],
        ),

        Command::AddSlide {
            presentation,
            layout,
            position,
        } => {
            let at = match position {
                None => "end of thePres".to_string(),
                Some(0) => "beginning of thePres".to_string(),
                Some(n) => format!("after slide {n} of thePres"),
            };
            tell(
                DocumentKind::Presentation,
                &[
                    format!("set thePres to presentation {}", quote(presentation)),
                    format!(
                        "set newSlide to make new slide at {at} with properties {{layout:{}}}",
                        layout_constant(*layout)
                    ),
                    "return slide index of newSlide".into(),
                ],
            )
        }

        Command::CountSlides { presentation } => tell(
            DocumentKind::Presentation,
            &[format!("return count of slides of presentation {}", quote(presentation))],
        ),

        Command::ListWorksheets { workbook } => tell(
            DocumentKind::Workbook,
            &[
                "set AppleScript's text item delimiters to linefeed".into(),
                format!("return (name of every worksheet of workbook {}) as text", quote(workbook)),
            ],
        ),

        Command::AppendSlideText {
            presentation,
            slide,
            placeholder,
            text,
        } => {
            let shape = match placeholder {
                Placeholder::Title => 1,
                Placeholder::Subtitle | Placeholder::Content => 2,
            };
            let target = format!(
                "text range of text frame of shape {shape} of slide {slide} of presentation {}",
                quote(presentation)
            );
            tell(DocumentKind::Presentation, &append_paragraph(&target, text))
        }

        Command::AddPicture {
            presentation,
            slide,
            path,
            position,
            size,
        } => tell(
            DocumentKind::Presentation,
            &[format!(
                "make new picture at end of slide {slide} of presentation {} with properties {{file name:{}, lock aspect ratio:false, left position:{}, top:{}, width:{}, height:{}}}",
                quote(presentation),
                quote(&path.to_string_lossy()),
                position.0 * POINTS_PER_INCH,
                position.1 * POINTS_PER_INCH,
                size.0 * POINTS_PER_INCH,
                size.1 * POINTS_PER_INCH,
            )],
        ),

        Command::AppendSpeakerNotes {
            presentation,
            slide,
            notes,
        } => {
            let target = format!(
                "text range of text frame of place holder 2 of notes page of slide {slide} of presentation {}",
                quote(presentation)
            );
            tell(DocumentKind::Presentation, &append_paragraph(&target, notes))
        }

        Command::AppendParagraphs {
            document,
            paragraphs,
            style,
        } => {
            let mut lines = vec![format!("set theDoc to document {}", quote(document))];
            for text in paragraphs {
                lines.push("insert paragraph at end of text object of theDoc".into());
                lines.push(format!("insert text {} at end of text object of theDoc", quote(text)));
                if let Some(style) = style {
                    lines.push(format!(
                        "set style of paragraph (count of paragraphs of theDoc) of theDoc to {}",
                        quote(style)
                    ));
                }
            }
            tell(DocumentKind::Document, &lines)
        }

        Command::AddTable {
            document,
            rows,
            cols,
            data,
        } => {
            let mut lines = vec![
                format!("set theDoc to document {}", quote(document)),
                "insert paragraph at end of text object of theDoc".into(),
                "set endRange to create range theDoc start (end of content of text object of theDoc) - 1 end (end of content of text object of theDoc) - 1".into(),
                format!(
                    "set theTable to make new table at theDoc with properties {{text object:endRange, number of rows:{rows}, number of columns:{cols}}}"
                ),
            ];
            for (r, row) in data.iter().enumerate() {
                for (c, text) in row.iter().enumerate() {
                    lines.push(format!(
                        "set content of text object of (get cell from table theTable row {} column {}) to {}",
                        r + 1,
                        c + 1,
                        quote(text)
                    ));
                }
            }
            tell(DocumentKind::Document, &lines)
        }

        Command::AddWorksheet {
            workbook,
            name,
            position,
        } => {
            let at = match position {
                None => "end of theWb".to_string(),
                Some(0) => "beginning of theWb".to_string(),
                Some(n) => format!("after worksheet {n} of theWb"),
            };
            tell(
                DocumentKind::Workbook,
                &[
                    format!("set theWb to workbook {}", quote(workbook)),
                    format!("set newSheet to make new worksheet at {at}"),
                    format!("set name of newSheet to {}", quote(name)),
                    "return entry index of newSheet".into(),
                ],
            )
        }

        Command::SetCells {
            workbook,
            sheet,
            start,
            rows,
        } => {
            let mut lines = vec![format!(
                "set theSheet to worksheet {} of workbook {}",
                quote(sheet),
                quote(workbook)
            )];
            for (r, row) in rows.iter().enumerate() {
                for (c, value) in row.iter().enumerate() {
                    let addr = CellAddress::new(start.row + r as u32, start.col + c as u16);
                    let property = if matches!(value, CellValue::Formula(_)) {
                        "formula"
                    } else {
                        "value"
                    };
                    lines.push(format!(
                        "set {property} of range \"{addr}\" of theSheet to {}",
                        cell_value_literal(value)
                    ));
                }
            }
            tell(DocumentKind::Workbook, &lines)
        }

        Command::AddChart {
            workbook,
            sheet,
            chart_type,
            data_range,
            title,
            anchor,
        } => {
            let mut lines = vec![
                format!(
                    "set theSheet to worksheet {} of workbook {}",
                    quote(sheet),
                    quote(workbook)
                ),
                format!("set anchorCell to range \"{anchor}\" of theSheet"),
                format!(
                    "set chartObj to make new chart object at theSheet with properties {{left position:(left position of anchorCell), top:(top of anchorCell), width:{CHART_WIDTH_PT}, height:{CHART_HEIGHT_PT}}}"
                ),
                "set theChart to chart of chartObj".into(),
                format!(
                    "set source data theChart source (range \"{data_range}\" of theSheet)"
                ),
                format!("set chart type of theChart to {}", chart_constant(*chart_type)),
            ];
            if let Some(title) = title {
                lines.push("set has title of theChart to true".into());
                lines.push(format!(
                    "set caption of chart title of theChart to {}",
                    quote(title)
                ));
            }
            tell(DocumentKind::Workbook, &lines)
        }

        Command::Save {
            kind,
            document,
            path,
            format,
        } => {
            let target = format!("{} {}", document_class(*kind), quote(document));
            tell(*kind, &[save_statement(*kind, &target, path, format)?])
        }
    };
    Ok(script)
}
