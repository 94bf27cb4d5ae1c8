//! Word-processing document model

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::style::TextFormat;

/// Title a new document gets when the caller does not name it
pub const DEFAULT_DOCUMENT_TITLE: &str = "New Document";

/// Heading levels accepted by [`Document::add_heading`]
pub const HEADING_LEVELS: std::ops::RangeInclusive<u8> = 1..=6;

/// Largest table accepted, in rows
pub const MAX_TABLE_ROWS: usize = 1000;

/// Largest table accepted, in columns (Word refuses more than 63)
pub const MAX_TABLE_COLS: usize = 63;

/// Kind of list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bullet,
    Number,
}

impl ListKind {
    pub fn name(&self) -> &'static str {
        match self {
            ListKind::Bullet => "bullet",
            ListKind::Number => "number",
        }
    }
}

impl FromStr for ListKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bullet" | "bulleted" | "unordered" => Ok(ListKind::Bullet),
            "number" | "numbered" | "ordered" => Ok(ListKind::Number),
            _ => Err(Error::UnknownVariant {
                what: "list type",
                value: s.to_string(),
                expected: "bullet, number",
            }),
        }
    }
}

/// A table with every cell holding plain text
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<String>>,
    style: Option<String>,
}

impl Table {
    /// Build a table, filling it from `data` row by row
    ///
    /// `data` may be shorter than the table; cells it does not reach stay empty.
    /// Data that would not fit is rejected rather than truncated.
    pub fn new(
        rows: usize,
        cols: usize,
        data: Option<Vec<Vec<String>>>,
        style: Option<String>,
    ) -> Result<Self> {
        if rows == 0 || rows > MAX_TABLE_ROWS {
            return Err(Error::invalid(format!("rows must be within 1..={MAX_TABLE_ROWS}")));
        }
        if cols == 0 || cols > MAX_TABLE_COLS {
            return Err(Error::invalid(format!(
                "columns must be within 1..={MAX_TABLE_COLS}"
            )));
        }

        let mut cells = vec![vec![String::new(); cols]; rows];
        if let Some(data) = data {
            if data.len() > rows {
                return Err(Error::invalid(format!(
                    "data has {} rows but the table has {rows}",
                    data.len()
                )));
            }
            for (r, row) in data.into_iter().enumerate() {
                if row.len() > cols {
                    return Err(Error::invalid(format!(
                        "data row {r} has {} cells but the table has {cols} columns",
                        row.len()
                    )));
                }
                for (c, value) in row.into_iter().enumerate() {
                    cells[r][c] = value;
                }
            }
        }

        Ok(Self {
            rows,
            cols,
            cells,
            style,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }
}

/// One top-level element of a document body
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        text: String,
        level: u8,
        style: Option<String>,
    },
    Paragraph {
        text: String,
        style: Option<String>,
        format: TextFormat,
    },
    List {
        items: Vec<String>,
        kind: ListKind,
        style: Option<String>,
    },
    Table(Table),
}

/// A word-processing document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    title: String,
    blocks: Vec<Block>,
}

impl Document {
    /// Create a document; any title but the default becomes its first heading
    pub fn new(title: &str) -> Self {
        let mut document = Self::empty(title);
        if title != DEFAULT_DOCUMENT_TITLE && !title.trim().is_empty() {
            document.blocks.push(Block::Heading {
                text: title.to_string(),
                level: 1,
                style: None,
            });
        }
        document
    }

    /// Create a document with an empty body
    pub fn empty(title: &str) -> Self {
        Self {
            title: title.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Add a heading; returns the new block's index
    pub fn add_heading(&mut self, text: &str, level: u8, style: Option<String>) -> Result<usize> {
        if !HEADING_LEVELS.contains(&level) {
            return Err(Error::invalid(format!(
                "heading level {level} outside {}..={}",
                HEADING_LEVELS.start(),
                HEADING_LEVELS.end()
            )));
        }
        self.blocks.push(Block::Heading {
            text: text.to_string(),
            level,
            style,
        });
        Ok(self.blocks.len() - 1)
    }

    /// Add a body paragraph; returns the new block's index
    pub fn add_paragraph(&mut self, text: &str, style: Option<String>, format: TextFormat) -> usize {
        self.blocks.push(Block::Paragraph {
            text: text.to_string(),
            style,
            format,
        });
        self.blocks.len() - 1
    }

    /// Add a list; returns the new block's index
    pub fn add_list(
        &mut self,
        items: Vec<String>,
        kind: ListKind,
        style: Option<String>,
    ) -> Result<usize> {
        if items.is_empty() {
            return Err(Error::invalid("a list needs at least one item"));
        }
        self.blocks.push(Block::List { items, kind, style });
        Ok(self.blocks.len() - 1)
    }

    /// Add a table that was built (and checked) beforehand
    pub fn add_table(&mut self, table: Table) -> usize {
        self.blocks.push(Block::Table(table));
        self.blocks.len() - 1
    }

    /// Append a block as-is; used when importing existing files
    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn heading_count(&self) -> usize {
        self.count(|b| matches!(b, Block::Heading { .. }))
    }

    pub fn paragraph_count(&self) -> usize {
        self.count(|b| matches!(b, Block::Paragraph { .. }))
    }

    pub fn list_count(&self) -> usize {
        self.count(|b| matches!(b, Block::List { .. }))
    }

    pub fn table_count(&self) -> usize {
        self.count(|b| matches!(b, Block::Table(_)))
    }

    fn count(&self, pred: impl Fn(&Block) -> bool) -> usize {
        self.blocks.iter().filter(|b| pred(b)).count()
    }
}
