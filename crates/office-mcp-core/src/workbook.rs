//! Workbook and worksheet model

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellRange, CellValue};
use crate::chart::Chart;
use crate::error::{Error, Result};
use crate::style::CellFormat;
use crate::MAX_SHEET_NAME_LEN;

/// Name of the sheet every new workbook starts with
pub const FIRST_SHEET_NAME: &str = "Sheet1";

/// A cell's value and optional formatting
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub format: Option<CellFormat>,
}

/// A worksheet within a workbook
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    name: String,
    cells: BTreeMap<CellAddress, Cell>,
    charts: Vec<Chart>,
}

impl Worksheet {
    /// Create an empty worksheet
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            charts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a value by A1 address, keeping any existing format
    pub fn set_value(&mut self, address: &str, value: CellValue) -> Result<CellAddress> {
        let addr = CellAddress::parse(address)?;
        self.set_cell(addr, value, None);
        Ok(addr)
    }

    /// Set a cell; `format` replaces the existing format when given
    ///
    /// Writing [`CellValue::Empty`] without a format clears the cell.
    pub fn set_cell(&mut self, addr: CellAddress, value: CellValue, format: Option<CellFormat>) {
        if value.is_empty() && format.is_none() {
            self.cells.remove(&addr);
            return;
        }
        let format = format.filter(|f| !f.is_plain());
        match self.cells.get_mut(&addr) {
            Some(cell) => {
                cell.value = value;
                if format.is_some() {
                    cell.format = format;
                }
            }
            None => {
                self.cells.insert(addr, Cell { value, format });
            }
        }
    }

    /// Write a block of rows starting at `origin`
    ///
    /// The whole block is checked against the grid before any cell changes.
    /// Rows may differ in length; the returned range covers the longest row.
    pub fn write_rows(
        &mut self,
        origin: CellAddress,
        rows: Vec<Vec<CellValue>>,
        format: Option<CellFormat>,
    ) -> Result<CellRange> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let range = CellRange::from_origin(origin, height, width)?;

        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                let addr = CellAddress::new(origin.row + r as u32, origin.col + c as u16);
                self.set_cell(addr, value, format.clone());
            }
        }
        Ok(range)
    }

    pub fn get(&self, addr: CellAddress) -> Option<&Cell> {
        self.cells.get(&addr)
    }

    /// Value at an address, [`CellValue::Empty`] when unset
    pub fn value(&self, addr: CellAddress) -> CellValue {
        self.cells
            .get(&addr)
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (&CellAddress, &Cell)> {
        self.cells.iter()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Smallest range containing every set cell
    pub fn used_range(&self) -> Option<CellRange> {
        let first = self.cells.keys().next()?;
        let (mut top, mut left, mut bottom, mut right) = (first.row, first.col, first.row, first.col);
        for addr in self.cells.keys() {
            top = top.min(addr.row);
            left = left.min(addr.col);
            bottom = bottom.max(addr.row);
            right = right.max(addr.col);
        }
        Some(CellRange::new(
            CellAddress::new(top, left),
            CellAddress::new(bottom, right),
        ))
    }

    pub fn add_chart(&mut self, chart: Chart) -> usize {
        self.charts.push(chart);
        self.charts.len() - 1
    }

    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }
}

/// A workbook: an ordered list of uniquely named worksheets
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    title: String,
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create a workbook with one sheet whose A1 holds the title in bold
    pub fn new(title: &str) -> Self {
        let mut sheet = Worksheet::new(FIRST_SHEET_NAME);
        if !title.trim().is_empty() {
            sheet.set_cell(
                CellAddress::new(0, 0),
                CellValue::string(title),
                Some(CellFormat::bold()),
            );
        }
        Self {
            title: title.to_string(),
            worksheets: vec![sheet],
        }
    }

    /// Create a workbook without any sheets
    pub fn empty(title: &str) -> Self {
        Self {
            title: title.to_string(),
            worksheets: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.worksheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Add a worksheet at the end, or at a 0-based position; returns its index
    pub fn add_worksheet(&mut self, name: &str, position: Option<usize>) -> Result<usize> {
        let index = position.unwrap_or(self.worksheets.len());
        if index > self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.validate_sheet_name(name)?;
        self.worksheets.insert(index, Worksheet::new(name));
        Ok(index)
    }

    /// Append an already-populated worksheet (template import)
    pub fn push_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name())?;
        self.worksheets.push(worksheet);
        Ok(self.worksheets.len() - 1)
    }

    fn position_of(&self, name: &str) -> Result<usize> {
        self.worksheets
            .iter()
            .position(|s| s.name == name)
            .or_else(|| {
                self.worksheets
                    .iter()
                    .position(|s| s.name.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    /// Look up a sheet by name (exact match first, then case-insensitive)
    pub fn worksheet_by_name(&self, name: &str) -> Result<&Worksheet> {
        let idx = self.position_of(name)?;
        Ok(&self.worksheets[idx])
    }

    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Result<&mut Worksheet> {
        let idx = self.position_of(name)?;
        Ok(&mut self.worksheets[idx])
    }

    /// Sheet names follow Excel's rules: 1 to 31 characters, none of
    /// `: \ / ? * [ ]`, and unique ignoring case.
    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {MAX_SHEET_NAME_LEN} characters)"
            )));
        }
        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{c}'"
            )));
        }
        if name.starts_with('\'') || name.ends_with('\'') {
            return Err(Error::InvalidSheetName(
                "Sheet name cannot begin or end with an apostrophe".into(),
            ));
        }

        let lower = name.to_lowercase();
        if self.worksheets.iter().any(|ws| ws.name.to_lowercase() == lower) {
            return Err(Error::DuplicateSheetName(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_workbook_writes_title() {
        let wb = Workbook::new("Sales");
        let sheet = wb.worksheet_by_name("Sheet1").unwrap();
        let a1 = sheet.get(CellAddress::new(0, 0)).unwrap();
        assert_eq!(a1.value, CellValue::string("Sales"));
        assert_eq!(a1.format, Some(CellFormat::bold()));
    }

    #[test]
    fn test_sheet_name_rules() {
        let mut wb = Workbook::new("x");
        assert_eq!(wb.add_worksheet("Data", None).unwrap(), 1);
        assert_eq!(wb.add_worksheet("Front", Some(0)).unwrap(), 0);
        assert_eq!(wb.sheet_names(), vec!["Front", "Sheet1", "Data"]);

        assert!(matches!(
            wb.add_worksheet("data", None),
            Err(Error::DuplicateSheetName(_))
        ));
        assert!(matches!(
            wb.add_worksheet("a/b", None),
            Err(Error::InvalidSheetName(_))
        ));
        assert!(matches!(
            wb.add_worksheet(&"n".repeat(32), None),
            Err(Error::InvalidSheetName(_))
        ));
        assert!(matches!(
            wb.add_worksheet("Late", Some(10)),
            Err(Error::SheetOutOfBounds(10, 3))
        ));
        assert!(wb.worksheet_by_name("DATA").is_ok());
        assert!(matches!(wb.worksheet_by_name("Nope"), Err(Error::SheetNotFound(_))));
    }

    #[test]
    fn test_write_rows_checks_bounds_first() {
        let mut sheet = Worksheet::new("S");
        let origin = CellAddress::parse("XFC1").unwrap();
        let rows = vec![vec![CellValue::Number(1.0), CellValue::Number(2.0), CellValue::Number(3.0)]];
        assert!(sheet.write_rows(origin, rows, None).is_err());
        assert_eq!(sheet.cell_count(), 0);

        let rows = vec![
            vec![CellValue::string("a"), CellValue::string("b")],
            vec![CellValue::Number(1.0)],
        ];
        let range = sheet
            .write_rows(CellAddress::parse("B2").unwrap(), rows, Some(CellFormat::bold()))
            .unwrap();
        assert_eq!(range.to_a1_string(), "B2:C3");
        assert_eq!(sheet.cell_count(), 3);
        assert_eq!(sheet.used_range().unwrap().to_a1_string(), "B2:C3");
    }

    #[test]
    fn test_set_cell_keeps_format_unless_replaced() {
        let mut sheet = Worksheet::new("S");
        let addr = CellAddress::new(0, 0);
        sheet.set_cell(addr, CellValue::Number(1.0), Some(CellFormat::bold()));
        sheet.set_cell(addr, CellValue::Number(2.0), None);
        assert_eq!(sheet.get(addr).unwrap().format, Some(CellFormat::bold()));
        sheet.set_cell(addr, CellValue::Empty, None);
        assert!(sheet.get(addr).is_none());
    }
}
