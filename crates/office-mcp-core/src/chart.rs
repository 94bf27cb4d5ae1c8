//! Chart types

use std::fmt;
use std::str::FromStr;

use crate::cell::{CellAddress, CellRange};
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// Columns a chart spans when anchored at a cell
pub const DEFAULT_CHART_COLS: u16 = 8;

/// Rows a chart spans when anchored at a cell
pub const DEFAULT_CHART_ROWS: u32 = 15;

/// Chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartType {
    /// Horizontal bars
    Bar,
    /// Vertical bars
    Column,
    Line,
    Pie,
}

impl ChartType {
    pub fn name(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Column => "column",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartType::Bar),
            "column" | "col" => Ok(ChartType::Column),
            "line" => Ok(ChartType::Line),
            "pie" => Ok(ChartType::Pie),
            _ => Err(Error::UnknownVariant {
                what: "chart type",
                value: s.to_string(),
                expected: "bar, column, line, pie",
            }),
        }
    }
}

/// Chart anchor position (cell corners, 0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartAnchor {
    /// Start column
    pub from_col: u16,
    /// Start row
    pub from_row: u32,
    /// End column
    pub to_col: u16,
    /// End row
    pub to_row: u32,
}

impl ChartAnchor {
    /// Anchor with the default footprint whose top-left corner is `cell`
    pub fn at(cell: CellAddress) -> Self {
        Self {
            from_col: cell.col,
            from_row: cell.row,
            to_col: cell.col.saturating_add(DEFAULT_CHART_COLS).min(MAX_COLS - 1),
            to_row: cell.row.saturating_add(DEFAULT_CHART_ROWS).min(MAX_ROWS - 1),
        }
    }
}

/// Cells feeding one series of a chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSource {
    /// Header cell naming the series
    pub name: Option<CellAddress>,
    /// Category labels
    pub categories: Option<CellRange>,
    /// Plotted values
    pub values: CellRange,
}

/// Chart definition
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// Chart type
    pub chart_type: ChartType,
    /// Chart title
    pub title: Option<String>,
    /// Source block on the owning sheet
    pub data_range: CellRange,
    /// Position anchor
    pub anchor: ChartAnchor,
}

impl Chart {
    /// Create a chart over `data_range`, anchored at `position`
    pub fn new(chart_type: ChartType, data_range: CellRange, position: CellAddress) -> Self {
        Self {
            chart_type,
            title: None,
            data_range,
            anchor: ChartAnchor::at(position),
        }
    }

    /// Set chart title; empty titles are dropped
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        let title = title.into();
        self.title = if title.trim().is_empty() {
            None
        } else {
            Some(title)
        };
        self
    }

    /// Split the data range into series
    ///
    /// With more than one row the first row names the series. With more than
    /// one column the first column holds the categories and every other column
    /// becomes a series.
    pub fn series(&self) -> Vec<SeriesSource> {
        let range = self.data_range;
        let has_header = range.row_count() > 1;
        let has_categories = range.col_count() > 1;
        let first_data_row = if has_header {
            range.start.row + 1
        } else {
            range.start.row
        };

        let categories = has_categories.then(|| {
            CellRange::new(
                CellAddress::new(first_data_row, range.start.col),
                CellAddress::new(range.end.row, range.start.col),
            )
        });
        let first_value_col = if has_categories {
            range.start.col + 1
        } else {
            range.start.col
        };

        (first_value_col..=range.end.col)
            .map(|col| SeriesSource {
                name: has_header.then(|| CellAddress::new(range.start.row, col)),
                categories,
                values: CellRange::new(
                    CellAddress::new(first_data_row, col),
                    CellAddress::new(range.end.row, col),
                ),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn range(s: &str) -> CellRange {
        CellRange::parse(s).unwrap()
    }

    #[test]
    fn test_series_with_header_and_categories() {
        let chart = Chart::new(ChartType::Column, range("A1:C4"), CellAddress::new(4, 4));
        let series = chart.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, Some(CellAddress::new(0, 1)));
        assert_eq!(series[0].categories, Some(range("A2:A4")));
        assert_eq!(series[0].values, range("B2:B4"));
        assert_eq!(series[1].values, range("C2:C4"));
    }

    #[test]
    fn test_series_single_column() {
        let chart = Chart::new(ChartType::Pie, range("B1:B5"), CellAddress::new(0, 3));
        let series = chart.series();
        assert_eq!(
            series,
            vec![SeriesSource {
                name: Some(CellAddress::new(0, 1)),
                categories: None,
                values: range("B2:B5"),
            }]
        );
    }

    #[test]
    fn test_anchor_clamps_to_grid() {
        let anchor = ChartAnchor::at(CellAddress::new(MAX_ROWS - 2, MAX_COLS - 2));
        assert_eq!(anchor.to_col, MAX_COLS - 1);
        assert_eq!(anchor.to_row, MAX_ROWS - 1);
    }

    #[test]
    fn test_empty_title_dropped() {
        let chart = Chart::new(ChartType::Line, range("A1:B2"), CellAddress::new(0, 0)).with_title("  ");
        assert_eq!(chart.title, None);
    }
}
