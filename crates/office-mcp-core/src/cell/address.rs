//! A1-style cell addresses and ranges

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// A cell address such as `B7`
///
/// Rows and columns are stored 0-based. `$` markers are accepted when parsing
/// and dropped, since nothing here copies references around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u16,
}

impl CellAddress {
    /// Create an address from 0-based indices
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse an address in A1 notation
    ///
    /// # Examples
    /// ```
    /// use office_mcp_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("c12").unwrap();
    /// assert_eq!((addr.row, addr.col), (11, 2));
    ///
    /// assert!(CellAddress::parse("Z9999999").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let body: String = trimmed.chars().filter(|c| *c != '$').collect();
        let split = body
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(body.len());
        let (letters, digits) = body.split_at(split);

        if letters.is_empty() {
            return Err(Error::InvalidAddress(format!("no column letters in '{trimmed}'")));
        }
        if digits.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{trimmed}'")));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!("invalid row number in '{trimmed}'")));
        }

        let col = Self::letters_to_column(letters)?;

        // Anything longer than 10 digits is out of range regardless of value
        let row: u64 = if digits.len() > 10 {
            u64::MAX
        } else {
            digits
                .parse()
                .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{trimmed}'")))?
        };
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{trimmed}'"
            )));
        }
        if row > MAX_ROWS as u64 {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }

        Ok(Self {
            row: (row - 1) as u32,
            col,
        })
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!("invalid column letter '{c}'")));
            }
            col = col * 26 + u64::from(c.to_ascii_uppercase() as u8 - b'A' + 1);
            if col > MAX_COLS as u64 {
                return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
            }
        }

        Ok((col - 1) as u16)
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::new();
        let mut n = u32::from(col) + 1;
        while n > 0 {
            n -= 1;
            letters.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        letters.reverse();
        String::from_utf8(letters).unwrap_or_default()
    }

    /// Address offset by the given number of rows and columns, if it stays on the grid
    pub fn offset(&self, rows: u32, cols: u32) -> Result<Self> {
        let row = u64::from(self.row) + u64::from(rows);
        let col = u64::from(self.col) + u64::from(cols);
        if row >= MAX_ROWS as u64 {
            return Err(Error::RowOutOfBounds(row + 1, MAX_ROWS));
        }
        if col >= MAX_COLS as u64 {
            return Err(Error::ColumnOutOfBounds(col + 1, MAX_COLS));
        }
        Ok(Self::new(row as u32, col as u16))
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }

    /// Format as an absolute reference (`$B$7`), as chart formulas expect
    pub fn to_absolute_string(&self) -> String {
        format!("${}${}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A rectangular block of cells, stored normalized (start is top-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    /// Create a range from two corners in any order
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddress::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Range of `rows` x `cols` cells whose top-left corner is `origin`
    pub fn from_origin(origin: CellAddress, rows: u32, cols: u32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidRange(format!(
                "range at {origin} must span at least one cell"
            )));
        }
        let end = origin.offset(rows - 1, cols - 1)?;
        Ok(Self::new(origin, end))
    }

    /// Parse `A1:C3`, or a single address as a one-cell range
    ///
    /// A leading `Sheet!` qualifier is ignored.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = match s.rfind('!') {
            Some(idx) => &s[idx + 1..],
            None => s,
        };
        match s.split_once(':') {
            Some((a, b)) => {
                let a = CellAddress::parse(a)
                    .map_err(|e| Error::InvalidRange(format!("'{s}': {e}")))?;
                let b = CellAddress::parse(b)
                    .map_err(|e| Error::InvalidRange(format!("'{s}': {e}")))?;
                Ok(Self::new(a, b))
            }
            None => {
                let a = CellAddress::parse(s)
                    .map_err(|e| Error::InvalidRange(format!("'{s}': {e}")))?;
                Ok(Self::new(a, a))
            }
        }
    }

    /// Number of rows covered
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns covered
    pub fn col_count(&self) -> u32 {
        u32::from(self.end.col - self.start.col) + 1
    }

    /// Whether the address lies inside the range
    pub fn contains(&self, addr: CellAddress) -> bool {
        (self.start.row..=self.end.row).contains(&addr.row)
            && (self.start.col..=self.end.col).contains(&addr.col)
    }

    /// Format as `A1:C3`
    pub fn to_a1_string(&self) -> String {
        format!("{}:{}", self.start, self.end)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple() {
        let addr = CellAddress::parse("A1").unwrap();
        assert_eq!(addr, CellAddress::new(0, 0));

        let addr = CellAddress::parse("$AA$10").unwrap();
        assert_eq!(addr, CellAddress::new(9, 26));

        let addr = CellAddress::parse("XFD1048576").unwrap();
        assert_eq!(addr, CellAddress::new(1_048_575, 16_383));
    }

    #[test]
    fn test_parse_rejects_out_of_grid() {
        assert!(matches!(
            CellAddress::parse("Z9999999"),
            Err(Error::RowOutOfBounds(9_999_999, MAX_ROWS))
        ));
        assert!(matches!(
            CellAddress::parse("XFE1"),
            Err(Error::ColumnOutOfBounds(..))
        ));
        assert!(CellAddress::parse("A99999999999999999999").is_err());
        assert!(CellAddress::parse("A0").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("12").is_err());
        assert!(CellAddress::parse("B").is_err());
        assert!(CellAddress::parse("B2x").is_err());
        assert!(CellAddress::parse("B-2").is_err());
    }

    #[test]
    fn test_column_letters_round_trip() {
        for (col, letters) in [(0, "A"), (25, "Z"), (26, "AA"), (701, "ZZ"), (16_383, "XFD")] {
            assert_eq!(CellAddress::column_to_letters(col), letters);
            assert_eq!(CellAddress::letters_to_column(letters).unwrap(), col);
        }
    }

    #[test]
    fn test_range_parse_normalizes() {
        let range = CellRange::parse("C3:A1").unwrap();
        assert_eq!(range.to_a1_string(), "A1:C3");
        assert_eq!((range.row_count(), range.col_count()), (3, 3));

        let range = CellRange::parse("Data!B2").unwrap();
        assert_eq!(range.to_a1_string(), "B2:B2");
    }

    #[test]
    fn test_range_from_origin() {
        let range = CellRange::from_origin(CellAddress::parse("A1").unwrap(), 4, 5).unwrap();
        assert_eq!(range.to_a1_string(), "A1:E4");
        assert!(range.contains(CellAddress::parse("E4").unwrap()));
        assert!(!range.contains(CellAddress::parse("F4").unwrap()));

        let corner = CellAddress::parse("XFD1").unwrap();
        assert!(CellRange::from_origin(corner, 1, 2).is_err());
    }
}
