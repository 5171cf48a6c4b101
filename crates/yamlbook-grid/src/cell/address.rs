//! Cell address and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address such as `A1` or `$B$2`
///
/// Rows and columns are 0-based internally; the A1 form is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based, A=0)
    pub col: u16,
    /// Whether the row reference is absolute (`$`)
    pub row_absolute: bool,
    /// Whether the column reference is absolute (`$`)
    pub col_absolute: bool,
}

impl CellAddress {
    /// Create a relative cell address
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// Create an absolute cell address (`$A$1` style)
    pub fn absolute(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: true,
            col_absolute: true,
        }
    }

    /// Parse a cell address from A1 notation
    ///
    /// ```
    /// use yamlbook_grid::CellAddress;
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert_eq!((addr.row, addr.col), (1, 1));
    /// assert!(addr.row_absolute && addr.col_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let (col_absolute, rest) = match s.strip_prefix('$') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let letters_end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if letters_end == 0 {
            return Err(Error::InvalidAddress(format!("no column letters in '{}'", s)));
        }
        let col = Self::letters_to_column(&rest[..letters_end])?;

        let rest = &rest[letters_end..];
        let (row_absolute, digits) = match rest.strip_prefix('$') {
            Some(digits) => (true, digits),
            None => (false, rest),
        };
        if digits.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }

        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }
        let row = row - 1;
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }

        Ok(Self {
            row,
            col,
            row_absolute,
            col_absolute,
        })
    }

    /// Convert a column index to letters (0 = A, 26 = AA)
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::new();
        let mut n = col as u32 + 1;
        while n > 0 {
            n -= 1;
            letters.push((b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        letters.iter().rev().collect()
    }

    /// Convert column letters to an index (A = 0, AA = 26)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if col > MAX_COLS as u32 {
                return Err(Error::ColumnOutOfBounds(MAX_COLS, MAX_COLS - 1));
            }
        }

        Ok((col - 1) as u16)
    }

    /// Format as an A1 string
    pub fn to_a1_string(&self) -> String {
        format!(
            "{}{}{}{}",
            if self.col_absolute { "$" } else { "" },
            Self::column_to_letters(self.col),
            if self.row_absolute { "$" } else { "" },
            self.row + 1
        )
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

/// A rectangular range of cells such as `A1:B10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    /// Top-left corner
    pub start: CellAddress,
    /// Bottom-right corner
    pub end: CellAddress,
}

impl CellRange {
    /// Create a range, normalizing the corners so `start` is top-left
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        let mut top_left = start;
        let mut bottom_right = end;
        top_left.row = start.row.min(end.row);
        top_left.col = start.col.min(end.col);
        bottom_right.row = start.row.max(end.row);
        bottom_right.col = start.col.max(end.col);
        Self {
            start: top_left,
            end: bottom_right,
        }
    }

    /// Create a range from row/column indices
    pub fn from_indices(start_row: u32, start_col: u16, end_row: u32, end_col: u16) -> Self {
        Self::new(
            CellAddress::new(start_row, start_col),
            CellAddress::new(end_row, end_col),
        )
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse `A1:B10` or a single `C3`
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once(':') {
            Some((start, end)) => Ok(Self::new(
                CellAddress::parse(start)?,
                CellAddress::parse(end)?,
            )),
            None => CellAddress::parse(s)
                .map(Self::single)
                .map_err(|_| Error::InvalidRange(s.to_string())),
        }
    }

    /// Whether a cell lies inside this range
    pub fn contains(&self, row: u32, col: u16) -> bool {
        (self.start.row..=self.end.row).contains(&row)
            && (self.start.col..=self.end.col).contains(&col)
    }

    /// Number of rows covered
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns covered
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Iterate over `(row, col)` pairs, row by row
    pub fn cells(&self) -> impl Iterator<Item = (u32, u16)> + '_ {
        (self.start.row..=self.end.row)
            .flat_map(move |row| (self.start.col..=self.end.col).map(move |col| (row, col)))
    }

    /// Format as an A1 range string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A range qualified by its sheet, as written in formulas and defined names:
/// `'Sheet1Hidden'!$A$1:$A$12`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetRange {
    /// Sheet name, unquoted
    pub sheet: String,
    /// The range on that sheet
    pub range: CellRange,
}

impl SheetRange {
    /// Create a sheet-qualified range
    pub fn new<S: Into<String>>(sheet: S, range: CellRange) -> Self {
        Self {
            sheet: sheet.into(),
            range,
        }
    }

    /// Parse `Sheet!A1:B2` or `'My Sheet'!$A$1:$A$4`; `''` inside quotes is a literal quote
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix('=').unwrap_or(s);
        let invalid = || Error::InvalidReference(s.to_string());

        let (sheet, rest) = if let Some(quoted) = s.strip_prefix('\'') {
            let mut sheet = String::new();
            let mut chars = quoted.char_indices().peekable();
            let mut close = None;
            while let Some((i, c)) = chars.next() {
                if c == '\'' {
                    if let Some((_, '\'')) = chars.peek() {
                        sheet.push('\'');
                        chars.next();
                    } else {
                        close = Some(i);
                        break;
                    }
                } else {
                    sheet.push(c);
                }
            }
            let close = close.ok_or_else(invalid)?;
            let rest = quoted[close + 1..].strip_prefix('!').ok_or_else(invalid)?;
            (sheet, rest)
        } else {
            let (sheet, rest) = s.split_once('!').ok_or_else(invalid)?;
            (sheet.to_string(), rest)
        };

        if sheet.is_empty() {
            return Err(invalid());
        }
        let range = CellRange::parse(rest).map_err(|_| invalid())?;
        Ok(Self { sheet, range })
    }

    /// Format as an absolute reference with a quoted sheet name
    pub fn to_reference(&self) -> String {
        let start = CellAddress::absolute(self.range.start.row, self.range.start.col);
        let end = CellAddress::absolute(self.range.end.row, self.range.end.col);
        format!(
            "'{}'!{}:{}",
            self.sheet.replace('\'', "''"),
            start,
            end
        )
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_reference())
    }
}

impl FromStr for SheetRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
