//! Rows
//!
//! Rows exist independently of their cells: a row can be created and left
//! empty, which is how blank lines inside a sheet survive a round trip.

use crate::cell::CellValue;
use std::collections::BTreeMap;

/// A row of sparse cells
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    /// Row index (0-based)
    pub index: u32,
    /// Row is hidden
    #[cfg_attr(feature = "serde", serde(default))]
    pub hidden: bool,
    cells: BTreeMap<u16, CellValue>,
}

impl Row {
    /// Create an empty row
    pub fn new(index: u32) -> Self {
        Self {
            index,
            hidden: false,
            cells: BTreeMap::new(),
        }
    }

    /// The value at a column, if any
    pub fn cell(&self, col: u16) -> Option<&CellValue> {
        self.cells.get(&col)
    }

    /// The display text at a column; blank cells yield `None`
    pub fn text(&self, col: u16) -> Option<String> {
        self.cell(col).and_then(CellValue::display_text)
    }

    /// Iterate over populated cells in column order
    pub fn cells(&self) -> impl Iterator<Item = (u16, &CellValue)> {
        self.cells.iter().map(|(col, value)| (*col, value))
    }

    /// The leftmost cell whose display text is non-empty
    pub fn first_filled(&self) -> Option<(u16, String)> {
        self.cells
            .iter()
            .find_map(|(col, value)| value.display_text().map(|text| (*col, text)))
    }

    /// Index of the rightmost populated column
    pub fn last_col(&self) -> Option<u16> {
        self.cells.keys().next_back().copied()
    }

    /// Check if the row has no populated cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of populated cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn set(&mut self, col: u16, value: CellValue) {
        if value.is_empty() {
            self.cells.remove(&col);
        } else {
            self.cells.insert(col, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_cells() {
        let mut row = Row::new(4);
        row.set(2, CellValue::string("city"));
        row.set(0, CellValue::string(""));
        row.set(3, CellValue::Number(7.0));

        assert_eq!(row.len(), 3);
        assert_eq!(row.first_filled(), Some((2, "city".to_string())));
        assert_eq!(row.text(3).as_deref(), Some("7"));
        assert_eq!(row.last_col(), Some(3));

        row.set(3, CellValue::Empty);
        assert_eq!(row.last_col(), Some(2));
        assert_eq!(row.cells().map(|(c, _)| c).collect::<Vec<_>>(), vec![0, 2]);
    }
}
