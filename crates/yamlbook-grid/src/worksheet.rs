//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellRange, CellValue};
use crate::comment::CellComment;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::validation::DataValidation;
use crate::{MAX_COLS, MAX_ROWS};

/// A single sheet: explicit rows of sparse cells, cell comments and list validations
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Sheet is visible
    visible: bool,
    /// Rows by index
    rows: BTreeMap<u32, Row>,
    /// Cell comments by row, then column
    #[cfg_attr(feature = "serde", serde(default))]
    comments: BTreeMap<u32, BTreeMap<u16, CellComment>>,
    /// Data validations
    #[cfg_attr(feature = "serde", serde(default))]
    data_validations: Vec<DataValidation>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            visible: true,
            rows: BTreeMap::new(),
            comments: BTreeMap::new(),
            data_validations: Vec::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Check if the sheet is visible
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set sheet visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    // === Rows ===

    /// Get or create the row at `index`
    pub fn create_row(&mut self, index: u32) -> Result<&mut Row> {
        check_row(index)?;
        Ok(self.rows.entry(index).or_insert_with(|| Row::new(index)))
    }

    /// Index one past the last created row (0 for an empty sheet)
    pub fn next_row_index(&self) -> u32 {
        self.rows.keys().next_back().map_or(0, |last| last + 1)
    }

    /// The row at `index`, if it was created
    pub fn row(&self, index: u32) -> Option<&Row> {
        self.rows.get(&index)
    }

    /// Indices of created rows, ascending
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }

    /// Created rows, ascending
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    /// Number of created rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    // === Cells ===

    /// Set a cell value by A1 address
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by indices, creating the row if needed.
    /// Setting [`CellValue::Empty`] clears the cell but keeps the row.
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        check_col(col)?;
        self.create_row(row)?.set(col, value.into());
        Ok(())
    }

    /// Get a cell value by indices
    pub fn value_at(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.rows.get(&row).and_then(|r| r.cell(col))
    }

    /// Get a cell value by A1 address
    pub fn value(&self, address: &str) -> Result<Option<&CellValue>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.value_at(addr.row, addr.col))
    }

    /// Range spanning every populated cell, or `None` for a sheet without values
    pub fn used_range(&self) -> Option<CellRange> {
        let mut bounds: Option<(u32, u16, u32, u16)> = None;
        for row in self.rows.values() {
            for (col, _) in row.cells() {
                bounds = Some(match bounds {
                    None => (row.index, col, row.index, col),
                    Some((r0, c0, r1, c1)) => (r0.min(row.index), c0.min(col), r1.max(row.index), c1.max(col)),
                });
            }
        }
        bounds.map(|(r0, c0, r1, c1)| CellRange::from_indices(r0, c0, r1, c1))
    }

    /// Number of populated cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(Row::len).sum()
    }

    /// Check if the sheet has no populated cells
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    // === Comments ===

    /// Attach a comment to a cell, replacing any existing one
    pub fn set_comment_at(&mut self, row: u32, col: u16, comment: CellComment) -> Result<()> {
        check_row(row)?;
        check_col(col)?;
        self.comments.entry(row).or_default().insert(col, comment);
        Ok(())
    }

    /// Get the comment attached to a cell
    pub fn comment_at(&self, row: u32, col: u16) -> Option<&CellComment> {
        self.comments.get(&row).and_then(|cols| cols.get(&col))
    }

    /// Remove the comment attached to a cell
    pub fn remove_comment_at(&mut self, row: u32, col: u16) -> Option<CellComment> {
        let cols = self.comments.get_mut(&row)?;
        let removed = cols.remove(&col);
        if cols.is_empty() {
            self.comments.remove(&row);
        }
        removed
    }

    /// Iterate over all comments with their positions
    pub fn comments(&self) -> impl Iterator<Item = ((u32, u16), &CellComment)> {
        self.comments
            .iter()
            .flat_map(|(row, cols)| cols.iter().map(move |(col, c)| ((*row, *col), c)))
    }

    /// Number of comments on this sheet
    pub fn comment_count(&self) -> usize {
        self.comments.values().map(BTreeMap::len).sum()
    }

    // === Data validation ===

    /// Add a data validation rule
    pub fn add_data_validation(&mut self, validation: DataValidation) {
        self.data_validations.push(validation);
    }

    /// All data validation rules
    pub fn data_validations(&self) -> &[DataValidation] {
        &self.data_validations
    }

    /// The validation covering a cell; later rules win over earlier ones
    pub fn data_validation_at(&self, row: u32, col: u16) -> Option<&DataValidation> {
        self.data_validations
            .iter()
            .rev()
            .find(|v| v.applies_to(row, col))
    }
}

fn check_row(row: u32) -> Result<()> {
    if row >= MAX_ROWS {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
    }
    Ok(())
}

fn check_col(col: u16) -> Result<()> {
    if col >= MAX_COLS {
        return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_explicit() {
        let mut sheet = Worksheet::new("Sheet1");
        assert_eq!(sheet.next_row_index(), 0);

        sheet.create_row(0).unwrap();
        sheet.create_row(1).unwrap();
        sheet.create_row(5).unwrap();
        assert_eq!(sheet.next_row_index(), 6);
        assert_eq!(sheet.row_indices().collect::<Vec<_>>(), vec![0, 1, 5]);
        assert_eq!(sheet.row_count(), 3);
        assert!(sheet.is_empty());
        assert!(sheet.used_range().is_none());
    }

    #[test]
    fn test_cell_values() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_cell_value_at(1, 0, "name").unwrap();
        sheet.set_cell_value_at(1, 1, "John").unwrap();
        sheet.set_cell_value("C5", 3.0).unwrap();

        assert_eq!(sheet.value_at(1, 1), Some(&CellValue::string("John")));
        assert_eq!(sheet.value("C5").unwrap(), Some(&CellValue::Number(3.0)));
        assert_eq!(sheet.cell_count(), 3);
        assert_eq!(sheet.used_range(), Some(CellRange::from_indices(1, 0, 4, 2)));

        sheet.set_cell_value_at(4, 2, CellValue::Empty).unwrap();
        assert_eq!(sheet.value_at(4, 2), None);
        assert!(sheet.row(4).is_some());
    }

    #[test]
    fn test_bounds() {
        let mut sheet = Worksheet::new("Sheet1");
        assert!(sheet.set_cell_value_at(MAX_ROWS, 0, "x").is_err());
        assert!(sheet.set_cell_value_at(0, MAX_COLS, "x").is_err());
        assert!(sheet
            .set_comment_at(MAX_ROWS, 0, CellComment::text_only("x"))
            .is_err());
    }

    #[test]
    fn test_comments() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet
            .set_comment_at(2, 1, CellComment::text_only("30"))
            .unwrap();
        sheet
            .set_comment_at(0, 0, CellComment::text_only("# note"))
            .unwrap();

        assert_eq!(sheet.comment_count(), 2);
        assert_eq!(sheet.comment_at(2, 1).unwrap().text, "30");
        let positions: Vec<_> = sheet.comments().map(|(pos, _)| pos).collect();
        assert_eq!(positions, vec![(0, 0), (2, 1)]);

        assert!(sheet.remove_comment_at(2, 1).is_some());
        assert!(sheet.comment_at(2, 1).is_none());
        assert_eq!(sheet.comment_count(), 1);
    }

    #[test]
    fn test_data_validation_lookup() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.add_data_validation(
            DataValidation::explicit_list(["a", "b"]).with_range(CellRange::from_indices(1, 1, 1, 1)),
        );
        sheet.add_data_validation(
            DataValidation::formula_list("Enum_0_1_1").with_range(CellRange::from_indices(1, 1, 1, 1)),
        );

        assert_eq!(sheet.data_validations().len(), 2);
        assert_eq!(sheet.data_validation_at(1, 1).unwrap().formula(), Some("Enum_0_1_1"));
        assert!(sheet.data_validation_at(0, 0).is_none());
    }
}
