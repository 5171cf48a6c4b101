//! # yamlbook-grid
//!
//! In-memory spreadsheet model used by the yamlbook transcoder.
//!
//! This crate provides the workbook primitives the encoder and decoder talk to:
//! - [`Workbook`], [`Worksheet`], [`Row`] - sheets, explicit rows and sparse cells
//! - [`CellValue`] - typed cell values (string, number, boolean)
//! - [`CellComment`] - comments anchored to a cell
//! - [`DataValidation`] - list constraints, either explicit or formula based
//! - [`NamedRange`] - defined names resolving to a sheet-qualified range
//! - [`CellAddress`], [`CellRange`] and [`SheetRange`] - addressing
//!
//! ## Example
//!
//! ```rust
//! use yamlbook_grid::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::empty();
//! let index = workbook.add_worksheet_with_name("Sheet1").unwrap();
//! let sheet = workbook.worksheet_mut(index).unwrap();
//!
//! let row = sheet.next_row_index();
//! sheet.set_cell_value_at(row, 0, "name").unwrap();
//! sheet.set_cell_value_at(row, 1, CellValue::Number(42.0)).unwrap();
//!
//! assert_eq!(sheet.value_at(0, 0), Some(&CellValue::string("name")));
//! ```
//!
//! With the `serde` feature enabled every type here is serializable, which is
//! how workbooks are persisted between an encode and a decode.

pub mod cell;
pub mod comment;
pub mod error;
pub mod named_range;
pub mod row;
pub mod validation;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellRange, CellValue, SheetRange};
pub use comment::CellComment;
pub use error::{Error, Result};
pub use named_range::{NameScope, NamedRange, NamedRangeCollection};
pub use row::Row;
pub use validation::{DataValidation, ListSource};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Maximum length of an explicit list validation source, once joined with commas
pub const MAX_EXPLICIT_LIST_LEN: usize = 255;
