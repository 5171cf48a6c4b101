//! Cell addressing and values

mod address;
mod value;

pub use address::{CellAddress, CellRange, SheetRange};
pub use value::CellValue;
