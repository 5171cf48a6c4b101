//! # yamlbook-csv
//!
//! CSV preview of yamlbook worksheets. Only cell values are exported;
//! comments, dropdowns and hidden sheets have no CSV form.

mod error;
mod options;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvWriteOptions, LineTerminator};
pub use writer::CsvWriter;
