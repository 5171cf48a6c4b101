//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::{CsvWriteOptions, LineTerminator};
use yamlbook_grid::{Workbook, Worksheet};

/// CSV preview writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a worksheet to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        worksheet: &Worksheet,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(worksheet, file, options)
    }

    /// Write the sheet at `index` of a workbook
    pub fn write_sheet<W: Write>(
        workbook: &Workbook,
        index: usize,
        writer: W,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let worksheet = workbook.worksheet(index).ok_or(CsvError::SheetNotFound {
            index,
            count: workbook.sheet_count(),
        })?;
        Self::write(worksheet, writer, options)
    }

    /// Write a worksheet to a writer.
    ///
    /// Every row of the covered range becomes a record, so blank rows stay
    /// as empty records and all records have the same width.
    pub fn write<W: Write>(
        worksheet: &Worksheet,
        writer: W,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .flexible(false)
            .from_writer(writer);

        let last_row = worksheet.next_row_index();
        if let Some(range) = worksheet.used_range() {
            let (first_row, first_col) = if options.from_origin {
                (0, 0)
            } else {
                (range.start.row, range.start.col)
            };
            let last_row = last_row.saturating_sub(1).max(range.end.row);
            for row in first_row..=last_row {
                let record: Vec<String> = (first_col..=range.end.col)
                    .map(|col| {
                        worksheet
                            .value_at(row, col)
                            .and_then(|value| value.display_text())
                            .unwrap_or_default()
                    })
                    .collect();
                csv_writer.write_record(&record)?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}
