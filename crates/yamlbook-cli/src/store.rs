//! Workbooks on disk, as JSON

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use yamlbook::Workbook;

pub fn load_workbook(path: &Path) -> Result<Workbook> {
    let file =
        File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("'{}' is not a workbook file", path.display()))
}

pub fn save_workbook(workbook: &Workbook, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, workbook)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        let workbook = yamlbook::to_workbook(["a: 1\n"]).unwrap();

        save_workbook(&workbook, &path).unwrap();
        let loaded = load_workbook(&path).unwrap();
        assert_eq!(loaded.worksheet(0), workbook.worksheet(0));
    }

    #[test]
    fn test_not_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let err = load_workbook(&path).unwrap_err();
        assert!(err.to_string().contains("is not a workbook file"));
    }
}
