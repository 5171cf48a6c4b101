//! Workbook type

use crate::cell::{CellValue, SheetRange};
use crate::error::{Error, Result};
use crate::named_range::{NameScope, NamedRange, NamedRangeCollection};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// An ordered collection of worksheets plus workbook-level defined names
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Workbook {
    /// Worksheets in tab order
    worksheets: Vec<Worksheet>,
    /// Defined names
    #[cfg_attr(feature = "serde", serde(default))]
    named_ranges: NamedRangeCollection,
}

impl Workbook {
    /// Create a workbook with a single empty sheet named "Sheet1"
    pub fn new() -> Self {
        Self {
            worksheets: vec![Worksheet::new("Sheet1")],
            named_ranges: NamedRangeCollection::new(),
        }
    }

    /// Create a workbook with no sheets
    pub fn empty() -> Self {
        Self::default()
    }

    // === Sheet management ===

    /// Number of sheets, hidden ones included
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name (case-insensitive)
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheet_index(name).and_then(|i| self.worksheets.get(i))
    }

    /// Get a mutable worksheet by name (case-insensitive)
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        let index = self.sheet_index(name)?;
        self.worksheets.get_mut(index)
    }

    /// Find a sheet index by name (case-insensitive)
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        let lower = name.to_lowercase();
        self.worksheets
            .iter()
            .position(|ws| ws.name().to_lowercase() == lower)
    }

    /// Iterate over all worksheets in tab order
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Iterate over visible worksheets with their physical index
    pub fn visible_worksheets(&self) -> impl Iterator<Item = (usize, &Worksheet)> {
        self.worksheets
            .iter()
            .enumerate()
            .filter(|(_, ws)| ws.is_visible())
    }

    /// Append a worksheet and return its index
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.validate_sheet_name(name, None)?;
        self.worksheets.push(Worksheet::new(name));
        Ok(self.worksheets.len() - 1)
    }

    /// Insert a worksheet at `index`, shifting later sheets right
    pub fn insert_worksheet(&mut self, index: usize, name: &str) -> Result<()> {
        if index > self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.validate_sheet_name(name, None)?;
        self.worksheets.insert(index, Worksheet::new(name));
        Ok(())
    }

    /// Remove a worksheet
    pub fn remove_worksheet(&mut self, index: usize) -> Result<Worksheet> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        Ok(self.worksheets.remove(index))
    }

    /// Rename a worksheet
    pub fn rename_worksheet(&mut self, index: usize, name: &str) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.validate_sheet_name(name, Some(index))?;
        self.worksheets[index].set_name(name);
        Ok(())
    }

    /// Hide or show a worksheet
    pub fn set_sheet_hidden(&mut self, index: usize, hidden: bool) -> Result<()> {
        let count = self.worksheets.len();
        let sheet = self
            .worksheets
            .get_mut(index)
            .ok_or(Error::SheetOutOfBounds(index, count))?;
        sheet.set_visible(!hidden);
        Ok(())
    }

    /// Whether a worksheet is hidden; `None` for an unknown index
    pub fn is_sheet_hidden(&self, index: usize) -> Option<bool> {
        self.worksheets.get(index).map(|ws| !ws.is_visible())
    }

    // === Defined names ===

    /// Define a workbook-scoped name
    pub fn define_name(&mut self, name: &str, refers_to: &str) -> Result<()> {
        self.define_name_with_scope(name, refers_to, NameScope::Workbook)
    }

    /// Define a name with a specific scope
    pub fn define_name_with_scope(
        &mut self,
        name: &str,
        refers_to: &str,
        scope: NameScope,
    ) -> Result<()> {
        self.named_ranges
            .define(NamedRange::new(name, refers_to, scope))
            .map_err(Error::InvalidName)
    }

    /// Look up a name as seen from `current_sheet`
    pub fn named_range(&self, name: &str, current_sheet: usize) -> Option<&NamedRange> {
        self.named_ranges.get(name, current_sheet)
    }

    /// All defined names
    pub fn named_ranges(&self) -> &NamedRangeCollection {
        &self.named_ranges
    }

    /// Resolve a list source to the values it covers, row by row.
    ///
    /// `reference` is either a sheet-qualified range (`'Lists'!$A$1:$A$3`) or
    /// a defined name visible from `current_sheet`. Missing cells resolve to
    /// [`CellValue::Empty`].
    pub fn resolve_range_values(
        &self,
        reference: &str,
        current_sheet: usize,
    ) -> Result<Vec<CellValue>> {
        let reference = reference.trim();
        let reference = reference.strip_prefix('=').unwrap_or(reference);
        let target = match SheetRange::parse(reference) {
            Ok(range) => range,
            Err(_) => {
                let named = self
                    .named_range(reference, current_sheet)
                    .ok_or_else(|| Error::InvalidName(format!("undefined name '{}'", reference)))?;
                SheetRange::parse(named.expression())?
            }
        };

        let sheet = self
            .worksheet_by_name(&target.sheet)
            .ok_or_else(|| Error::SheetNotFound(target.sheet.clone()))?;
        Ok(target
            .range
            .cells()
            .map(|(row, col)| sheet.value_at(row, col).cloned().unwrap_or_default())
            .collect())
    }

    fn validate_sheet_name(&self, name: &str, exclude_index: Option<usize>) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters): {}",
                MAX_SHEET_NAME_LEN, name
            )));
        }

        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }

        match self.sheet_index(name) {
            Some(i) if Some(i) != exclude_index => Err(Error::DuplicateSheetName(name.into())),
            _ => Ok(()),
        }
    }
}
