//! Sheet naming and document-to-sheet assignment

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use tracing::debug;
use yamlbook_grid::{Error as GridError, Workbook};

use crate::error::{GridContext, Result};
use crate::node::Node;

/// Names the visible sheet at a logical position, and its hidden companion.
///
/// Any `Fn(usize) -> String` closure is a strategy:
///
/// ```rust
/// use yamlbook::SheetNameStrategy;
///
/// let names = |i: usize| format!("Doc{}", i + 1);
/// assert_eq!(names.sheet_name(1), "Doc2");
/// assert_eq!(names.hidden_sheet_name(1), "Doc2Hidden");
/// ```
pub trait SheetNameStrategy: Send + Sync {
    /// Name of the visible sheet at a logical position
    fn sheet_name(&self, index: usize) -> String;

    /// Name of the hidden option sheet paired with a visible sheet
    fn hidden_sheet_name(&self, index: usize) -> String {
        format!("{}Hidden", self.sheet_name(index))
    }
}

impl<F> SheetNameStrategy for F
where
    F: Fn(usize) -> String + Send + Sync,
{
    fn sheet_name(&self, index: usize) -> String {
        self(index)
    }
}

/// `Sheet1`, `Sheet2`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSheetNames;

impl SheetNameStrategy for DefaultSheetNames {
    fn sheet_name(&self, index: usize) -> String {
        format!("Sheet{}", index + 1)
    }
}

/// Picks the logical sheet for a document, given its position among all documents
pub trait NodeToSheetMapper: Send + Sync {
    fn sheet_for(&self, document: &Node, index: usize) -> usize;
}

impl<F> NodeToSheetMapper for F
where
    F: Fn(&Node, usize) -> usize + Send + Sync,
{
    fn sheet_for(&self, document: &Node, index: usize) -> usize {
        self(document, index)
    }
}

/// Every document goes to the first sheet
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSheet;

impl NodeToSheetMapper for FirstSheet {
    fn sheet_for(&self, _document: &Node, _index: usize) -> usize {
        0
    }
}

/// Option sheet paired with one visible sheet
#[derive(Debug, Clone)]
pub(crate) struct HiddenSheet {
    pub name: String,
    /// First free row in column A
    pub next_row: u32,
}

/// Sheets created during one write call.
///
/// Sheets are tracked by name, since inserting a hidden sheet shifts the
/// physical index of every sheet after it.
pub(crate) struct SheetRegistry<'a> {
    names: &'a dyn SheetNameStrategy,
    visible: Vec<String>,
    hidden: HashMap<usize, HiddenSheet>,
}

impl<'a> SheetRegistry<'a> {
    pub fn new(names: &'a dyn SheetNameStrategy) -> Self {
        Self {
            names,
            visible: Vec::new(),
            hidden: HashMap::new(),
        }
    }

    /// Physical index of the visible sheet at `logical`, creating it and any
    /// sheets before it
    pub fn visible_sheet(&mut self, workbook: &mut Workbook, logical: usize) -> Result<usize> {
        while self.visible.len() <= logical {
            let name = self.names.sheet_name(self.visible.len());
            workbook
                .add_worksheet_with_name(&name)
                .grid_context(|| format!("creating sheet '{}'", name))?;
            debug!(sheet = %name, "created visible sheet");
            self.visible.push(name);
        }
        Self::physical(workbook, &self.visible[logical])
    }

    /// The hidden option sheet for `logical`, inserted right after its visible
    /// sheet on first use
    pub fn hidden_sheet(
        &mut self,
        workbook: &mut Workbook,
        logical: usize,
    ) -> Result<&mut HiddenSheet> {
        let visible = self.visible_sheet(workbook, logical)?;
        match self.hidden.entry(logical) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let name = self.names.hidden_sheet_name(logical);
                workbook
                    .insert_worksheet(visible + 1, &name)
                    .and_then(|()| workbook.set_sheet_hidden(visible + 1, true))
                    .grid_context(|| format!("creating hidden sheet '{}'", name))?;
                debug!(sheet = %name, after = visible, "created hidden option sheet");
                Ok(entry.insert(HiddenSheet { name, next_row: 0 }))
            }
        }
    }

    fn physical(workbook: &Workbook, name: &str) -> Result<usize> {
        workbook
            .sheet_index(name)
            .ok_or_else(|| GridError::SheetNotFound(name.to_string()))
            .grid_context(|| "locating a written sheet")
    }
}

impl fmt::Debug for SheetRegistry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetRegistry")
            .field("visible", &self.visible)
            .field("hidden", &self.hidden)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        assert_eq!(DefaultSheetNames.sheet_name(0), "Sheet1");
        assert_eq!(DefaultSheetNames.hidden_sheet_name(2), "Sheet3Hidden");
    }

    #[test]
    fn test_closure_strategies() {
        let names = |i: usize| format!("Part{}", i);
        assert_eq!(names.sheet_name(0), "Part0");

        let by_kind = |node: &Node, _: usize| usize::from(node.is_scalar());
        assert_eq!(by_kind.sheet_for(&Node::scalar("x"), 0), 1);
        assert_eq!(FirstSheet.sheet_for(&Node::scalar("x"), 7), 0);
    }

    #[test]
    fn test_registry_creates_intervening_sheets() {
        let mut workbook = Workbook::empty();
        let mut registry = SheetRegistry::new(&DefaultSheetNames);
        assert_eq!(registry.visible_sheet(&mut workbook, 2).unwrap(), 2);
        assert_eq!(workbook.sheet_count(), 3);
        assert_eq!(registry.visible_sheet(&mut workbook, 0).unwrap(), 0);
        assert_eq!(workbook.sheet_count(), 3);
    }

    #[test]
    fn test_hidden_sheet_follows_its_visible_sheet() {
        let mut workbook = Workbook::empty();
        let mut registry = SheetRegistry::new(&DefaultSheetNames);
        registry.visible_sheet(&mut workbook, 1).unwrap();

        let hidden = registry.hidden_sheet(&mut workbook, 0).unwrap();
        assert_eq!(hidden.name, "Sheet1Hidden");
        hidden.next_row = 5;

        let names: Vec<_> = workbook.worksheets().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["Sheet1", "Sheet1Hidden", "Sheet2"]);
        assert_eq!(workbook.is_sheet_hidden(1), Some(true));
        assert_eq!(registry.visible_sheet(&mut workbook, 1).unwrap(), 2);
        assert_eq!(registry.hidden_sheet(&mut workbook, 0).unwrap().next_row, 5);
        assert_eq!(workbook.sheet_count(), 3);
    }
}
