//! Literal markers shared by the writer and the reader
//!
//! Both directions must agree on every marker; a workbook written with one
//! syntax can only be read back with the same one.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Marker literals used in the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookSyntax {
    /// Row-leading token separating documents (`---`)
    pub frontmatter: String,
    /// Prefix of comment cells (`#`)
    pub comment_mark: String,
    /// Prefix added to values that would otherwise read as markers (`\`)
    pub escape_mark: String,
    /// Cell content marking a sequence item (`-`)
    pub item_mark: String,
    /// Columns per indentation level in cell-offset mode
    pub cells_per_level: u16,
    /// Reserved prefix of the cell comment holding the true values of a labeled enum
    pub enum_values_prefix: String,
}

impl Default for WorkbookSyntax {
    fn default() -> Self {
        Self {
            frontmatter: "---".into(),
            comment_mark: "#".into(),
            escape_mark: "\\".into(),
            item_mark: "-".into(),
            cells_per_level: 1,
            enum_values_prefix: "ENUM_VALUES:".into(),
        }
    }
}

impl WorkbookSyntax {
    /// Create the default syntax
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document separator
    pub fn with_frontmatter(mut self, frontmatter: impl Into<String>) -> Self {
        self.frontmatter = frontmatter.into();
        self
    }

    /// Set the comment mark
    pub fn with_comment_mark(mut self, mark: impl Into<String>) -> Self {
        self.comment_mark = mark.into();
        self
    }

    /// Set the escape mark
    pub fn with_escape_mark(mut self, mark: impl Into<String>) -> Self {
        self.escape_mark = mark.into();
        self
    }

    /// Set the sequence item mark
    pub fn with_item_mark(mut self, mark: impl Into<String>) -> Self {
        self.item_mark = mark.into();
        self
    }

    /// Set how many columns one indentation level occupies
    pub fn with_cells_per_level(mut self, cells: u16) -> Self {
        self.cells_per_level = cells;
        self
    }

    /// Set the reserved enum comment prefix
    pub fn with_enum_values_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.enum_values_prefix = prefix.into();
        self
    }

    /// Check that the markers can be told apart
    pub fn validate(&self) -> Result<()> {
        let markers = [
            ("frontmatter", &self.frontmatter),
            ("comment mark", &self.comment_mark),
            ("escape mark", &self.escape_mark),
            ("item mark", &self.item_mark),
            ("enum values prefix", &self.enum_values_prefix),
        ];
        if let Some((name, _)) = markers.iter().find(|(_, m)| m.is_empty()) {
            return Err(Error::configuration(format!("{} must not be empty", name)));
        }
        if self.cells_per_level == 0 {
            return Err(Error::configuration("cells per level must be at least 1"));
        }
        if self.escape_mark.starts_with(self.comment_mark.as_str())
            || self.comment_mark.starts_with(self.escape_mark.as_str())
        {
            return Err(Error::configuration(
                "comment mark and escape mark must not be prefixes of each other",
            ));
        }
        if self.item_mark == self.frontmatter {
            return Err(Error::configuration(
                "item mark and frontmatter must differ",
            ));
        }
        Ok(())
    }

    /// Whether a cell text is a comment; escaped comment marks are not
    pub fn is_comment(&self, text: &str) -> bool {
        let escaped = text
            .strip_prefix(self.escape_mark.as_str())
            .is_some_and(|rest| rest.starts_with(self.comment_mark.as_str()));
        text.starts_with(self.comment_mark.as_str()) && !escaped
    }

    /// Whether a cell text is the sequence item mark
    pub fn is_item_mark(&self, text: &str) -> bool {
        text == self.item_mark
    }

    /// Whether a cell text is the document separator
    pub fn is_frontmatter(&self, text: &str) -> bool {
        text == self.frontmatter
    }

    /// Render comment text as a comment cell: `# text`
    pub fn comment_cell(&self, text: &str) -> String {
        format!("{} {}", self.comment_mark, text.trim())
    }

    /// Extract the comment text from a comment cell
    pub fn comment_text<'a>(&self, cell: &'a str) -> &'a str {
        cell.strip_prefix(self.comment_mark.as_str())
            .unwrap_or(cell)
            .trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let syntax = WorkbookSyntax::default();
        assert_eq!(syntax.frontmatter, "---");
        assert_eq!(syntax.comment_mark, "#");
        assert_eq!(syntax.escape_mark, "\\");
        assert_eq!(syntax.item_mark, "-");
        assert_eq!(syntax.cells_per_level, 1);
        assert_eq!(syntax.enum_values_prefix, "ENUM_VALUES:");
        assert!(syntax.validate().is_ok());
    }

    #[test]
    fn test_comment_detection() {
        let syntax = WorkbookSyntax::default();
        assert!(syntax.is_comment("# note"));
        assert!(syntax.is_comment("#"));
        assert!(!syntax.is_comment("\\# not a note"));
        assert!(!syntax.is_comment("value # trailing"));
        assert_eq!(syntax.comment_cell("  Age in Years "), "# Age in Years");
        assert_eq!(syntax.comment_text("#   Age in Years "), "Age in Years");
    }

    #[test]
    fn test_validate_rejects_clashing_markers() {
        assert!(WorkbookSyntax::new().with_item_mark("").validate().is_err());
        assert!(WorkbookSyntax::new().with_cells_per_level(0).validate().is_err());
        assert!(WorkbookSyntax::new().with_escape_mark("#").validate().is_err());
        assert!(WorkbookSyntax::new().with_item_mark("---").validate().is_err());
        assert!(WorkbookSyntax::new()
            .with_comment_mark("//")
            .with_cells_per_level(2)
            .validate()
            .is_ok());
    }
}
