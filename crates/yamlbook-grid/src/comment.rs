//! Comments anchored to a cell
//!
//! The transcoder uses cell comments as a side channel: a cell can show one
//! text while its comment carries the value that should be read back.
//!
//! ```rust
//! use yamlbook_grid::{CellComment, Workbook};
//!
//! let mut workbook = Workbook::empty();
//! workbook.add_worksheet_with_name("Sheet1").unwrap();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value_at(0, 1, "Age in Years").unwrap();
//! sheet.set_comment_at(0, 1, CellComment::text_only("30")).unwrap();
//!
//! assert_eq!(sheet.comment_at(0, 1).map(|c| c.text.as_str()), Some("30"));
//! ```

use std::fmt;

/// A cell comment (note)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellComment {
    /// Author of the comment, empty when unknown
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "String::is_empty"))]
    pub author: String,
    /// Comment text
    pub text: String,
    /// Whether the comment box is shown without hovering
    #[cfg_attr(feature = "serde", serde(default))]
    pub visible: bool,
}

impl CellComment {
    /// Create a comment with an author
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            visible: false,
        }
    }

    /// Create a comment with just text
    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(String::new(), text)
    }

    /// Set whether the comment is visible by default
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Whether the comment carries no text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl fmt::Display for CellComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.author.is_empty() {
            f.write_str(&self.text)
        } else {
            write!(f, "{}: {}", self.author, self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_builders() {
        let comment = CellComment::new("yamlbook", "original key").with_visible(true);
        assert_eq!(comment.author, "yamlbook");
        assert!(comment.visible);
        assert_eq!(comment.to_string(), "yamlbook: original key");

        let comment = CellComment::text_only("30");
        assert_eq!(comment.to_string(), "30");
        assert!(!comment.is_blank());
        assert!(CellComment::text_only("  ").is_blank());
    }
}
