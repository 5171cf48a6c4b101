//! List data validation
//!
//! A list validation restricts a cell to a fixed set of options and shows
//! them as a dropdown. The options are either spelled out inline or read
//! from a range, usually through a defined name.
//!
//! ```rust
//! use yamlbook_grid::{CellRange, DataValidation, ListSource};
//!
//! let validation = DataValidation::explicit_list(["Active", "Inactive"])
//!     .with_range(CellRange::from_indices(3, 1, 3, 1));
//!
//! assert!(validation.applies_to(3, 1));
//! assert_eq!(validation.source, ListSource::Explicit(vec!["Active".into(), "Inactive".into()]));
//! ```

use crate::cell::CellRange;

/// Where a list validation takes its options from
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListSource {
    /// Options listed inline
    Explicit(Vec<String>),
    /// A formula naming the option range: a defined name or a sheet-qualified reference
    Formula(String),
}

/// A list validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataValidation {
    /// Option source
    pub source: ListSource,
    /// Cell ranges this validation applies to
    pub ranges: Vec<CellRange>,
    /// Allow blank cells
    pub allow_blank: bool,
    /// Show the in-cell dropdown arrow
    pub show_dropdown: bool,
    /// Error alert title
    pub error_title: Option<String>,
    /// Error alert message
    pub error_message: Option<String>,
}

impl DataValidation {
    fn with_source(source: ListSource) -> Self {
        Self {
            source,
            ranges: Vec::new(),
            allow_blank: true,
            show_dropdown: true,
            error_title: None,
            error_message: None,
        }
    }

    /// Validation against an inline option list
    pub fn explicit_list<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_source(ListSource::Explicit(
            options.into_iter().map(Into::into).collect(),
        ))
    }

    /// Validation against a formula list (`Enum_0_1_2` or `'Lists'!$A$1:$A$9`)
    pub fn formula_list(formula: impl Into<String>) -> Self {
        Self::with_source(ListSource::Formula(formula.into()))
    }

    /// Add a range this validation applies to
    pub fn with_range(mut self, range: CellRange) -> Self {
        self.ranges.push(range);
        self
    }

    /// Set whether blank cells are allowed
    pub fn with_allow_blank(mut self, allow: bool) -> Self {
        self.allow_blank = allow;
        self
    }

    /// Set whether the dropdown arrow is shown
    pub fn with_dropdown(mut self, show: bool) -> Self {
        self.show_dropdown = show;
        self
    }

    /// Set the error alert shown for values outside the list
    pub fn with_error_message(mut self, title: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_title = Some(title.into());
        self.error_message = Some(message.into());
        self
    }

    /// Check if this validation covers a cell
    pub fn applies_to(&self, row: u32, col: u16) -> bool {
        self.ranges.iter().any(|r| r.contains(row, col))
    }

    /// The inline options, if this is an explicit list
    pub fn explicit_options(&self) -> Option<&[String]> {
        match &self.source {
            ListSource::Explicit(options) => Some(options),
            ListSource::Formula(_) => None,
        }
    }

    /// The formula, if this is a formula list
    pub fn formula(&self) -> Option<&str> {
        match &self.source {
            ListSource::Formula(formula) => Some(formula),
            ListSource::Explicit(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_list() {
        let v = DataValidation::explicit_list(vec!["a", "b"])
            .with_range(CellRange::parse("B2:B4").unwrap())
            .with_allow_blank(false)
            .with_error_message("Invalid value", "Pick from the list");
        assert_eq!(v.explicit_options(), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(v.formula(), None);
        assert!(v.applies_to(2, 1));
        assert!(!v.applies_to(4, 1));
        assert!(!v.allow_blank);
        assert_eq!(v.error_title.as_deref(), Some("Invalid value"));
    }

    #[test]
    fn test_formula_list() {
        let v = DataValidation::formula_list("Enum_0_1_1").with_dropdown(false);
        assert_eq!(v.formula(), Some("Enum_0_1_1"));
        assert!(v.explicit_options().is_none());
        assert!(!v.show_dropdown);
        assert!(!v.applies_to(0, 0));
    }
}
