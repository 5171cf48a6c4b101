//! Defined names
//!
//! A defined name points at a sheet-qualified range. Dropdowns whose option
//! list does not fit inline use one as their validation source:
//!
//! ```text
//! Enum_0_3_2 -> 'Sheet1Hidden'!$A$1:$A$300
//! ```

use std::collections::HashMap;

/// Scope of a defined name
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NameScope {
    /// Visible from every sheet
    Workbook,
    /// Local to one sheet, by physical index
    Sheet(usize),
}

/// A defined name
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedRange {
    /// The name; lookups ignore case
    pub name: String,
    /// Where the name is visible
    pub scope: NameScope,
    /// Reference text, e.g. `'Sheet1Hidden'!$A$1:$A$4`
    pub refers_to: String,
}

impl NamedRange {
    /// Create a defined name
    pub fn new(name: impl Into<String>, refers_to: impl Into<String>, scope: NameScope) -> Self {
        Self {
            name: name.into(),
            scope,
            refers_to: refers_to.into(),
        }
    }

    /// Create a workbook-scoped name
    pub fn workbook_scope(name: impl Into<String>, refers_to: impl Into<String>) -> Self {
        Self::new(name, refers_to, NameScope::Workbook)
    }

    /// The reference without a leading `=`
    pub fn expression(&self) -> &str {
        self.refers_to.strip_prefix('=').unwrap_or(&self.refers_to)
    }

    /// Whether `name` is acceptable as a defined name: a letter, `_` or `\`
    /// followed by letters, digits, `_` or `.`
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_alphabetic() || c == '_' || c == '\\' => {}
            _ => return false,
        }
        chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
    }
}

/// Defined names keyed case-insensitively per scope
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedRangeCollection {
    ranges: HashMap<String, NamedRange>,
}

impl NamedRangeCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    fn make_key(name: &str, scope: &NameScope) -> String {
        let lower = name.to_lowercase();
        match scope {
            NameScope::Workbook => lower,
            NameScope::Sheet(idx) => format!("{}:sheet:{}", lower, idx),
        }
    }

    /// Define a name; fails if it is malformed or already defined in the same scope
    pub fn define(&mut self, range: NamedRange) -> Result<(), String> {
        if !NamedRange::is_valid_name(&range.name) {
            return Err(format!("'{}' is not a valid name", range.name));
        }
        let key = Self::make_key(&range.name, &range.scope);
        if self.ranges.contains_key(&key) {
            return Err(format!(
                "Named range '{}' already exists in this scope",
                range.name
            ));
        }
        self.ranges.insert(key, range);
        Ok(())
    }

    /// Look a name up from a sheet: its sheet-scoped definition wins over the workbook one
    pub fn get(&self, name: &str, current_sheet: usize) -> Option<&NamedRange> {
        self.ranges
            .get(&Self::make_key(name, &NameScope::Sheet(current_sheet)))
            .or_else(|| self.ranges.get(&Self::make_key(name, &NameScope::Workbook)))
    }

    /// Check if a name exists in the given scope
    pub fn contains(&self, name: &str, scope: &NameScope) -> bool {
        self.ranges.contains_key(&Self::make_key(name, scope))
    }

    /// Iterate over all defined names
    pub fn iter(&self) -> impl Iterator<Item = &NamedRange> {
        self.ranges.values()
    }

    /// Number of defined names
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
