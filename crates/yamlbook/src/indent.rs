//! Indentation strategies
//!
//! Nesting depth is recorded per row in one of two ways:
//!
//! - **Cell offset**: level `N` puts the content in column `N * cells_per_level`.
//!   The reader recovers the level from the first non-empty column.
//! - **Prefix**: level 0 content sits in column 0 with no marker; deeper rows
//!   carry a marker such as `2>` in column 0 and their content in column 1.
//!
//! Marker grammars are pluggable through [`IndentMarker`]. An implementation
//! must satisfy `decode(encode(level)) == Some(level)` for every level, and
//! decode an empty string as level 0.

use std::fmt;
use std::sync::Arc;

use yamlbook_grid::Row;

use crate::error::{Error, Result};
use crate::syntax::WorkbookSyntax;

/// Encodes and decodes the row marker of the prefix strategy
pub trait IndentMarker: fmt::Debug + Send + Sync {
    /// Marker text for a level; empty for level 0
    fn encode(&self, level: usize) -> String;

    /// Level named by a marker, or `None` if the text is not a marker
    fn decode(&self, marker: &str) -> Option<usize>;

    /// Whether the text parses as a marker
    fn is_marker(&self, value: &str) -> bool {
        self.decode(value).is_some()
    }
}

/// A marker grammar built from a pattern with one `{N}` placeholder.
///
/// The default pattern `{N}>` yields `1>`, `2>`, ... and rejects `0>`,
/// `-1>`, bare digits and a bare `>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixPattern {
    before: String,
    after: String,
}

impl PrefixPattern {
    /// Placeholder replaced by the level number
    pub const PLACEHOLDER: &'static str = "{N}";

    /// Parse a pattern such as `{N}>` or `L{N}:`
    pub fn new(pattern: &str) -> Result<Self> {
        let (before, after) = pattern.split_once(Self::PLACEHOLDER).ok_or_else(|| {
            Error::configuration(format!(
                "indent pattern '{}' has no {} placeholder",
                pattern,
                Self::PLACEHOLDER
            ))
        })?;
        if after.contains(Self::PLACEHOLDER) {
            return Err(Error::configuration(format!(
                "indent pattern '{}' has more than one placeholder",
                pattern
            )));
        }
        if before.is_empty() && after.is_empty() {
            return Err(Error::configuration(
                "indent pattern needs literal text around the placeholder",
            ));
        }
        if before.chars().chain(after.chars()).any(|c| c.is_ascii_digit()) {
            return Err(Error::configuration(format!(
                "indent pattern '{}' must not contain digits outside the placeholder",
                pattern
            )));
        }
        Ok(Self {
            before: before.to_string(),
            after: after.to_string(),
        })
    }
}

impl Default for PrefixPattern {
    fn default() -> Self {
        Self {
            before: String::new(),
            after: ">".into(),
        }
    }
}

impl fmt::Display for PrefixPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.before, Self::PLACEHOLDER, self.after)
    }
}

impl IndentMarker for PrefixPattern {
    fn encode(&self, level: usize) -> String {
        if level == 0 {
            return String::new();
        }
        format!("{}{}{}", self.before, level, self.after)
    }

    fn decode(&self, marker: &str) -> Option<usize> {
        if marker.is_empty() {
            return Some(0);
        }
        let digits = marker
            .strip_prefix(self.before.as_str())?
            .strip_suffix(self.after.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<usize>().ok().filter(|level| *level > 0)
    }
}

/// How nesting depth is laid out in a row
#[derive(Debug, Clone, Default)]
pub enum Indentation {
    /// Content column is `level * cells_per_level`
    #[default]
    CellOffset,
    /// Marker in column 0, content in column 1 for levels above 0
    Prefix(Arc<dyn IndentMarker>),
}

impl Indentation {
    /// Prefix strategy with the default `{N}>` markers
    pub fn prefix() -> Self {
        Indentation::Prefix(Arc::new(PrefixPattern::default()))
    }

    /// Prefix strategy with a custom marker grammar
    pub fn prefix_with<M: IndentMarker + 'static>(marker: M) -> Self {
        Indentation::Prefix(Arc::new(marker))
    }

    /// Whether this is a prefix strategy
    pub fn is_prefix(&self) -> bool {
        matches!(self, Indentation::Prefix(_))
    }

    /// Column holding the content of a row at `level`
    pub fn content_column(&self, level: usize, syntax: &WorkbookSyntax) -> u16 {
        match self {
            Indentation::CellOffset => {
                let col = level.saturating_mul(syntax.cells_per_level as usize);
                u16::try_from(col).unwrap_or(u16::MAX)
            }
            Indentation::Prefix(_) if level == 0 => 0,
            Indentation::Prefix(_) => 1,
        }
    }

    /// Marker to put in column 0 of a row at `level`, if the strategy uses one
    pub fn marker(&self, level: usize) -> Option<String> {
        match self {
            Indentation::Prefix(marker) if level > 0 => Some(marker.encode(level)),
            _ => None,
        }
    }

    /// Level a level-0 content value would be mistaken for, if any.
    ///
    /// Only the prefix strategy has this hazard: `2>` written as a plain
    /// top-level value reads back as a level-2 marker.
    pub fn shadowed_level(&self, value: &str) -> Option<usize> {
        match self {
            Indentation::Prefix(marker) => marker.decode(value).filter(|level| *level > 0),
            Indentation::CellOffset => None,
        }
    }

    /// Recover the level of a row. Unparseable markers fall back to level 0.
    pub fn row_level(&self, row: &Row, syntax: &WorkbookSyntax) -> usize {
        match self {
            Indentation::CellOffset => row
                .first_filled()
                .map(|(col, _)| col as usize / syntax.cells_per_level.max(1) as usize)
                .unwrap_or(0),
            Indentation::Prefix(marker) => row
                .text(0)
                .and_then(|text| marker.decode(&text))
                .unwrap_or(0),
        }
    }
}
