//! Output modes

use serde::{Deserialize, Serialize};

/// How a workbook is laid out, and how a reader interprets cell comments.
///
/// A reader must use the mode the workbook was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Direct tree-to-cell mapping; every comment becomes a comment cell or row
    #[default]
    YamlOriented,
    /// Human-readable layout under a [`CommentPolicy`](crate::CommentPolicy);
    /// replaced content is kept in cell comments
    Display,
    /// Schema-driven data-entry form with titles and dropdowns
    DataCollect,
}

impl OutputMode {
    /// Whether cell comments carry recoverable values in this mode
    pub fn is_recoverable(self) -> bool {
        matches!(self, OutputMode::Display | OutputMode::DataCollect)
    }
}
