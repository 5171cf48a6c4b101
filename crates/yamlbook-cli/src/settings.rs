//! JSON settings file (`--config`)
//!
//! ```json
//! {
//!   "syntax": {"comment_mark": "//"},
//!   "comments": {"key": "display_name", "item": "hidden"},
//!   "collect": {"use_hidden_sheets_for_long_enums": true},
//!   "indentation": "prefix",
//!   "prefix_pattern": "L{N}:"
//! }
//! ```
//!
//! Every field is optional.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use yamlbook::{
    CommentPolicy, DataCollectConfig, GridReader, GridWriter, Indentation, OutputMode,
    PrefixPattern, WorkbookSyntax,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndentationSetting {
    #[default]
    CellOffset,
    Prefix,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub syntax: WorkbookSyntax,
    pub comments: CommentPolicy,
    pub collect: DataCollectConfig,
    pub indentation: IndentationSetting,
    pub prefix_pattern: Option<String>,
}

impl Settings {
    /// Load settings, or the defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let file = File::open(path)
            .with_context(|| format!("Failed to open settings '{}'", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid settings in '{}'", path.display()))
    }

    /// Force the prefix strategy, as `--prefix` does
    pub fn with_prefix(mut self, prefix: bool) -> Self {
        if prefix {
            self.indentation = IndentationSetting::Prefix;
        }
        self
    }

    pub fn indentation(&self) -> Result<Indentation> {
        match (self.indentation, self.prefix_pattern.as_deref()) {
            (IndentationSetting::CellOffset, _) => Ok(Indentation::CellOffset),
            (IndentationSetting::Prefix, None) => Ok(Indentation::prefix()),
            (IndentationSetting::Prefix, Some(pattern)) => {
                let marker = PrefixPattern::new(pattern)
                    .with_context(|| format!("Invalid prefix pattern '{}'", pattern))?;
                Ok(Indentation::prefix_with(marker))
            }
        }
    }

    pub fn writer(&self, mode: OutputMode) -> Result<GridWriter> {
        Ok(GridWriter::new()
            .with_mode(mode)
            .with_syntax(self.syntax.clone())
            .with_indentation(self.indentation()?)
            .with_comment_policy(self.comments)
            .with_data_collect(self.collect))
    }

    pub fn reader(&self, mode: OutputMode) -> Result<GridReader> {
        Ok(GridReader::new()
            .with_mode(mode)
            .with_syntax(self.syntax.clone())
            .with_indentation(self.indentation()?))
    }
}
