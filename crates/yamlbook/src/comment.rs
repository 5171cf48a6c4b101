//! Comment placement policy
//!
//! Every comment in a tree falls into one of seven categories by its
//! structural position. The policy maps each category to what the writer
//! does with it. Mapping, Sequence, Key and Value comments are
//! *replaceable*: their text may stand in for the displayed content, with
//! the original content moved to a cell comment. The other three are only
//! shown or dropped.

use serde::{Deserialize, Serialize};

/// Structural position of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentCategory {
    /// Before a document's frontmatter
    Document,
    /// Before a mapping
    Mapping,
    /// Before a sequence
    Sequence,
    /// Beside a key
    Key,
    /// Beside a scalar value
    Value,
    /// Before a key/value pair as a whole
    KeyValuePair,
    /// Before or beside a sequence item
    Item,
}

impl CommentCategory {
    /// All categories
    pub const ALL: [CommentCategory; 7] = [
        CommentCategory::Document,
        CommentCategory::Mapping,
        CommentCategory::Sequence,
        CommentCategory::Key,
        CommentCategory::Value,
        CommentCategory::KeyValuePair,
        CommentCategory::Item,
    ];

    /// Whether comment text may replace the displayed content
    pub fn is_replaceable(self) -> bool {
        matches!(
            self,
            CommentCategory::Mapping
                | CommentCategory::Sequence
                | CommentCategory::Key
                | CommentCategory::Value
        )
    }
}

/// Option for a replaceable category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentDisplay {
    /// Comment text is displayed; the original goes to a cell comment
    DisplayName,
    /// Comment is dropped
    Hidden,
    /// Comment is written as its own comment cell or row
    #[default]
    Comment,
}

/// Option for a non-replaceable category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentVisibility {
    /// Comment is dropped
    Hidden,
    /// Comment is written as its own comment cell or row
    #[default]
    Comment,
}

/// What the writer does with a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Show the comment text in place of the content; keep the content in a cell comment
    Replace,
    /// Drop the comment
    Drop,
    /// Write the comment as a marker-prefixed cell or row
    Emit,
}

impl From<CommentDisplay> for Placement {
    fn from(option: CommentDisplay) -> Self {
        match option {
            CommentDisplay::DisplayName => Placement::Replace,
            CommentDisplay::Hidden => Placement::Drop,
            CommentDisplay::Comment => Placement::Emit,
        }
    }
}

impl From<CommentVisibility> for Placement {
    fn from(option: CommentVisibility) -> Self {
        match option {
            CommentVisibility::Hidden => Placement::Drop,
            CommentVisibility::Comment => Placement::Emit,
        }
    }
}

/// One option per comment category.
///
/// The field types make an invalid combination unrepresentable: only
/// replaceable categories can be set to [`CommentDisplay::DisplayName`].
/// [`Default`] emits every comment, which is what lossless round trips need;
/// [`CommentPolicy::display`] is the reader-friendly preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentPolicy {
    pub document: CommentVisibility,
    pub mapping: CommentDisplay,
    pub sequence: CommentDisplay,
    pub key: CommentDisplay,
    pub value: CommentDisplay,
    pub key_value_pair: CommentVisibility,
    pub item: CommentVisibility,
}

impl CommentPolicy {
    /// Every comment written as a comment cell or row
    pub fn emit_all() -> Self {
        Self::default()
    }

    /// Display preset: replaceable comments become display names, the rest are hidden
    pub fn display() -> Self {
        Self {
            document: CommentVisibility::Hidden,
            mapping: CommentDisplay::DisplayName,
            sequence: CommentDisplay::DisplayName,
            key: CommentDisplay::DisplayName,
            value: CommentDisplay::DisplayName,
            key_value_pair: CommentVisibility::Hidden,
            item: CommentVisibility::Hidden,
        }
    }

    pub fn with_document(mut self, option: CommentVisibility) -> Self {
        self.document = option;
        self
    }

    pub fn with_mapping(mut self, option: CommentDisplay) -> Self {
        self.mapping = option;
        self
    }

    pub fn with_sequence(mut self, option: CommentDisplay) -> Self {
        self.sequence = option;
        self
    }

    pub fn with_key(mut self, option: CommentDisplay) -> Self {
        self.key = option;
        self
    }

    pub fn with_value(mut self, option: CommentDisplay) -> Self {
        self.value = option;
        self
    }

    pub fn with_key_value_pair(mut self, option: CommentVisibility) -> Self {
        self.key_value_pair = option;
        self
    }

    pub fn with_item(mut self, option: CommentVisibility) -> Self {
        self.item = option;
        self
    }

    /// Placement for a category
    pub fn placement(&self, category: CommentCategory) -> Placement {
        match category {
            CommentCategory::Document => self.document.into(),
            CommentCategory::Mapping => self.mapping.into(),
            CommentCategory::Sequence => self.sequence.into(),
            CommentCategory::Key => self.key.into(),
            CommentCategory::Value => self.value.into(),
            CommentCategory::KeyValuePair => self.key_value_pair.into(),
            CommentCategory::Item => self.item.into(),
        }
    }

    /// Placement for a category given the comments actually present;
    /// `None` when there is nothing to place
    pub fn place(&self, category: CommentCategory, comments: &[String]) -> Option<Placement> {
        if comments.is_empty() {
            None
        } else {
            Some(self.placement(category))
        }
    }
}

/// Text shown in place of content: the first comment, trimmed, if non-empty
pub fn display_name(comments: &[String]) -> Option<&str> {
    comments
        .first()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
}
