//! Comment-annotated document tree
//!
//! ```rust
//! use yamlbook::Node;
//!
//! let tree = Node::mapping(vec![
//!     (Node::scalar("name"), Node::scalar("John")),
//!     (Node::scalar("age"), Node::scalar("30").with_inline_comment("Age in Years")),
//! ]);
//!
//! assert_eq!(tree.get("age").and_then(Node::as_scalar), Some("30"));
//! ```

use std::fmt;

/// The three shapes a node can take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A leaf value, always held as text
    Scalar(String),
    /// Ordered key/value pairs; keys are usually scalars
    Mapping(Vec<(Node, Node)>),
    /// Ordered items
    Sequence(Vec<Node>),
}

/// A tree node with its attached comments.
///
/// Comments are stored as their text without the comment mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Comment lines preceding the node
    pub block_comments: Vec<String>,
    /// Comments on the same line as the node
    pub inline_comments: Vec<String>,
    /// Comment lines after the node's children
    pub end_comments: Vec<String>,
}

impl Node {
    /// Create a node of the given kind without comments
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            block_comments: Vec::new(),
            inline_comments: Vec::new(),
            end_comments: Vec::new(),
        }
    }

    /// Create a scalar
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Scalar(value.into()))
    }

    /// Create a mapping
    pub fn mapping(pairs: Vec<(Node, Node)>) -> Self {
        Self::new(NodeKind::Mapping(pairs))
    }

    /// Create a sequence
    pub fn sequence(items: Vec<Node>) -> Self {
        Self::new(NodeKind::Sequence(items))
    }

    pub fn with_block_comment(mut self, text: impl Into<String>) -> Self {
        self.block_comments.push(text.into());
        self
    }

    pub fn with_inline_comment(mut self, text: impl Into<String>) -> Self {
        self.inline_comments.push(text.into());
        self
    }

    pub fn with_end_comment(mut self, text: impl Into<String>) -> Self {
        self.end_comments.push(text.into());
        self
    }

    /// Scalar text, if this is a scalar
    pub fn as_scalar(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Pairs, if this is a mapping
    pub fn as_mapping(&self) -> Option<&[(Node, Node)]> {
        match &self.kind {
            NodeKind::Mapping(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Items, if this is a sequence
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(_))
    }

    /// Value stored under a scalar key, if this is a mapping
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k.as_scalar() == Some(key))
            .map(|(_, v)| v)
    }

    /// Whether this node or any descendant carries a comment
    pub fn has_comments(&self) -> bool {
        let own = !self.block_comments.is_empty()
            || !self.inline_comments.is_empty()
            || !self.end_comments.is_empty();
        own || match &self.kind {
            NodeKind::Scalar(_) => false,
            NodeKind::Mapping(pairs) => pairs
                .iter()
                .any(|(k, v)| k.has_comments() || v.has_comments()),
            NodeKind::Sequence(items) => items.iter().any(Node::has_comments),
        }
    }

    /// Trim every comment in the tree, for comparisons that ignore comment whitespace
    pub fn normalize_comments(&mut self) {
        for comments in [
            &mut self.block_comments,
            &mut self.inline_comments,
            &mut self.end_comments,
        ] {
            for comment in comments.iter_mut() {
                *comment = comment.trim().to_string();
            }
        }
        match &mut self.kind {
            NodeKind::Scalar(_) => {}
            NodeKind::Mapping(pairs) => {
                for (key, value) in pairs {
                    key.normalize_comments();
                    value.normalize_comments();
                }
            }
            NodeKind::Sequence(items) => items.iter_mut().for_each(Node::normalize_comments),
        }
    }

    /// Copy of the tree with all comments removed
    pub fn without_comments(&self) -> Node {
        let kind = match &self.kind {
            NodeKind::Scalar(value) => NodeKind::Scalar(value.clone()),
            NodeKind::Mapping(pairs) => NodeKind::Mapping(
                pairs
                    .iter()
                    .map(|(k, v)| (k.without_comments(), v.without_comments()))
                    .collect(),
            ),
            NodeKind::Sequence(items) => {
                NodeKind::Sequence(items.iter().map(Node::without_comments).collect())
            }
        };
        Node::new(kind)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::scalar(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::scalar(value)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::yaml::emit_document(self).trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::mapping(vec![
            (
                Node::scalar("person").with_block_comment("  owner "),
                Node::mapping(vec![(Node::scalar("city"), Node::scalar("NYC"))]),
            ),
            (
                Node::scalar("tags"),
                Node::sequence(vec![Node::scalar("a"), Node::scalar("b").with_inline_comment("x ")]),
            ),
        ])
    }

    #[test]
    fn test_accessors() {
        let tree = sample();
        assert!(tree.as_mapping().is_some());
        assert_eq!(
            tree.get("person").and_then(|p| p.get("city")).and_then(Node::as_scalar),
            Some("NYC")
        );
        assert_eq!(tree.get("tags").and_then(Node::as_sequence).map(<[_]>::len), Some(2));
        assert!(tree.get("missing").is_none());
        assert!(Node::scalar("x").get("x").is_none());
    }

    #[test]
    fn test_comment_helpers() {
        let mut tree = sample();
        assert!(tree.has_comments());
        assert!(!tree.without_comments().has_comments());

        tree.normalize_comments();
        let person_key = &tree.as_mapping().unwrap()[0].0;
        assert_eq!(person_key.block_comments, vec!["owner".to_string()]);
    }
}
