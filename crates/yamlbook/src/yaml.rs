//! YAML text in and out of [`Node`] trees
//!
//! Loading goes through `serde_yaml`, which does not surface comments, so
//! parsed trees are comment-free. Emission writes every comment a tree
//! carries: block comments on their own lines before the node, inline
//! comments at the end of the node's line and end comments after its
//! children.

use std::io::Read;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::Result;
use crate::node::{Node, NodeKind};

const INDENT: usize = 2;

/// Parse every document in a YAML stream
pub fn parse_documents(text: &str) -> Result<Vec<Node>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document)?;
        documents.push(value_to_node(&value));
    }
    Ok(documents)
}

/// Parse every document read from `reader`
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Vec<Node>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_documents(&text)
}

/// Convert a YAML value; every scalar keeps its plain text form
pub fn value_to_node(value: &Value) -> Node {
    match value {
        Value::Null => Node::scalar("null"),
        Value::Bool(b) => Node::scalar(b.to_string()),
        Value::Number(n) => Node::scalar(n.to_string()),
        Value::String(s) => Node::scalar(s.as_str()),
        Value::Sequence(items) => Node::sequence(items.iter().map(value_to_node).collect()),
        Value::Mapping(map) => Node::mapping(
            map.iter()
                .map(|(k, v)| (value_to_node(k), value_to_node(v)))
                .collect(),
        ),
        Value::Tagged(tagged) => value_to_node(&tagged.value),
    }
}

/// Emit documents separated by `---` lines
pub fn emit_documents(documents: &[Node]) -> String {
    let mut out = String::new();
    for document in documents {
        out.push_str("---\n");
        out.push_str(&emit_document(document));
    }
    out
}

/// Emit one document without a separator line
pub fn emit_document(document: &Node) -> String {
    let mut emitter = Emitter::default();
    emitter.comments(&document.block_comments, 0);
    match &document.kind {
        NodeKind::Scalar(value) => {
            emitter.out.push_str(&scalar_text(value));
            emitter.inline(&document.inline_comments);
            emitter.out.push('\n');
        }
        _ if is_empty_collection(document) => {
            emitter.out.push_str(empty_collection(document));
            emitter.inline(&document.inline_comments);
            emitter.out.push('\n');
        }
        _ => {
            emitter.comments(&document.inline_comments, 0);
            emitter.children(document, 0);
        }
    }
    emitter.comments(&document.end_comments, 0);
    emitter.out
}

#[derive(Default)]
struct Emitter {
    out: String,
}

impl Emitter {
    fn pad(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat(' ').take(indent));
    }

    fn comments(&mut self, comments: &[String], indent: usize) {
        for comment in comments {
            self.pad(indent);
            push_comment(&mut self.out, comment);
            self.out.push('\n');
        }
    }

    fn inline(&mut self, comments: &[String]) {
        for comment in comments {
            self.out.push(' ');
            push_comment(&mut self.out, comment);
        }
    }

    /// Children of a mapping or sequence, each line at `indent`
    fn children(&mut self, node: &Node, indent: usize) {
        match &node.kind {
            NodeKind::Scalar(_) => {}
            NodeKind::Mapping(pairs) => {
                for (key, value) in pairs {
                    self.pair(key, value, indent);
                }
            }
            NodeKind::Sequence(items) => {
                for item in items {
                    self.item(item, indent);
                }
            }
        }
    }

    fn pair(&mut self, key: &Node, value: &Node, indent: usize) {
        self.comments(&key.block_comments, indent);
        let key_text = match &key.kind {
            NodeKind::Scalar(text) => Some(key_text(text)),
            _ => None,
        };
        match key_text {
            Some(text) => {
                if value.is_scalar() {
                    self.comments(&value.block_comments, indent);
                }
                self.pad(indent);
                self.out.push_str(&text);
                self.out.push(':');
                self.inline(&key.inline_comments);
            }
            None => {
                self.pad(indent);
                self.out.push('?');
                self.inline(&key.inline_comments);
                self.out.push('\n');
                self.value_body(key, indent);
                self.pad(indent);
                self.out.push(':');
            }
        }
        self.value(value, indent);
        self.comments(&key.end_comments, indent);
    }

    fn item(&mut self, item: &Node, indent: usize) {
        if item.is_scalar() || is_empty_collection(item) {
            self.comments(&item.block_comments, indent);
        }
        self.pad(indent);
        self.out.push('-');
        self.value(item, indent);
    }

    /// Write a value after a `key:` or `-` already on the line
    fn value(&mut self, value: &Node, indent: usize) {
        match &value.kind {
            NodeKind::Scalar(text) => {
                self.out.push(' ');
                self.out.push_str(&scalar_text(text));
                self.inline(&value.inline_comments);
                self.out.push('\n');
                self.comments(&value.end_comments, indent);
            }
            _ if is_empty_collection(value) => {
                self.out.push(' ');
                self.out.push_str(empty_collection(value));
                self.inline(&value.inline_comments);
                self.out.push('\n');
                self.comments(&value.end_comments, indent);
            }
            _ => {
                self.inline(&value.inline_comments);
                self.out.push('\n');
                self.value_body(value, indent);
            }
        }
    }

    /// A collection on the lines below its parent, one level deeper
    fn value_body(&mut self, value: &Node, indent: usize) {
        let inner = indent + INDENT;
        match &value.kind {
            NodeKind::Scalar(text) => {
                self.comments(&value.block_comments, inner);
                self.pad(inner);
                self.out.push_str(&scalar_text(text));
                self.inline(&value.inline_comments);
                self.out.push('\n');
            }
            _ => {
                self.comments(&value.block_comments, inner);
                self.children(value, inner);
            }
        }
        self.comments(&value.end_comments, inner);
    }
}

fn push_comment(out: &mut String, comment: &str) {
    let text = comment.trim();
    out.push('#');
    if !text.is_empty() {
        out.push(' ');
        out.push_str(text);
    }
}

fn is_empty_collection(node: &Node) -> bool {
    match &node.kind {
        NodeKind::Scalar(_) => false,
        NodeKind::Mapping(pairs) => pairs.is_empty(),
        NodeKind::Sequence(items) => items.is_empty(),
    }
}

fn empty_collection(node: &Node) -> &'static str {
    match node.kind {
        NodeKind::Sequence(_) => "[]",
        _ => "{}",
    }
}

/// Plain text if the loader would read it back unchanged, else a quoted string
fn scalar_text(value: &str) -> String {
    let plain = format!("k: {}", value);
    let reads_back = serde_yaml::from_str::<Value>(&plain)
        .ok()
        .and_then(|doc| doc.get("k").map(value_to_node))
        .is_some_and(|node| node.as_scalar() == Some(value));
    if reads_back && !value.contains('\n') {
        value.to_string()
    } else {
        quoted(value)
    }
}

fn key_text(key: &str) -> String {
    let plain = format!("{}: x", key);
    let reads_back = serde_yaml::from_str::<Value>(&plain)
        .ok()
        .and_then(|doc| match doc {
            Value::Mapping(map) if map.len() == 1 => map.keys().next().map(value_to_node),
            _ => None,
        })
        .is_some_and(|node| node.as_scalar() == Some(key));
    if reads_back && !key.contains('\n') && !key.starts_with('?') {
        key.to_string()
    } else {
        quoted(key)
    }
}

fn quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}
