//! JSON Schema lookup and skeleton generation for data-collection workbooks
//!
//! Paths use a small subset of JSONPath: `$` is the root, `.name` steps
//! into an object property and `[*]` into array items. Local `$ref`s are
//! followed and `allOf` branches are merged into their parent unless the
//! navigator is told to skip them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dropdown::OverflowPolicy;
use crate::error::{Error, Result};
use crate::node::Node;

/// Nesting limit for `$ref` chains and skeleton generation
const MAX_DEPTH: usize = 32;

/// Settings for schema-driven workbooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataCollectConfig {
    /// Spill option lists over 255 characters into a hidden sheet instead of truncating
    pub use_hidden_sheets_for_long_enums: bool,
    /// Ignore `allOf` branches when resolving schema fragments
    pub skip_all_of: bool,
}

impl DataCollectConfig {
    pub fn with_hidden_sheets_for_long_enums(mut self, enabled: bool) -> Self {
        self.use_hidden_sheets_for_long_enums = enabled;
        self
    }

    pub fn with_skip_all_of(mut self, skip: bool) -> Self {
        self.skip_all_of = skip;
        self
    }

    /// Overflow handling implied by these settings
    pub fn overflow_policy(&self) -> OverflowPolicy {
        if self.use_hidden_sheets_for_long_enums {
            OverflowPolicy::HiddenSheet
        } else {
            OverflowPolicy::Truncate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Property(String),
    Items,
}

fn parse_path(path: &str) -> Option<Vec<Step>> {
    let mut rest = path.trim().strip_prefix('$')?;
    let mut steps = Vec::new();
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("[*]") {
            steps.push(Step::Items);
            rest = after;
        } else if let Some(after) = rest.strip_prefix('.') {
            let end = after.find(['.', '[']).unwrap_or(after.len());
            if end == 0 {
                return None;
            }
            steps.push(Step::Property(after[..end].to_string()));
            rest = &after[end..];
        } else {
            return None;
        }
    }
    Some(steps)
}

/// Resolves paths against a parsed JSON Schema
#[derive(Debug, Clone)]
pub struct SchemaNavigator {
    root: Value,
    skip_all_of: bool,
}

impl SchemaNavigator {
    /// Parse schema text
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map(Self::from_value)
            .map_err(Error::MalformedSchema)
    }

    pub fn from_value(root: Value) -> Self {
        Self {
            root,
            skip_all_of: false,
        }
    }

    pub fn with_skip_all_of(mut self, skip: bool) -> Self {
        self.skip_all_of = skip;
        self
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Schema fragment at a path, with references resolved
    pub fn find(&self, path: &str) -> Option<Value> {
        let mut current = self.resolve(&self.root, 0)?;
        for step in parse_path(path)? {
            let next = match step {
                Step::Property(name) => current.get("properties")?.get(&name)?,
                Step::Items => match current.get("items")? {
                    Value::Array(tuple) => tuple.first()?,
                    items => items,
                },
            };
            current = self.resolve(next, 0)?;
        }
        Some(current)
    }

    /// Follow `$ref` and fold `allOf` into one fragment
    fn resolve(&self, schema: &Value, depth: usize) -> Option<Value> {
        if depth > MAX_DEPTH {
            return None;
        }
        let target = match schema.get("$ref").and_then(Value::as_str) {
            Some(reference) => self.resolve(self.pointer(reference)?, depth + 1)?,
            None => schema.clone(),
        };
        let has_all_of = !self.skip_all_of && target.get("allOf").is_some_and(Value::is_array);
        if !has_all_of {
            return Some(target);
        }
        let Value::Object(mut merged) = target else {
            return None;
        };
        let branches = match merged.remove("allOf") {
            Some(Value::Array(branches)) => branches,
            _ => Vec::new(),
        };
        for branch in &branches {
            if let Some(Value::Object(branch)) = self.resolve(branch, depth + 1) {
                merge_into(&mut merged, branch);
            }
        }
        Some(Value::Object(merged))
    }

    /// Look up a local reference such as `#/definitions/address`
    fn pointer(&self, reference: &str) -> Option<&Value> {
        let pointer = reference.strip_prefix('#')?;
        if pointer.is_empty() {
            return Some(&self.root);
        }
        self.root.pointer(pointer)
    }

    /// Placeholder document for the schema: `default`, then `const`, objects
    /// as their properties, arrays as one template item, other leaves null
    pub fn skeleton(&self) -> Value {
        self.skeleton_of(&self.root, 0)
    }

    fn skeleton_of(&self, schema: &Value, depth: usize) -> Value {
        if depth > MAX_DEPTH {
            return Value::Null;
        }
        let Some(schema) = self.resolve(schema, 0) else {
            return Value::Null;
        };
        if let Some(value) = schema.get("default").or_else(|| schema.get("const")) {
            return value.clone();
        }
        match schema_type(&schema) {
            Some("object") => {
                let properties = schema
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| {
                        props
                            .iter()
                            .map(|(name, prop)| (name.clone(), self.skeleton_of(prop, depth + 1)))
                            .collect()
                    })
                    .unwrap_or_default();
                Value::Object(properties)
            }
            Some("array") => {
                let item = match schema.get("items") {
                    Some(Value::Array(tuple)) => tuple.first(),
                    other => other,
                };
                Value::Array(
                    item.map(|item| self.skeleton_of(item, depth + 1))
                        .into_iter()
                        .collect(),
                )
            }
            _ => Value::Null,
        }
    }
}

/// Fold an `allOf` branch into its parent; the parent's own keys win
fn merge_into(merged: &mut Map<String, Value>, branch: Map<String, Value>) {
    for (key, value) in branch {
        match merged.get_mut(&key) {
            None => {
                merged.insert(key, value);
            }
            Some(Value::Object(own)) if key == "properties" => {
                if let Value::Object(extra) = value {
                    for (name, prop) in extra {
                        own.entry(name).or_insert(prop);
                    }
                }
            }
            Some(Value::Array(own)) if key == "required" => {
                if let Value::Array(extra) = value {
                    for name in extra {
                        if !own.contains(&name) {
                            own.push(name);
                        }
                    }
                }
            }
            Some(_) => {}
        }
    }
}

/// Declared type, or the one implied by `properties` or `items`
fn schema_type(schema: &Value) -> Option<&str> {
    match schema.get("type") {
        Some(Value::String(kind)) => Some(kind.as_str()),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .find(|kind| *kind != "null"),
        _ if schema.get("properties").is_some() => Some("object"),
        _ if schema.get("items").is_some() => Some("array"),
        _ => None,
    }
}

/// Convert JSON to a comment-free tree; null becomes the scalar `null`
pub fn json_to_node(value: &Value) -> Node {
    match value {
        Value::Null => Node::scalar("null"),
        Value::Bool(b) => Node::scalar(b.to_string()),
        Value::Number(n) => Node::scalar(n.to_string()),
        Value::String(s) => Node::scalar(s.as_str()),
        Value::Array(items) => Node::sequence(items.iter().map(json_to_node).collect()),
        Value::Object(map) => Node::mapping(
            map.iter()
                .map(|(k, v)| (Node::scalar(k.as_str()), json_to_node(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn person_schema() -> Value {
        json!({
            "type": "object",
            "definitions": {
                "address": {
                    "type": "object",
                    "properties": {
                        "city": {"type": "string", "title": "City"}
                    }
                }
            },
            "properties": {
                "name": {"type": "string", "title": "Full Name"},
                "status": {
                    "type": "string",
                    "enum": ["active", "inactive"],
                    "enumNames": ["Active", "Inactive"],
                    "default": "active"
                },
                "home": {"$ref": "#/definitions/address"},
                "tags": {"type": "array", "items": {"type": "string", "enum": ["a", "b"]}},
                "extra": {
                    "allOf": [
                        {"properties": {"x": {"type": "integer"}}},
                        {"properties": {"y": {"const": 3}}}
                    ]
                }
            }
        })
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(parse_path("$"), Some(vec![]));
        assert_eq!(
            parse_path("$.a[*].b"),
            Some(vec![
                Step::Property("a".into()),
                Step::Items,
                Step::Property("b".into())
            ])
        );
        assert_eq!(parse_path("a.b"), None);
        assert_eq!(parse_path("$..a"), None);
    }

    #[test]
    fn test_find() {
        let nav = SchemaNavigator::from_value(person_schema());
        assert_eq!(nav.find("$.name").unwrap()["title"], "Full Name");
        assert_eq!(nav.find("$.home.city").unwrap()["title"], "City");
        assert_eq!(nav.find("$.tags[*]").unwrap()["enum"], json!(["a", "b"]));
        assert_eq!(nav.find("$.extra.y").unwrap()["const"], 3);
        assert!(nav.find("$.missing").is_none());
        assert!(nav.find("$.name.deeper").is_none());
    }

    #[test]
    fn test_skip_all_of() {
        let nav = SchemaNavigator::from_value(person_schema()).with_skip_all_of(true);
        assert!(nav.find("$.extra.x").is_none());
        assert!(nav.find("$.home.city").is_some());
    }

    #[test]
    fn test_skeleton() {
        let nav = SchemaNavigator::from_value(person_schema());
        assert_eq!(
            nav.skeleton(),
            json!({
                "name": null,
                "status": "active",
                "home": {"city": null},
                "tags": [null],
                "extra": {"x": null, "y": 3}
            })
        );
    }

    #[test]
    fn test_self_reference_terminates() {
        let nav = SchemaNavigator::from_value(json!({
            "type": "object",
            "properties": {"child": {"$ref": "#"}}
        }));
        let skeleton = nav.skeleton();
        assert!(skeleton.get("child").is_some());
    }

    #[test]
    fn test_malformed_schema() {
        assert!(matches!(
            SchemaNavigator::parse("{not json"),
            Err(Error::MalformedSchema(_))
        ));
    }

    #[test]
    fn test_json_to_node() {
        let node = json_to_node(&json!({"a": [1, true, null]}));
        let items = node.get("a").and_then(Node::as_sequence).unwrap();
        let texts: Vec<_> = items.iter().filter_map(Node::as_scalar).collect();
        assert_eq!(texts, vec!["1", "true", "null"]);
    }
}
