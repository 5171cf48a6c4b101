//! Cell value types

use std::fmt;

/// The typed value held by a cell
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value", rename_all = "lowercase"))]
pub enum CellValue {
    /// Empty cell
    #[default]
    Empty,

    /// Boolean value
    Boolean(bool),

    /// Numeric value
    Number(f64),

    /// String value
    String(String),
}

impl CellValue {
    /// Create a string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Get the numeric value, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the boolean value, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the string value, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The text a user would see in the cell.
    ///
    /// Integral numbers print without a fractional part; empty strings and
    /// empty cells both yield `None`.
    pub fn display_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::String(s) if s.is_empty() => None,
            CellValue::String(s) => Some(s.clone()),
            CellValue::Boolean(b) => Some(b.to_string()),
            CellValue::Number(n) => Some(format_number(*n)),
        }
    }

    /// Name of the value type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::String(_) => "string",
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text() {
        assert_eq!(CellValue::Empty.display_text(), None);
        assert_eq!(CellValue::string("").display_text(), None);
        assert_eq!(CellValue::string("x").display_text().as_deref(), Some("x"));
        assert_eq!(CellValue::Number(30.0).display_text().as_deref(), Some("30"));
        assert_eq!(CellValue::Number(-2.5).display_text().as_deref(), Some("-2.5"));
        assert_eq!(CellValue::Boolean(true).display_text().as_deref(), Some("true"));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Boolean(false).to_string(), "FALSE");
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(CellValue::from("a"), CellValue::string("a"));
        assert_eq!(CellValue::from(2i64).as_number(), Some(2.0));
        assert_eq!(CellValue::from(true).as_bool(), Some(true));
        assert_eq!(CellValue::from(String::from("b")).as_str(), Some("b"));
        assert_eq!(CellValue::Number(1.0).type_name(), "number");
    }
}
