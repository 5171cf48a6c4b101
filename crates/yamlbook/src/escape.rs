//! Reversible escaping of values that collide with grid markers
//!
//! A value gets exactly one escape mark prepended when it would otherwise
//! be read as structure:
//!
//! - it starts with the comment mark or the escape mark,
//! - it equals the item mark or the frontmatter marker,
//! - it is a top-level value the prefix strategy would read as a marker.
//!
//! Keys are additionally escaped when empty, since an empty key cell would
//! shift the row's apparent indentation. Unescaping strips exactly one
//! leading escape mark, so `unescape(escape(v)) == v` for every `v`.

use std::borrow::Cow;

use crate::indent::Indentation;
use crate::syntax::WorkbookSyntax;

/// Escapes and unescapes cell values for one syntax and indentation strategy
#[derive(Debug, Clone, Copy)]
pub struct ValueCodec<'a> {
    syntax: &'a WorkbookSyntax,
    indentation: &'a Indentation,
}

impl<'a> ValueCodec<'a> {
    pub fn new(syntax: &'a WorkbookSyntax, indentation: &'a Indentation) -> Self {
        Self {
            syntax,
            indentation,
        }
    }

    /// Whether a value written at `level` needs an escape mark
    pub fn needs_escape(&self, value: &str, level: usize) -> bool {
        value.starts_with(self.syntax.comment_mark.as_str())
            || value.starts_with(self.syntax.escape_mark.as_str())
            || self.syntax.is_item_mark(value)
            || self.syntax.is_frontmatter(value)
            || (level == 0 && self.indentation.shadowed_level(value).is_some())
    }

    /// Escape a value written at `level`
    pub fn escape<'v>(&self, value: &'v str, level: usize) -> Cow<'v, str> {
        if self.needs_escape(value, level) {
            Cow::Owned(format!("{}{}", self.syntax.escape_mark, value))
        } else {
            Cow::Borrowed(value)
        }
    }

    /// Escape a key written at `level`; empty keys become a lone escape mark
    pub fn escape_key<'v>(&self, key: &'v str, level: usize) -> Cow<'v, str> {
        if key.is_empty() {
            Cow::Owned(self.syntax.escape_mark.clone())
        } else {
            self.escape(key, level)
        }
    }

    /// Strip one leading escape mark, if present
    pub fn unescape<'v>(&self, value: &'v str) -> &'v str {
        value
            .strip_prefix(self.syntax.escape_mark.as_str())
            .unwrap_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn with_codec<R>(indentation: Indentation, f: impl FnOnce(ValueCodec<'_>) -> R) -> R {
        let syntax = WorkbookSyntax::default();
        f(ValueCodec::new(&syntax, &indentation))
    }

    #[test]
    fn test_comment_lookalike_is_escaped() {
        with_codec(Indentation::CellOffset, |codec| {
            let escaped = codec.escape("# Look like a comment", 0);
            assert_eq!(escaped, "\\# Look like a comment");
            assert_eq!(codec.unescape(&escaped), "# Look like a comment");
        });
    }

    #[test]
    fn test_escape_is_position_sensitive() {
        with_codec(Indentation::CellOffset, |codec| {
            assert_eq!(codec.escape("a # b", 0), "a # b");
            assert_eq!(codec.escape("a\\b", 0), "a\\b");
            assert_eq!(codec.escape("-x", 0), "-x");
            assert_eq!(codec.escape("\\x", 0), "\\\\x");
        });
    }

    #[test]
    fn test_marker_values_are_escaped() {
        with_codec(Indentation::CellOffset, |codec| {
            assert_eq!(codec.escape("-", 2), "\\-");
            assert_eq!(codec.escape("---", 0), "\\---");
            assert_eq!(codec.escape("2>", 0), "2>");
        });
        with_codec(Indentation::prefix(), |codec| {
            assert_eq!(codec.escape("2>", 0), "\\2>");
            assert_eq!(codec.escape("2>", 1), "2>");
            assert_eq!(codec.escape("0>", 0), "0>");
        });
    }

    #[test]
    fn test_empty_key() {
        with_codec(Indentation::CellOffset, |codec| {
            assert_eq!(codec.escape_key("", 0), "\\");
            assert_eq!(codec.unescape(&codec.escape_key("", 0)), "");
            assert_eq!(codec.escape_key("null", 0), "null");
        });
    }

    #[test]
    fn test_repeated_escaping_accumulates() {
        with_codec(Indentation::CellOffset, |codec| {
            let once = codec.escape("#x", 0).into_owned();
            let twice = codec.escape(&once, 0).into_owned();
            assert_eq!(twice, "\\\\#x");
            assert_eq!(codec.unescape(codec.unescape(&twice)), "#x");
        });
    }

    proptest! {
        #[test]
        fn unescape_inverts_escape(value in "\\PC*", level in 0usize..4) {
            for indentation in [Indentation::CellOffset, Indentation::prefix()] {
                with_codec(indentation, |codec| {
                    let escaped = codec.escape(&value, level);
                    prop_assert_eq!(codec.unescape(&escaped), value.as_str());
                    let key = codec.escape_key(&value, level);
                    prop_assert_eq!(codec.unescape(&key), value.as_str());
                    Ok(())
                })?;
            }
        }

        #[test]
        fn escaped_values_never_read_as_comments(value in "[#\\\\a-z ]{0,8}") {
            let syntax = WorkbookSyntax::default();
            let indentation = Indentation::CellOffset;
            let codec = ValueCodec::new(&syntax, &indentation);
            prop_assert!(!syntax.is_comment(&codec.escape(&value, 0)));
        }
    }
}
