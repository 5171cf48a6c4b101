//! Grid to tree
//!
//! Each visible sheet named by the sheet-name strategy is read row by row.
//! A row starting with the frontmatter opens a new document; rows before
//! the first frontmatter form a document of their own when they hold
//! content, otherwise their comments lead the first document. A sheet
//! without any frontmatter is one document.
//!
//! Within a document a row's level comes from the [`Indentation`] strategy
//! and its content is the run of cells from the content column to the last
//! filled one. A run headed by the item mark is a sequence item; a run with
//! a second cell, or with deeper rows below it, is a mapping entry.

use std::sync::Arc;

use tracing::{debug, trace};
use yamlbook_grid::{CellValue, ListSource, Row, Workbook, Worksheet};

use crate::dropdown::{parse_values_comment, recover_value};
use crate::error::Result;
use crate::escape::ValueCodec;
use crate::indent::Indentation;
use crate::mode::OutputMode;
use crate::node::Node;
use crate::sheet::{DefaultSheetNames, SheetNameStrategy};
use crate::syntax::WorkbookSyntax;

/// Converts a workbook back into document trees
#[derive(Clone)]
pub struct GridReader {
    mode: OutputMode,
    syntax: WorkbookSyntax,
    indentation: Indentation,
    sheet_names: Arc<dyn SheetNameStrategy>,
}

impl Default for GridReader {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            syntax: WorkbookSyntax::default(),
            indentation: Indentation::default(),
            sheet_names: Arc::new(DefaultSheetNames),
        }
    }
}

impl std::fmt::Debug for GridReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridReader")
            .field("mode", &self.mode)
            .field("syntax", &self.syntax)
            .field("indentation", &self.indentation)
            .finish_non_exhaustive()
    }
}

impl GridReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode the workbook was written in
    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_syntax(mut self, syntax: WorkbookSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn with_indentation(mut self, indentation: Indentation) -> Self {
        self.indentation = indentation;
        self
    }

    pub fn with_sheet_names<S: SheetNameStrategy + 'static>(mut self, names: S) -> Self {
        self.sheet_names = Arc::new(names);
        self
    }

    pub(crate) fn with_shared_sheet_names(mut self, names: Arc<dyn SheetNameStrategy>) -> Self {
        self.sheet_names = names;
        self
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Read every document, sheet by sheet.
    ///
    /// Visible sheets are matched by position against the sheet-name
    /// strategy; a sheet whose name differs is skipped, as are hidden sheets.
    pub fn from_workbook(&self, workbook: &Workbook) -> Result<Vec<Node>> {
        self.syntax.validate()?;
        let mut documents = Vec::new();
        for (logical, (physical, sheet)) in workbook.visible_worksheets().enumerate() {
            let expected = self.sheet_names.sheet_name(logical);
            if sheet.name() != expected {
                debug!(sheet = %sheet.name(), expected = %expected, "skipping unrecognized sheet");
                continue;
            }
            let view = SheetView {
                reader: self,
                workbook,
                physical,
                sheet,
            };
            let found = view.documents();
            debug!(sheet = %sheet.name(), documents = found.len(), "read sheet");
            documents.extend(found);
        }
        Ok(documents)
    }
}

/// One row reduced to its level and content cells
#[derive(Debug, Clone)]
struct Line {
    level: usize,
    frontmatter: bool,
    /// Cell texts from the content column to the last filled column
    slots: Vec<Option<String>>,
}

impl Line {
    fn slot(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(Option::as_deref)
    }

    fn head(&self) -> Option<&str> {
        self.slot(0)
    }
}

struct SheetView<'r> {
    reader: &'r GridReader,
    workbook: &'r Workbook,
    physical: usize,
    sheet: &'r Worksheet,
}

impl SheetView<'_> {
    fn documents(&self) -> Vec<Node> {
        let lines: Vec<Line> = self.sheet.rows().map(|row| self.line(row)).collect();
        DocumentSplitter {
            parser: Parser {
                syntax: &self.reader.syntax,
                codec: ValueCodec::new(&self.reader.syntax, &self.reader.indentation),
            },
        }
        .split(&lines)
    }

    fn line(&self, row: &Row) -> Line {
        let syntax = &self.reader.syntax;
        let frontmatter = row.text(0).is_some_and(|text| syntax.is_frontmatter(&text));
        let level = if frontmatter {
            0
        } else {
            self.reader.indentation.row_level(row, syntax)
        };
        let start = self.reader.indentation.content_column(level, syntax);
        let slots = match row.last_col() {
            Some(last) if last >= start && !frontmatter => (start..=last)
                .map(|col| self.cell_text(row.index, col))
                .collect(),
            _ => Vec::new(),
        };
        Line {
            level,
            frontmatter,
            slots,
        }
    }

    /// Text a cell stands for. In recoverable modes a cell comment holds the
    /// original text, or the true values behind a labeled dropdown.
    fn cell_text(&self, row: u32, col: u16) -> Option<String> {
        let shown = self
            .sheet
            .value_at(row, col)
            .and_then(CellValue::display_text);
        if !self.reader.mode.is_recoverable() {
            return shown;
        }
        let Some(note) = self.sheet.comment_at(row, col).filter(|c| !c.is_blank()) else {
            return shown;
        };
        // Only a validated cell is a dropdown; elsewhere the note is literal text
        let values = self
            .sheet
            .data_validation_at(row, col)
            .and_then(|_| {
                parse_values_comment(&note.text, &self.reader.syntax.enum_values_prefix)
            });
        match values {
            Some(values) => {
                let selected = shown?;
                let options = self.dropdown_options(row, col);
                Some(recover_value(&selected, &options, &values))
            }
            None => Some(note.text.clone()),
        }
    }

    fn dropdown_options(&self, row: u32, col: u16) -> Vec<String> {
        let Some(validation) = self.sheet.data_validation_at(row, col) else {
            return Vec::new();
        };
        match &validation.source {
            ListSource::Explicit(options) => options.clone(),
            ListSource::Formula(formula) => {
                match self.workbook.resolve_range_values(formula, self.physical) {
                    Ok(values) => values
                        .iter()
                        .map(|value| value.display_text().unwrap_or_default())
                        .collect(),
                    Err(err) => {
                        debug!(%formula, error = %err, "unresolvable dropdown source");
                        Vec::new()
                    }
                }
            }
        }
    }
}

/// Cuts a sheet's lines into documents at frontmatter rows
struct DocumentSplitter<'a> {
    parser: Parser<'a>,
}

impl DocumentSplitter<'_> {
    fn split(&self, lines: &[Line]) -> Vec<Node> {
        let starts: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.frontmatter)
            .map(|(index, _)| index)
            .collect();

        let Some(&first) = starts.first() else {
            if lines.is_empty() {
                return Vec::new();
            }
            return vec![self.parser.document(lines, Vec::new())];
        };

        let mut documents = Vec::new();
        let prelude = &lines[..first];
        let mut carried = if prelude.iter().any(|l| self.parser.is_content(l)) {
            documents.push(self.parser.document(prelude, Vec::new()));
            Vec::new()
        } else {
            self.parser.comments_of(prelude)
        };

        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(lines.len());
            let mut body = &lines[start + 1..end];
            let mut trailing = Vec::new();
            if i + 1 < starts.len() {
                // Level-0 comments right before the next frontmatter lead the next document
                let keep = body
                    .iter()
                    .rposition(|l| !(l.level == 0 && self.parser.is_comment(l)))
                    .map_or(0, |p| p + 1);
                trailing = self.parser.comments_of(&body[keep..]);
                body = &body[..keep];
            }
            documents.push(self.parser.document(body, std::mem::take(&mut carried)));
            carried = trailing;
        }
        documents
    }
}

/// Rebuilds nodes from lines
struct Parser<'a> {
    syntax: &'a WorkbookSyntax,
    codec: ValueCodec<'a>,
}

impl Parser<'_> {
    fn is_comment(&self, line: &Line) -> bool {
        line.head().is_some_and(|head| self.syntax.is_comment(head))
    }

    fn is_content(&self, line: &Line) -> bool {
        line.head().is_some() && !self.is_comment(line)
    }

    fn comment(&self, cell: &str) -> String {
        self.syntax.comment_text(cell).to_string()
    }

    fn comments_of(&self, lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .filter(|line| self.is_comment(line))
            .filter_map(|line| line.head().map(|head| self.comment(head)))
            .collect()
    }

    /// Comment cells starting at `from`; returns them with the first non-comment slot
    fn inline_comments(&self, line: &Line, from: usize) -> (Vec<String>, usize) {
        let mut comments = Vec::new();
        let mut slot = from;
        while let Some(text) = line.slot(slot).filter(|t| self.syntax.is_comment(t)) {
            comments.push(self.comment(text));
            slot += 1;
        }
        (comments, slot)
    }

    fn document(&self, lines: &[Line], leading: Vec<String>) -> Node {
        let mut node = self.region(lines, 0);
        if !leading.is_empty() {
            let mut comments = leading;
            comments.append(&mut node.block_comments);
            node.block_comments = comments;
        }
        node
    }

    /// Index of the first line after `from` at `level` or shallower
    fn nested_end(lines: &[Line], from: usize, level: usize) -> usize {
        lines[from..]
            .iter()
            .position(|line| line.level <= level)
            .map_or(lines.len(), |p| from + p)
    }

    /// Parse lines that hold one node, expected at `level` or deeper.
    ///
    /// A region without content still yields a node: an empty scalar holding
    /// the region's comments. Every frontmatter row therefore produces exactly
    /// one document, so N documents read back as N documents even when some
    /// of them are blank or comment-only.
    fn region(&self, lines: &[Line], level: usize) -> Node {
        let Some(first) = lines.iter().position(|l| self.is_content(l)) else {
            let mut node = Node::scalar("");
            node.block_comments = self.comments_of(lines);
            return node;
        };
        let line = &lines[first];
        let level = line.level.max(level);
        let head = line.head().unwrap_or_default();

        if self.syntax.is_item_mark(head) {
            trace!(level, "sequence");
            return self.sequence(lines, level);
        }
        let deeper_below = lines.get(first + 1).is_some_and(|next| next.level > level);
        let has_sibling = lines[first + 1..]
            .iter()
            .any(|l| l.level == level && self.is_content(l));
        if line.slots.len() > 1 || deeper_below || has_sibling {
            trace!(level, "mapping");
            return self.mapping(lines, level);
        }

        trace!(level, "scalar");
        let mut node = Node::scalar(self.codec.unescape(head));
        node.block_comments = self.comments_of(&lines[..first]);
        node.end_comments = self.comments_of(&lines[first + 1..]);
        node
    }

    fn mapping(&self, lines: &[Line], level: usize) -> Node {
        let mut pairs = Vec::new();
        let mut pending = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            if self.is_comment(line) {
                pending.extend(line.head().map(|head| self.comment(head)));
                i += 1;
                continue;
            }
            let head = match line.head() {
                Some(head) if line.level == level && !self.syntax.is_item_mark(head) => head,
                _ => {
                    i += 1;
                    continue;
                }
            };

            let mut key = Node::scalar(self.codec.unescape(head));
            key.block_comments = std::mem::take(&mut pending);
            let (key_comments, value_slot) = self.inline_comments(line, 1);
            key.inline_comments = key_comments;

            let end = Self::nested_end(lines, i + 1, level);
            let value = if value_slot < line.slots.len() {
                let text = line.slot(value_slot).unwrap_or_default();
                let mut value = Node::scalar(self.codec.unescape(text));
                value.inline_comments = self.inline_comments(line, value_slot + 1).0;
                value
            } else if end > i + 1 {
                self.region(&lines[i + 1..end], level + 1)
            } else {
                Node::scalar("")
            };
            pairs.push((key, value));
            i = end;
        }
        let mut node = Node::mapping(pairs);
        node.end_comments = pending;
        node
    }

    fn sequence(&self, lines: &[Line], level: usize) -> Node {
        let mut items = Vec::new();
        let mut pending = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            if self.is_comment(line) {
                pending.extend(line.head().map(|head| self.comment(head)));
                i += 1;
                continue;
            }
            let is_item = line.level == level
                && line.head().is_some_and(|h| self.syntax.is_item_mark(h));
            if !is_item {
                i += 1;
                continue;
            }

            let end = Self::nested_end(lines, i + 1, level);
            let mut item = if line.slots.len() > 1 {
                let text = line.slot(1).unwrap_or_default();
                let mut item = Node::scalar(self.codec.unescape(text));
                item.inline_comments = self.inline_comments(line, 2).0;
                item
            } else if end > i + 1 {
                self.region(&lines[i + 1..end], level + 1)
            } else {
                Node::scalar("")
            };
            let mut comments = std::mem::take(&mut pending);
            comments.append(&mut item.block_comments);
            item.block_comments = comments;
            items.push(item);
            i = end;
        }
        let mut node = Node::sequence(items);
        node.end_comments = pending;
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::GridWriter;
    use pretty_assertions::assert_eq;

    fn sheet_with(rows: &[&[(u16, &str)]]) -> Workbook {
        let mut workbook = Workbook::empty();
        let index = workbook.add_worksheet_with_name("Sheet1").unwrap();
        let sheet = workbook.worksheet_mut(index).unwrap();
        for (r, cells) in rows.iter().enumerate() {
            let r = r as u32;
            sheet.create_row(r).unwrap();
            for (col, text) in cells.iter() {
                sheet.set_cell_value_at(r, *col, *text).unwrap();
            }
        }
        workbook
    }

    #[test]
    fn test_sheet_without_frontmatter_is_one_document() {
        let workbook = sheet_with(&[&[(0, "a"), (1, "1")], &[(0, "b"), (1, "2")]]);
        let docs = GridReader::new().from_workbook(&workbook).unwrap();
        assert_eq!(
            docs,
            vec![Node::mapping(vec![
                (Node::scalar("a"), Node::scalar("1")),
                (Node::scalar("b"), Node::scalar("2")),
            ])]
        );
    }

    #[test]
    fn test_prelude_comments_lead_first_document() {
        let workbook = sheet_with(&[&[(0, "# intro")], &[(0, "---")], &[(0, "x")]]);
        let docs = GridReader::new().from_workbook(&workbook).unwrap();
        assert_eq!(docs, vec![Node::scalar("x").with_block_comment("intro")]);
    }

    #[test]
    fn test_prelude_with_content_is_a_document() {
        let workbook = sheet_with(&[&[(0, "x")], &[(0, "---")], &[(0, "y")]]);
        let docs = GridReader::new().from_workbook(&workbook).unwrap();
        assert_eq!(docs, vec![Node::scalar("x"), Node::scalar("y")]);
    }

    #[test]
    fn test_numbers_read_as_text() {
        let mut workbook = sheet_with(&[&[(0, "---")], &[(0, "n")]]);
        workbook
            .worksheet_mut(0)
            .unwrap()
            .set_cell_value_at(1, 1, CellValue::Number(30.0))
            .unwrap();
        let docs = GridReader::new().from_workbook(&workbook).unwrap();
        assert_eq!(docs[0].get("n").and_then(Node::as_scalar), Some("30"));
    }

    #[test]
    fn test_unknown_and_hidden_sheets_are_skipped() {
        let mut workbook = sheet_with(&[&[(0, "---")], &[(0, "x")]]);
        workbook.add_worksheet_with_name("Notes").unwrap();
        workbook.add_worksheet_with_name("Sheet2Hidden").unwrap();
        workbook.set_sheet_hidden(2, true).unwrap();
        let docs = GridReader::new().from_workbook(&workbook).unwrap();
        assert_eq!(docs, vec![Node::scalar("x")]);
    }

    #[test]
    fn test_empty_workbook_has_no_documents() {
        let workbook = sheet_with(&[]);
        assert!(GridReader::new().from_workbook(&workbook).unwrap().is_empty());
    }

    #[test]
    fn test_display_mode_recovers_swapped_key() {
        let tree = Node::mapping(vec![(
            Node::scalar("fn").with_inline_comment("Full Name"),
            Node::scalar("John"),
        )]);
        let writer = GridWriter::new()
            .with_mode(OutputMode::Display)
            .with_comment_policy(crate::CommentPolicy::display());
        let workbook = writer.to_workbook([tree]).unwrap();
        assert_eq!(
            workbook.worksheet(0).unwrap().row(1).unwrap().text(0),
            Some("Full Name".to_string())
        );

        let docs = writer.reader().from_workbook(&workbook).unwrap();
        assert_eq!(
            docs,
            vec![Node::mapping(vec![(Node::scalar("fn"), Node::scalar("John"))])]
        );
    }
}
