//! Tree to grid
//!
//! Every document starts with a frontmatter row and continues with one row
//! per scalar, mapping key and sequence item:
//!
//! ```text
//! ---
//! name   John
//! person
//!        city   NYC
//! tags
//!        -      a
//!        -      b
//! ```
//!
//! Nesting depth is laid out by the configured [`Indentation`]. Comments go
//! where the effective [`CommentPolicy`] puts them.

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use yamlbook_grid::{CellComment, CellValue, Error as GridError, Workbook, Worksheet};

use crate::comment::{display_name, CommentCategory, CommentPolicy, Placement};
use crate::dropdown::{write_dropdown, DropdownTarget, EnumOptions};
use crate::error::{Error, GridContext, Result};
use crate::escape::ValueCodec;
use crate::indent::Indentation;
use crate::mode::OutputMode;
use crate::node::{Node, NodeKind};
use crate::reader::GridReader;
use crate::schema::{json_to_node, DataCollectConfig, SchemaNavigator};
use crate::sheet::{DefaultSheetNames, FirstSheet, NodeToSheetMapper, SheetNameStrategy, SheetRegistry};
use crate::syntax::WorkbookSyntax;

/// Converts document trees into a workbook.
///
/// A writer holds configuration only; every call builds its workbook from
/// scratch, so one writer can serve any number of calls.
#[derive(Clone)]
pub struct GridWriter {
    mode: OutputMode,
    syntax: WorkbookSyntax,
    indentation: Indentation,
    comments: CommentPolicy,
    collect: DataCollectConfig,
    schema: Option<String>,
    sheet_names: Arc<dyn SheetNameStrategy>,
    sheet_mapper: Arc<dyn NodeToSheetMapper>,
}

impl Default for GridWriter {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            syntax: WorkbookSyntax::default(),
            indentation: Indentation::default(),
            comments: CommentPolicy::default(),
            collect: DataCollectConfig::default(),
            schema: None,
            sheet_names: Arc::new(DefaultSheetNames),
            sheet_mapper: Arc::new(FirstSheet),
        }
    }
}

impl fmt::Debug for GridWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridWriter")
            .field("mode", &self.mode)
            .field("syntax", &self.syntax)
            .field("indentation", &self.indentation)
            .field("comments", &self.comments)
            .field("collect", &self.collect)
            .field("schema", &self.schema.as_ref().map(|_| "..."))
            .finish_non_exhaustive()
    }
}

impl GridWriter {
    /// Create a writer with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

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

    /// Comment policy applied in [`OutputMode::Display`]
    pub fn with_comment_policy(mut self, policy: CommentPolicy) -> Self {
        self.comments = policy;
        self
    }

    pub fn with_data_collect(mut self, config: DataCollectConfig) -> Self {
        self.collect = config;
        self
    }

    /// JSON Schema text for [`GridWriter::schema_to_workbook`]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_sheet_names<S: SheetNameStrategy + 'static>(mut self, names: S) -> Self {
        self.sheet_names = Arc::new(names);
        self
    }

    pub fn with_sheet_mapper<M: NodeToSheetMapper + 'static>(mut self, mapper: M) -> Self {
        self.sheet_mapper = Arc::new(mapper);
        self
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn syntax(&self) -> &WorkbookSyntax {
        &self.syntax
    }

    pub fn indentation(&self) -> &Indentation {
        &self.indentation
    }

    /// Policy in force: the configured one in display mode, emit-all otherwise
    pub fn effective_policy(&self) -> CommentPolicy {
        match self.mode {
            OutputMode::Display => self.comments,
            OutputMode::YamlOriented | OutputMode::DataCollect => CommentPolicy::emit_all(),
        }
    }

    /// A reader that agrees with this writer on mode, markers, indentation and sheet names
    pub fn reader(&self) -> GridReader {
        GridReader::new()
            .with_mode(self.mode)
            .with_syntax(self.syntax.clone())
            .with_indentation(self.indentation.clone())
            .with_shared_sheet_names(Arc::clone(&self.sheet_names))
    }

    /// Write documents into a new workbook, in order.
    ///
    /// The document index handed to the sheet mapper counts every document
    /// across the whole iterator.
    pub fn to_workbook<I>(&self, documents: I) -> Result<Workbook>
    where
        I: IntoIterator<Item = Node>,
    {
        self.syntax.validate()?;
        let policy = self.effective_policy();
        let mut state = WriteState::new(self.sheet_names.as_ref());

        for (index, document) in documents.into_iter().enumerate() {
            let sheet = self.sheet_mapper.sheet_for(&document, index);
            debug!(document = index, sheet, "writing document");
            DocumentWriter::new(self, &mut state, sheet, policy).write_document(&document)?;
        }

        if state.workbook.sheet_count() == 0 {
            state.sheets.visible_sheet(&mut state.workbook, 0)?;
        }
        Ok(state.workbook)
    }

    /// Build a data-entry workbook from the configured JSON Schema.
    ///
    /// Property titles replace keys (the key is kept in a cell comment) and
    /// enum fields become dropdowns. Requires [`OutputMode::DataCollect`]
    /// and a schema.
    pub fn schema_to_workbook(&self) -> Result<Workbook> {
        if self.mode != OutputMode::DataCollect {
            return Err(Error::configuration(format!(
                "schema-driven workbooks need data-collect mode, not {:?}",
                self.mode
            )));
        }
        let schema = self
            .schema
            .as_deref()
            .ok_or_else(|| Error::configuration("no JSON schema configured"))?;
        self.syntax.validate()?;

        let navigator = SchemaNavigator::parse(schema)?.with_skip_all_of(self.collect.skip_all_of);
        let skeleton = json_to_node(&navigator.skeleton());
        debug!(
            overflow = ?self.collect.overflow_policy(),
            "writing schema-driven workbook"
        );

        let mut state = WriteState::new(self.sheet_names.as_ref());
        let mut writer = DocumentWriter::new(self, &mut state, 0, CommentPolicy::emit_all());
        writer.frontmatter()?;
        writer.collect_node(&skeleton, 0, "$", &navigator)?;
        Ok(state.workbook)
    }
}

/// Accumulation state of one write call
struct WriteState<'a> {
    workbook: Workbook,
    sheets: SheetRegistry<'a>,
}

impl<'a> WriteState<'a> {
    fn new(names: &'a dyn SheetNameStrategy) -> Self {
        Self {
            workbook: Workbook::empty(),
            sheets: SheetRegistry::new(names),
        }
    }
}

/// Writes one document into its sheet
struct DocumentWriter<'s, 'a> {
    writer: &'s GridWriter,
    state: &'s mut WriteState<'a>,
    sheet: usize,
    policy: CommentPolicy,
    codec: ValueCodec<'s>,
}

impl<'s, 'a> DocumentWriter<'s, 'a> {
    fn new(
        writer: &'s GridWriter,
        state: &'s mut WriteState<'a>,
        sheet: usize,
        policy: CommentPolicy,
    ) -> Self {
        Self {
            writer,
            state,
            sheet,
            policy,
            codec: ValueCodec::new(&writer.syntax, &writer.indentation),
        }
    }

    // === Cells ===

    fn worksheet(&mut self) -> Result<&mut Worksheet> {
        let state = &mut *self.state;
        let physical = state.sheets.visible_sheet(&mut state.workbook, self.sheet)?;
        let count = state.workbook.sheet_count();
        state
            .workbook
            .worksheet_mut(physical)
            .ok_or(GridError::SheetOutOfBounds(physical, count))
            .grid_context(|| "selecting the target sheet")
    }

    /// Append a row for content at `level`; returns the row and its content column
    fn new_row(&mut self, level: usize) -> Result<(u32, u16)> {
        let writer = self.writer;
        let col = writer.indentation.content_column(level, &writer.syntax);
        let marker = writer.indentation.marker(level);
        let sheet = self.worksheet()?;
        let row = sheet.next_row_index();
        sheet
            .create_row(row)
            .grid_context(|| format!("creating row {}", row))?;
        if let Some(marker) = marker {
            sheet
                .set_cell_value_at(row, 0, marker)
                .grid_context(|| format!("writing the indent marker of row {}", row))?;
        }
        Ok((row, col))
    }

    fn set_text(&mut self, row: u32, col: u16, text: &str) -> Result<()> {
        let value = if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::string(text)
        };
        self.worksheet()?
            .set_cell_value_at(row, col, value)
            .grid_context(|| format!("writing row {} column {}", row, col))
    }

    fn set_note(&mut self, row: u32, col: u16, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.worksheet()?
            .set_comment_at(row, col, CellComment::text_only(text))
            .grid_context(|| format!("attaching a comment at row {} column {}", row, col))
    }

    /// Show `shown`, unless a replace placement swaps in the first comment;
    /// the swapped-out text then goes to the cell comment. A blank original
    /// is kept as a lone escape mark so the note is never empty.
    fn set_swappable(
        &mut self,
        row: u32,
        col: u16,
        level: usize,
        shown: &str,
        comments: &[String],
        placement: Placement,
    ) -> Result<()> {
        match display_name(comments) {
            Some(name) if placement == Placement::Replace => {
                let displayed = self.codec.escape(name, level).into_owned();
                self.set_text(row, col, &displayed)?;
                if shown.is_empty() {
                    let writer = self.writer;
                    self.set_note(row, col, &writer.syntax.escape_mark)
                } else {
                    self.set_note(row, col, shown)
                }
            }
            _ => self.set_text(row, col, shown),
        }
    }

    /// Cell text for a scalar: `null` is left blank, everything else escaped
    fn scalar_cell(&self, value: &str, level: usize) -> String {
        if value == "null" {
            String::new()
        } else {
            self.codec.escape(value, level).into_owned()
        }
    }

    // === Comments ===

    fn comment_rows(&mut self, comments: &[String], level: usize) -> Result<()> {
        let writer = self.writer;
        for comment in comments {
            let (row, col) = self.new_row(level)?;
            self.set_text(row, col, &writer.syntax.comment_cell(comment))?;
        }
        Ok(())
    }

    /// Comment cells along a row from `start`; returns the next free column
    fn comment_cells(&mut self, row: u32, start: u16, comments: &[String]) -> Result<u16> {
        let writer = self.writer;
        let mut col = start;
        for comment in comments {
            self.set_text(row, col, &writer.syntax.comment_cell(comment))?;
            col = col.saturating_add(1);
        }
        Ok(col)
    }

    /// Block comments of one category at `level`. A replace placement writes
    /// a header row showing the first comment, with the comment itself kept
    /// in the cell comment.
    fn block_comments(
        &mut self,
        category: CommentCategory,
        comments: &[String],
        level: usize,
    ) -> Result<()> {
        match self.policy.place(category, comments) {
            Some(Placement::Emit) => self.comment_rows(comments, level),
            Some(Placement::Replace) => {
                let Some(name) = display_name(comments) else {
                    return Ok(());
                };
                let writer = self.writer;
                let (row, col) = self.new_row(level)?;
                let displayed = self.codec.escape(name, level).into_owned();
                self.set_text(row, col, &displayed)?;
                self.set_note(row, col, &writer.syntax.comment_cell(name))
            }
            Some(Placement::Drop) | None => Ok(()),
        }
    }

    // === Documents ===

    fn frontmatter(&mut self) -> Result<()> {
        let writer = self.writer;
        let (row, _) = self.new_row(0)?;
        self.set_text(row, 0, &writer.syntax.frontmatter)
    }

    fn write_document(&mut self, document: &Node) -> Result<()> {
        if self.policy.place(CommentCategory::Document, &document.block_comments)
            == Some(Placement::Emit)
        {
            self.comment_rows(&document.block_comments, 0)?;
        }
        self.frontmatter()?;
        self.write_body(document, 0)?;
        self.comment_rows(&document.end_comments, 0)
    }

    /// A node below a key or an item, with its own block and end comments
    fn write_nested(&mut self, node: &Node, level: usize) -> Result<()> {
        match &node.kind {
            NodeKind::Mapping(_) => {
                self.block_comments(CommentCategory::Mapping, &node.block_comments, level)?
            }
            NodeKind::Sequence(_) => {
                self.block_comments(CommentCategory::Sequence, &node.block_comments, level)?
            }
            NodeKind::Scalar(_) => self.comment_rows(&node.block_comments, level)?,
        }
        self.write_body(node, level)?;
        self.comment_rows(&node.end_comments, level)
    }

    fn write_body(&mut self, node: &Node, level: usize) -> Result<()> {
        match &node.kind {
            NodeKind::Scalar(value) => {
                let (row, col) = self.new_row(level)?;
                let shown = self.scalar_cell(value, level);
                self.set_text(row, col, &shown)
            }
            NodeKind::Mapping(pairs) => pairs
                .iter()
                .try_for_each(|(key, value)| self.write_pair(key, value, level)),
            NodeKind::Sequence(items) => items
                .iter()
                .try_for_each(|item| self.write_item(item, level)),
        }
    }

    fn write_pair(&mut self, key: &Node, value: &Node, level: usize) -> Result<()> {
        self.block_comments(CommentCategory::KeyValuePair, &key.block_comments, level)?;

        let NodeKind::Scalar(key_text) = &key.kind else {
            self.write_nested(key, level)?;
            self.write_nested(value, level + 1)?;
            return self.comment_rows(&key.end_comments, level);
        };

        let (row, col) = self.new_row(level)?;
        let escaped_key = self.codec.escape_key(key_text, level).into_owned();
        let key_placement = self.policy.placement(CommentCategory::Key);
        self.set_swappable(
            row,
            col,
            level,
            &escaped_key,
            &key.inline_comments,
            key_placement,
        )?;
        let mut next = col.saturating_add(1);
        if key_placement == Placement::Emit {
            next = self.comment_cells(row, next, &key.inline_comments)?;
        }

        match &value.kind {
            NodeKind::Scalar(text) => {
                let placement = self.policy.placement(CommentCategory::Value);
                let shown = self.scalar_cell(text, level + 1);
                self.set_swappable(
                    row,
                    next,
                    level + 1,
                    &shown,
                    &value.inline_comments,
                    placement,
                )?;
                if placement == Placement::Emit {
                    self.comment_cells(row, next.saturating_add(1), &value.inline_comments)?;
                }
            }
            _ => self.write_nested(value, level + 1)?,
        }

        self.comment_rows(&key.end_comments, level)
    }

    fn write_item(&mut self, item: &Node, level: usize) -> Result<()> {
        let writer = self.writer;
        self.block_comments(CommentCategory::Item, &item.block_comments, level)?;

        let (row, col) = self.new_row(level)?;
        self.set_text(row, col, &writer.syntax.item_mark)?;
        match &item.kind {
            NodeKind::Scalar(value) => {
                let shown = self.scalar_cell(value, level + 1);
                self.set_text(row, col.saturating_add(1), &shown)?;
                if self.policy.placement(CommentCategory::Item) == Placement::Emit {
                    self.comment_cells(row, col.saturating_add(2), &item.inline_comments)?;
                }
                self.comment_rows(&item.end_comments, level)
            }
            _ => {
                self.write_body(item, level + 1)?;
                self.comment_rows(&item.end_comments, level + 1)
            }
        }
    }

    // === Schema-driven layout ===

    fn collect_node(
        &mut self,
        node: &Node,
        level: usize,
        path: &str,
        navigator: &SchemaNavigator,
    ) -> Result<()> {
        match &node.kind {
            NodeKind::Scalar(value) => {
                let (row, col) = self.new_row(level)?;
                self.collect_value(row, col, value, level, navigator.find(path).as_ref())
            }
            NodeKind::Mapping(pairs) => {
                for (key, value) in pairs {
                    let NodeKind::Scalar(key_text) = &key.kind else {
                        self.collect_node(key, level, path, navigator)?;
                        self.collect_node(value, level + 1, path, navigator)?;
                        continue;
                    };
                    let property_path = if path == "$" {
                        format!("$.{}", key_text)
                    } else {
                        format!("{}.{}", path, key_text)
                    };
                    let schema = navigator.find(&property_path);
                    let (row, col) = self.new_row(level)?;
                    let escaped_key = self.codec.escape_key(key_text, level).into_owned();
                    match schema.as_ref().and_then(|s| s.get("title")).and_then(|t| t.as_str()) {
                        Some(title) => {
                            let displayed = self.codec.escape(title, level).into_owned();
                            self.set_text(row, col, &displayed)?;
                            self.set_note(row, col, &escaped_key)?;
                        }
                        None => self.set_text(row, col, &escaped_key)?,
                    }

                    match &value.kind {
                        NodeKind::Scalar(text) => self.collect_value(
                            row,
                            col.saturating_add(1),
                            text,
                            level + 1,
                            schema.as_ref(),
                        )?,
                        _ => self.collect_node(value, level + 1, &property_path, navigator)?,
                    }
                }
                Ok(())
            }
            NodeKind::Sequence(items) => {
                let items_path = format!("{}[*]", path);
                let writer = self.writer;
                for item in items {
                    let (row, col) = self.new_row(level)?;
                    self.set_text(row, col, &writer.syntax.item_mark)?;
                    match &item.kind {
                        NodeKind::Scalar(text) => {
                            let schema = navigator.find(&items_path);
                            self.collect_value(
                                row,
                                col.saturating_add(1),
                                text,
                                level + 1,
                                schema.as_ref(),
                            )?
                        }
                        _ => self.collect_node(item, level + 1, &items_path, navigator)?,
                    }
                }
                Ok(())
            }
        }
    }

    /// A scalar cell, or a dropdown when the schema fragment has an `enum`
    fn collect_value(
        &mut self,
        row: u32,
        col: u16,
        value: &str,
        level: usize,
        schema: Option<&serde_json::Value>,
    ) -> Result<()> {
        match schema.and_then(EnumOptions::from_schema) {
            Some(options) => self.write_enum(row, col, value, &options),
            None => {
                let shown = self.scalar_cell(value, level);
                self.set_text(row, col, &shown)
            }
        }
    }

    /// Dropdown cell; a value matching an offered option is preselected
    fn write_enum(&mut self, row: u32, col: u16, value: &str, options: &EnumOptions) -> Result<()> {
        let writer = self.writer;
        let target = DropdownTarget {
            sheet: self.sheet,
            row,
            col,
        };
        let state = &mut *self.state;
        let offered = write_dropdown(
            &mut state.workbook,
            &mut state.sheets,
            target,
            options,
            &writer.syntax.enum_values_prefix,
            writer.collect.overflow_policy(),
        )?;

        let preselected = options.option_for(value).filter(|option| {
            options
                .display_options()
                .iter()
                .take(offered)
                .any(|offered_option| offered_option.as_str() == *option)
        });
        match preselected {
            Some(option) => self.set_text(row, col, option),
            None => Ok(()),
        }
    }
}
