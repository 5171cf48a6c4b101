//! Enum dropdowns
//!
//! An enum cell carries a list validation. Without labels the options are
//! the true values. With labels the options are the labels, and the true
//! values travel in the cell comment as
//! `ENUM_VALUES:active,inactive,pending` (only `,` and `\` escaped); a
//! reader maps the selected label to its value by position.
//!
//! Inline option lists are capped at 255 characters. Longer lists either
//! spill into a hidden sheet referenced through a defined name, or are cut
//! to the longest prefix that fits.

use serde_json::Value;
use tracing::{debug, warn};
use yamlbook_grid::{
    CellComment, CellRange, DataValidation, SheetRange, Workbook, MAX_EXPLICIT_LIST_LEN,
};

use crate::error::{GridContext, Result};
use crate::sheet::SheetRegistry;

/// What to do with an option list too long for an inline validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Write the options to a hidden sheet and reference them by name
    HiddenSheet,
    /// Keep the longest prefix that fits and log a warning
    #[default]
    Truncate,
}

/// Enum values with optional parallel display labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumOptions {
    pub values: Vec<String>,
    pub labels: Option<Vec<String>>,
}

impl EnumOptions {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            labels: None,
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Read `enum` and `enumNames` from a schema fragment
    pub fn from_schema(schema: &Value) -> Option<Self> {
        let values = schema.get("enum")?.as_array()?;
        let labels = schema
            .get("enumNames")
            .and_then(Value::as_array)
            .map(|names| names.iter().map(label_text).collect());
        Some(Self {
            values: values.iter().map(value_text).collect(),
            labels,
        })
    }

    /// Options shown in the dropdown: the labels if present, else the values
    pub fn display_options(&self) -> &[String] {
        self.labels.as_deref().unwrap_or(&self.values)
    }

    /// The comment carrying the true values; only labeled enums need one
    pub fn values_comment(&self, prefix: &str) -> Option<String> {
        self.labels.as_ref()?;
        let parts: Vec<String> = self.values.iter().map(|v| escape_part(v)).collect();
        Some(format!("{}{}", prefix, parts.join(",")))
    }

    /// Dropdown option standing for a true value, if any
    pub fn option_for(&self, value: &str) -> Option<&str> {
        let index = self.values.iter().position(|v| v == value)?;
        self.display_options().get(index).map(String::as_str)
    }
}

/// Text of a JSON enum value: strings raw, `null` as `null`, others as JSON
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text of a label; non-string labels are unusual but tolerated
fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn escape_part(part: &str) -> String {
    part.replace('\\', "\\\\").replace(',', "\\,")
}

/// Split a values comment back into values; `None` if the prefix is missing
pub fn parse_values_comment(comment: &str, prefix: &str) -> Option<Vec<String>> {
    let body = comment.strip_prefix(prefix)?;
    let mut values = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for c in body.chars() {
        if escaped {
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == ',' {
            values.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    values.push(current);
    Some(values)
}

/// Map a selected option back to its true value by position.
///
/// Selections not found among the options are returned unchanged.
pub fn recover_value(selected: &str, options: &[String], values: &[String]) -> String {
    options
        .iter()
        .position(|o| o == selected)
        .and_then(|index| values.get(index))
        .cloned()
        .unwrap_or_else(|| selected.to_string())
}

/// Length of the options joined with commas, in characters
fn joined_len(options: &[String]) -> usize {
    options.iter().map(|o| o.chars().count()).sum::<usize>() + options.len().saturating_sub(1)
}

/// Whether the options fit an inline validation
pub fn fits_inline(options: &[String]) -> bool {
    joined_len(options) <= MAX_EXPLICIT_LIST_LEN
}

/// Longest prefix of the options whose joined length fits an inline validation
pub fn truncate(options: &[String]) -> &[String] {
    let mut total = 0;
    for (i, option) in options.iter().enumerate() {
        total += usize::from(i > 0) + option.chars().count();
        if total > MAX_EXPLICIT_LIST_LEN {
            return &options[..i];
        }
    }
    options
}

/// Where a dropdown goes
#[derive(Debug, Clone, Copy)]
pub(crate) struct DropdownTarget {
    /// Logical index of the visible sheet
    pub sheet: usize,
    pub row: u32,
    pub col: u16,
}

/// Attach a dropdown for `enum_options` to the target cell.
///
/// Returns how many options the dropdown offers, which is fewer than given
/// only after truncation.
pub(crate) fn write_dropdown(
    workbook: &mut Workbook,
    registry: &mut SheetRegistry<'_>,
    target: DropdownTarget,
    enum_options: &EnumOptions,
    values_prefix: &str,
    policy: OverflowPolicy,
) -> Result<usize> {
    let options = enum_options.display_options();
    if options.is_empty() {
        return Ok(0);
    }
    let cell = CellRange::from_indices(target.row, target.col, target.row, target.col);

    let (validation, offered) = if fits_inline(options) {
        (DataValidation::explicit_list(options), options.len())
    } else {
        match policy {
            OverflowPolicy::HiddenSheet => {
                let name = spill_to_hidden_sheet(workbook, registry, target, options)?;
                (DataValidation::formula_list(name), options.len())
            }
            OverflowPolicy::Truncate => {
                let kept = truncate(options);
                warn!(
                    "Dropdown truncated from {} to {} options ({} char limit)",
                    options.len(),
                    kept.len(),
                    MAX_EXPLICIT_LIST_LEN
                );
                (DataValidation::explicit_list(kept), kept.len())
            }
        }
    };

    let physical = registry.visible_sheet(workbook, target.sheet)?;
    let sheet_count = workbook.sheet_count();
    let sheet = workbook
        .worksheet_mut(physical)
        .ok_or(yamlbook_grid::Error::SheetOutOfBounds(physical, sheet_count))
        .grid_context(|| "adding a dropdown")?;
    sheet.add_data_validation(validation.with_range(cell));
    if let Some(comment) = enum_options.values_comment(values_prefix) {
        sheet
            .set_comment_at(target.row, target.col, CellComment::text_only(comment))
            .grid_context(|| format!("storing enum values at row {}", target.row))?;
    }
    Ok(offered)
}

/// Write options to column A of the hidden sheet and name the range
fn spill_to_hidden_sheet(
    workbook: &mut Workbook,
    registry: &mut SheetRegistry<'_>,
    target: DropdownTarget,
    options: &[String],
) -> Result<String> {
    let hidden = registry.hidden_sheet(workbook, target.sheet)?;
    let start = hidden.next_row;
    let count = u32::try_from(options.len()).unwrap_or(u32::MAX);
    let end = start.saturating_add(count) - 1;
    hidden.next_row = end + 1;
    let hidden_name = hidden.name.clone();

    let sheet = workbook
        .worksheet_by_name_mut(&hidden_name)
        .ok_or_else(|| yamlbook_grid::Error::SheetNotFound(hidden_name.clone()))
        .grid_context(|| "writing dropdown options")?;
    for (row, option) in (start..).zip(options) {
        sheet
            .set_cell_value_at(row, 0, option.as_str())
            .grid_context(|| format!("writing dropdown option to row {}", row))?;
    }

    let range_name = format!("Enum_{}_{}_{}", target.sheet, target.row, target.col);
    let reference = SheetRange::new(hidden_name, CellRange::from_indices(start, 0, end, 0));
    workbook
        .define_name(&range_name, &reference.to_reference())
        .grid_context(|| format!("defining '{}'", range_name))?;
    debug!(name = %range_name, options = options.len(), "spilled dropdown to hidden sheet");
    Ok(range_name)
}
