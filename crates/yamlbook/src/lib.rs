//! # yamlbook
//!
//! Bidirectional transcoder between comment-annotated YAML trees and
//! spreadsheet grids.
//!
//! - [`GridWriter`] lays documents out as rows: one row per scalar, mapping
//!   key and sequence item, with depth expressed by an [`Indentation`]
//!   strategy and comments placed under a [`CommentPolicy`]
//! - [`GridReader`] reads such a workbook back into [`Node`] trees
//! - in [`OutputMode::DataCollect`] a JSON Schema drives a data-entry form
//!   with titles and enum dropdowns
//!
//! ## Example
//!
//! ```rust
//! use yamlbook::{GridWriter, Node};
//!
//! let documents = yamlbook::yaml::parse_documents("name: John\ntags:\n  - a\n").unwrap();
//! let writer = GridWriter::new();
//! let workbook = writer.to_workbook(documents.clone()).unwrap();
//!
//! let sheet = workbook.worksheet(0).unwrap();
//! assert_eq!(sheet.row(1).unwrap().text(0).as_deref(), Some("name"));
//!
//! let read_back = writer.reader().from_workbook(&workbook).unwrap();
//! assert_eq!(read_back, documents);
//! ```

pub mod comment;
pub mod dropdown;
pub mod error;
pub mod escape;
pub mod indent;
pub mod mode;
pub mod node;
pub mod reader;
pub mod schema;
pub mod sheet;
pub mod syntax;
pub mod writer;
pub mod yaml;

// Re-exports for convenience
pub use comment::{CommentCategory, CommentDisplay, CommentPolicy, CommentVisibility, Placement};
pub use dropdown::{EnumOptions, OverflowPolicy};
pub use error::{Error, Result};
pub use escape::ValueCodec;
pub use indent::{IndentMarker, Indentation, PrefixPattern};
pub use mode::OutputMode;
pub use node::{Node, NodeKind};
pub use reader::GridReader;
pub use schema::{DataCollectConfig, SchemaNavigator};
pub use sheet::{DefaultSheetNames, FirstSheet, NodeToSheetMapper, SheetNameStrategy};
pub use syntax::WorkbookSyntax;
pub use writer::GridWriter;

pub use yamlbook_grid::Workbook;

/// Parse YAML sources and write all their documents with the default writer
pub fn to_workbook<I, S>(sources: I) -> Result<Workbook>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut documents = Vec::new();
    for source in sources {
        documents.extend(yaml::parse_documents(source.as_ref())?);
    }
    GridWriter::new().to_workbook(documents)
}

/// Read a workbook written with the default writer
pub fn from_workbook(workbook: &Workbook) -> Result<Vec<Node>> {
    GridReader::new().from_workbook(workbook)
}

/// Read a workbook written with the default writer and emit it as YAML
pub fn to_yaml(workbook: &Workbook) -> Result<String> {
    Ok(yaml::emit_documents(&from_workbook(workbook)?))
}

/// Writer using the prefix indentation strategy with default markers
pub fn prefix_writer() -> GridWriter {
    GridWriter::new().with_indentation(Indentation::prefix())
}

/// Reader matching [`prefix_writer`]
pub fn prefix_reader() -> GridReader {
    GridReader::new().with_indentation(Indentation::prefix())
}
