//! Schema-driven workbooks: titles, dropdowns and their overflow handling.

use pretty_assertions::assert_eq;
use serde_json::json;
use yamlbook::{DataCollectConfig, GridWriter, Node, OutputMode, Workbook};

fn enum_schema(count: usize) -> String {
    let (values, labels): (Vec<String>, Vec<String>) = if count == 3 {
        (
            vec!["active".into(), "inactive".into(), "pending".into()],
            vec!["Active".into(), "Inactive".into(), "Pending".into()],
        )
    } else {
        (0..count)
            .map(|i| (format!("opt{:03}", i), format!("Option {:03}", i)))
            .unzip()
    };
    json!({
        "type": "object",
        "properties": {
            "status": {"type": "string", "enum": values, "enumNames": labels}
        }
    })
    .to_string()
}

fn collect_writer(schema: String, config: DataCollectConfig) -> GridWriter {
    GridWriter::new()
        .with_mode(OutputMode::DataCollect)
        .with_data_collect(config)
        .with_schema(schema)
}

fn select(workbook: &mut Workbook, row: u32, col: u16, label: &str) {
    workbook
        .worksheet_mut(0)
        .unwrap()
        .set_cell_value_at(row, col, label)
        .unwrap();
}

fn status_of(writer: &GridWriter, workbook: &Workbook) -> Option<String> {
    let documents = writer.reader().from_workbook(workbook).unwrap();
    documents[0]
        .get("status")
        .and_then(Node::as_scalar)
        .map(str::to_string)
}

#[test]
fn short_labeled_enum_uses_explicit_list() {
    let writer = collect_writer(enum_schema(3), DataCollectConfig::default());
    let mut workbook = writer.schema_to_workbook().unwrap();

    assert_eq!(workbook.sheet_count(), 1);
    let sheet = workbook.worksheet(0).unwrap();
    assert_eq!(sheet.row(1).unwrap().text(0).as_deref(), Some("status"));
    let validation = sheet.data_validation_at(1, 1).unwrap();
    assert_eq!(
        validation.explicit_options().map(<[String]>::to_vec),
        Some(vec![
            "Active".to_string(),
            "Inactive".to_string(),
            "Pending".to_string()
        ])
    );
    assert_eq!(
        sheet.comment_at(1, 1).map(|c| c.text.as_str()),
        Some("ENUM_VALUES:active,inactive,pending")
    );

    select(&mut workbook, 1, 1, "Active");
    assert_eq!(status_of(&writer, &workbook).as_deref(), Some("active"));
}

#[test]
fn long_enum_spills_into_hidden_sheet() {
    let config = DataCollectConfig::default().with_hidden_sheets_for_long_enums(true);
    let writer = collect_writer(enum_schema(300), config);
    let mut workbook = writer.schema_to_workbook().unwrap();

    assert_eq!(workbook.sheet_count(), 2);
    assert_eq!(workbook.worksheet(1).unwrap().name(), "Sheet1Hidden");
    assert_eq!(workbook.is_sheet_hidden(1), Some(true));
    assert!(workbook.named_range("Enum_0_1_1", 0).is_some());

    let sheet = workbook.worksheet(0).unwrap();
    let validation = sheet.data_validation_at(1, 1).unwrap();
    assert_eq!(validation.formula(), Some("Enum_0_1_1"));
    let hidden = workbook.worksheet(1).unwrap();
    assert_eq!(hidden.row(299).unwrap().text(0).as_deref(), Some("Option 299"));

    select(&mut workbook, 1, 1, "Option 150");
    assert_eq!(status_of(&writer, &workbook).as_deref(), Some("opt150"));
    select(&mut workbook, 1, 1, "Option 299");
    assert_eq!(status_of(&writer, &workbook).as_deref(), Some("opt299"));
}

#[test]
fn long_enum_is_truncated_by_default() {
    let writer = collect_writer(enum_schema(300), DataCollectConfig::default());
    let mut workbook = writer.schema_to_workbook().unwrap();

    assert_eq!(workbook.sheet_count(), 1);
    let validation = workbook.worksheet(0).unwrap().data_validation_at(1, 1).unwrap();
    let options = validation.explicit_options().unwrap();
    assert_eq!(options.len(), 23);
    assert_eq!(options.last().map(String::as_str), Some("Option 022"));

    select(&mut workbook, 1, 1, "Option 010");
    assert_eq!(status_of(&writer, &workbook).as_deref(), Some("opt010"));
}

#[test]
fn titles_defaults_and_nested_fields() {
    let schema = json!({
        "type": "object",
        "properties": {
            "name": {"type": "string", "title": "Full Name"},
            "status": {
                "type": "string",
                "enum": ["active", "inactive", "pending"],
                "enumNames": ["Active", "Inactive", "Pending"],
                "default": "pending"
            },
            "tags": {"type": "array", "items": {"type": "string", "enum": ["a", "b"]}},
            "address": {
                "type": "object",
                "properties": {
                    "city": {"type": "string", "title": "City", "default": "NYC"}
                }
            }
        }
    });
    let writer = collect_writer(schema.to_string(), DataCollectConfig::default());
    let workbook = writer.schema_to_workbook().unwrap();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(sheet.row(0).unwrap().text(0).as_deref(), Some("---"));
    assert_eq!(sheet.row(1).unwrap().text(0).as_deref(), Some("Full Name"));
    assert_eq!(sheet.comment_at(1, 0).map(|c| c.text.as_str()), Some("name"));
    assert_eq!(sheet.row(2).unwrap().text(1).as_deref(), Some("Pending"));
    assert_eq!(sheet.row(4).unwrap().text(1).as_deref(), Some("-"));
    assert_eq!(
        sheet
            .data_validation_at(4, 2)
            .and_then(|v| v.explicit_options())
            .map(<[String]>::to_vec),
        Some(vec!["a".to_string(), "b".to_string()])
    );
    assert_eq!(sheet.row(6).unwrap().text(1).as_deref(), Some("City"));

    let documents = writer.reader().from_workbook(&workbook).unwrap();
    let expected = Node::mapping(vec![
        (Node::scalar("name"), Node::scalar("")),
        (Node::scalar("status"), Node::scalar("pending")),
        (Node::scalar("tags"), Node::sequence(vec![Node::scalar("")])),
        (
            Node::scalar("address"),
            Node::mapping(vec![(Node::scalar("city"), Node::scalar("NYC"))]),
        ),
    ]);
    assert_eq!(documents, vec![expected]);
}

#[test]
fn all_of_branches_can_be_skipped() {
    let schema = json!({
        "type": "object",
        "allOf": [{"properties": {"extra": {"type": "string", "title": "Extra"}}}],
        "properties": {"name": {"type": "string"}}
    })
    .to_string();

    let merged = collect_writer(schema.clone(), DataCollectConfig::default())
        .schema_to_workbook()
        .unwrap();
    assert_eq!(merged.worksheet(0).unwrap().row_count(), 3);

    let skipped = collect_writer(schema, DataCollectConfig::default().with_skip_all_of(true))
        .schema_to_workbook()
        .unwrap();
    assert_eq!(skipped.worksheet(0).unwrap().row_count(), 2);
}
