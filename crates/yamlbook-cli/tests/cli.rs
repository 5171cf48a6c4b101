use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn yamlbook(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_yamlbook"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run yamlbook")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn encode_then_decode() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "name: John\nports:\n  - 80\n  - 443\n---\nplain\n",
    )
    .unwrap();

    stdout(&yamlbook(&["encode", "config.yaml", "-o", "book.json"], dir.path()));
    let yaml = stdout(&yamlbook(&["decode", "book.json"], dir.path()));
    assert_eq!(yaml, "---\nname: John\nports:\n  - 80\n  - 443\n---\nplain\n");
}

#[test]
fn prefix_layout_shows_in_preview() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("in.yaml"), "person:\n  city: NYC\n").unwrap();

    stdout(&yamlbook(
        &["encode", "in.yaml", "-o", "book.json", "--prefix"],
        dir.path(),
    ));
    let csv = stdout(&yamlbook(&["preview", "book.json"], dir.path()));
    assert_eq!(csv, "---,,\r\nperson,,\r\n1>,city,NYC\r\n");

    let yaml = stdout(&yamlbook(&["decode", "book.json", "--prefix"], dir.path()));
    assert_eq!(yaml, "---\nperson:\n  city: NYC\n");
}

#[test]
fn collect_and_list_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let values: Vec<String> = (0..100).map(|i| format!("value-{:03}", i)).collect();
    let schema = serde_json::json!({
        "type": "object",
        "properties": {"choice": {"type": "string", "enum": values}}
    });
    std::fs::write(dir.path().join("schema.json"), schema.to_string()).unwrap();

    stdout(&yamlbook(
        &["collect", "schema.json", "-o", "form.json", "--hidden-sheets"],
        dir.path(),
    ));
    let sheets = stdout(&yamlbook(&["sheets", "form.json"], dir.path()));
    assert_eq!(sheets, "0\tSheet1\tvisible\n1\tSheet1Hidden\thidden\n");
}

#[test]
fn config_file_sets_markers() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("in.yaml"), "items:\n  - a\n").unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{"syntax": {"item_mark": "*"}}"#,
    )
    .unwrap();

    stdout(&yamlbook(
        &["encode", "in.yaml", "-o", "book.json", "-c", "settings.json"],
        dir.path(),
    ));
    let csv = stdout(&yamlbook(&["preview", "book.json", "-d", ";"], dir.path()));
    assert_eq!(csv, "---;;\r\nitems;;\r\n;*;a\r\n");

    let yaml = stdout(&yamlbook(
        &["decode", "book.json", "-c", "settings.json"],
        dir.path(),
    ));
    assert_eq!(yaml, "---\nitems:\n  - a\n");
}

#[test]
fn missing_input_fails_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let output = yamlbook(&["decode", "nope.json"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to open 'nope.json'"));
}
