//! Every category under every legal option, with all other categories emitted.

use pretty_assertions::assert_eq;
use yamlbook::{
    CommentCategory, CommentDisplay, CommentPolicy, CommentVisibility, GridWriter, Node,
    OutputMode, Placement, Workbook,
};

/// One comment per category; the comment text names its category
fn annotated_tree() -> Node {
    Node::mapping(vec![
        (
            Node::scalar("k1")
                .with_block_comment("pair note")
                .with_inline_comment("key note"),
            Node::scalar("v1").with_inline_comment("value note"),
        ),
        (
            Node::scalar("k2"),
            Node::mapping(vec![(Node::scalar("x"), Node::scalar("1"))])
                .with_block_comment("mapping note"),
        ),
        (
            Node::scalar("k3"),
            Node::sequence(vec![Node::scalar("i1").with_block_comment("item note")])
                .with_block_comment("sequence note"),
        ),
    ])
    .with_block_comment("document note")
}

fn note_for(category: CommentCategory) -> &'static str {
    match category {
        CommentCategory::Document => "document note",
        CommentCategory::Mapping => "mapping note",
        CommentCategory::Sequence => "sequence note",
        CommentCategory::Key => "key note",
        CommentCategory::Value => "value note",
        CommentCategory::KeyValuePair => "pair note",
        CommentCategory::Item => "item note",
    }
}

fn policy_with(category: CommentCategory, placement: Placement) -> CommentPolicy {
    let display = match placement {
        Placement::Replace => CommentDisplay::DisplayName,
        Placement::Drop => CommentDisplay::Hidden,
        Placement::Emit => CommentDisplay::Comment,
    };
    let visibility = match placement {
        Placement::Drop => CommentVisibility::Hidden,
        Placement::Replace | Placement::Emit => CommentVisibility::Comment,
    };
    let policy = CommentPolicy::emit_all();
    match category {
        CommentCategory::Document => policy.with_document(visibility),
        CommentCategory::Mapping => policy.with_mapping(display),
        CommentCategory::Sequence => policy.with_sequence(display),
        CommentCategory::Key => policy.with_key(display),
        CommentCategory::Value => policy.with_value(display),
        CommentCategory::KeyValuePair => policy.with_key_value_pair(visibility),
        CommentCategory::Item => policy.with_item(visibility),
    }
}

/// Every filled cell as (text, attached comment)
fn cells(workbook: &Workbook) -> Vec<(String, Option<String>)> {
    let sheet = workbook.worksheet(0).unwrap();
    sheet
        .rows()
        .flat_map(|row| {
            row.cells()
                .filter_map(|(col, value)| {
                    let text = value.display_text()?;
                    let note = sheet.comment_at(row.index, col).map(|c| c.text.clone());
                    Some((text, note))
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn placement_of(workbook: &Workbook, note: &str) -> Option<Placement> {
    let cells = cells(workbook);
    let comment_cell = format!("# {}", note);
    if cells.iter().any(|(text, _)| *text == comment_cell) {
        return Some(Placement::Emit);
    }
    if cells.iter().any(|(text, attached)| text == note && attached.is_some()) {
        return Some(Placement::Replace);
    }
    let mentioned = cells.iter().any(|(text, attached)| {
        text.contains(note) || attached.as_deref().is_some_and(|a| a.contains(note))
    });
    (!mentioned).then_some(Placement::Drop)
}

#[test]
fn each_category_is_placed_independently() {
    for category in CommentCategory::ALL {
        let options: &[Placement] = if category.is_replaceable() {
            &[Placement::Replace, Placement::Drop, Placement::Emit]
        } else {
            &[Placement::Drop, Placement::Emit]
        };
        for &placement in options {
            let workbook = GridWriter::new()
                .with_mode(OutputMode::Display)
                .with_comment_policy(policy_with(category, placement))
                .to_workbook([annotated_tree()])
                .unwrap();

            for other in CommentCategory::ALL {
                let expected = if other == category {
                    placement
                } else {
                    Placement::Emit
                };
                assert_eq!(
                    placement_of(&workbook, note_for(other)),
                    Some(expected),
                    "{:?} set to {:?}, checking {:?}",
                    category,
                    placement,
                    other
                );
            }
        }
    }
}

#[test]
fn replaced_content_lands_in_attached_comment() {
    let policy = CommentPolicy::emit_all().with_key(CommentDisplay::DisplayName);
    let workbook = GridWriter::new()
        .with_mode(OutputMode::Display)
        .with_comment_policy(policy)
        .to_workbook([annotated_tree()])
        .unwrap();
    assert!(cells(&workbook).contains(&("key note".to_string(), Some("k1".to_string()))));
}

#[test]
fn yaml_oriented_mode_ignores_the_policy() {
    let hidden = CommentPolicy::display();
    let writer = GridWriter::new().with_comment_policy(hidden);
    assert_eq!(writer.effective_policy(), CommentPolicy::emit_all());

    let workbook = writer.to_workbook([annotated_tree()]).unwrap();
    for category in CommentCategory::ALL {
        assert_eq!(
            placement_of(&workbook, note_for(category)),
            Some(Placement::Emit)
        );
    }
}

#[test]
fn display_preset_reads_back_original_content() {
    let tree = Node::mapping(vec![(
        Node::scalar("k2"),
        Node::mapping(vec![(
            Node::scalar("x").with_inline_comment("Ex"),
            Node::scalar("1").with_inline_comment("One"),
        )])
        .with_block_comment("Section"),
    )]);
    let writer = GridWriter::new()
        .with_mode(OutputMode::Display)
        .with_comment_policy(CommentPolicy::display());
    let workbook = writer.to_workbook([tree]).unwrap();
    let documents = writer.reader().from_workbook(&workbook).unwrap();

    let expected = Node::mapping(vec![(
        Node::scalar("k2"),
        Node::mapping(vec![(
            Node::scalar("x").with_block_comment("Section"),
            Node::scalar("1"),
        )]),
    )]);
    assert_eq!(documents, vec![expected]);
}
