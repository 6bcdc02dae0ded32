use super::TranscriptView;
use crate::domain::models::AttachmentTag;
use crate::domain::models::Author;
use crate::domain::models::Turn;

fn line_text(view: &TranscriptView) -> Vec<String> {
    return view
        .lines()
        .iter()
        .map(|line| {
            return line
                .spans
                .iter()
                .map(|span| return span.content.to_string())
                .collect::<Vec<String>>()
                .join("");
        })
        .collect();
}

#[test]
fn it_renders_a_header_content_and_separator_per_turn() {
    let mut view = TranscriptView::default();
    view.set_turns(&[Turn::new(Author::Assistant, "Hello there!")], 80);

    let lines = line_text(&view);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Study Assistant");
    assert_eq!(lines[1], "Hello there!");
    assert_eq!(lines[2], "");
}

#[test]
fn it_shows_an_attachment_tag() {
    let mut view = TranscriptView::default();
    let turn = Turn::new_with_attachment(
        Author::User,
        "Summarize",
        AttachmentTag {
            name: "notes.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
        },
    );
    view.set_turns(&[turn], 80);

    let lines = line_text(&view);
    assert_eq!(lines[1], "Attached: notes.pdf");
}

#[test]
fn it_placeholders_an_empty_turn() {
    let mut view = TranscriptView::default();
    view.set_turns(&[Turn::new(Author::Assistant, "")], 80);

    let lines = line_text(&view);
    assert_eq!(lines[1], "...");
}

#[test]
fn it_wraps_long_paragraphs() {
    let mut view = TranscriptView::default();
    view.set_turns(
        &[Turn::new(
            Author::Assistant,
            "one two three four five six seven eight",
        )],
        20,
    );

    let lines = line_text(&view);
    assert!(lines.len() > 3);
    for line in &lines {
        assert!(line.len() <= 20, "line too long: {line}");
    }
}

#[test]
fn it_prefixes_list_items() {
    let mut view = TranscriptView::default();
    view.set_turns(&[Turn::new(Author::Assistant, "* a\n* b")], 80);

    let lines = line_text(&view);
    assert_eq!(lines[1], "- a");
    assert_eq!(lines[2], "- b");
}
