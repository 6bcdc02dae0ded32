use super::AttachmentTag;
use super::Author;
use super::ContentPiece;
use super::Turn;

#[test]
fn it_executes_new() {
    let turn = Turn::new(Author::Assistant, "Hi there!");
    assert_eq!(turn.author, Author::Assistant);
    assert_eq!(turn.author.to_string(), "Study Assistant");
    assert_eq!(turn.text(), "Hi there!".to_string());
    assert_eq!(turn.attachment, None);
}

#[test]
fn it_executes_new_replacing_tabs() {
    let turn = Turn::new(Author::Assistant, "\t\tHi there!");
    assert_eq!(turn.text(), "    Hi there!".to_string());
}

#[test]
fn it_executes_new_with_attachment() {
    let tag = AttachmentTag {
        name: "notes.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
    };
    let turn = Turn::new_with_attachment(Author::User, "Summarize this", tag.clone());
    assert_eq!(turn.attachment, Some(tag));
    assert_eq!(turn.text(), "Summarize this");
}

#[test]
fn it_concatenates_text_pieces_only() {
    let turn = Turn {
        author: Author::User,
        pieces: vec![
            ContentPiece::InlineData {
                mime_type: "application/pdf".to_string(),
                data: "aGk=".to_string(),
            },
            ContentPiece::Text("What is".to_string()),
            ContentPiece::Text(" this?".to_string()),
        ],
        attachment: None,
    };
    assert_eq!(turn.text(), "What is this?");
}

#[test]
fn it_replaces_text_wholesale() {
    let mut turn = Turn::new(Author::Assistant, "partial");
    turn.set_text("partial reply grew");
    turn.set_text("partial reply grew longer");
    assert_eq!(turn.text(), "partial reply grew longer");
    assert_eq!(turn.pieces.len(), 1);
}

#[test]
fn it_round_trips_through_serde() {
    let turn = Turn::new_with_attachment(
        Author::User,
        "Check the attached file",
        AttachmentTag {
            name: "syllabus.txt".to_string(),
            mime_type: "text/plain".to_string(),
        },
    );
    let payload = serde_json::to_string(&turn).unwrap();
    let decoded: Turn = serde_json::from_str(&payload).unwrap();
    assert_eq!(decoded, turn);
}
