use anyhow::Result;
use tokio::sync::mpsc;

use super::AppState;
use crate::domain::models::Action;
use crate::domain::models::AssistantResponse;
use crate::domain::models::Author;
use crate::domain::models::ContentPiece;
use crate::domain::models::NoticeType;
use crate::domain::models::View;
use crate::domain::services::Catalog;
use crate::domain::services::Transcript;

fn app_state() -> (AppState, mpsc::UnboundedReceiver<Action>) {
    let (tx, rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = AppState::new(tx, Transcript::seeded(), Catalog::default(), None);
    app_state.last_known_width = 100;
    app_state.last_known_height = 40;
    return (app_state, rx);
}

fn app_state_without_assistant() -> (AppState, mpsc::UnboundedReceiver<Action>) {
    let (tx, rx) = mpsc::unbounded_channel::<Action>();
    let app_state = AppState::new(
        tx,
        Transcript::seeded(),
        Catalog::default(),
        Some("AI client could not be initialized. Make sure your API key is configured.".to_string()),
    );
    return (app_state, rx);
}

mod handle_input {
    use super::*;

    #[tokio::test]
    async fn it_exits_on_quit() -> Result<()> {
        let (mut app_state, _rx) = app_state();
        app_state.handle_input("/q").await?;

        assert!(app_state.exit);
        return Ok(());
    }

    #[tokio::test]
    async fn it_switches_views() -> Result<()> {
        let (mut app_state, _rx) = app_state();

        app_state.handle_input("/groups").await?;
        assert_eq!(app_state.view, View::Groups);

        app_state.handle_input("/chat").await?;
        assert_eq!(app_state.view, View::Assistant);

        return Ok(());
    }

    #[tokio::test]
    async fn it_ignores_empty_input() -> Result<()> {
        let (mut app_state, mut rx) = app_state();
        app_state.handle_input("   ").await?;

        assert!(!app_state.waiting_for_backend);
        assert!(rx.try_recv().is_err());
        return Ok(());
    }

    #[tokio::test]
    async fn it_sends_a_chat_message() -> Result<()> {
        let (mut app_state, mut rx) = app_state();
        app_state.handle_input("Explain recursion").await?;

        assert_eq!(app_state.view, View::Assistant);
        assert!(app_state.waiting_for_backend);
        assert!(app_state.transcript.in_progress());
        assert_eq!(app_state.transcript.turns().len(), 3);
        assert_eq!(app_state.transcript.turns()[1].author, Author::User);
        assert_eq!(app_state.transcript.turns()[1].text(), "Explain recursion");

        match rx.try_recv()? {
            Action::AssistantRequest(prompt) => {
                assert_eq!(prompt.history.len(), 1);
                assert_eq!(prompt.pieces.len(), 1);
            }
            _ => panic!("expected an assistant request"),
        }

        return Ok(());
    }

    #[tokio::test]
    async fn it_sends_a_staged_attachment_without_text() -> Result<()> {
        let (mut app_state, mut rx) = app_state();

        let dir = tempfile::tempdir()?;
        let file_path = dir.path().join("notes.txt");
        tokio::fs::write(&file_path, "hello").await?;
        app_state
            .handle_input(&format!("/attach {}", file_path.display()))
            .await?;
        assert!(app_state.staged_attachment.is_some());

        app_state.handle_input("   ").await?;

        assert!(app_state.staged_attachment.is_none());
        assert!(app_state.waiting_for_backend);
        assert_eq!(app_state.transcript.turns().len(), 3);
        let user_turn = &app_state.transcript.turns()[1];
        assert_eq!(user_turn.author, Author::User);
        assert_eq!(user_turn.attachment.as_ref().unwrap().name, "notes.txt");

        match rx.try_recv()? {
            Action::AssistantRequest(prompt) => {
                assert_eq!(prompt.pieces.len(), 1);
                match &prompt.pieces[0] {
                    ContentPiece::InlineData { mime_type, .. } => {
                        assert_eq!(mime_type, "text/plain");
                    }
                    _ => panic!("expected an inline data piece"),
                }
            }
            _ => panic!("expected an assistant request"),
        }

        return Ok(());
    }

    #[tokio::test]
    async fn it_rejects_a_second_send_while_streaming() -> Result<()> {
        let (mut app_state, mut rx) = app_state();
        app_state.handle_input("First question").await?;
        rx.try_recv()?;

        app_state.handle_input("Second question").await?;

        assert_eq!(app_state.transcript.turns().len(), 3);
        assert!(rx.try_recv().is_err());
        return Ok(());
    }

    #[tokio::test]
    async fn it_notifies_once_when_the_assistant_is_unavailable() -> Result<()> {
        let (mut app_state, mut rx) = app_state_without_assistant();

        app_state.handle_input("Hello?").await?;
        assert_eq!(app_state.notices.len(), 1);
        assert!(!app_state.waiting_for_backend);
        assert_eq!(app_state.transcript.turns().len(), 1);
        assert!(rx.try_recv().is_err());

        app_state.handle_input("Anyone there?").await?;
        assert_eq!(app_state.notices.len(), 1);

        return Ok(());
    }

    #[tokio::test]
    async fn it_uploads_a_course() -> Result<()> {
        let (mut app_state, mut rx) = app_state();
        app_state
            .handle_input("/upload cs101;Intro to CS;Dr. Turing;syllabus.pdf")
            .await?;

        match rx.try_recv()? {
            Action::UploadCourse(draft) => {
                assert_eq!(draft.code, "cs101");
                assert_eq!(draft.file_name, "syllabus.pdf");
            }
            _ => panic!("expected an upload"),
        }

        return Ok(());
    }

    #[tokio::test]
    async fn it_rejects_an_incomplete_upload() -> Result<()> {
        let (mut app_state, mut rx) = app_state();
        app_state.handle_input("/upload cs101;;Dr. Turing;x.pdf").await?;

        assert!(rx.try_recv().is_err());
        let notices = app_state.notices.visible(std::time::Instant::now());
        assert_eq!(notices[0].0.text, "Please fill all fields and select a file.");
        assert_eq!(notices[0].0.ntype, NoticeType::Error);
        return Ok(());
    }

    #[tokio::test]
    async fn it_joins_a_group_by_position() -> Result<()> {
        let (mut app_state, mut rx) = app_state();
        let id = app_state.catalog.groups[0].id.to_string();

        app_state.handle_input("/join 1").await?;

        assert!(app_state.is_pending(&id));
        match rx.try_recv()? {
            Action::JoinGroup(group_id) => assert_eq!(group_id, id),
            _ => panic!("expected a join"),
        }

        // A repeat while the first is in flight is dropped.
        app_state.handle_input("/join 1").await?;
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[tokio::test]
    async fn it_refuses_to_join_a_full_group() -> Result<()> {
        let (mut app_state, mut rx) = app_state();
        let full_index = app_state
            .catalog
            .groups
            .iter()
            .position(|e| return e.is_full())
            .unwrap();

        app_state
            .handle_input(&format!("/join {}", full_index + 1))
            .await?;

        assert!(rx.try_recv().is_err());
        let notices = app_state.notices.visible(std::time::Instant::now());
        assert_eq!(notices[0].0.text, "This group is now full.");
        return Ok(());
    }

    #[tokio::test]
    async fn it_filters_partners_before_connecting() -> Result<()> {
        let (mut app_state, mut rx) = app_state();
        app_state.handle_input("/find quantum").await?;
        assert_eq!(app_state.view, View::Partners);

        let expected_id = app_state.catalog.filter_students("quantum")[0].id.to_string();
        app_state.handle_input("/connect 1").await?;

        match rx.try_recv()? {
            Action::ConnectPartner(id) => assert_eq!(id, expected_id),
            _ => panic!("expected a connect"),
        }

        return Ok(());
    }

    #[tokio::test]
    async fn it_clears_the_chat() -> Result<()> {
        let (mut app_state, _rx) = app_state();
        app_state.transcript.append(crate::domain::models::Turn::new(
            Author::User,
            "hello",
        ));

        app_state.handle_input("/clear").await?;

        assert_eq!(app_state.transcript.turns().len(), 1);
        assert!(app_state.take_dirty().transcript);
        return Ok(());
    }

    #[tokio::test]
    async fn it_exports_the_transcript_as_markup() -> Result<()> {
        let (mut app_state, mut rx) = app_state();
        app_state.handle_input("/export").await?;

        match rx.try_recv()? {
            Action::CopyTranscript(markup) => {
                assert!(markup.starts_with("<p><strong>Study Assistant</strong></p>"));
                assert!(markup.contains("<p>"));
            }
            _ => panic!("expected a copy"),
        }

        return Ok(());
    }
}

mod handle_events {
    use super::*;

    #[tokio::test]
    async fn it_accumulates_streamed_fragments() -> Result<()> {
        let (mut app_state, _rx) = app_state();
        app_state.handle_input("Explain recursion").await?;

        app_state.handle_assistant_response(AssistantResponse {
            text: "Recursion is ".to_string(),
            done: false,
        });
        app_state.handle_assistant_response(AssistantResponse {
            text: "self-reference.".to_string(),
            done: false,
        });

        let last = app_state.transcript.turns().last().unwrap();
        assert_eq!(last.text(), "Recursion is self-reference.");
        assert!(app_state.waiting_for_backend);

        app_state.handle_assistant_response(AssistantResponse {
            text: "".to_string(),
            done: true,
        });

        assert!(!app_state.waiting_for_backend);
        assert!(!app_state.transcript.in_progress());
        return Ok(());
    }

    #[tokio::test]
    async fn it_discards_the_placeholder_on_error() -> Result<()> {
        let (mut app_state, _rx) = app_state();
        app_state.handle_input("Explain recursion").await?;
        assert_eq!(app_state.transcript.turns().len(), 3);

        app_state.handle_assistant_error("boom");

        assert_eq!(app_state.transcript.turns().len(), 2);
        assert!(!app_state.waiting_for_backend);
        let notices = app_state.notices.visible(std::time::Instant::now());
        assert_eq!(
            notices[0].0.text,
            "Sorry, something went wrong. The AI may be unavailable."
        );
        return Ok(());
    }

    #[tokio::test]
    async fn it_applies_a_join_at_event_time() -> Result<()> {
        let (mut app_state, _rx) = app_state();
        let id = app_state.catalog.groups[0].id.to_string();
        let before = app_state.catalog.groups[0].members;

        app_state.handle_input("/join 1").await?;
        app_state.handle_group_joined(&id);

        assert!(!app_state.is_pending(&id));
        assert_eq!(app_state.catalog.groups[0].members, before + 1);
        return Ok(());
    }

    #[test]
    fn it_marks_a_partner_connected() {
        let (mut app_state, _rx) = app_state();
        let student = app_state.catalog.students[0].to_owned();

        app_state.handle_partner_connected(&student.id);

        assert!(app_state.catalog.students[0].connected);
        let notices = app_state.notices.visible(std::time::Instant::now());
        assert_eq!(
            notices[0].0.text,
            format!("Connection request sent to {}!", student.name)
        );
    }

    #[tokio::test]
    async fn it_keeps_the_user_turn_savable_when_exiting_mid_stream() -> Result<()> {
        let (mut app_state, _rx) = app_state();
        app_state.handle_input("Explain recursion").await?;
        // The send-time dirty bit was consumed by a save that skipped the
        // mid-stream transcript.
        assert!(app_state.take_dirty().transcript);
        assert!(app_state.transcript.in_progress());

        app_state.prepare_shutdown();

        assert!(!app_state.transcript.in_progress());
        assert_eq!(app_state.transcript.turns().len(), 2);
        assert_eq!(app_state.transcript.turns()[1].text(), "Explain recursion");
        assert!(app_state.take_dirty().transcript);
        return Ok(());
    }

    #[tokio::test]
    async fn it_leaves_a_settled_transcript_alone_on_shutdown() -> Result<()> {
        let (mut app_state, _rx) = app_state();
        app_state.handle_input("Explain recursion").await?;
        app_state.handle_assistant_response(AssistantResponse {
            text: "Done.".to_string(),
            done: true,
        });
        app_state.take_dirty();

        app_state.prepare_shutdown();

        assert_eq!(app_state.transcript.turns().len(), 3);
        assert!(!app_state.take_dirty().transcript);
        return Ok(());
    }

    #[test]
    fn it_resets_help_before_notices_on_esc() {
        let (mut app_state, _rx) = app_state();
        app_state.show_help = true;
        app_state.notices.push(NoticeType::Info, "hello");

        app_state.handle_esc();
        assert!(!app_state.show_help);
        assert_eq!(app_state.notices.len(), 1);

        app_state.handle_esc();
        assert!(app_state.notices.is_empty());
    }
}
