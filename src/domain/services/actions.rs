use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time;

use crate::domain::models::Action;
use crate::domain::models::Course;
use crate::domain::models::Event;
use crate::domain::models::StudyGroup;
use crate::infrastructure::backends::AssistantClient;

// The portal backend is simulated; these delays stand in for network
// round trips so the UI's in-flight states are observable.
const UPLOAD_DELAY: Duration = Duration::from_millis(1500);
const CREATE_GROUP_DELAY: Duration = Duration::from_millis(1500);
const JOIN_DELAY: Duration = Duration::from_millis(1000);
const CONNECT_DELAY: Duration = Duration::from_millis(1000);

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /courses /groups /partners /chat - Switch between portal views.
- /upload (/u) CODE;NAME;INSTRUCTOR;FILE - Upload course material.
- /download (/d) N - Download materials for the Nth listed course.
- /newgroup (/ng) NAME;CODE[;CAPACITY] - Create a study group.
- /join (/j) N - Join the Nth listed study group.
- /find (/f) TERM - Filter study partners by name, major, or course.
- /connect (/co) N - Send a connection request to the Nth listed partner.
- /attach (/a) PATH - Stage a file (up to 2MB) for your next question.
- /detach (/da) - Remove the staged file.
- /clear (/c) - Clear the chat history.
- /export (/e) - Copy the transcript to the clipboard as markup.
- /reset (/r) [courses|groups|partners|chat] - Reset a section's data.
- /help (/h) - Provides this help menu.
- /quit /exit (/q) - Exit StudySphere.

HOTKEYS:
- Tab - Cycle through views.
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- Esc - Dismiss the help menu, or the newest notice.
- CTRL+C - Exit.

Anything typed without a leading slash is sent to the AI assistant.
        "#;

    return text.trim().to_string();
}

fn worker_error(err: anyhow::Error, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    tx.send(Event::AssistantError(format!("{err:?}")))?;
    return Ok(());
}

fn copy_to_clipboard(slot: &mut Option<arboard::Clipboard>, text: String) -> Result<()> {
    if slot.is_none() {
        *slot = Some(arboard::Clipboard::new()?);
    }

    if let Some(clipboard) = slot.as_mut() {
        clipboard.set_text(text)?;
    }

    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        client: AssistantClient,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let client = Arc::new(client);
        // Kept alive between copies; some platforms drop the selection when
        // the clipboard handle goes away.
        let mut clipboard: Option<arboard::Clipboard> = None;

        loop {
            let event = rx.recv().await;
            if event.is_none() {
                continue;
            }

            let worker_tx = tx.clone();
            match event.unwrap() {
                Action::AssistantRequest(prompt) => {
                    let worker_client = client.clone();
                    tokio::spawn(async move {
                        let res = worker_client.get_completion(prompt, &worker_tx).await;
                        if let Err(err) = res {
                            worker_error(err, &worker_tx)?;
                        }

                        return Ok::<(), anyhow::Error>(());
                    });
                }
                Action::UploadCourse(draft) => {
                    tokio::spawn(async move {
                        time::sleep(UPLOAD_DELAY).await;
                        worker_tx.send(Event::CourseUploaded(Course::from_draft(draft)))?;
                        return Ok::<(), anyhow::Error>(());
                    });
                }
                Action::CreateGroup(draft) => {
                    tokio::spawn(async move {
                        time::sleep(CREATE_GROUP_DELAY).await;
                        worker_tx.send(Event::GroupCreated(StudyGroup::from_draft(draft)))?;
                        return Ok::<(), anyhow::Error>(());
                    });
                }
                Action::JoinGroup(id) => {
                    tokio::spawn(async move {
                        time::sleep(JOIN_DELAY).await;
                        worker_tx.send(Event::GroupJoined(id))?;
                        return Ok::<(), anyhow::Error>(());
                    });
                }
                Action::ConnectPartner(id) => {
                    tokio::spawn(async move {
                        time::sleep(CONNECT_DELAY).await;
                        worker_tx.send(Event::PartnerConnected(id))?;
                        return Ok::<(), anyhow::Error>(());
                    });
                }
                Action::CopyTranscript(markup) => match copy_to_clipboard(&mut clipboard, markup) {
                    Ok(()) => {
                        tx.send(Event::TranscriptCopied())?;
                    }
                    Err(err) => {
                        tracing::warn!(error = ?err, "clipboard unavailable");
                    }
                },
            }
        }
    }
}
