use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;

use super::Gemini;
use crate::domain::models::AssistantBackend;
use crate::domain::models::AssistantPrompt;
use crate::domain::models::AssistantResponse;
use crate::domain::models::Author;
use crate::domain::models::ContentPiece;
use crate::domain::models::Event;
use crate::domain::models::Turn;

impl Gemini {
    fn with_url(url: String) -> Gemini {
        return Gemini {
            url,
            token: "abc".to_string(),
            model: "model-1".to_string(),
        };
    }
}

fn to_res(action: Option<Event>) -> Result<AssistantResponse> {
    let act = match action.unwrap() {
        Event::AssistantPromptResponse(res) => res,
        _ => bail!("Wrong type from recv"),
    };

    return Ok(act);
}

#[tokio::test]
async fn it_gets_completions() -> Result<()> {
    let body = [
        "[{",
        "\"candidates\": [{",
        "\"content\": {",
        "\"parts\": [{",
        "\"text\": \"Hello \"",
        "}],",
        "\"role\": \"model\"",
        "}",
        "}]",
        "},",
        "{",
        "\"candidates\": [{",
        "\"content\": {",
        "\"parts\": [{",
        "\"text\": \"World\",",
        "\"dummy\": true",
        "}],",
        "\"role\": \"model\"",
        "}",
        "}]",
        "},",
        "{",
        "\"candidates\": [{",
        "\"content\": {",
        "\"parts\": [{",
        "\"text\": \"\"",
        "}],",
        "\"role\": \"model\"",
        "}",
        "}]",
        "}]",
    ]
    .join("\n");

    let prompt = AssistantPrompt {
        history: vec![
            Turn::new(Author::Assistant, "Hello! How can I help?"),
            Turn::new(Author::User, "Hi there"),
        ],
        pieces: vec![ContentPiece::Text("Say hi to the world".to_string())],
    };

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1beta/model-1:streamGenerateContent?key=abc")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "contents": [
                { "role": "model", "parts": [{ "text": "Hello! How can I help?" }] },
                { "role": "user", "parts": [{ "text": "Hi there" }] },
                { "role": "user", "parts": [{ "text": "Say hi to the world" }] }
            ]
        })))
        .with_status(200)
        .with_body(body)
        .create();

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();

    let backend = Gemini::with_url(server.url());
    backend.get_completion(prompt, &tx).await?;

    mock.assert();

    let first_recv = to_res(rx.recv().await)?;
    let second_recv = to_res(rx.recv().await)?;
    let third_recv = to_res(rx.recv().await)?;

    assert_eq!(first_recv.text, "Hello ".to_string());
    assert!(!first_recv.done);

    assert_eq!(second_recv.text, "World".to_string());
    assert!(!second_recv.done);

    // The empty fragment is dropped; the next send is the terminator.
    assert_eq!(third_recv.text, "".to_string());
    assert!(third_recv.done);

    return Ok(());
}

#[tokio::test]
async fn it_sends_the_system_instruction() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1beta/model-1:streamGenerateContent?key=abc")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "systemInstruction": {
                "parts": [{ "text": super::SYSTEM_INSTRUCTION }]
            }
        })))
        .with_status(200)
        .with_body("[]")
        .create();

    let (tx, _rx) = mpsc::unbounded_channel::<Event>();
    let prompt = AssistantPrompt {
        history: vec![],
        pieces: vec![ContentPiece::Text("Hello".to_string())],
    };

    Gemini::with_url(server.url())
        .get_completion(prompt, &tx)
        .await?;

    mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_forwards_inline_data() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1beta/model-1:streamGenerateContent?key=abc")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "inlineData": { "mimeType": "text/plain", "data": "aGVsbG8=" } },
                    { "text": "Summarize this" }
                ]
            }]
        })))
        .with_status(200)
        .with_body("[]")
        .create();

    let (tx, _rx) = mpsc::unbounded_channel::<Event>();
    let prompt = AssistantPrompt {
        history: vec![],
        pieces: vec![
            ContentPiece::InlineData {
                mime_type: "text/plain".to_string(),
                data: "aGVsbG8=".to_string(),
            },
            ContentPiece::Text("Summarize this".to_string()),
        ],
    };

    Gemini::with_url(server.url())
        .get_completion(prompt, &tx)
        .await?;

    mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_fails_on_an_error_status() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1beta/model-1:streamGenerateContent?key=abc")
        .with_status(500)
        .create();

    let (tx, _rx) = mpsc::unbounded_channel::<Event>();
    let prompt = AssistantPrompt {
        history: vec![],
        pieces: vec![ContentPiece::Text("Hello".to_string())],
    };

    let res = Gemini::with_url(server.url())
        .get_completion(prompt, &tx)
        .await;

    assert!(res.is_err());
    mock.assert();
}
