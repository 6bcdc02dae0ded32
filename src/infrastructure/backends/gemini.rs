#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AssistantBackend;
use crate::domain::models::AssistantPrompt;
use crate::domain::models::AssistantResponse;
use crate::domain::models::Author;
use crate::domain::models::ContentPiece;
use crate::domain::models::Event;
use crate::domain::models::SYSTEM_INSTRUCTION;

fn convert_err(err: reqwest::Error) -> std::io::Error {
    let err_msg = err.to_string();
    return std::io::Error::new(std::io::ErrorKind::Interrupted, err_msg);
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<ContentPiece>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SystemInstruction {
    parts: Vec<ContentPiece>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest {
    contents: Vec<Content>,
    system_instruction: SystemInstruction,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    text: String,
}

pub struct Gemini {
    url: String,
    token: String,
    model: String,
}

impl Default for Gemini {
    fn default() -> Gemini {
        return Gemini {
            url: "https://generativelanguage.googleapis.com".to_string(),
            token: Config::get(ConfigKey::GeminiToken),
            model: Config::get(ConfigKey::Model),
        };
    }
}

fn role_for(author: Author) -> String {
    match author {
        Author::User => return "user".to_string(),
        Author::Assistant => return "model".to_string(),
    }
}

#[async_trait]
impl AssistantBackend for Gemini {
    #[allow(clippy::implicit_return)]
    async fn get_completion<'a>(
        &self,
        prompt: AssistantPrompt,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        let mut contents = prompt
            .history
            .iter()
            .map(|turn| {
                return Content {
                    role: role_for(turn.author),
                    parts: turn.pieces.to_owned(),
                };
            })
            .collect::<Vec<Content>>();

        contents.push(Content {
            role: "user".to_string(),
            parts: prompt.pieces,
        });

        let req = CompletionRequest {
            contents,
            system_instruction: SystemInstruction {
                parts: vec![ContentPiece::Text(SYSTEM_INSTRUCTION.to_string())],
            },
        };

        let res = reqwest::Client::new()
            .post(format!(
                "{url}/v1beta/{model}:streamGenerateContent?key={key}",
                url = self.url,
                model = self.model,
                key = self.token,
            ))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "failed to make completion request to Gemini"
            );
            bail!(format!(
                "Failed to make completion request to Gemini, {}",
                res.status().as_u16()
            ));
        }

        let stream = res.bytes_stream().map_err(convert_err);
        let mut lines_reader = StreamReader::new(stream).lines();

        // The response is a pretty-printed JSON array streamed chunk by
        // chunk. Scanning for the "text" lines avoids buffering the whole
        // document before the first fragment can be shown.
        while let Some(line) = lines_reader.next_line().await? {
            let cleaned_line = line.trim().trim_end_matches(',').to_string();
            if !cleaned_line.starts_with("\"text\":") {
                continue;
            }

            let ores: GenerateContentResponse =
                serde_json::from_str(&format!("{{ {cleaned_line} }}"))?;
            if ores.text.is_empty() {
                continue;
            }

            tx.send(Event::AssistantPromptResponse(AssistantResponse {
                text: ores.text,
                done: false,
            }))?;
        }

        tx.send(Event::AssistantPromptResponse(AssistantResponse {
            text: "".to_string(),
            done: true,
        }))?;

        return Ok(());
    }
}
