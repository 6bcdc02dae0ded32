pub mod gemini;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AssistantPrompt;
use crate::domain::models::BackendBox;
use crate::domain::models::Event;

/// The remote assistant, or the typed reason it can never answer. The key
/// check happens once at startup; everything downstream branches on this
/// value rather than probing a global.
pub enum AssistantClient {
    Ready(BackendBox),
    Unavailable { reason: String },
}

impl AssistantClient {
    pub fn from_config() -> AssistantClient {
        if Config::get(ConfigKey::GeminiToken).is_empty() {
            return AssistantClient::Unavailable {
                reason: "AI client could not be initialized. Make sure your API key is configured."
                    .to_string(),
            };
        }

        return AssistantClient::Ready(Box::<gemini::Gemini>::default());
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            AssistantClient::Ready(_) => return None,
            AssistantClient::Unavailable { reason } => return Some(reason),
        }
    }

    pub async fn get_completion(
        &self,
        prompt: AssistantPrompt,
        tx: &mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        match self {
            AssistantClient::Ready(backend) => return backend.get_completion(prompt, tx).await,
            AssistantClient::Unavailable { reason } => bail!(reason.to_string()),
        }
    }
}
