use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::ContentPiece;
use super::Event;
use super::Turn;

/// Persona handed to the completion endpoint with every request.
pub const SYSTEM_INSTRUCTION: &str = "You are a friendly and helpful study assistant for university students. Your goal is to explain complex topics simply, provide study guidance, and help students learn effectively. If a file is provided, prioritize answering based on the file content. Your responses should be encouraging and formatted clearly using markdown (e.g., use ** for bold, lists with *, and ` for code).";

/// The full conversation to complete: every prior session turn, plus the
/// pieces of the just-composed user turn (which may include inline binary
/// data that is never persisted).
pub struct AssistantPrompt {
    pub history: Vec<Turn>,
    pub pieces: Vec<ContentPiece>,
}

pub struct AssistantResponse {
    pub text: String,
    pub done: bool,
}

#[async_trait]
pub trait AssistantBackend {
    /// Requests a streaming completion. Fragments are passed through the
    /// channel in arrival order, followed by a final response with `done`
    /// set. The call is not restartable; a dropped connection simply ends
    /// the fragment sequence.
    async fn get_completion<'a>(
        &self,
        prompt: AssistantPrompt,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()>;
}

pub type BackendBox = Box<dyn AssistantBackend + Send + Sync>;
