pub mod openai;

use std::future::Future;

use serde::Serialize;

use crate::error::DraftError;
use crate::state::ChatMessage;

pub use openai::OpenAIClient;

/// Body of one chat-completion call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Anything that can turn a [`CompletionRequest`] into generated text.
///
/// Implemented by [`OpenAIClient`] for real endpoints; tests substitute a
/// recording fake.
pub trait CompletionBackend: Send + Sync {
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, DraftError>> + Send;
}
