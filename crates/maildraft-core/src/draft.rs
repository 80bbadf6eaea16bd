//! Draft generation: one prompt, one completion call.

use tracing::{info, warn};

use crate::ai::{CompletionBackend, CompletionRequest};
use crate::error::DraftError;
use crate::form::EmailDetails;
use crate::prompt::build_messages;
use crate::tone::temperature_for;

pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_MAX_TOKENS: u32 = 250;

/// Stored in place of a draft when the completion call fails.
pub const FAILURE_DRAFT: &str = "Failed to generate email draft due to an API error.";

#[derive(Clone)]
pub struct DraftGenerator<B> {
    backend: B,
    model: String,
    max_tokens: u32,
}

impl<B: CompletionBackend> DraftGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn request_for(&self, details: &EmailDetails) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: build_messages(details),
            max_tokens: self.max_tokens,
            temperature: temperature_for(&details.tone),
        }
    }

    /// Issue exactly one completion call for `details`.
    ///
    /// Does not check the input guard; callers go through
    /// [`crate::session::Session::prepare`] first.
    pub async fn generate(&self, details: &EmailDetails) -> Result<String, DraftError> {
        let request = self.request_for(details);
        info!(
            model = %request.model,
            tone = %details.tone,
            temperature = request.temperature,
            key_points = details.key_points.len(),
            "generating email draft"
        );

        match self.backend.complete(&request).await {
            Ok(text) => {
                info!(chars = text.chars().count(), "email draft generated");
                Ok(text)
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "email draft generation failed");
                Err(e)
            }
        }
    }
}

#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use std::sync::{Arc, Mutex};

    use crate::ai::{CompletionBackend, CompletionRequest};
    use crate::error::DraftError;

    /// Records every request and answers with a canned reply
    #[derive(Clone)]
    pub struct RecordingBackend {
        pub calls: Arc<Mutex<Vec<CompletionRequest>>>,
        reply: Result<String, DraftError>,
    }

    impl RecordingBackend {
        pub fn replying(text: &str) -> Self {
            Self { calls: Arc::default(), reply: Ok(text.to_string()) }
        }

        pub fn failing(err: DraftError) -> Self {
            Self { calls: Arc::default(), reply: Err(err) }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn last_request(&self) -> Option<CompletionRequest> {
            self.calls.lock().unwrap().last().cloned()
        }
    }

    impl CompletionBackend for RecordingBackend {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, DraftError> {
            self.calls.lock().unwrap().push(request.clone());
            self.reply.clone()
        }
    }
}
