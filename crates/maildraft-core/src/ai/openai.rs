use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error};

use super::{CompletionBackend, CompletionRequest};
use crate::error::DraftError;

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

// Error envelope used by OpenAI and compatible APIs
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for any endpoint implementing `POST {base_url}/chat/completions`.
///
/// Cheap to clone; `reqwest::Client` is reference counted internally.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAIClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub async fn query(&self, request: &CompletionRequest) -> Result<String, DraftError> {
        let url = self.endpoint();
        debug!(
            %url,
            model = %request.model,
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            messages = request.messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(%url, error = %e, "completion request failed (transport)");
                DraftError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DraftError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let err = status_error(status, &body);
            error!(%status, kind = err.kind(), error = %err, "completion endpoint returned an error");
            return Err(err);
        }

        let text = parse_completion(&body)?;
        debug!(chars = text.chars().count(), "received completion");
        Ok(text)
    }
}

impl CompletionBackend for OpenAIClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DraftError> {
        self.query(request).await
    }
}

/// Classify a non-success response.
fn status_error(status: StatusCode, body: &str) -> DraftError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|env| env.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DraftError::Unauthorized {
            status: status.as_u16(),
            message,
        },
        _ => DraftError::Api { status: status.as_u16(), message },
    }
}

/// Extract the first choice's content, verbatim.
fn parse_completion(body: &str) -> Result<String, DraftError> {
    let response: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| DraftError::MalformedResponse(format!("invalid JSON body: {e}")))?;

    response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| DraftError::MalformedResponse("response has no choices".into()))?
        .message
        .content
        .ok_or_else(|| DraftError::MalformedResponse("first choice has no content".into()))
}
