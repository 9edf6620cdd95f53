use super::{SuggestionRequest, SuggestionService};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Suggestion generator backed by an OpenAI-compatible chat completion API.
///
/// The style prompt becomes the system message; the transcript and target
/// language go into the user message.
pub struct OpenAiSuggestionService {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiSuggestionService {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl SuggestionService for OpenAiSuggestionService {
    async fn generate(&self, request: &SuggestionRequest) -> Result<String> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.style_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!(
                        "Based on the following transcript, provide a response in {}. Transcript: {}",
                        request.language, request.transcript
                    ),
                },
            ],
        };

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Suggestion request failed")?;

        if !response.status().is_success() {
            bail!("Suggestion service returned {}", response.status());
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse suggestion response")?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .context("Suggestion response contained no choices")?;

        Ok(choice.message.content)
    }
}
