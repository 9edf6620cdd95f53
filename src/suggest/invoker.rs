use super::{SuggestionRequest, SuggestionService};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// Default ceiling on one suggestion call.
pub const DEFAULT_SUGGESTION_TIMEOUT: Duration = Duration::from_secs(15);

/// Outcome of one suggestion attempt.
///
/// Failures carry fallback text in `response_text` instead of an error; a
/// missing suggestion never blocks transcript persistence or kills the
/// session.
#[derive(Debug, Clone)]
pub struct SuggestionResult {
    pub request_text: String,
    pub style_prompt_used: String,
    pub language_used: String,
    pub response_text: String,
    pub ok: bool,
}

/// Fixed substitute text for a failed suggestion, by language.
pub fn fallback_text(language: &str) -> &'static str {
    match language.split(['-', '_']).next().unwrap_or("") {
        "ko" => "죄송합니다. 지금은 답변 제안을 생성할 수 없습니다.",
        "ja" => "申し訳ありません。現在、返答の提案を生成できません。",
        "es" => "Lo sentimos, no se pudo generar una sugerencia en este momento.",
        _ => "Sorry, a suggestion could not be generated right now.",
    }
}

/// Invokes the suggestion generator with a bounded timeout, degrading every
/// failure to fallback text.
#[derive(Clone)]
pub struct SuggestionInvoker {
    service: Arc<dyn SuggestionService>,
    timeout: Duration,
}

impl SuggestionInvoker {
    pub fn new(service: Arc<dyn SuggestionService>) -> Self {
        Self {
            service,
            timeout: DEFAULT_SUGGESTION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Request a suggestion for one finalized transcript segment.
    pub async fn suggest(&self, text: &str, style_prompt: &str, language: &str) -> SuggestionResult {
        let request = SuggestionRequest {
            transcript: text.to_string(),
            style_prompt: style_prompt.to_string(),
            language: language.to_string(),
        };

        let (response_text, ok) = match timeout(self.timeout, self.service.generate(&request)).await
        {
            Ok(Ok(response)) => (response, true),
            Ok(Err(e)) => {
                warn!("Suggestion generation failed: {:#}", e);
                (fallback_text(language).to_string(), false)
            }
            Err(_) => {
                warn!(
                    "Suggestion generation timed out after {:?}",
                    self.timeout
                );
                (fallback_text(language).to_string(), false)
            }
        };

        SuggestionResult {
            request_text: request.transcript,
            style_prompt_used: request.style_prompt,
            language_used: request.language,
            response_text,
            ok,
        }
    }
}
