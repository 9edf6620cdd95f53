//! Response suggestion generation for finalized transcript segments.

pub mod invoker;
pub mod openai;

pub use invoker::{fallback_text, SuggestionInvoker, SuggestionResult, DEFAULT_SUGGESTION_TIMEOUT};
pub use openai::OpenAiSuggestionService;

use anyhow::Result;
use async_trait::async_trait;

/// Request passed to the external suggestion generator.
#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    pub transcript: String,
    pub style_prompt: String,
    pub language: String,
}

/// External text-suggestion generator.
#[async_trait]
pub trait SuggestionService: Send + Sync {
    /// Generate a response suggestion for one finalized transcript.
    async fn generate(&self, request: &SuggestionRequest) -> Result<String>;
}
