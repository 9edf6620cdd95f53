//! Persistence collaborator consumed by the session core.
//!
//! The core only reads meetings and style prompts and appends transcript
//! records; everything else on this surface backs the REST API.

pub mod memory;
pub mod types;

pub use memory::MemoryStorage;
pub use types::{AnswerStyle, Meeting, TranscriptRecord};

use anyhow::Result;
use async_trait::async_trait;

/// Prompt applied when a session has no answer style selected.
pub const DEFAULT_STYLE_PROMPT: &str =
    "You are a helpful meeting assistant. Suggest a short, professional reply to the last thing said.";

#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_meeting(&self, title: Option<String>, language: String) -> Result<Meeting>;
    async fn get_meeting(&self, meeting_id: &str) -> Result<Option<Meeting>>;
    /// All meetings, newest first.
    async fn list_meetings(&self) -> Result<Vec<Meeting>>;
    /// Removes a meeting and its transcripts. Returns whether it existed.
    async fn delete_meeting(&self, meeting_id: &str) -> Result<bool>;

    async fn create_style(&self, name: String, prompt: String) -> Result<AnswerStyle>;
    async fn list_styles(&self) -> Result<Vec<AnswerStyle>>;
    async fn delete_style(&self, style_id: &str) -> Result<bool>;
    /// Resolves a style selection to its prompt. Unknown or absent styles
    /// fall back to the default prompt.
    async fn style_prompt(&self, style_id: Option<&str>) -> Result<String>;

    async fn save_transcript(
        &self,
        meeting_id: &str,
        text: &str,
        suggestion: &str,
    ) -> Result<TranscriptRecord>;
    /// Transcript records for one meeting, in insertion order.
    async fn transcripts_for(&self, meeting_id: &str) -> Result<Vec<TranscriptRecord>>;
}
