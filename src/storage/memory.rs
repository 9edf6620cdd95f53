use super::types::{AnswerStyle, Meeting, TranscriptRecord};
use super::{Storage, DEFAULT_STYLE_PROMPT};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory storage backend. Backs tests and single-node deployments.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    meetings: HashMap<String, Meeting>,
    styles: HashMap<String, AnswerStyle>,
    transcripts: Vec<TranscriptRecord>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_meeting(&self, title: Option<String>, language: String) -> Result<Meeting> {
        let created_at = Utc::now();
        let meeting = Meeting {
            id: uuid::Uuid::new_v4().to_string(),
            title: title
                .unwrap_or_else(|| format!("Meeting on {}", created_at.format("%Y-%m-%d"))),
            language,
            created_at,
        };

        let mut inner = self.inner.write().await;
        inner.meetings.insert(meeting.id.clone(), meeting.clone());

        Ok(meeting)
    }

    async fn get_meeting(&self, meeting_id: &str) -> Result<Option<Meeting>> {
        let inner = self.inner.read().await;
        Ok(inner.meetings.get(meeting_id).cloned())
    }

    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        let inner = self.inner.read().await;
        let mut meetings: Vec<Meeting> = inner.meetings.values().cloned().collect();
        meetings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(meetings)
    }

    async fn delete_meeting(&self, meeting_id: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let removed = inner.meetings.remove(meeting_id).is_some();
        if removed {
            // Transcripts belong to their meeting and go with it.
            inner.transcripts.retain(|t| t.meeting_id != meeting_id);
        }
        Ok(removed)
    }

    async fn create_style(&self, name: String, prompt: String) -> Result<AnswerStyle> {
        let style = AnswerStyle {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            prompt,
        };

        let mut inner = self.inner.write().await;
        inner.styles.insert(style.id.clone(), style.clone());

        Ok(style)
    }

    async fn list_styles(&self) -> Result<Vec<AnswerStyle>> {
        let inner = self.inner.read().await;
        let mut styles: Vec<AnswerStyle> = inner.styles.values().cloned().collect();
        styles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(styles)
    }

    async fn delete_style(&self, style_id: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.styles.remove(style_id).is_some())
    }

    async fn style_prompt(&self, style_id: Option<&str>) -> Result<String> {
        if let Some(style_id) = style_id {
            let inner = self.inner.read().await;
            if let Some(style) = inner.styles.get(style_id) {
                return Ok(style.prompt.clone());
            }
        }
        Ok(DEFAULT_STYLE_PROMPT.to_string())
    }

    async fn save_transcript(
        &self,
        meeting_id: &str,
        text: &str,
        suggestion: &str,
    ) -> Result<TranscriptRecord> {
        let record = TranscriptRecord {
            id: uuid::Uuid::new_v4().to_string(),
            meeting_id: meeting_id.to_string(),
            text: text.to_string(),
            suggestion: suggestion.to_string(),
            recorded_at: Utc::now(),
        };

        let mut inner = self.inner.write().await;
        inner.transcripts.push(record.clone());

        Ok(record)
    }

    async fn transcripts_for(&self, meeting_id: &str) -> Result<Vec<TranscriptRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .transcripts
            .iter()
            .filter(|t| t.meeting_id == meeting_id)
            .cloned()
            .collect())
    }
}
