use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A meeting that clients stream audio into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    /// BCP-47 language code used for transcription and suggestions.
    pub language: String,
    pub created_at: DateTime<Utc>,
}

/// A reusable prompt that shapes generated suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerStyle {
    pub id: String,
    pub name: String,
    pub prompt: String,
}

/// Durable record of one finalized segment and its suggestion.
/// Insertion order per meeting matches the order the segments were emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub id: String,
    pub meeting_id: String,
    pub text: String,
    pub suggestion: String,
    pub recorded_at: DateTime<Utc>,
}
