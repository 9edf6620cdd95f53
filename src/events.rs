use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Control events a client sends over its streaming connection.
///
/// Audio itself travels as binary frames, one frame per chunk; only control
/// traffic is JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    StartSession { meeting_id: String },
    ChangeStyle { style_id: String },
    StopSession,
}

/// Events delivered back to the originating connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    SessionStarted { session_id: String },
    /// Provisional transcription, revised by later segments.
    InterimTranscript { text: String },
    /// Finalized transcription; a suggestion follows for each of these.
    FinalTranscript { text: String },
    /// The generated suggestion (or fallback text on failure).
    AiResponse { text: String },
    Error { message: String },
}

/// Outbound delivery seam for one connection.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event, returning whether the connection was still
    /// reachable. Delivery to a gone connection is a no-op, not an error.
    async fn deliver(&self, event: ServerEvent) -> bool;
}
