use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use thiserror::Error;

/// One transcription result emitted by the speech service.
#[derive(Debug, Clone)]
pub struct TranscriptSegment {
    /// Transcribed text.
    pub text: String,
    /// Whether the service will revise this text further. Interim segments
    /// may repeat; a final segment is never re-emitted.
    pub is_final: bool,
    /// When the segment was received.
    pub emitted_at: DateTime<Utc>,
}

impl TranscriptSegment {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
            emitted_at: Utc::now(),
        }
    }

    pub fn final_(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
            emitted_at: Utc::now(),
        }
    }
}

/// Failures surfaced by a transcription stream.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The streaming session could not be established. Reported to the
    /// start caller; the session never begins streaming.
    #[error("failed to open transcription stream: {0}")]
    Connect(String),
    /// The established stream failed mid-flight. Not retried; the session
    /// is torn down and the client reconnects.
    #[error("transcription stream failed: {0}")]
    Stream(String),
    /// Audio was fed after the stream finished.
    #[error("transcription stream already closed")]
    Closed,
}

/// Ordered, non-restartable result sequence of one streaming session.
/// Ends when the upstream stream ends; an `Err` item is terminal.
pub type SegmentStream = BoxStream<'static, Result<TranscriptSegment, BridgeError>>;

/// Outbound half of one transcription stream.
#[async_trait]
pub trait AudioFeed: Send {
    /// Forward one audio chunk upstream.
    async fn send(&mut self, chunk: &[u8]) -> Result<(), BridgeError>;

    /// Signal that no more audio follows. Idempotent.
    async fn finish(&mut self) -> Result<(), BridgeError>;
}

/// A live bidirectional transcription stream for one session.
///
/// The two halves are consumed by different tasks: the feeder drains the
/// session's audio queue into `feed` while the drain loop reads `results`.
pub struct TranscriptionStream {
    pub feed: Box<dyn AudioFeed>,
    pub results: SegmentStream,
}

/// External streaming speech-to-text service.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Open one streaming session configured for `language`.
    async fn open(
        &self,
        session_id: &str,
        language: &str,
    ) -> Result<TranscriptionStream, BridgeError>;
}
