use super::bridge::{
    AudioFeed, BridgeError, SegmentStream, TranscriptSegment, TranscriptionService,
    TranscriptionStream,
};
use async_trait::async_trait;
use base64::Engine;
use chrono::Utc;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Stream configuration message published when a session opens.
#[derive(Debug, Serialize, Deserialize)]
pub struct StreamOpenMessage {
    pub session_id: String,
    pub language: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub timestamp: String, // RFC3339 timestamp
}

/// Audio frame message published to the transcription service.
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioFrameMessage {
    pub session_id: String,
    pub sequence: u32,
    pub pcm: String, // Base64-encoded PCM bytes
    pub sample_rate: u32,
    pub channels: u16,
    pub timestamp: String, // RFC3339 timestamp
    #[serde(rename = "final")]
    pub final_frame: bool,
}

/// Result message received from the transcription service.
#[derive(Debug, Serialize, Deserialize)]
pub struct SttResultMessage {
    pub session_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub partial: bool,
    #[serde(default)]
    pub end_of_stream: bool,
    #[serde(default)]
    pub error: Option<String>,
    pub timestamp: String,
}

/// Streaming transcription service reached over NATS.
///
/// Audio frames go out on `stt.audio.session-{id}`; results come back on
/// `stt.text.>` and are filtered by session id in the payload.
pub struct NatsTranscription {
    url: String,
    sample_rate: u32,
    channels: u16,
}

impl NatsTranscription {
    pub fn new(url: impl Into<String>, sample_rate: u32, channels: u16) -> Self {
        Self {
            url: url.into(),
            sample_rate,
            channels,
        }
    }

    fn audio_subject(session_id: &str) -> String {
        format!("stt.audio.session-{}", session_id)
    }
}

#[async_trait]
impl TranscriptionService for NatsTranscription {
    async fn open(
        &self,
        session_id: &str,
        language: &str,
    ) -> Result<TranscriptionStream, BridgeError> {
        let client = async_nats::connect(self.url.as_str())
            .await
            .map_err(|e| BridgeError::Connect(e.to_string()))?;

        let subscriber = client
            .subscribe("stt.text.>")
            .await
            .map_err(|e| BridgeError::Connect(e.to_string()))?;

        let open = StreamOpenMessage {
            session_id: session_id.to_string(),
            language: language.to_string(),
            sample_rate: self.sample_rate,
            channels: self.channels,
            timestamp: Utc::now().to_rfc3339(),
        };
        let payload =
            serde_json::to_vec(&open).map_err(|e| BridgeError::Connect(e.to_string()))?;
        client
            .publish("stt.session.open", payload.into())
            .await
            .map_err(|e| BridgeError::Connect(e.to_string()))?;

        info!(
            "Opened transcription stream for session {} ({})",
            session_id, language
        );

        let feed = Box::new(NatsAudioFeed {
            client,
            subject: Self::audio_subject(session_id),
            session_id: session_id.to_string(),
            sample_rate: self.sample_rate,
            channels: self.channels,
            sequence: 0,
            finished: false,
        });

        let results = result_stream(subscriber, session_id.to_string());

        Ok(TranscriptionStream { feed, results })
    }
}

struct NatsAudioFeed {
    client: async_nats::Client,
    subject: String,
    session_id: String,
    sample_rate: u32,
    channels: u16,
    sequence: u32,
    finished: bool,
}

impl NatsAudioFeed {
    async fn publish_frame(&mut self, pcm: &[u8], final_frame: bool) -> Result<(), BridgeError> {
        let message = AudioFrameMessage {
            session_id: self.session_id.clone(),
            sequence: self.sequence,
            pcm: base64::engine::general_purpose::STANDARD.encode(pcm),
            sample_rate: self.sample_rate,
            channels: self.channels,
            timestamp: Utc::now().to_rfc3339(),
            final_frame,
        };
        self.sequence += 1;

        let payload =
            serde_json::to_vec(&message).map_err(|e| BridgeError::Stream(e.to_string()))?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await
            .map_err(|e| BridgeError::Stream(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl AudioFeed for NatsAudioFeed {
    async fn send(&mut self, chunk: &[u8]) -> Result<(), BridgeError> {
        if self.finished {
            return Err(BridgeError::Closed);
        }
        self.publish_frame(chunk, false).await
    }

    async fn finish(&mut self) -> Result<(), BridgeError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        // Empty final frame marks end of audio for this session.
        self.publish_frame(&[], true).await
    }
}

/// Map the raw subscription into this session's ordered segment sequence.
fn result_stream(subscriber: async_nats::Subscriber, session_id: String) -> SegmentStream {
    futures::stream::unfold(
        (subscriber, session_id, false),
        |(mut subscriber, session_id, done)| async move {
            if done {
                return None;
            }

            loop {
                let msg = match subscriber.next().await {
                    Some(msg) => msg,
                    // Subscription dropping without an end-of-stream marker is
                    // a mid-stream failure, not a normal end.
                    None => {
                        return Some((
                            Err(BridgeError::Stream(
                                "transcription subscription closed".to_string(),
                            )),
                            (subscriber, session_id, true),
                        ));
                    }
                };

                let parsed: SttResultMessage = match serde_json::from_slice(&msg.payload) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        warn!("Failed to parse transcript message: {}", e);
                        continue;
                    }
                };

                if parsed.session_id != session_id {
                    continue;
                }

                if let Some(error) = parsed.error {
                    return Some((
                        Err(BridgeError::Stream(error)),
                        (subscriber, session_id, true),
                    ));
                }

                if parsed.end_of_stream {
                    return None;
                }

                let segment = TranscriptSegment {
                    text: parsed.text,
                    is_final: !parsed.partial,
                    emitted_at: Utc::now(),
                };
                return Some((Ok(segment), (subscriber, session_id, false)));
            }
        },
    )
    .boxed()
}
