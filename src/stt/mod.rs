//! Adapter around the external streaming speech-to-text service.
//!
//! `TranscriptionService` is the seam the session core drives; the NATS
//! transport is the production implementation, tests plug in their own.

pub mod bridge;
pub mod nats;

pub use bridge::{
    AudioFeed, BridgeError, SegmentStream, TranscriptSegment, TranscriptionService,
    TranscriptionStream,
};
pub use nats::{AudioFrameMessage, NatsTranscription, SttResultMessage, StreamOpenMessage};
