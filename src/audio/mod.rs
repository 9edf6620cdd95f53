pub mod archive;
pub mod channel;

pub use archive::{AudioArchive, DiscardArchive, WavAudioArchive};
pub use channel::{audio_channel, AudioConsumer, AudioFrame, AudioProducer, DEFAULT_AUDIO_QUEUE_DEPTH};
