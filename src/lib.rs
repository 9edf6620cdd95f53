pub mod audio;
pub mod config;
pub mod events;
pub mod http;
pub mod session;
pub mod storage;
pub mod stt;
pub mod suggest;

pub use audio::{
    audio_channel, AudioArchive, AudioConsumer, AudioFrame, AudioProducer, DiscardArchive,
    WavAudioArchive, DEFAULT_AUDIO_QUEUE_DEPTH,
};
pub use config::Config;
pub use events::{ClientEvent, EventSink, ServerEvent};
pub use http::{create_router, AppState};
pub use session::{Session, SessionPhase, SessionRegistry, SessionSettings, StartError};
pub use storage::{
    AnswerStyle, Meeting, MemoryStorage, Storage, TranscriptRecord, DEFAULT_STYLE_PROMPT,
};
pub use stt::{
    AudioFeed, BridgeError, NatsTranscription, SegmentStream, TranscriptSegment,
    TranscriptionService, TranscriptionStream,
};
pub use suggest::{
    fallback_text, OpenAiSuggestionService, SuggestionInvoker, SuggestionRequest,
    SuggestionResult, SuggestionService, DEFAULT_SUGGESTION_TIMEOUT,
};
