use super::session::{Session, SessionPhase, StyleCell};
use super::worker::{self, WorkerContext};
use crate::audio::{audio_channel, AudioArchive, AudioProducer, DEFAULT_AUDIO_QUEUE_DEPTH};
use crate::events::EventSink;
use crate::storage::Storage;
use crate::stt::{BridgeError, TranscriptionService};
use crate::suggest::SuggestionInvoker;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Why a session failed to start. These are the only errors a caller sees;
/// everything after a successful start is absorbed inside the session.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("a session is already active for this connection")]
    AlreadyActive,
    #[error("meeting {0} not found")]
    MeetingNotFound(String),
    #[error(transparent)]
    Transcription(#[from] BridgeError),
    #[error("storage lookup failed: {0}")]
    Storage(anyhow::Error),
}

/// Tuning knobs applied to every new session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// High-water mark of the per-session audio queue.
    pub audio_queue_depth: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            audio_queue_depth: DEFAULT_AUDIO_QUEUE_DEPTH,
        }
    }
}

/// Registry entry for one live session.
pub(crate) struct SessionHandle {
    pub session: Arc<Session>,
    pub producer: AudioProducer,
    pub style: Arc<StyleCell>,
}

/// Live sessions keyed by connection id. The only structure mutated from
/// both network handlers and drain loops; every mutation goes through the
/// lock.
pub(crate) type SessionTable = Mutex<HashMap<String, SessionHandle>>;

/// Remove the table entry for `session`'s connection, but only if it still
/// belongs to this session. A reconnect may have started a new session
/// under the same connection id.
pub(crate) async fn remove_if_current(table: &SessionTable, session: &Session) {
    let mut table = table.lock().await;
    let is_current = table
        .get(&session.connection_id)
        .map(|handle| handle.session.session_id == session.session_id)
        .unwrap_or(false);
    if is_current {
        table.remove(&session.connection_id);
    }
}

/// Tracks active sessions by connection identity and enforces at most one
/// worker per connection.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<RegistryShared>,
}

struct RegistryShared {
    table: Arc<SessionTable>,
    storage: Arc<dyn Storage>,
    transcription: Arc<dyn TranscriptionService>,
    suggester: SuggestionInvoker,
    archive: Arc<dyn AudioArchive>,
    settings: SessionSettings,
}

impl SessionRegistry {
    pub fn new(
        storage: Arc<dyn Storage>,
        transcription: Arc<dyn TranscriptionService>,
        suggester: SuggestionInvoker,
        archive: Arc<dyn AudioArchive>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            inner: Arc::new(RegistryShared {
                table: Arc::new(Mutex::new(HashMap::new())),
                storage,
                transcription,
                suggester,
                archive,
                settings,
            }),
        }
    }

    /// Start a session for `connection_id` against `meeting_id`, delivering
    /// results through `sink`.
    ///
    /// The table lock is held across setup, so concurrent starts for one
    /// connection serialize and the second one sees `AlreadyActive`.
    pub async fn start_session(
        &self,
        connection_id: &str,
        meeting_id: &str,
        sink: Arc<dyn EventSink>,
    ) -> Result<Arc<Session>, StartError> {
        let mut table = self.inner.table.lock().await;

        if table.contains_key(connection_id) {
            warn!("Session already active for connection {}", connection_id);
            return Err(StartError::AlreadyActive);
        }

        let meeting = self
            .inner
            .storage
            .get_meeting(meeting_id)
            .await
            .map_err(StartError::Storage)?
            .ok_or_else(|| StartError::MeetingNotFound(meeting_id.to_string()))?;

        let session = Arc::new(Session::new(connection_id, meeting_id, &meeting.language));

        // Setup failures surface here; the session never starts streaming.
        let stream = self
            .inner
            .transcription
            .open(&session.session_id, &meeting.language)
            .await?;

        let (producer, consumer) =
            audio_channel(self.inner.settings.audio_queue_depth, &session.session_id);
        let style = Arc::new(StyleCell::default());

        session.advance(SessionPhase::Streaming);

        worker::spawn(
            WorkerContext {
                session: Arc::clone(&session),
                style: Arc::clone(&style),
                storage: Arc::clone(&self.inner.storage),
                suggester: self.inner.suggester.clone(),
                archive: Arc::clone(&self.inner.archive),
                sink,
                table: Arc::clone(&self.inner.table),
            },
            consumer,
            stream,
        );

        table.insert(
            connection_id.to_string(),
            SessionHandle {
                session: Arc::clone(&session),
                producer,
                style,
            },
        );

        info!(
            "Session {} started for connection {} (meeting {}, language {})",
            session.session_id, connection_id, meeting_id, meeting.language
        );

        Ok(session)
    }

    /// Enqueue one audio chunk. No-op when no session is active; never
    /// blocks on speech-service I/O.
    pub async fn push_audio(&self, connection_id: &str, bytes: Vec<u8>) {
        let table = self.inner.table.lock().await;
        match table.get(connection_id) {
            Some(handle) => handle.producer.push(bytes),
            None => debug!(
                "Audio from connection {} ignored: no active session",
                connection_id
            ),
        }
    }

    /// Switch the answer style used for subsequent suggestions. No-op when
    /// no session is active.
    pub async fn change_style(&self, connection_id: &str, style_id: &str) {
        let table = self.inner.table.lock().await;
        if let Some(handle) = table.get(connection_id) {
            handle.style.set(style_id.to_string());
            info!(
                "Session {} switched to style {}",
                handle.session.session_id, style_id
            );
        }
    }

    /// Signal end of audio for the connection's session. Idempotent;
    /// results already in flight keep draining, and the entry stays until
    /// the worker finishes so late audio lands in a closed queue.
    pub async fn stop_session(&self, connection_id: &str) {
        let table = self.inner.table.lock().await;
        if let Some(handle) = table.get(connection_id) {
            if handle.session.advance(SessionPhase::Stopping) {
                info!("Session {} stopping", handle.session.session_id);
            }
            handle.producer.close();
        }
    }

    /// Equivalent to stop, plus unconditional removal of the bookkeeping;
    /// the connection id may be reused by a reconnect before the worker has
    /// fully drained.
    pub async fn on_disconnect(&self, connection_id: &str) {
        let handle = self.inner.table.lock().await.remove(connection_id);
        if let Some(handle) = handle {
            handle.session.advance(SessionPhase::Stopping);
            handle.producer.close();
            info!(
                "Connection {} disconnected, session {} draining",
                connection_id, handle.session.session_id
            );
        }
    }

    /// Number of live sessions.
    pub async fn active_sessions(&self) -> usize {
        self.inner.table.lock().await.len()
    }

    /// Close every live session's audio queue. Used on service shutdown.
    pub async fn shutdown(&self) {
        let table = self.inner.table.lock().await;
        for handle in table.values() {
            handle.session.advance(SessionPhase::Stopping);
            handle.producer.close();
        }
    }
}
