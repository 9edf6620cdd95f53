use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

/// Lifecycle of one session. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionPhase {
    /// Registered, streaming not yet established.
    Idle = 0,
    /// Audio accepted, results flowing.
    Streaming = 1,
    /// End of audio signaled; in-flight results draining.
    Stopping = 2,
    /// Terminal; resources released.
    Closed = 3,
}

impl SessionPhase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => SessionPhase::Idle,
            1 => SessionPhase::Streaming,
            2 => SessionPhase::Stopping,
            _ => SessionPhase::Closed,
        }
    }
}

/// One live client connection driving one meeting.
///
/// Owned by the `SessionRegistry`; the worker tasks hold read references.
pub struct Session {
    pub session_id: String,
    pub connection_id: String,
    pub meeting_id: String,
    pub language: String,
    pub started_at: DateTime<Utc>,
    phase: AtomicU8,
}

impl Session {
    pub fn new(connection_id: &str, meeting_id: &str, language: &str) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            connection_id: connection_id.to_string(),
            meeting_id: meeting_id.to_string(),
            language: language.to_string(),
            started_at: Utc::now(),
            phase: AtomicU8::new(SessionPhase::Idle as u8),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        SessionPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    /// Advance the lifecycle, returning whether this call moved it.
    ///
    /// Phases never move backwards, so repeated stop/disconnect signals and
    /// the error path racing normal teardown are all safe.
    pub fn advance(&self, next: SessionPhase) -> bool {
        let prev = self.phase.fetch_max(next as u8, Ordering::SeqCst);
        prev < next as u8
    }
}

/// Last-writer-wins holder for the session's active answer style.
///
/// Written by the network side, read by the finalizer when it dispatches a
/// suggestion; requests already dispatched are unaffected.
#[derive(Default)]
pub struct StyleCell {
    current: Mutex<Option<String>>,
}

impl StyleCell {
    pub fn set(&self, style_id: String) {
        *self.current.lock().unwrap() = Some(style_id);
    }

    pub fn get(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }
}
