use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Default high-water mark for buffered audio chunks per session.
pub const DEFAULT_AUDIO_QUEUE_DEPTH: usize = 50;

/// One item in a session's audio queue.
///
/// Carrying end-of-stream as its own variant keeps it unambiguous with a
/// legitimately empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioFrame {
    /// An opaque audio payload, in arrival order.
    Chunk(Vec<u8>),
    /// End-of-stream marker, enqueued exactly once by `close()`.
    EndOfStream,
}

/// Create a bounded audio queue for one session.
///
/// The producer half lives with the network handler, the consumer half with
/// the session's drain loop; no third party touches either.
pub fn audio_channel(capacity: usize, session_id: &str) -> (AudioProducer, AudioConsumer) {
    let (tx, rx) = mpsc::channel(capacity);
    let producer = AudioProducer {
        tx,
        closed: Arc::new(AtomicBool::new(false)),
        dropped: Arc::new(AtomicUsize::new(0)),
        session_id: session_id.to_string(),
    };
    (producer, AudioConsumer { rx })
}

/// Producer half of a session's audio queue.
pub struct AudioProducer {
    tx: mpsc::Sender<AudioFrame>,
    closed: Arc<AtomicBool>,
    dropped: Arc<AtomicUsize>,
    session_id: String,
}

impl AudioProducer {
    /// Enqueue one audio chunk without blocking.
    ///
    /// A closed queue drops the chunk. A full queue also drops it: audio
    /// loss under sustained overload is accepted, stalling the connection
    /// handler is not.
    pub fn push(&self, bytes: Vec<u8>) {
        if self.closed.load(Ordering::SeqCst) {
            debug!(
                "Audio chunk for session {} dropped: queue closed",
                self.session_id
            );
            return;
        }

        match self.tx.try_send(AudioFrame::Chunk(bytes)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::SeqCst) + 1;
                warn!(
                    "Audio queue full for session {}, chunk dropped ({} dropped so far)",
                    self.session_id, dropped
                );
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(
                    "Audio chunk for session {} dropped: consumer gone",
                    self.session_id
                );
            }
        }
    }

    /// Close the queue, enqueueing the end-of-stream marker. Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Err(mpsc::error::TrySendError::Full(frame)) =
            self.tx.try_send(AudioFrame::EndOfStream)
        {
            // Queue is at the high-water mark; the marker still has to land
            // behind the buffered chunks, so hand it to a task that can wait.
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(frame).await;
            });
        }
    }

    /// Whether `close()` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of chunks dropped due to overflow.
    pub fn dropped_chunks(&self) -> usize {
        self.dropped.load(Ordering::SeqCst)
    }
}

/// Consumer half of a session's audio queue, owned by one drain loop.
pub struct AudioConsumer {
    rx: mpsc::Receiver<AudioFrame>,
}

impl AudioConsumer {
    /// Await the next frame.
    ///
    /// A fully drained queue whose producers are gone reads as
    /// `EndOfStream`, so the drain loop always terminates.
    pub async fn next(&mut self) -> AudioFrame {
        match self.rx.recv().await {
            Some(frame) => frame,
            None => AudioFrame::EndOfStream,
        }
    }
}
