use super::registry::{remove_if_current, SessionTable};
use super::session::{Session, SessionPhase, StyleCell};
use crate::audio::{AudioArchive, AudioConsumer, AudioFrame};
use crate::events::{EventSink, ServerEvent};
use crate::storage::{Storage, DEFAULT_STYLE_PROMPT};
use crate::stt::{AudioFeed, TranscriptSegment, TranscriptionStream};
use crate::suggest::SuggestionInvoker;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Everything a session worker needs, passed in explicitly at spawn time.
pub(crate) struct WorkerContext {
    pub session: Arc<Session>,
    pub style: Arc<StyleCell>,
    pub storage: Arc<dyn Storage>,
    pub suggester: SuggestionInvoker,
    pub archive: Arc<dyn AudioArchive>,
    pub sink: Arc<dyn EventSink>,
    pub table: Arc<SessionTable>,
}

pub(crate) fn spawn(
    ctx: WorkerContext,
    consumer: AudioConsumer,
    stream: TranscriptionStream,
) -> JoinHandle<()> {
    tokio::spawn(run(ctx, consumer, stream))
}

/// The per-session drain loop.
///
/// Consumes bridge results in emission order and fans finalized segments
/// out to the finalizer. Ends when the bridge stream is exhausted or fails,
/// then releases the registry entry without waiting for in-flight
/// suggestion calls.
async fn run(ctx: WorkerContext, consumer: AudioConsumer, stream: TranscriptionStream) {
    let TranscriptionStream { feed, mut results } = stream;

    // Audio queue -> bridge. Runs independently so slow speech-service
    // writes never back up onto the network handler.
    let _feeder = tokio::spawn(feed_audio(
        Arc::clone(&ctx.session),
        Arc::clone(&ctx.archive),
        consumer,
        feed,
    ));

    // Per-session sequencing point: suggestions and persistence for
    // finalized segments run serially, in emission order, off the drain
    // loop. Unbounded so a slow suggestion call never backs up into the
    // drain loop; the task outlives the worker when calls straggle.
    let (final_tx, final_rx) = mpsc::unbounded_channel::<TranscriptSegment>();
    tokio::spawn(finalize_segments(
        Arc::clone(&ctx.session),
        Arc::clone(&ctx.style),
        Arc::clone(&ctx.storage),
        ctx.suggester.clone(),
        Arc::clone(&ctx.sink),
        final_rx,
    ));

    while let Some(item) = results.next().await {
        match item {
            Ok(segment) if segment.is_final => {
                info!(
                    "Final transcript for session {}: {}",
                    ctx.session.session_id, segment.text
                );
                ctx.sink
                    .deliver(ServerEvent::FinalTranscript {
                        text: segment.text.clone(),
                    })
                    .await;
                if final_tx.send(segment).is_err() {
                    error!(
                        "Finalizer for session {} is gone, dropping remaining results",
                        ctx.session.session_id
                    );
                    break;
                }
            }
            Ok(segment) => {
                ctx.sink
                    .deliver(ServerEvent::InterimTranscript { text: segment.text })
                    .await;
            }
            Err(e) => {
                // Mid-stream failures are terminal: tear down and let the
                // client reconnect.
                error!(
                    "Transcription stream failed for session {}: {}",
                    ctx.session.session_id, e
                );
                break;
            }
        }
    }

    ctx.session.advance(SessionPhase::Closed);
    drop(final_tx); // finalizer drains whatever is queued and exits on its own

    // Removing the registry entry drops the audio producer, which in turn
    // lets the feeder terminate even if no stop was ever signaled.
    remove_if_current(&ctx.table, &ctx.session).await;

    info!("Session {} closed", ctx.session.session_id);
}

/// Forwards queued audio chunks to the bridge in arrival order, then
/// archives the session's raw audio once the stream ends.
async fn feed_audio(
    session: Arc<Session>,
    archive: Arc<dyn AudioArchive>,
    mut consumer: AudioConsumer,
    mut feed: Box<dyn AudioFeed>,
) {
    let mut recorded: Vec<u8> = Vec::new();

    loop {
        match consumer.next().await {
            AudioFrame::Chunk(bytes) => {
                recorded.extend_from_slice(&bytes);
                if let Err(e) = feed.send(&bytes).await {
                    warn!(
                        "Failed to forward audio for session {}: {}",
                        session.session_id, e
                    );
                    break;
                }
            }
            AudioFrame::EndOfStream => {
                if let Err(e) = feed.finish().await {
                    warn!(
                        "Failed to signal end of audio for session {}: {}",
                        session.session_id, e
                    );
                }
                break;
            }
        }
    }

    if recorded.is_empty() {
        return;
    }
    if let Err(e) = archive
        .store(&session.meeting_id, &session.session_id, &recorded)
        .await
    {
        warn!(
            "Failed to archive audio for session {}: {:#}",
            session.session_id, e
        );
    }
}

/// For each finalized segment: resolve the active style, request a
/// suggestion, persist the pair, deliver the suggestion event.
async fn finalize_segments(
    session: Arc<Session>,
    style: Arc<StyleCell>,
    storage: Arc<dyn Storage>,
    suggester: SuggestionInvoker,
    sink: Arc<dyn EventSink>,
    mut segments: mpsc::UnboundedReceiver<TranscriptSegment>,
) {
    while let Some(segment) = segments.recv().await {
        // Style is sampled at dispatch time; later changes only affect
        // later segments.
        let style_id = style.get();
        let prompt = match storage.style_prompt(style_id.as_deref()).await {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(
                    "Style lookup failed for session {}: {:#}",
                    session.session_id, e
                );
                DEFAULT_STYLE_PROMPT.to_string()
            }
        };

        let suggestion = suggester
            .suggest(&segment.text, &prompt, &session.language)
            .await;

        if let Err(e) = storage
            .save_transcript(&session.meeting_id, &segment.text, &suggestion.response_text)
            .await
        {
            error!(
                "Failed to persist transcript for meeting {}: {:#}",
                session.meeting_id, e
            );
        }

        if !sink
            .deliver(ServerEvent::AiResponse {
                text: suggestion.response_text,
            })
            .await
        {
            debug!(
                "Suggestion for session {} dropped: connection gone",
                session.session_id
            );
        }
    }
}
