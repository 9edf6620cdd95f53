use super::state::AppState;
use crate::events::{ClientEvent, EventSink, ServerEvent};
use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Forwards session events into a connection's outbound queue. Once the
/// connection is gone the queue is closed and delivery reads as a no-op.
struct WsEventSink {
    tx: mpsc::Sender<ServerEvent>,
}

#[async_trait]
impl EventSink for WsEventSink {
    async fn deliver(&self, event: ServerEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }
}

/// GET /ws
/// The streaming endpoint: JSON control frames and binary audio frames in,
/// JSON events out.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: AppState) {
    let connection_id = uuid::Uuid::new_v4().to_string();
    info!("Client connected: {}", connection_id);

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (event_tx, mut event_rx) = mpsc::channel::<ServerEvent>(64);

    // One writer task per connection keeps outbound events ordered.
    let writer_connection = connection_id.clone();
    let writer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Failed to encode server event: {}", e);
                    continue;
                }
            };
            if ws_tx.send(Message::Text(payload)).await.is_err() {
                debug!("Connection {} went away mid-send", writer_connection);
                break;
            }
        }
    });

    let sink: Arc<dyn EventSink> = Arc::new(WsEventSink {
        tx: event_tx.clone(),
    });

    while let Some(message) = ws_rx.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                debug!("WebSocket error on {}: {}", connection_id, e);
                break;
            }
        };

        match message {
            Message::Binary(bytes) => state.registry.push_audio(&connection_id, bytes).await,
            Message::Text(text) => {
                handle_client_event(&state, &connection_id, &text, &sink).await
            }
            Message::Close(_) => break,
            // Ping/Pong are handled by axum
            _ => {}
        }
    }

    state.registry.on_disconnect(&connection_id).await;
    writer.abort();
    info!("Client disconnected: {}", connection_id);
}

async fn handle_client_event(
    state: &AppState,
    connection_id: &str,
    text: &str,
    sink: &Arc<dyn EventSink>,
) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            warn!("Unparseable client event from {}: {}", connection_id, e);
            sink.deliver(ServerEvent::Error {
                message: "unrecognized event".to_string(),
            })
            .await;
            return;
        }
    };

    match event {
        ClientEvent::StartSession { meeting_id } => {
            match state
                .registry
                .start_session(connection_id, &meeting_id, Arc::clone(sink))
                .await
            {
                Ok(session) => {
                    sink.deliver(ServerEvent::SessionStarted {
                        session_id: session.session_id.clone(),
                    })
                    .await;
                }
                Err(e) => {
                    warn!("Failed to start session for {}: {}", connection_id, e);
                    sink.deliver(ServerEvent::Error {
                        message: e.to_string(),
                    })
                    .await;
                }
            }
        }
        ClientEvent::ChangeStyle { style_id } => {
            state.registry.change_style(connection_id, &style_id).await
        }
        ClientEvent::StopSession => state.registry.stop_session(connection_id).await,
    }
}
