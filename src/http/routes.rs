use super::handlers;
use super::state::AppState;
use super::ws;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Live streaming endpoint
        .route("/ws", get(ws::ws_handler))
        // Meetings
        .route(
            "/api/meetings",
            post(handlers::create_meeting).get(handlers::list_meetings),
        )
        .route("/api/meetings/:meeting_id", delete(handlers::delete_meeting))
        .route(
            "/api/meetings/:meeting_id/transcripts",
            get(handlers::get_transcripts),
        )
        // Answer styles
        .route(
            "/api/styles",
            post(handlers::create_style).get(handlers::list_styles),
        )
        .route("/api/styles/:style_id", delete(handlers::delete_style))
        // Request logging + browser clients
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
