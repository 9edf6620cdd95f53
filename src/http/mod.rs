//! HTTP surface: REST API for meetings/styles plus the live WebSocket
//! streaming endpoint
//!
//! - POST /api/meetings - Create a meeting
//! - GET /api/meetings - Meeting history
//! - DELETE /api/meetings/:id - Remove a meeting and its transcripts
//! - GET /api/meetings/:id/transcripts - Saved transcript/suggestion pairs
//! - POST /api/styles, GET /api/styles, DELETE /api/styles/:id
//! - GET /ws - Live audio in, transcript/suggestion events out
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;
mod ws;

pub use routes::create_router;
pub use state::AppState;
