use super::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateMeetingRequest {
    /// Optional meeting title (defaults to a dated title)
    pub title: Option<String>,

    /// BCP-47 language code (default: en-US)
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateMeetingResponse {
    pub meeting_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateStyleRequest {
    pub name: String,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct CreateStyleResponse {
    pub style_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub active_sessions: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/meetings
/// Create a new meeting
pub async fn create_meeting(
    State(state): State<AppState>,
    Json(req): Json<CreateMeetingRequest>,
) -> impl IntoResponse {
    let language = req.language.unwrap_or_else(|| "en-US".to_string());

    match state.storage.create_meeting(req.title, language).await {
        Ok(meeting) => {
            info!("Created meeting {} ({})", meeting.id, meeting.language);
            (
                StatusCode::OK,
                Json(CreateMeetingResponse {
                    meeting_id: meeting.id,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to create meeting: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create meeting".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/meetings
/// List meetings, newest first
pub async fn list_meetings(State(state): State<AppState>) -> impl IntoResponse {
    match state.storage.list_meetings().await {
        Ok(meetings) => (StatusCode::OK, Json(meetings)).into_response(),
        Err(e) => {
            error!("Failed to list meetings: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list meetings".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// DELETE /api/meetings/:meeting_id
pub async fn delete_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> impl IntoResponse {
    match state.storage.delete_meeting(&meeting_id).await {
        Ok(true) => {
            info!("Deleted meeting {}", meeting_id);
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Meeting {} not found", meeting_id),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to delete meeting {}: {:#}", meeting_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete meeting".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/meetings/:meeting_id/transcripts
/// Saved transcript/suggestion pairs for a meeting, in insertion order
pub async fn get_transcripts(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> impl IntoResponse {
    let meeting = match state.storage.get_meeting(&meeting_id).await {
        Ok(Some(meeting)) => meeting,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Meeting {} not found", meeting_id),
                }),
            )
                .into_response();
        }
        Err(e) => {
            error!("Failed to load meeting {}: {:#}", meeting_id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to load meeting".to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.storage.transcripts_for(&meeting.id).await {
        Ok(transcripts) => (StatusCode::OK, Json(transcripts)).into_response(),
        Err(e) => {
            error!("Failed to load transcripts for {}: {:#}", meeting_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to load transcripts".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /api/styles
/// Create an answer style
pub async fn create_style(
    State(state): State<AppState>,
    Json(req): Json<CreateStyleRequest>,
) -> impl IntoResponse {
    if req.name.trim().is_empty() || req.prompt.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Name and prompt are required".to_string(),
            }),
        )
            .into_response();
    }

    match state.storage.create_style(req.name, req.prompt).await {
        Ok(style) => {
            info!("Created answer style {} ({})", style.id, style.name);
            (
                StatusCode::OK,
                Json(CreateStyleResponse { style_id: style.id }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to create style: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create style".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/styles
pub async fn list_styles(State(state): State<AppState>) -> impl IntoResponse {
    match state.storage.list_styles().await {
        Ok(styles) => (StatusCode::OK, Json(styles)).into_response(),
        Err(e) => {
            error!("Failed to list styles: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list styles".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// DELETE /api/styles/:style_id
pub async fn delete_style(
    State(state): State<AppState>,
    Path(style_id): Path<String>,
) -> impl IntoResponse {
    match state.storage.delete_style(&style_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Style {} not found", style_id),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to delete style {}: {:#}", style_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete style".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let active_sessions = state.registry.active_sessions().await;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            active_sessions,
        }),
    )
}
