use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiError;
use crate::constants::{HISTORY_MAX_PAGE_SIZE, MAX_INPUT_CHARS};
use crate::service::ValidationError;
use crate::history::HistoryRecord;
use crate::tone::{self, DEFAULT_TONE, ToneProfile};
use crate::types::{GenerationRequest, Mode};

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_true")]
    pub save_history: bool,
    #[serde(default)]
    pub mode: Mode,
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub rewritten_text: String,
    pub tone: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<HistoryRecord>,
}

#[derive(Debug, Serialize)]
pub struct TonesResponse {
    pub tones: &'static [ToneProfile],
}

/// POST /api/generate
pub(super) async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!("Unreadable generate body: {}", e);
        // Oversized bodies can only hold text past the input bound
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::BadRequest(
                ValidationError::TooLong {
                    max: MAX_INPUT_CHARS,
                }
                .to_string(),
            )
        } else {
            ApiError::BadRequest("No data provided".to_string())
        }
    })?;

    let result = state
        .service
        .handle(GenerationRequest {
            input_text: body.text,
            tone: body.tone,
            mode: body.mode,
            persist: body.save_history,
        })
        .await?;

    Ok(Json(GenerateResponse {
        success: true,
        rewritten_text: result.output_text,
        tone: result.tone,
        timestamp: result.generated_at,
    }))
}

/// GET /api/history
pub(super) async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(state.page_size)
        .clamp(1, HISTORY_MAX_PAGE_SIZE);
    let history = state.history.recent(limit).await?;
    Ok(Json(HistoryResponse {
        success: true,
        history,
    }))
}

/// DELETE /api/history/delete/{id}
pub(super) async fn delete_history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AckResponse>, ApiError> {
    if !state.history.delete(id).await? {
        tracing::debug!("History record {} did not exist", id);
    }
    Ok(Json(AckResponse {
        success: true,
        message: "Record deleted successfully",
    }))
}

/// DELETE /api/history/clear
pub(super) async fn clear_history(
    State(state): State<AppState>,
) -> Result<Json<AckResponse>, ApiError> {
    let removed = state.history.clear().await?;
    tracing::info!("Cleared {} history records", removed);
    Ok(Json(AckResponse {
        success: true,
        message: "History cleared successfully",
    }))
}

/// GET /api/tones
pub(super) async fn list_tones() -> Json<TonesResponse> {
    Json(TonesResponse { tones: tone::all() })
}

/// GET /health
pub(super) async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "remote_enabled": state.service.remote_enabled(),
    }))
}

pub(super) async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}
