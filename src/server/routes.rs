//! API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ServerState>`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::openai::{ChatCompletionRequest, ChatCompletionResponse, ModelCard, ModelList};
use crate::config::AppConfig;
use crate::forecast::{self, Forecaster};
use crate::prompt::PromptParser;
use crate::types::ForecastError;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Everything a request needs. Immutable after startup.
pub struct ServerState {
    pub forecaster: Box<dyn Forecaster>,
    pub parser: PromptParser,
    pub model: ModelCard,
}

impl ServerState {
    pub fn new(forecaster: Box<dyn Forecaster>, parser: PromptParser, model: ModelCard) -> Self {
        Self { forecaster, parser, model }
    }

    /// Build state from configuration.
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(
            forecast::forecaster_for(cfg.forecast.method),
            PromptParser::new(cfg.forecast.max_horizon),
            ModelCard::from(&cfg.model),
        )
    }
}

pub type AppState = Arc<ServerState>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Request failures, rendered as `{"error": <message>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No messages provided")]
    NoMessages,

    #[error("No user message found")]
    NoUserMessage,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoMessages | ApiError::NoUserMessage | ApiError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Forecast(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Forecast(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %message, "Rejected request");
        }
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model: state.model.id.clone(),
    })
}

/// GET /v1/models
pub async fn list_models(State(state): State<AppState>) -> Json<ModelList> {
    Json(ModelList::new(vec![state.model.clone()]))
}

/// POST /v1/chat/completions
///
/// The first user message is parsed for a series and horizon; the
/// forecast bundle is returned as JSON text in the assistant message.
pub async fn chat_completions(
    State(state): State<AppState>,
    payload: Result<Json<ChatCompletionRequest>, JsonRejection>,
) -> Result<Json<ChatCompletionResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::MalformedBody(e.body_text()))?;

    if request.messages.is_empty() {
        return Err(ApiError::NoMessages);
    }
    let prompt = request.user_prompt().ok_or(ApiError::NoUserMessage)?;

    let parsed = state.parser.parse(prompt)?;
    let bundle = forecast::run(state.forecaster.as_ref(), &parsed)?;

    info!(
        n = parsed.series.len(),
        horizon = parsed.horizon,
        method = %state.forecaster.method(),
        flags = ?bundle.quality_flags,
        "Forecast served"
    );

    let content = serde_json::to_string(&bundle)
        .map_err(|e| ApiError::Internal(format!("Failed to serialise forecast: {e}")))?;

    Ok(Json(ChatCompletionResponse::single(&state.model.id, content)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
