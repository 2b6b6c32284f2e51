//! HTTP surface of the generation server.
//!
//! - `GET /health` answers `{"status":"ok"}`.
//! - `POST /generate` takes `{"user_prompt": ...}` and answers
//!   `{"response": ...}`, or `{"detail": ...}` with a non-success status.
//!   An empty `user_prompt` fails request validation (422, list-shaped
//!   `detail`); one that is only whitespace is a 400.

use crate::generator::TextGenerator;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parley_core::generation::{ErrorDetail, GenerationReply, GenerationRequest};
use parley_interaction::GeminiError;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub const NOT_CONFIGURED_DETAIL: &str = "Gemini API key not configured. Service is unavailable.";
pub const EMPTY_PROMPT_DETAIL: &str = "'user_prompt' must be a non-empty string.";
pub const UPSTREAM_FAILURE_DETAIL: &str =
    "An error occurred while communicating with the Gemini API.";

const PROMPT_PREVIEW_CHARS: usize = 100;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key was configured; `/generate` then answers 503.
    generator: Option<Arc<dyn TextGenerator>>,
    system_prompt: Arc<str>,
}

impl AppState {
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        system_prompt: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            generator,
            system_prompt: system_prompt.into(),
        }
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

/// An error answered with a `detail` body.
#[derive(Debug)]
pub enum ApiError {
    /// `{"detail": "..."}` with `status`.
    Detail { status: StatusCode, detail: String },
    /// Request validation failure: 422 with a list-shaped `detail`.
    Validation {
        field: &'static str,
        kind: &'static str,
        message: &'static str,
    },
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::Detail {
            status,
            detail: detail.into(),
        }
    }
}

impl From<GeminiError> for ApiError {
    fn from(error: GeminiError) -> Self {
        match error {
            GeminiError::Blocked { reason } => {
                tracing::warn!(%reason, "Gemini response was blocked");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    format!(
                        "Response blocked due to safety concerns ({reason}). \
                         Please modify your prompt."
                    ),
                )
            }
            other => {
                tracing::error!("Error calling Gemini API: {other}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE_DETAIL)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Detail { status, detail } => {
                (status, Json(ErrorDetail { detail })).into_response()
            }
            ApiError::Validation {
                field,
                kind,
                message,
            } => {
                let body = json!({
                    "detail": [{ "type": kind, "loc": ["body", field], "msg": message }]
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

/// The prompt sent upstream for one user prompt.
pub fn full_prompt(system_prompt: &str, user_prompt: &str) -> String {
    format!("{system_prompt}\n\nUser: {user_prompt}\nAssistant:")
}

/// Builds the application router with CORS restricted to `allowed_origins`.
///
/// Origins that are not valid header values are skipped.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/generate", post(generate))
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<HealthStatus> {
    tracing::info!("health check endpoint accessed");
    Json(HealthStatus { status: "ok" })
}

async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<GenerationRequest>,
) -> Result<Json<GenerationReply>, ApiError> {
    // Request validation runs before any service check.
    if payload.user_prompt.is_empty() {
        tracing::warn!("generate request rejected: 'user_prompt' is missing text");
        return Err(ApiError::Validation {
            field: "user_prompt",
            kind: "string_too_short",
            message: "String should have at least 1 character",
        });
    }

    let Some(generator) = state.generator.as_ref() else {
        tracing::error!("generate request rejected: GOOGLE_API_KEY is not configured");
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            NOT_CONFIGURED_DETAIL,
        ));
    };

    let user_prompt = payload.user_prompt.trim();
    if user_prompt.is_empty() {
        tracing::warn!("generate request rejected: 'user_prompt' is empty");
        return Err(ApiError::new(StatusCode::BAD_REQUEST, EMPTY_PROMPT_DETAIL));
    }

    let preview: String = user_prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
    tracing::info!(prompt_len = user_prompt.len(), "received user prompt: {preview}");
    let prompt = full_prompt(&state.system_prompt, user_prompt);

    let response = generator.generate_text(&prompt).await?;
    tracing::info!(response_len = response.len(), "generated response");
    Ok(Json(GenerationReply { response }))
}
