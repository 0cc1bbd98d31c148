use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;

use crate::models::{ChatRequest, ChatResponse};
use crate::rag::DEFAULT_SESSION;
use crate::state::AppState;

const MESSAGE_REQUIRED: &str = "Message is required.";
const NOT_READY: &str =
    "System is initializing or failed to initialize, please try again in a moment.";

type ApiError = (StatusCode, Json<ChatResponse>);

/// POST /chatbot - Answer one message using the shared RAG pipeline.
pub async fn chatbot(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    // ── Step 1: Validate input ────────────────────────────
    let req = parse_request(&headers, &body)?;

    let message = req.message.as_deref().map(str::trim).unwrap_or_default();
    if message.is_empty() {
        return Err(reply(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED));
    }

    let session = req
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION);

    // ── Step 2: Get (or retry building) the pipeline ─────
    let Some(pipeline) = state.pipeline.get_or_init().await else {
        return Err(reply(StatusCode::SERVICE_UNAVAILABLE, NOT_READY));
    };

    // ── Step 3: Rephrase, retrieve, answer ────────────────
    let history = state.history.messages(session);
    let result = pipeline.invoke(message, &history).await.map_err(|e| {
        tracing::error!("Error processing request: {e:#}");
        internal_error(format!("{e:#}"))
    })?;

    // ── Step 4: Remember the exchange ─────────────────────
    state
        .history
        .record_exchange(session, message, &result.answer);

    Ok(Json(ChatResponse {
        answer: result.answer,
    }))
}

/// Read the request body. A body that is not JSON, is empty, or is not a JSON
/// object carries no message and yields an empty request; only unparseable
/// JSON or an object with mistyped fields is an error.
fn parse_request(headers: &HeaderMap, body: &[u8]) -> Result<ChatRequest, ApiError> {
    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ChatRequest::default());
    }

    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Rejected chat body: {e}");
        internal_error(format!("Failed to parse the request body as JSON: {e}"))
    })?;
    if !value.is_object() {
        return Ok(ChatRequest::default());
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::warn!("Rejected chat body: {e}");
        internal_error(format!("Failed to deserialize the JSON body: {e}"))
    })
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn reply(status: StatusCode, answer: &str) -> ApiError {
    (
        status,
        Json(ChatResponse {
            answer: answer.to_string(),
        }),
    )
}

fn internal_error(detail: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ChatResponse {
            answer: format!("Sorry, something went wrong: {detail}"),
        }),
    )
}
