//! Route handlers.

use crate::http::error::ApiError;
use crate::http::router::AppState;
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use notion_agent_domain::AnswerEnvelope;
use serde::{Deserialize, Serialize};

/// Body of `GET /`.
pub const WELCOME_MESSAGE: &str =
    "Notion Agent APIへようこそ！ POST /ask に {\"question\": \"...\"} を送信してください。";

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: WELCOME_MESSAGE,
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AnswerEnvelope>, ApiError> {
    let Json(request) = payload?;
    let envelope = state.answerer.execute(&request.question).await?;
    Ok(Json(envelope))
}
