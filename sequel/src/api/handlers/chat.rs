//! Chat turn and conversation log handlers.

use axum::extract::{Query, State};
use axum::Json;

use crate::api::dto::{
    ChatHistoryQuery, ChatHistoryResponse, ChatRecordDto, ChatRequest, ChatResponse,
};
use crate::api::extractors::AppJson;
use crate::api::AppState;
use crate::error::{Result, SequelError};

const DEFAULT_HISTORY_LIMIT: u32 = 20;
const MAX_HISTORY_LIMIT: u32 = 100;

/// `POST /api/chat`
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Completion text plus graph updates", body = ChatResponse),
        (status = 400, description = "Missing or empty message"),
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let message = request
        .message
        .filter(|message| !message.is_empty())
        .ok_or_else(|| SequelError::Validation("No message provided".to_string()))?;

    let turn = state.chat.handle_turn(&message).await?;
    Ok(Json(turn.into()))
}

/// `GET /api/chat_history`
#[utoipa::path(
    get,
    path = "/api/chat_history",
    tag = "chat",
    params(ChatHistoryQuery),
    responses(
        (status = 200, description = "Most recent turns, newest first", body = ChatHistoryResponse),
    )
)]
pub async fn chat_history(
    State(state): State<AppState>,
    Query(query): Query<ChatHistoryQuery>,
) -> Result<Json<ChatHistoryResponse>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let records = state.db.recent_conversations(limit).await?;
    let total = state.db.count_conversations().await?;

    Ok(Json(ChatHistoryResponse {
        history: records.into_iter().map(ChatRecordDto::from).collect(),
        total,
    }))
}
