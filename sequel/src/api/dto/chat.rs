use serde::{Deserialize, Serialize};

use crate::models::ConversationRecord;
use crate::services::ChatTurn;

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ChatRequest {
    /// User message. Missing or blank messages are rejected.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    /// Concept labels extracted from this turn, in order of appearance.
    pub concepts: Vec<String>,
    /// Edges this turn added to the graph.
    pub edges_created: usize,
}

impl From<ChatTurn> for ChatResponse {
    fn from(turn: ChatTurn) -> Self {
        Self {
            response: turn.response,
            concepts: turn.concepts,
            edges_created: turn.edges_created,
        }
    }
}

/// Query parameters for `GET /api/chat_history`.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct ChatHistoryQuery {
    /// Maximum number of records (default 20, capped at 100).
    pub limit: Option<u32>,
}

/// One logged turn.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ChatRecordDto {
    pub id: String,
    pub message: String,
    pub response: String,
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub timestamp: String,
}

impl From<ConversationRecord> for ChatRecordDto {
    fn from(record: ConversationRecord) -> Self {
        let timestamp = record.formatted_timestamp();
        Self {
            id: record.id,
            message: record.message,
            response: record.response,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ChatHistoryResponse {
    pub history: Vec<ChatRecordDto>,
    pub total: u64,
}
