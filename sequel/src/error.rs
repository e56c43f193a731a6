use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SequelError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for SequelError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            SequelError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            SequelError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            SequelError::Database(e) => {
                tracing::error!(error = %e, "Database failure while handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            SequelError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SequelError>;
