use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::SequelError;

/// `axum::Json` whose rejections render as the service's `{error, code}` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(SequelError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for SequelError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(rejection = %rejection, "Rejected chat request body");
        SequelError::Validation(describe_rejection(&rejection))
    }
}

fn describe_rejection(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Request body must be sent as application/json".to_string()
        }
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON".to_string(),
        JsonRejection::JsonDataError(err) => {
            format!("Invalid request body: {}", serde_detail(&err.body_text()))
        }
        JsonRejection::BytesRejection(_) => "Request body could not be read".to_string(),
        other => other.body_text(),
    }
}

/// The serde part of axum's rejection text, e.g. "message: invalid type ...".
fn serde_detail(body_text: &str) -> &str {
    body_text
        .split_once(": ")
        .map(|(_, detail)| detail)
        .unwrap_or(body_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::ChatRequest;
    use axum::body::Body;
    use axum::http::{header, Request};

    async fn rejection_for(body: &'static str, content_type: Option<&str>) -> String {
        let mut builder = Request::post("/api/chat");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();

        match AppJson::<ChatRequest>::from_request(request, &()).await {
            Err(SequelError::Validation(message)) => message,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("body should have been rejected"),
        }
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let message = rejection_for(r#"{"message":"hi"}"#, None).await;
        assert_eq!(message, "Request body must be sent as application/json");
    }

    #[tokio::test]
    async fn test_syntax_error() {
        let message = rejection_for("{not json", Some("application/json")).await;
        assert_eq!(message, "Request body is not valid JSON");
    }

    #[tokio::test]
    async fn test_wrong_message_type() {
        let message = rejection_for(r#"{"message":42}"#, Some("application/json")).await;
        assert!(message.starts_with("Invalid request body: "));
        assert!(message.contains("invalid type"));
    }

    #[test]
    fn test_serde_detail() {
        assert_eq!(
            serde_detail("Failed to deserialize the JSON body into the target type: message: bad"),
            "message: bad"
        );
        assert_eq!(serde_detail("plain"), "plain");
    }
}
