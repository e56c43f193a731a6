use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display format used when a record is rendered for clients.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One logged chat turn. Records are append-only and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: String,
    pub message: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationRecord {
    pub fn new(id: String, message: String, response: String) -> Self {
        Self {
            id,
            message,
            response,
            created_at: Utc::now(),
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_formatted_timestamp() {
        let mut record = ConversationRecord::new(
            "c1".to_string(),
            "Hello".to_string(),
            "Hi there".to_string(),
        );
        record.created_at = Utc.with_ymd_and_hms(2025, 3, 25, 14, 5, 9).unwrap();

        assert_eq!(record.formatted_timestamp(), "2025-03-25 14:05:09");
    }
}
