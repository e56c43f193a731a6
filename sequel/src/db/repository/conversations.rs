use chrono::{DateTime, Utc};
use libsql::{params, Connection};
use nanoid::nanoid;

use crate::error::Result;
use crate::models::ConversationRecord;

pub struct ConversationRepository;

impl ConversationRepository {
    pub async fn create(
        conn: &Connection,
        message: &str,
        response: &str,
    ) -> Result<ConversationRecord> {
        let record = ConversationRecord::new(nanoid!(), message.to_string(), response.to_string());

        conn.execute(
            r#"
            INSERT INTO conversations (id, message, response, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.id.clone(),
                record.message.clone(),
                record.response.clone(),
                record.created_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(record)
    }

    pub async fn recent(conn: &Connection, limit: u32) -> Result<Vec<ConversationRecord>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, message, response, created_at
                FROM conversations
                ORDER BY rowid DESC
                LIMIT ?1
                "#,
                params![limit as i64],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_record(&row)?);
        }

        Ok(results)
    }

    pub async fn count(conn: &Connection) -> Result<u64> {
        let mut rows = conn.query("SELECT COUNT(*) FROM conversations", ()).await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)?.max(0) as u64),
            None => Ok(0),
        }
    }

    fn row_to_record(row: &libsql::Row) -> Result<ConversationRecord> {
        Ok(ConversationRecord {
            id: row.get(0)?,
            message: row.get(1)?,
            response: row.get(2)?,
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(3)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}
