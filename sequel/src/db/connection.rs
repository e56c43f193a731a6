use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

pub const MEMORY_URL: &str = ":memory:";

/// Shared handle to the relational store. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    pub(crate) db: Arc<libsql::Database>,
    /// Every `:memory:` connection opens its own database, so in-memory
    /// stores hand out clones of the one connection the schema lives on.
    shared: Option<Connection>,
    pub(crate) busy_timeout_ms: u64,
    pub(crate) journal_mode: String,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let is_memory = config.url == MEMORY_URL;
        let journal_mode = if is_memory {
            "MEMORY".to_string()
        } else {
            normalize_journal_mode(&config.journal_mode).to_string()
        };

        let db = if is_memory {
            Builder::new_local(MEMORY_URL).build().await?
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };
        let shared = if is_memory { Some(db.connect()?) } else { None };

        let database = Self {
            db: Arc::new(db),
            shared,
            busy_timeout_ms: config.busy_timeout_ms,
            journal_mode,
        };
        database.configure_database().await?;
        database.init_schema().await?;

        tracing::debug!(url = %config.url, journal_mode = %database.journal_mode, "Database ready");
        Ok(database)
    }

    pub fn is_memory(&self) -> bool {
        self.shared.is_some()
    }

    /// Open a connection with the configured busy timeout applied.
    pub async fn connect(&self) -> Result<Connection> {
        if let Some(conn) = &self.shared {
            return Ok(conn.clone());
        }

        let conn = self.db.connect()?;
        let busy_timeout_sql = format!("PRAGMA busy_timeout = {}", self.busy_timeout_ms);
        if let Err(error) = conn.execute_batch(&busy_timeout_sql).await {
            tracing::warn!(
                busy_timeout_ms = self.busy_timeout_ms,
                error = %error,
                "Failed to set SQLite busy_timeout"
            );
        }
        Ok(conn)
    }

    async fn configure_database(&self) -> Result<()> {
        let conn = self.connect().await?;

        let journal_sql = format!("PRAGMA journal_mode = {}", self.journal_mode);
        if let Err(error) = conn.execute_batch(&journal_sql).await {
            tracing::warn!(
                mode = %self.journal_mode,
                error = %error,
                "Failed to set SQLite journal_mode"
            );
        }

        Ok(())
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.connect().await?;
        schema::init_schema(&conn).await?;
        Ok(())
    }
}

fn normalize_journal_mode(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "DELETE" => "DELETE",
        "TRUNCATE" => "TRUNCATE",
        "PERSIST" => "PERSIST",
        "MEMORY" => "MEMORY",
        "WAL" => "WAL",
        "OFF" => "OFF",
        _ => "WAL",
    }
}
