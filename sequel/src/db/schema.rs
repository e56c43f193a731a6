use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Logged chat turns (append-only)
        CREATE TABLE IF NOT EXISTS conversations (
            id TEXT PRIMARY KEY,
            message TEXT NOT NULL,
            response TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_conversations_created_at ON conversations(created_at);

        -- Concept nodes keyed by their label
        CREATE TABLE IF NOT EXISTS concept_nodes (
            id TEXT PRIMARY KEY,
            label TEXT NOT NULL UNIQUE,
            size REAL NOT NULL DEFAULT 1.0,
            color TEXT NOT NULL DEFAULT '#B290D6',
            category TEXT,
            created_at TEXT NOT NULL
        );

        -- Undirected concept edges; pair_key is "min(id):max(id)"
        CREATE TABLE IF NOT EXISTS concept_edges (
            id TEXT PRIMARY KEY,
            source_id TEXT NOT NULL,
            target_id TEXT NOT NULL,
            pair_key TEXT NOT NULL UNIQUE,
            weight REAL NOT NULL DEFAULT 1.0,
            created_at TEXT NOT NULL,
            FOREIGN KEY (source_id) REFERENCES concept_nodes(id),
            FOREIGN KEY (target_id) REFERENCES concept_nodes(id),
            CHECK (source_id <> target_id)
        );

        CREATE INDEX IF NOT EXISTS idx_concept_edges_source_id ON concept_edges(source_id);
        CREATE INDEX IF NOT EXISTS idx_concept_edges_target_id ON concept_edges(target_id);
        "#,
    )
    .await?;

    migrate_concept_nodes_category(conn).await?;

    Ok(())
}

async fn migrate_concept_nodes_category(conn: &Connection) -> Result<()> {
    let category_exists: bool = conn
        .query(
            "SELECT COUNT(*) FROM pragma_table_info('concept_nodes') WHERE name='category'",
            (),
        )
        .await?
        .next()
        .await?
        .map(|row| row.get::<i64>(0).unwrap_or(0) > 0)
        .unwrap_or(false);

    if !category_exists {
        tracing::info!("Migrating concept_nodes table: adding category column");
        conn.execute("ALTER TABLE concept_nodes ADD COLUMN category TEXT", ())
            .await?;
        tracing::info!("Migration complete: category column added");
    }

    Ok(())
}
