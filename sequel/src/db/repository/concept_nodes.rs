use chrono::{DateTime, Utc};
use libsql::{params, Connection};
use nanoid::nanoid;

use crate::error::{Result, SequelError};
use crate::models::{ConceptNode, NodeCategory};

const NODE_COLUMNS: &str = "id, label, size, color, category, created_at";

pub struct ConceptNodeRepository;

impl ConceptNodeRepository {
    /// Insert-or-ignore on the unique label, then read the stored row back.
    ///
    /// Whoever wins a concurrent insert, every caller sees the same node.
    pub async fn resolve(conn: &Connection, label: &str) -> Result<ConceptNode> {
        let candidate = ConceptNode::new(nanoid!(), label.to_string());

        let inserted = conn
            .execute(
                r#"
                INSERT INTO concept_nodes (id, label, size, color, category, created_at)
                VALUES (?1, ?2, ?3, ?4, NULL, ?5)
                ON CONFLICT(label) DO NOTHING
                "#,
                params![
                    candidate.id.clone(),
                    candidate.label.clone(),
                    candidate.size,
                    candidate.color.clone(),
                    candidate.created_at.to_rfc3339(),
                ],
            )
            .await?;

        if inserted > 0 {
            tracing::debug!(label, id = %candidate.id, "Created concept node");
            return Ok(candidate);
        }

        Self::get_by_label(conn, label).await?.ok_or_else(|| {
            SequelError::Internal(format!("Concept node '{label}' vanished after insert"))
        })
    }

    pub async fn get_by_label(conn: &Connection, label: &str) -> Result<Option<ConceptNode>> {
        let mut rows = conn
            .query(
                &format!("SELECT {NODE_COLUMNS} FROM concept_nodes WHERE label = ?1"),
                params![label],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_node(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn set_category(conn: &Connection, id: &str, category: NodeCategory) -> Result<()> {
        let affected = conn
            .execute(
                "UPDATE concept_nodes SET category = ?1, color = ?2 WHERE id = ?3",
                params![category.to_string(), category.color(), id],
            )
            .await?;

        if affected == 0 {
            return Err(SequelError::NotFound(format!("Concept node {id} not found")));
        }

        Ok(())
    }

    pub async fn count(conn: &Connection) -> Result<u64> {
        let mut rows = conn.query("SELECT COUNT(*) FROM concept_nodes", ()).await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)?.max(0) as u64),
            None => Ok(0),
        }
    }

    pub async fn list_all(conn: &Connection) -> Result<Vec<ConceptNode>> {
        let mut rows = conn
            .query(
                &format!("SELECT {NODE_COLUMNS} FROM concept_nodes ORDER BY rowid ASC"),
                (),
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_node(&row)?);
        }

        Ok(results)
    }

    fn row_to_node(row: &libsql::Row) -> Result<ConceptNode> {
        let category = row
            .get::<Option<String>>(4)?
            .and_then(|value| match value.parse::<NodeCategory>() {
                Ok(category) => Some(category),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unknown stored node category");
                    None
                }
            });

        Ok(ConceptNode {
            id: row.get(0)?,
            label: row.get(1)?,
            size: row.get(2)?,
            color: row.get(3)?,
            category,
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(5)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}
