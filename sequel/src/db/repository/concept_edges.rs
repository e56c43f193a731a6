use chrono::{DateTime, Utc};
use libsql::{params, Connection};
use nanoid::nanoid;

use crate::error::{Result, SequelError};
use crate::models::{pair_key, ConceptEdge, EdgeUpsert};

const EDGE_COLUMNS: &str = "id, source_id, target_id, weight, created_at";

pub struct ConceptEdgeRepository;

impl ConceptEdgeRepository {
    /// Create the edge `source -> target` unless the unordered pair is
    /// already linked. The first stored weight always wins.
    pub async fn upsert(
        conn: &Connection,
        source_id: &str,
        target_id: &str,
        weight: f64,
    ) -> Result<EdgeUpsert> {
        if source_id == target_id {
            return Err(SequelError::Validation(format!(
                "Cannot link concept node {source_id} to itself"
            )));
        }

        let key = pair_key(source_id, target_id);
        let candidate = ConceptEdge::new(
            nanoid!(),
            source_id.to_string(),
            target_id.to_string(),
            weight,
        );

        let inserted = conn
            .execute(
                r#"
                INSERT INTO concept_edges (id, source_id, target_id, pair_key, weight, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(pair_key) DO NOTHING
                "#,
                params![
                    candidate.id.clone(),
                    candidate.source_id.clone(),
                    candidate.target_id.clone(),
                    key.clone(),
                    candidate.weight,
                    candidate.created_at.to_rfc3339(),
                ],
            )
            .await?;

        if inserted > 0 {
            tracing::debug!(
                source = source_id,
                target = target_id,
                weight,
                "Created concept edge"
            );
            return Ok(EdgeUpsert::Created(candidate));
        }

        let existing = Self::get_by_pair(conn, source_id, target_id)
            .await?
            .ok_or_else(|| SequelError::Internal(format!("Concept edge {key} vanished")))?;
        Ok(EdgeUpsert::Existing(existing))
    }

    pub async fn get_by_pair(conn: &Connection, a: &str, b: &str) -> Result<Option<ConceptEdge>> {
        let mut rows = conn
            .query(
                &format!("SELECT {EDGE_COLUMNS} FROM concept_edges WHERE pair_key = ?1"),
                params![pair_key(a, b)],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_edge(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn for_node(conn: &Connection, node_id: &str) -> Result<Vec<ConceptEdge>> {
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {EDGE_COLUMNS} FROM concept_edges
                     WHERE source_id = ?1 OR target_id = ?1
                     ORDER BY rowid ASC"
                ),
                params![node_id],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_edge(&row)?);
        }

        Ok(results)
    }

    pub async fn list_all(conn: &Connection) -> Result<Vec<ConceptEdge>> {
        let mut rows = conn
            .query(
                &format!("SELECT {EDGE_COLUMNS} FROM concept_edges ORDER BY rowid ASC"),
                (),
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_edge(&row)?);
        }

        Ok(results)
    }

    fn row_to_edge(row: &libsql::Row) -> Result<ConceptEdge> {
        Ok(ConceptEdge {
            id: row.get(0)?,
            source_id: row.get(1)?,
            target_id: row.get(2)?,
            weight: row.get(3)?,
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(4)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}
