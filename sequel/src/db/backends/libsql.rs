use crate::db::connection::Database;
use crate::db::repository::{ConceptEdgeRepository, ConceptNodeRepository, ConversationRepository};
use crate::db::traits::{ConversationStore, DatabaseBackend, GraphStore};
use crate::error::Result;
use crate::models::{ConceptEdge, ConceptNode, ConversationRecord, EdgeUpsert, NodeCategory};
use async_trait::async_trait;

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConversationStore for LibSqlBackend {
    async fn record_conversation(
        &self,
        message: &str,
        response: &str,
    ) -> Result<ConversationRecord> {
        let conn = self.db.connect().await?;
        ConversationRepository::create(&conn, message, response).await
    }
    async fn recent_conversations(&self, limit: u32) -> Result<Vec<ConversationRecord>> {
        let conn = self.db.connect().await?;
        ConversationRepository::recent(&conn, limit).await
    }
    async fn count_conversations(&self) -> Result<u64> {
        let conn = self.db.connect().await?;
        ConversationRepository::count(&conn).await
    }
}

#[async_trait]
impl GraphStore for LibSqlBackend {
    async fn resolve_node(&self, label: &str) -> Result<ConceptNode> {
        let conn = self.db.connect().await?;
        ConceptNodeRepository::resolve(&conn, label).await
    }
    async fn get_node_by_label(&self, label: &str) -> Result<Option<ConceptNode>> {
        let conn = self.db.connect().await?;
        ConceptNodeRepository::get_by_label(&conn, label).await
    }
    async fn set_node_category(&self, id: &str, category: NodeCategory) -> Result<()> {
        let conn = self.db.connect().await?;
        ConceptNodeRepository::set_category(&conn, id, category).await
    }
    async fn count_nodes(&self) -> Result<u64> {
        let conn = self.db.connect().await?;
        ConceptNodeRepository::count(&conn).await
    }
    async fn upsert_edge(&self, a: &str, b: &str, weight: f64) -> Result<EdgeUpsert> {
        let conn = self.db.connect().await?;
        ConceptEdgeRepository::upsert(&conn, a, b, weight).await
    }
    async fn edges_for_node(&self, node_id: &str) -> Result<Vec<ConceptEdge>> {
        let conn = self.db.connect().await?;
        ConceptEdgeRepository::for_node(&conn, node_id).await
    }
    async fn fetch_all(&self) -> Result<(Vec<ConceptNode>, Vec<ConceptEdge>)> {
        let conn = self.db.connect().await?;
        let nodes = ConceptNodeRepository::list_all(&conn).await?;
        let edges = ConceptEdgeRepository::list_all(&conn).await?;
        Ok((nodes, edges))
    }
}

impl DatabaseBackend for LibSqlBackend {}
