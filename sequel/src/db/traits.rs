use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ConceptEdge, ConceptNode, ConversationRecord, EdgeUpsert, NodeCategory};

/// Append-only log of chat turns.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a new turn. Never updates or merges with earlier records.
    async fn record_conversation(&self, message: &str, response: &str)
        -> Result<ConversationRecord>;
    /// Most recent turns, newest first.
    async fn recent_conversations(&self, limit: u32) -> Result<Vec<ConversationRecord>>;
    async fn count_conversations(&self) -> Result<u64>;
}

/// Concept nodes and undirected concept edges.
///
/// Implementations enforce label uniqueness and unordered-pair uniqueness at
/// the storage layer, so concurrent callers cannot create duplicates.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Return the node for `label`, creating it with default display metadata
    /// when absent.
    async fn resolve_node(&self, label: &str) -> Result<ConceptNode>;
    async fn get_node_by_label(&self, label: &str) -> Result<Option<ConceptNode>>;
    async fn set_node_category(&self, id: &str, category: NodeCategory) -> Result<()>;
    async fn count_nodes(&self) -> Result<u64>;

    /// Link `a` and `b` unless an edge already exists in either direction.
    /// An existing edge is returned untouched; its weight is never updated.
    async fn upsert_edge(&self, a: &str, b: &str, weight: f64) -> Result<EdgeUpsert>;
    /// Edges incident to `node_id`, whichever end it was stored on.
    async fn edges_for_node(&self, node_id: &str) -> Result<Vec<ConceptEdge>>;

    /// Every node and edge in insertion order.
    async fn fetch_all(&self) -> Result<(Vec<ConceptNode>, Vec<ConceptEdge>)>;
}

/// A complete database backend: the conversation log and the concept graph
/// behind one handle.
pub trait DatabaseBackend: ConversationStore + GraphStore {}
