use std::collections::HashMap;
use std::sync::Arc;

use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::intelligence::{ConceptExtractor, SimilarityLinker};
use crate::llm::CompletionClient;
use crate::models::{ConceptNode, ConversationRecord};

/// Everything one chat turn produced.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub record: ConversationRecord,
    pub response: String,
    pub concepts: Vec<String>,
    pub nodes: Vec<ConceptNode>,
    pub edges_created: usize,
}

pub struct ChatService {
    db: Arc<dyn DatabaseBackend>,
    completion: CompletionClient,
    extractor: ConceptExtractor,
    linker: SimilarityLinker,
}

impl ChatService {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        completion: CompletionClient,
        extractor: ConceptExtractor,
        linker: SimilarityLinker,
    ) -> Self {
        Self {
            db,
            completion,
            extractor,
            linker,
        }
    }

    /// Run one turn: complete, log, extract, resolve, link.
    ///
    /// A failed completion is still logged; it just contributes nothing to
    /// the graph. Storage errors abort the turn.
    pub async fn handle_turn(&self, message: &str) -> Result<ChatTurn> {
        let response = self.completion.complete(message).await;

        let record = self.db.record_conversation(message, &response).await?;

        let concepts = self.extractor.extract(message, &response);
        let nodes = self.resolve_batch(&concepts).await?;

        let edges_created = self
            .linker
            .link(self.db.as_ref(), &nodes)
            .await?
            .iter()
            .filter(|upsert| upsert.is_created())
            .count();

        tracing::info!(
            conversation_id = %record.id,
            concepts = concepts.len(),
            edges_created,
            "Processed chat turn"
        );

        Ok(ChatTurn {
            record,
            response,
            concepts,
            nodes,
            edges_created,
        })
    }

    async fn resolve_batch(&self, labels: &[String]) -> Result<Vec<ConceptNode>> {
        let mut cache: HashMap<&str, ConceptNode> = HashMap::with_capacity(labels.len());
        let mut nodes = Vec::with_capacity(labels.len());

        for label in labels {
            let node = match cache.get(label.as_str()) {
                Some(node) => node.clone(),
                None => {
                    let node = self.db.resolve_node(label).await?;
                    cache.insert(label.as_str(), node.clone());
                    node
                }
            };
            if !nodes.iter().any(|existing: &ConceptNode| existing.id == node.id) {
                nodes.push(node);
            }
        }

        Ok(nodes)
    }
}
