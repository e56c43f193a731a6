use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::intelligence::{ConceptExtractor, SimilarityLinker};
use crate::llm::CompletionClient;
use crate::services::{ChatService, GraphService};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseBackend>,
    pub completion: CompletionClient,
    pub chat: Arc<ChatService>,
    pub graph: Arc<GraphService>,
}

impl AppState {
    pub fn new(config: &Config, db: Arc<dyn DatabaseBackend>, completion: CompletionClient) -> Self {
        let chat = ChatService::new(
            db.clone(),
            completion.clone(),
            ConceptExtractor::new(),
            SimilarityLinker::new(config.graph.similarity_threshold),
        );
        let graph = GraphService::new(db.clone());

        Self {
            db,
            completion,
            chat: Arc::new(chat),
            graph: Arc::new(graph),
        }
    }
}
