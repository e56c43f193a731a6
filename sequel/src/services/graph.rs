use std::sync::Arc;

use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::models::{GraphSnapshot, NodeCategory};

/// Demonstration graph created on an empty database.
const SAMPLE_CONCEPTS: [(&str, NodeCategory); 6] = [
    ("Runtime Polymorphism", NodeCategory::Concept),
    ("Compile time polymorphism", NodeCategory::Concept),
    ("Method Overloading", NodeCategory::Technique),
    ("Overriding", NodeCategory::Technique),
    ("Memory allocation", NodeCategory::Topic),
    ("Accessing through heap stack", NodeCategory::Technique),
];

/// `(source, target, weight)` as indexes into [`SAMPLE_CONCEPTS`].
const SAMPLE_EDGES: [(usize, usize, f64); 5] = [
    (0, 1, 0.8),
    (1, 2, 0.7),
    (0, 3, 0.6),
    (0, 4, 0.5),
    (4, 5, 0.4),
];

pub struct GraphService {
    db: Arc<dyn DatabaseBackend>,
}

impl GraphService {
    pub fn new(db: Arc<dyn DatabaseBackend>) -> Self {
        Self { db }
    }

    /// Every node and edge, with node colors resolved for display.
    pub async fn graph_data(&self) -> Result<GraphSnapshot> {
        let (mut nodes, edges) = self.db.fetch_all().await?;

        for (position, node) in nodes.iter_mut().enumerate() {
            node.color = node.display_color(position);
        }

        Ok(GraphSnapshot { nodes, edges })
    }

    /// Populate the sample graph. Returns `false` when nodes already exist.
    pub async fn seed_sample_graph(&self) -> Result<bool> {
        if self.db.count_nodes().await? > 0 {
            return Ok(false);
        }

        let mut ids = Vec::with_capacity(SAMPLE_CONCEPTS.len());
        for (label, category) in SAMPLE_CONCEPTS {
            let node = self.db.resolve_node(label).await?;
            self.db.set_node_category(&node.id, category).await?;
            ids.push(node.id);
        }

        for (source, target, weight) in SAMPLE_EDGES {
            self.db.upsert_edge(&ids[source], &ids[target], weight).await?;
        }

        tracing::info!(
            nodes = SAMPLE_CONCEPTS.len(),
            edges = SAMPLE_EDGES.len(),
            "Seeded sample concept graph"
        );
        Ok(true)
    }
}
