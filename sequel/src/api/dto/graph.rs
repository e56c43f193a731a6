use serde::Serialize;

use crate::models::{ConceptEdge, ConceptNode, GraphSnapshot};

/// A concept node as rendered by the graph view.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct NodeDto {
    pub id: String,
    pub label: String,
    pub size: f64,
    pub color: String,
}

impl From<ConceptNode> for NodeDto {
    fn from(node: ConceptNode) -> Self {
        Self {
            id: node.id,
            label: node.label,
            size: node.size,
            color: node.color,
        }
    }
}

/// An undirected concept edge. `source`/`target` keep the stored direction.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct EdgeDto {
    pub id: String,
    pub source: String,
    pub target: String,
    pub weight: f64,
}

impl From<ConceptEdge> for EdgeDto {
    fn from(edge: ConceptEdge) -> Self {
        Self {
            id: edge.id,
            source: edge.source_id,
            target: edge.target_id,
            weight: edge.weight,
        }
    }
}

/// Response body for `GET /api/graph_data`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct GraphDataResponse {
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
}

impl From<GraphSnapshot> for GraphDataResponse {
    fn from(snapshot: GraphSnapshot) -> Self {
        Self {
            nodes: snapshot.nodes.into_iter().map(NodeDto::from).collect(),
            edges: snapshot.edges.into_iter().map(EdgeDto::from).collect(),
        }
    }
}
