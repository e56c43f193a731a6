use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Colors cycled through for nodes that carry no category.
pub const NODE_PALETTE: [&str; 5] = ["#7C9FDF", "#B290D6", "#7ED1B8", "#F0E98C", "#D67E7E"];

/// Color stored on freshly created nodes.
pub const DEFAULT_NODE_COLOR: &str = "#B290D6";

pub const DEFAULT_NODE_SIZE: f64 = 1.0;

/// Categorical type tag used for display coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    /// Broad subject area
    Topic,
    /// Abstract idea within a topic
    Concept,
    /// Concrete method or practice
    Technique,
    /// Named person, place or thing
    Entity,
}

impl NodeCategory {
    pub fn color(&self) -> &'static str {
        match self {
            Self::Topic => NODE_PALETTE[0],
            Self::Concept => NODE_PALETTE[2],
            Self::Technique => NODE_PALETTE[3],
            Self::Entity => NODE_PALETTE[4],
        }
    }
}

impl std::fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Topic => write!(f, "topic"),
            Self::Concept => write!(f, "concept"),
            Self::Technique => write!(f, "technique"),
            Self::Entity => write!(f, "entity"),
        }
    }
}

impl std::str::FromStr for NodeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "topic" => Ok(Self::Topic),
            "concept" => Ok(Self::Concept),
            "technique" => Ok(Self::Technique),
            "entity" => Ok(Self::Entity),
            _ => Err(format!("Unknown node category: {s}")),
        }
    }
}

/// Persisted identity for a unique concept label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptNode {
    pub id: String,
    /// Natural key, unique and case-sensitive.
    pub label: String,
    pub size: f64,
    pub color: String,
    pub category: Option<NodeCategory>,
    pub created_at: DateTime<Utc>,
}

impl ConceptNode {
    pub fn new(id: String, label: String) -> Self {
        Self {
            id,
            label,
            size: DEFAULT_NODE_SIZE,
            color: DEFAULT_NODE_COLOR.to_string(),
            category: None,
            created_at: Utc::now(),
        }
    }

    /// Color shown to clients, given the node's position in insertion order.
    ///
    /// Categorised nodes use their category color. Uncategorised nodes keep an
    /// explicitly assigned color and otherwise cycle through [`NODE_PALETTE`].
    pub fn display_color(&self, position: usize) -> String {
        if let Some(category) = self.category {
            return category.color().to_string();
        }

        if self.color.is_empty() || self.color == DEFAULT_NODE_COLOR {
            NODE_PALETTE[position % NODE_PALETTE.len()].to_string()
        } else {
            self.color.clone()
        }
    }
}

/// Undirected weighted relation between two concept nodes.
///
/// `source_id`/`target_id` keep the direction the edge was first written in,
/// but the pair is unique regardless of direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
}

impl ConceptEdge {
    pub fn new(id: String, source_id: String, target_id: String, weight: f64) -> Self {
        Self {
            id,
            source_id,
            target_id,
            weight,
            created_at: Utc::now(),
        }
    }

    pub fn pair_key(&self) -> String {
        pair_key(&self.source_id, &self.target_id)
    }

    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source_id == a && self.target_id == b) || (self.source_id == b && self.target_id == a)
    }
}

/// Canonical key for the unordered pair `{a, b}`.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}:{b}")
    } else {
        format!("{b}:{a}")
    }
}

/// Outcome of an edge upsert.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeUpsert {
    Created(ConceptEdge),
    /// The pair was already linked; the stored edge is returned unchanged.
    Existing(ConceptEdge),
}

impl EdgeUpsert {
    pub fn edge(&self) -> &ConceptEdge {
        match self {
            Self::Created(edge) | Self::Existing(edge) => edge,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Full graph snapshot in insertion order.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    pub nodes: Vec<ConceptNode>,
    pub edges: Vec<ConceptEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_independent() {
        assert_eq!(pair_key("a", "b"), pair_key("b", "a"));
        assert_eq!(pair_key("node_2", "node_1"), "node_1:node_2");
    }

    #[test]
    fn test_edge_connects_both_directions() {
        let edge = ConceptEdge::new("e1".into(), "n1".into(), "n2".into(), 0.5);
        assert!(edge.connects("n1", "n2"));
        assert!(edge.connects("n2", "n1"));
        assert!(!edge.connects("n1", "n3"));
    }

    #[test]
    fn test_new_node_defaults() {
        let node = ConceptNode::new("n1".into(), "Paris".into());
        assert_eq!(node.size, 1.0);
        assert_eq!(node.color, DEFAULT_NODE_COLOR);
        assert!(node.category.is_none());
    }

    #[test]
    fn test_display_color_cycles_palette_for_default_color() {
        let node = ConceptNode::new("n1".into(), "Paris".into());
        assert_eq!(node.display_color(0), "#7C9FDF");
        assert_eq!(node.display_color(2), "#7ED1B8");
        assert_eq!(node.display_color(7), "#7ED1B8");
    }

    #[test]
    fn test_display_color_prefers_category() {
        let mut node = ConceptNode::new("n1".into(), "Overriding".into());
        node.category = Some(NodeCategory::Technique);
        assert_eq!(node.display_color(0), NodeCategory::Technique.color());
    }

    #[test]
    fn test_display_color_keeps_explicit_color() {
        let mut node = ConceptNode::new("n1".into(), "Rome".into());
        node.color = "#123456".to_string();
        assert_eq!(node.display_color(3), "#123456");
    }

    #[test]
    fn test_node_category_round_trip_through_str() {
        for category in [
            NodeCategory::Topic,
            NodeCategory::Concept,
            NodeCategory::Technique,
            NodeCategory::Entity,
        ] {
            assert_eq!(category.to_string().parse::<NodeCategory>(), Ok(category));
        }
        assert!("planet".parse::<NodeCategory>().is_err());
    }
}
