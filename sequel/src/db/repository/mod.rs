mod concept_edges;
mod concept_nodes;
mod conversations;

pub use concept_edges::ConceptEdgeRepository;
pub use concept_nodes::ConceptNodeRepository;
pub use conversations::ConversationRepository;
