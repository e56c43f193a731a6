//! Turning conversation text into graph structure: concept extraction and
//! similarity linking.

mod concepts;
mod similarity;

pub use concepts::{
    is_failure_response, ConceptExtractor, FAILURE_PREFIXES, MAX_CONCEPTS, STOP_WORDS,
};
pub use similarity::{
    cosine_similarity, qualifying_pairs, tokenize, SimilarityLinker, TfIdf,
    DEFAULT_SIMILARITY_THRESHOLD,
};
