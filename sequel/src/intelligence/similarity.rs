use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::db::GraphStore;
use crate::error::Result;
use crate::models::{ConceptNode, EdgeUpsert};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.1;

/// Tokens of two or more word characters.
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

fn token_regex() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is valid"))
}

pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// TF-IDF model fitted on a single batch of documents.
///
/// Raw term counts weighted by smoothed idf `ln((1 + n) / (1 + df)) + 1`,
/// each row L2-normalised.
#[derive(Debug, Clone)]
pub struct TfIdf {
    vocabulary: BTreeMap<String, usize>,
    vectors: Vec<Vec<f64>>,
}

impl TfIdf {
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| tokenize(doc.as_ref()))
            .collect();

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let mut unique: Vec<&String> = tokens.iter().collect();
            unique.sort();
            unique.dedup();
            for term in unique {
                *document_frequency.entry(term.clone()).or_default() += 1;
            }
        }

        let vocabulary: BTreeMap<String, usize> = document_frequency
            .keys()
            .enumerate()
            .map(|(index, term)| (term.clone(), index))
            .collect();

        let n = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .values()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = tokenized
            .iter()
            .map(|tokens| {
                let mut row = vec![0.0; vocabulary.len()];
                for term in tokens {
                    if let Some(&index) = vocabulary.get(term) {
                        row[index] += 1.0;
                    }
                }
                for (value, weight) in row.iter_mut().zip(&idf) {
                    *value *= weight;
                }
                normalize(&mut row);
                row
            })
            .collect();

        Self {
            vocabulary,
            vectors,
        }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vector(&self, index: usize) -> Option<&[f64]> {
        self.vectors.get(index).map(Vec::as_slice)
    }

    /// Cosine similarity between documents `i` and `j`.
    pub fn similarity(&self, i: usize, j: usize) -> f64 {
        match (self.vector(i), self.vector(j)) {
            (Some(a), Some(b)) => cosine_similarity(a, b),
            _ => 0.0,
        }
    }
}

fn normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in row.iter_mut() {
            *value /= norm;
        }
    }
}

/// Cosine similarity of two equal-length vectors. Zero vectors score 0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Index pairs `(i, j)` with `i < j` whose score is strictly above `threshold`.
pub fn qualifying_pairs(
    count: usize,
    threshold: f64,
    score: impl Fn(usize, usize) -> f64,
) -> Vec<(usize, usize, f64)> {
    let mut pairs = Vec::new();
    for i in 0..count {
        for j in (i + 1)..count {
            let similarity = score(i, j);
            if similarity > threshold {
                pairs.push((i, j, similarity));
            }
        }
    }
    pairs
}

/// Links the nodes of one extraction batch by label similarity.
#[derive(Debug, Clone)]
pub struct SimilarityLinker {
    threshold: f64,
}

impl Default for SimilarityLinker {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl SimilarityLinker {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score every unordered pair in `nodes`.
    pub fn score(&self, nodes: &[ConceptNode]) -> Vec<(usize, usize, f64)> {
        if nodes.len() < 2 {
            return Vec::new();
        }

        let labels: Vec<&str> = nodes.iter().map(|node| node.label.as_str()).collect();
        let model = TfIdf::fit(&labels);
        qualifying_pairs(nodes.len(), self.threshold, |i, j| model.similarity(i, j))
    }

    /// Upsert an edge for every qualifying pair, weighted by its similarity.
    pub async fn link<S>(&self, store: &S, nodes: &[ConceptNode]) -> Result<Vec<EdgeUpsert>>
    where
        S: GraphStore + ?Sized,
    {
        let pairs = self.score(nodes);
        let mut results = Vec::with_capacity(pairs.len());

        for (i, j, similarity) in pairs {
            let (a, b) = (&nodes[i], &nodes[j]);
            if a.id == b.id {
                continue;
            }
            let upsert = store.upsert_edge(&a.id, &b.id, similarity).await?;
            tracing::debug!(
                source = %a.label,
                target = %b.label,
                similarity,
                created = upsert.is_created(),
                "Linked concept pair"
            );
            results.push(upsert);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::{Database, LibSqlBackend};

    fn node(label: &str) -> ConceptNode {
        ConceptNode::new(format!("id-{label}"), label.to_string())
    }

    #[test]
    fn test_tokenize_lowercases_and_drops_single_chars() {
        assert_eq!(tokenize("Method Overloading A b"), vec!["method", "overloading"]);
    }

    #[test]
    fn test_disjoint_labels_score_zero() {
        let model = TfIdf::fit(&["Rome", "Italy"]);
        assert_eq!(model.similarity(0, 1), 0.0);
    }

    #[test]
    fn test_identical_documents_score_one() {
        let model = TfIdf::fit(&["Method Overloading", "Method Overloading"]);
        assert!((model.similarity(0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shared_term_matches_smoothed_idf() {
        // n = 2; "method" has df 2 (idf 1), the other terms df 1 (idf ln 1.5 + 1).
        let model = TfIdf::fit(&["Method Overloading", "Method Overriding"]);
        let rare = (1.5f64).ln() + 1.0;
        let expected = 1.0 / (1.0 + rare * rare);
        assert!((model.similarity(0, 1) - expected).abs() < 1e-12);
        assert_eq!(model.vocabulary_len(), 3);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let model = TfIdf::fit(&["Runtime Polymorphism", "Compile Time Polymorphism"]);
        for i in 0..2 {
            let norm: f64 = model.vector(i).unwrap().iter().map(|v| v * v).sum();
            assert!((norm - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let at_threshold = qualifying_pairs(2, 0.1, |_, _| 0.1);
        assert!(at_threshold.is_empty());

        let above = qualifying_pairs(2, 0.1, |_, _| 0.1000001);
        assert_eq!(above, vec![(0, 1, 0.1000001)]);
    }

    #[test]
    fn test_qualifying_pairs_are_unordered() {
        let pairs = qualifying_pairs(3, 0.0, |_, _| 0.5);
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|(i, j, _)| i < j));
    }

    #[test]
    fn test_score_needs_two_nodes() {
        let linker = SimilarityLinker::default();
        assert!(linker.score(&[]).is_empty());
        assert!(linker.score(&[node("Paris")]).is_empty());
    }

    #[test]
    fn test_score_links_shared_terms_only() {
        let linker = SimilarityLinker::default();
        let nodes = [
            node("Method Overloading"),
            node("Method Overriding"),
            node("Paris"),
        ];
        let pairs = linker.score(&nodes);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].0, pairs[0].1), (0, 1));
    }

    #[tokio::test]
    async fn test_link_persists_edges_once() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("file:{}", dir.path().join("link.db").display());
        let config = DatabaseConfig::new(url);
        let db = Database::new(&config).await.unwrap();
        let store = LibSqlBackend::new(db);

        let a = store.resolve_node("Method Overloading").await.unwrap();
        let b = store.resolve_node("Method Overriding").await.unwrap();
        let nodes = vec![a, b];

        let linker = SimilarityLinker::default();
        let first = linker.link(&store, &nodes).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(first[0].is_created());

        let second = linker.link(&store, &nodes).await.unwrap();
        assert!(!second[0].is_created());

        let (_, edges) = store.fetch_all().await.unwrap();
        assert_eq!(edges.len(), 1);
    }
}
