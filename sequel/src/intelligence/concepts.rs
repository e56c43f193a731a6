//! Heuristic concept extraction.
//!
//! A concept is a maximal run of capitalized words ("Paris", "Method
//! Overloading"). No linguistic analysis is attempted.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Maximal runs of `Xxxx` words separated by whitespace.
const CONCEPT_PATTERN: &str = r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b";

/// Capitalized pronouns and demonstratives that are never concepts.
pub const STOP_WORDS: [&str; 11] = [
    "I", "You", "He", "She", "It", "We", "They", "This", "That", "These", "Those",
];

/// Literal starts of responses produced by a failed completion call.
pub const FAILURE_PREFIXES: [&str; 4] = [
    "Error processing request:",
    "API Error",
    "Unexpected response format",
    "I'm sorry",
];

pub const MAX_CONCEPTS: usize = 5;

fn concept_regex() -> &'static Regex {
    static CONCEPT_REGEX: OnceLock<Regex> = OnceLock::new();
    CONCEPT_REGEX.get_or_init(|| Regex::new(CONCEPT_PATTERN).expect("concept pattern is valid"))
}

/// Whether `response` is the rendered text of a failed completion.
pub fn is_failure_response(response: &str) -> bool {
    let trimmed = response.trim_start();
    FAILURE_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
}

#[derive(Debug, Clone)]
pub struct ConceptExtractor {
    max_concepts: usize,
}

impl Default for ConceptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConceptExtractor {
    pub fn new() -> Self {
        Self {
            max_concepts: MAX_CONCEPTS,
        }
    }

    /// Up to five distinct concept labels from one turn, in order of first
    /// appearance. Failed turns yield nothing.
    pub fn extract(&self, message: &str, response: &str) -> Vec<String> {
        if is_failure_response(response) {
            tracing::debug!("Skipping concept extraction for failed completion");
            return Vec::new();
        }

        let combined = format!("{message} {response}");

        let mut seen = HashSet::new();
        let mut concepts = Vec::new();

        for found in concept_regex().find_iter(&combined) {
            let label = found.as_str().split_whitespace().collect::<Vec<_>>().join(" ");

            if STOP_WORDS.contains(&label.as_str()) {
                continue;
            }

            if seen.insert(label.clone()) {
                concepts.push(label);
                if concepts.len() == self.max_concepts {
                    break;
                }
            }
        }

        concepts
    }
}
