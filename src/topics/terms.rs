// Per-topic top-term extraction from a trained factor matrix.
//
// The factorization itself happens outside this crate; what arrives here
// is its components matrix (one weight row per topic, one column per
// vocabulary term) plus the fitted vocabulary.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The k heaviest terms for one topic, descending weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicWordSet {
    pub topic: usize,
    pub terms: Vec<String>,
}

/// A trained topic model as exported by the modeling side: the fitted
/// vocabulary and the components matrix.
#[derive(Debug, Deserialize)]
pub struct TrainedTopics {
    pub vocabulary: Vec<String>,
    pub components: Vec<Vec<f64>>,
}

impl TrainedTopics {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read weights file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse weights file {}", path.display()))
    }
}

/// The k vocabulary terms with the largest weight, descending.
///
/// Ties keep ascending vocabulary index (stable sort), so output is
/// deterministic. Weight and vocabulary lengths may differ; the overlap
/// is used.
pub fn top_terms(weights: &[f64], vocabulary: &[String], k: usize) -> Vec<String> {
    let n = weights.len().min(vocabulary.len());
    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by(|&a, &b| {
        weights[b]
            .partial_cmp(&weights[a])
            .unwrap_or(Ordering::Equal)
    });
    indices
        .into_iter()
        .take(k)
        .map(|i| vocabulary[i].clone())
        .collect()
}

/// One [`TopicWordSet`] per components row.
pub fn topic_word_sets(trained: &TrainedTopics, k: usize) -> Vec<TopicWordSet> {
    trained
        .components
        .iter()
        .enumerate()
        .map(|(topic, weights)| TopicWordSet {
            topic,
            terms: top_terms(weights, &trained.vocabulary, k),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn terms_come_back_heaviest_first() {
        let vocabulary = vocab(&["low", "high", "mid"]);
        let weights = [0.1, 0.9, 0.5];
        assert_eq!(top_terms(&weights, &vocabulary, 3), vocab(&["high", "mid", "low"]));
    }

    #[test]
    fn ties_break_by_vocabulary_index() {
        let vocabulary = vocab(&["b", "a", "c", "d"]);
        let weights = [0.5, 0.5, 0.9, 0.5];
        // "c" wins, then the three tied terms keep vocabulary order.
        assert_eq!(
            top_terms(&weights, &vocabulary, 4),
            vocab(&["c", "b", "a", "d"])
        );
    }

    #[test]
    fn k_larger_than_vocabulary_is_clamped() {
        let vocabulary = vocab(&["only", "two"]);
        let weights = [0.2, 0.4];
        assert_eq!(top_terms(&weights, &vocabulary, 10), vocab(&["two", "only"]));
    }

    #[test]
    fn length_mismatch_uses_the_overlap() {
        let vocabulary = vocab(&["a", "b", "c"]);
        let weights = [0.9, 0.1]; // shorter than the vocabulary
        assert_eq!(top_terms(&weights, &vocabulary, 5), vocab(&["a", "b"]));
    }

    #[test]
    fn one_word_set_per_topic_row() {
        let trained = TrainedTopics {
            vocabulary: vocab(&["rollback", "netcode", "juggle", "combo"]),
            components: vec![vec![0.1, 0.2, 0.9, 0.8], vec![0.9, 0.8, 0.0, 0.1]],
        };
        let sets = topic_word_sets(&trained, 2);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].topic, 0);
        assert_eq!(sets[0].terms, vocab(&["juggle", "combo"]));
        assert_eq!(sets[1].terms, vocab(&["rollback", "netcode"]));
    }
}
