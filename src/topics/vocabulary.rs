// Vocabulary ranking over cleaned comment documents.
//
// Uses the `keyword_extraction` crate's TF-IDF with each comment as a
// separate document: terms that show up in every comment get downweighted,
// terms distinctive to pockets of discussion get boosted. The ranked list
// is what an external factorization consumes as its fitted vocabulary.

use anyhow::Result;
use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use stop_words::{get, LANGUAGE};
use tracing::info;

/// Vocabulary terms with their TF-IDF scores, descending.
#[derive(Debug, Clone)]
pub struct RankedVocabulary {
    pub terms: Vec<String>,
    pub scores: Vec<f32>,
}

impl RankedVocabulary {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Rank up to `top_n` vocabulary terms over the given documents.
pub fn ranked_vocabulary(documents: &[String], top_n: usize) -> Result<RankedVocabulary> {
    if documents.is_empty() {
        anyhow::bail!("No documents to rank — collect and clean comments first");
    }

    // The extractor does its own stop-word pass; harmless after ours.
    let stop_words: Vec<String> = get(LANGUAGE::English);

    let params = TfIdfParams::UnprocessedDocuments(documents, &stop_words, None);
    let tfidf = TfIdf::new(params);

    let ranked: Vec<(String, f32)> = tfidf.get_ranked_word_scores(top_n);

    if ranked.is_empty() {
        anyhow::bail!(
            "TF-IDF produced no terms from {} documents — they may be empty after cleaning",
            documents.len()
        );
    }

    info!(
        terms = ranked.len(),
        top_term = %ranked[0].0,
        "Ranked vocabulary"
    );

    let (terms, scores) = ranked.into_iter().unzip();
    Ok(RankedVocabulary { terms, scores })
}
